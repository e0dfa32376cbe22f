/*!
 * Device Session
 *
 * Owns everything shared by the resources of one device: the slot allocator,
 * the IO backend and the event translator. Resources hold an
 * `Arc<DeviceHandle>`, so the session lives until its last resource is gone.
 *
 * # Example
 *
 * ```ignore
 * let session = DeviceSession::builder()
 *     .with_config(SessionConfig::small())
 *     .build()?;
 * let mut combo = session.combo_event(TileLocation::new(1, 1), ModuleKind::Core)?;
 * ```
 */

use crate::bitmap::{BitmapAllocator, BitmapStats};
use crate::core::config::SessionConfig;
use crate::core::errors::{RscError, RscResult};
use crate::core::types::{GridGeometry, ModuleKind, TileLocation};
use crate::event::{EventTranslator, RegisterTranslator};
use crate::io::{backend_for, DeviceIo};
use crate::monitoring::session_span;
use crate::resource::ComboEvent;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use tracing::{info, warn, Span};
use uuid::Uuid;

/// Shared per-device state handed to every resource
pub struct DeviceHandle {
    id: Uuid,
    config: SessionConfig,
    io: Arc<dyn DeviceIo>,
    translator: Arc<dyn EventTranslator>,
    allocator: Mutex<BitmapAllocator>,
    span: Span,
}

impl DeviceHandle {
    #[inline]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[inline]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[inline]
    pub fn geometry(&self) -> GridGeometry {
        self.config.geometry()
    }

    #[inline]
    pub fn io(&self) -> &dyn DeviceIo {
        self.io.as_ref()
    }

    #[inline]
    pub fn translator(&self) -> &dyn EventTranslator {
        self.translator.as_ref()
    }

    /// Exclusive access to the slot allocator.
    ///
    /// Hold the guard for the whole of a multi-slot acquisition so it is
    /// atomic with respect to other resources.
    #[inline]
    pub fn allocator(&self) -> MutexGuard<'_, BitmapAllocator> {
        self.allocator.lock()
    }

    pub fn stats(&self) -> BitmapStats {
        self.allocator.lock().stats()
    }

    /// Tracing span carrying the session id
    #[inline]
    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Drop for DeviceHandle {
    fn drop(&mut self) {
        let _entered = self.span.enter();
        let used = self.allocator.get_mut().stats().total_used();
        if used > 0 {
            warn!(used, "Session closing with slots still allocated");
        }
        if let Err(e) = self.io.finish() {
            warn!(error = %e, "IO backend finish failed");
        }
        info!("Device session closed");
    }
}

/// Builder for [`DeviceSession`]
#[derive(Default)]
pub struct DeviceSessionBuilder {
    config: Option<SessionConfig>,
    io: Option<Arc<dyn DeviceIo>>,
    translator: Option<Arc<dyn EventTranslator>>,
}

impl DeviceSessionBuilder {
    #[must_use]
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use this backend instead of the one named in the config
    #[must_use]
    pub fn with_io(mut self, io: Arc<dyn DeviceIo>) -> Self {
        self.io = Some(io);
        self
    }

    /// Use this translator instead of a [`RegisterTranslator`] over the backend
    #[must_use]
    pub fn with_translator(mut self, translator: Arc<dyn EventTranslator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn build(self) -> RscResult<DeviceSession> {
        let config = self.config.unwrap_or_default();
        config
            .validate()
            .map_err(|e| RscError::invalid_argument(e.to_string()))?;

        let id = Uuid::new_v4();
        let span = session_span(id);
        let _entered = span.enter();

        let io = self.io.unwrap_or_else(|| backend_for(config.backend));
        io.init(config.base_addr)?;

        let translator = match self.translator {
            Some(translator) => translator,
            None => {
                let translator = RegisterTranslator::new(io.clone());
                if config.verify_writes {
                    Arc::new(translator.with_verification(config.poll_timeout_us))
                } else {
                    Arc::new(translator)
                }
            }
        };

        info!(
            backend = %io.backend(),
            columns = config.columns,
            rows = config.rows_per_column,
            slots_per_tile = config.combo_slots_per_tile,
            "Device session opened"
        );

        let allocator = Mutex::new(BitmapAllocator::new(config.geometry()));
        drop(_entered);

        Ok(DeviceSession {
            handle: Arc::new(DeviceHandle {
                id,
                config,
                io,
                translator,
                allocator,
                span,
            }),
        })
    }
}

/// One open device
#[derive(Clone)]
pub struct DeviceSession {
    handle: Arc<DeviceHandle>,
}

impl DeviceSession {
    pub fn builder() -> DeviceSessionBuilder {
        DeviceSessionBuilder::default()
    }

    /// Open a session with the backend named in `config`
    pub fn open(config: SessionConfig) -> RscResult<Self> {
        Self::builder().with_config(config).build()
    }

    #[inline]
    pub fn handle(&self) -> &Arc<DeviceHandle> {
        &self.handle
    }

    /// Create a combo event resource bound to a tile module
    pub fn combo_event(&self, loc: TileLocation, module: ModuleKind) -> RscResult<ComboEvent> {
        ComboEvent::new(Arc::clone(&self.handle), loc, module)
    }

    pub fn stats(&self) -> BitmapStats {
        self.handle.stats()
    }
}
