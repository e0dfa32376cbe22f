/*!
 * Resource Lifecycle
 *
 * State machine shared by every tile resource kind:
 *
 * ```text
 * Uninitialized --initialize--> Initialized --configure--> Configured
 *     --reserve--> Reserved --start--> Started --stop--> Reserved
 *     --release--> Initialized
 * ```
 *
 * The transition table below is the single source of truth; a call from any
 * other state fails with `InvalidState` before anything is touched.
 */

use crate::core::errors::{RscError, RscResult};
use crate::core::types::{GridGeometry, ModuleKind, TileLocation};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Lifecycle state of a tile resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceState {
    Uninitialized,
    Initialized,
    Configured,
    Reserved,
    Started,
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceState::Uninitialized => write!(f, "UNINITIALIZED"),
            ResourceState::Initialized => write!(f, "INITIALIZED"),
            ResourceState::Configured => write!(f, "CONFIGURED"),
            ResourceState::Reserved => write!(f, "RESERVED"),
            ResourceState::Started => write!(f, "STARTED"),
        }
    }
}

/// Resource kinds built on the shared lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ResourceKind {
    ComboEvent,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::ComboEvent => write!(f, "combo event"),
        }
    }
}

/// Lifecycle operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Initialize,
    Configure,
    Reserve,
    Start,
    Stop,
    Release,
}

impl Transition {
    /// States the operation may be called from
    pub const fn sources(&self) -> &'static [ResourceState] {
        use ResourceState::*;
        match self {
            Transition::Initialize => &[Uninitialized],
            Transition::Configure => &[Initialized, Configured],
            Transition::Reserve => &[Configured],
            Transition::Start => &[Reserved],
            Transition::Stop => &[Started],
            Transition::Release => &[Reserved],
        }
    }

    /// State reached on success
    pub const fn target(&self) -> ResourceState {
        match self {
            Transition::Initialize => ResourceState::Initialized,
            Transition::Configure => ResourceState::Configured,
            Transition::Reserve => ResourceState::Reserved,
            Transition::Start => ResourceState::Started,
            Transition::Stop => ResourceState::Reserved,
            Transition::Release => ResourceState::Initialized,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Transition::Initialize => "initialize",
            Transition::Configure => "configure",
            Transition::Reserve => "reserve",
            Transition::Start => "start",
            Transition::Stop => "stop",
            Transition::Release => "release",
        }
    }
}

/// State plus tile binding, embedded in each concrete resource
#[derive(Debug, Clone)]
pub struct Lifecycle {
    kind: ResourceKind,
    state: ResourceState,
    binding: Option<(TileLocation, ModuleKind)>,
}

impl Lifecycle {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            state: ResourceState::Uninitialized,
            binding: None,
        }
    }

    #[inline]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    #[inline]
    pub fn state(&self) -> ResourceState {
        self.state
    }

    #[inline]
    pub fn location(&self) -> Option<TileLocation> {
        self.binding.map(|(loc, _)| loc)
    }

    #[inline]
    pub fn module(&self) -> Option<ModuleKind> {
        self.binding.map(|(_, module)| module)
    }

    /// Tile and module the resource is bound to
    pub fn binding(&self) -> RscResult<(TileLocation, ModuleKind)> {
        self.binding.ok_or(RscError::InvalidState {
            operation: "use",
            state: self.state,
        })
    }

    /// Bind to a tile module, validating the pairing against the grid
    pub fn initialize(
        &mut self,
        geometry: GridGeometry,
        loc: TileLocation,
        module: ModuleKind,
    ) -> RscResult<()> {
        self.check(Transition::Initialize)?;
        if !geometry.contains(loc) {
            return Err(RscError::invalid_argument(format!(
                "tile {} is outside the grid",
                loc
            )));
        }
        if !module.fits(loc) {
            return Err(RscError::invalid_argument(format!(
                "{} has no {} module",
                loc, module
            )));
        }
        self.binding = Some((loc, module));
        self.advance(Transition::Initialize);
        Ok(())
    }

    /// Fail with `InvalidState` unless `transition` may run now
    pub fn check(&self, transition: Transition) -> RscResult<()> {
        if transition.sources().contains(&self.state) {
            Ok(())
        } else {
            Err(RscError::InvalidState {
                operation: transition.name(),
                state: self.state,
            })
        }
    }

    /// Record a completed transition
    pub fn advance(&mut self, transition: Transition) {
        let from = self.state;
        self.state = transition.target();
        trace!(
            kind = %self.kind,
            op = transition.name(),
            from = %from,
            to = %self.state,
            "Resource state changed"
        );
    }
}
