/*!
 * Session Configuration
 *
 * Device session settings: grid geometry, IO backend, poll timing.
 * Loaded from defaults, an optional JSON file, and environment overrides.
 */

use super::errors::ConfigError;
use super::limits::*;
use super::types::GridGeometry;
use crate::io::BackendKind;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Environment variable selecting the IO backend (`sim` or `noop`)
pub const ENV_BACKEND: &str = "AIE_RSC_BACKEND";

/// Environment variable overriding the verification poll timeout
pub const ENV_POLL_TIMEOUT_US: &str = "AIE_RSC_POLL_TIMEOUT_US";

/// Environment variable enabling write verification
pub const ENV_VERIFY_WRITES: &str = "AIE_RSC_VERIFY_WRITES";

/// Configuration for one device session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Array columns (default: 50)
    pub columns: u8,

    /// Core/memory rows per column (default: 8)
    pub rows_per_column: u8,

    /// Combo slots per tile per module (default: 4)
    pub combo_slots_per_tile: u32,

    /// IO backend bound to the session (default: sim)
    pub backend: BackendKind,

    /// Device base address handed to the backend
    pub base_addr: u64,

    /// Bound for verification polls in microseconds (default: 1000)
    pub poll_timeout_us: u32,

    /// Read back combo control registers after programming
    pub verify_writes: bool,
}

impl SessionConfig {
    /// Create default configuration
    pub fn new() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows_per_column: DEFAULT_ROWS_PER_COLUMN,
            combo_slots_per_tile: COMBO_SLOTS_PER_TILE,
            backend: BackendKind::Sim,
            base_addr: DEFAULT_BASE_ADDR,
            poll_timeout_us: DEFAULT_POLL_TIMEOUT_US,
            verify_writes: false,
        }
    }

    /// Small 4x4 grid, handy for tests
    pub fn small() -> Self {
        Self {
            columns: 4,
            rows_per_column: 4,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    #[must_use]
    pub fn with_verify_writes(mut self, verify: bool) -> Self {
        self.verify_writes = verify;
        self
    }

    #[must_use]
    pub fn with_poll_timeout_us(mut self, timeout_us: u32) -> Self {
        self.poll_timeout_us = timeout_us;
        self
    }

    pub fn geometry(&self) -> GridGeometry {
        GridGeometry::new(self.columns, self.rows_per_column, self.combo_slots_per_tile)
    }

    /// Load a JSON config file; missing keys take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: SessionConfig = serde_json::from_str(&raw)?;
        debug!(path = %path.as_ref().display(), "Loaded session config");
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides on top of this configuration
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    pub(crate) fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_BACKEND) {
            self.backend = value.parse().map_err(|reason| ConfigError::Invalid {
                field: "backend",
                reason,
            })?;
        }

        if let Some(value) = lookup(ENV_POLL_TIMEOUT_US) {
            self.poll_timeout_us = value.trim().parse().map_err(|e| ConfigError::Invalid {
                field: "poll_timeout_us",
                reason: format!("{}: {}", value, e),
            })?;
        }

        if let Some(value) = lookup(ENV_VERIFY_WRITES) {
            self.verify_writes = matches!(value.trim(), "1" | "true" | "yes");
        }

        self.validate()?;
        Ok(self)
    }

    /// Reject geometries the allocator cannot lay out
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 {
            return Err(ConfigError::Invalid {
                field: "columns",
                reason: "must be at least 1".into(),
            });
        }
        if self.rows_per_column == 0 {
            return Err(ConfigError::Invalid {
                field: "rows_per_column",
                reason: "must be at least 1".into(),
            });
        }
        if self.combo_slots_per_tile == 0
            || self.combo_slots_per_tile % 2 != 0
            || self.combo_slots_per_tile > MAX_COMBO_SLOTS_PER_TILE
        {
            return Err(ConfigError::Invalid {
                field: "combo_slots_per_tile",
                reason: format!(
                    "{} is not an even count between 2 and {}",
                    self.combo_slots_per_tile, MAX_COMBO_SLOTS_PER_TILE
                ),
            });
        }
        if self.poll_timeout_us == 0 {
            warn!("poll_timeout_us of 0 is treated as {}", MIN_POLL_TIMEOUT_US);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}
