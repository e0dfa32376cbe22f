/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use super::types::{ModuleKind, TileLocation};
use crate::io::IoError;
use crate::resource::ResourceState;
use miette::Diagnostic;
use thiserror::Error;

/// Common result type for resource operations
pub type RscResult<T> = Result<T, RscError>;

/// Resource manager errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum RscError {
    #[error("Invalid argument: {0}")]
    #[diagnostic(
        code(rsc::invalid_argument),
        help("Check event/operator counts and that the module exists at the requested tile.")
    )]
    InvalidArgument(String),

    #[error("Cannot {operation} resource in state {state}")]
    #[diagnostic(
        code(rsc::invalid_state),
        help("Lifecycle is initialize -> configure -> reserve -> start -> stop -> release.")
    )]
    InvalidState {
        operation: &'static str,
        state: ResourceState,
    },

    #[error("No free {module} slot at tile {location}: requested {requested}, available {available}")]
    #[diagnostic(
        code(rsc::resource_exhausted),
        help("Release another resource on this tile or pick a different tile. Retrying is safe.")
    )]
    ResourceExhausted {
        module: ModuleKind,
        location: TileLocation,
        requested: u32,
        available: u32,
    },

    #[error("Failed to program combo channel {channel}: {reason}")]
    #[diagnostic(
        code(rsc::hardware_programming_failed),
        help("Channels touched by this call were restored; the resource keeps its previous state.")
    )]
    HardwareProgrammingFailed { channel: u8, reason: String },

    #[error("Poll timed out after {timeout_us}us at offset 0x{offset:x}")]
    #[diagnostic(code(rsc::poll_timeout))]
    PollTimeout { offset: u64, timeout_us: u32 },

    #[error("Invalid event {event} for {module} module at tile {location}")]
    #[diagnostic(
        code(rsc::invalid_event),
        help("Logical events must belong to the module's event range.")
    )]
    InvalidEvent {
        event: u32,
        module: ModuleKind,
        location: TileLocation,
    },

    #[error("Resource has no configuration")]
    #[diagnostic(code(rsc::not_configured), help("Call set_events() first."))]
    NotConfigured,

    #[error("Resource is not reserved")]
    #[diagnostic(code(rsc::not_reserved), help("Call reserve() first."))]
    NotReserved,

    #[error("IO backend unavailable: {0}")]
    #[diagnostic(code(rsc::invalid_backend))]
    InvalidBackend(String),
}

impl RscError {
    #[inline]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        RscError::InvalidArgument(msg.into())
    }
}

impl From<IoError> for RscError {
    fn from(err: IoError) -> Self {
        match err {
            IoError::PollTimeout { offset, timeout_us } => {
                RscError::PollTimeout { offset, timeout_us }
            }
            IoError::InvalidBackend(reason) => RscError::InvalidBackend(reason),
        }
    }
}

/// Configuration loading errors
#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    #[diagnostic(code(config::io))]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    #[diagnostic(code(config::parse), help("Config files are JSON objects; unknown keys are rejected."))]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value for {field}: {reason}")]
    #[diagnostic(code(config::invalid))]
    Invalid { field: &'static str, reason: String },
}
