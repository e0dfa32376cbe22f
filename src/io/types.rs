/*!
 * IO Types
 * Backend selection, IO errors and simulator bookkeeping
 */

use crate::core::types::TileLocation;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// IO operation result
pub type IoResult<T> = Result<T, IoError>;

/// IO backend errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IoError {
    #[error("Backend unavailable: {0}")]
    InvalidBackend(String),

    #[error("Mask poll timed out after {timeout_us}us at offset 0x{offset:x}")]
    PollTimeout { offset: u64, timeout_us: u32 },
}

/// Register transport bound to a device session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-memory register file
    #[default]
    Sim,
    /// Inert backend, every operation is a no-op
    Noop,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Sim => write!(f, "sim"),
            BackendKind::Noop => write!(f, "noop"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sim" | "simulation" => Ok(BackendKind::Sim),
            "noop" | "none" => Ok(BackendKind::Noop),
            other => Err(format!("unknown backend '{}'", other)),
        }
    }
}

/// Simulator side-band command issued to a tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileCommand {
    pub location: TileLocation,
    pub opcode: u8,
    pub word0: u32,
    pub word1: u32,
    pub tag: String,
}

/// Register traffic counters of the simulation backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimIoStats {
    pub reads: u64,
    pub writes: u64,
    pub commands: u64,
}
