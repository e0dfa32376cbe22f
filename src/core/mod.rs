/*!
 * Core Module
 * Fundamental types, limits, configuration and error handling
 */

pub mod config;
pub mod errors;
pub mod guard;
pub mod limits;
pub mod types;

// Re-export for convenience
pub use config::SessionConfig;
pub use errors::*;
pub use guard::{RollbackOrder, TransactionGuard, TransactionState};
pub use types::*;
