/*!
 * IO Module
 * Register transport backends
 *
 * The resource core only sees `dyn DeviceIo`; the backend is picked once,
 * when the session is built.
 */

pub mod noop;
pub mod sim;
pub mod traits;
pub mod types;

use std::sync::Arc;

// Re-export for convenience
pub use noop::NoopIo;
pub use sim::SimIo;
pub use traits::DeviceIo;
pub use types::*;

/// Instantiate the backend named by `kind`
pub fn backend_for(kind: BackendKind) -> Arc<dyn DeviceIo> {
    match kind {
        BackendKind::Sim => Arc::new(SimIo::new()),
        BackendKind::Noop => Arc::new(NoopIo::new()),
    }
}
