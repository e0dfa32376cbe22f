/*!
 * Event Module
 * Logical event catalog and combo channel programming
 */

pub mod registers;
pub mod traits;
pub mod translator;
pub mod types;

// Re-export for convenience
pub use traits::EventTranslator;
pub use translator::RegisterTranslator;
pub use types::*;
