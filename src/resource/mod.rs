/*!
 * Resource Module
 * Tile resources and the lifecycle they share
 */

pub mod combo;
pub mod lifecycle;
pub mod traits;

// Re-export for convenience
pub use combo::ComboEvent;
pub use lifecycle::{Lifecycle, ResourceKind, ResourceState, Transition};
pub use traits::TileResource;
