/*!
 * Bitmap Module
 * Hardware slot pools for every module kind of the tile grid
 */

pub mod allocator;
pub mod types;

// Re-export for convenience
pub use allocator::{BitmapAllocator, RscBitmap};
pub use types::*;
