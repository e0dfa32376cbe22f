/*!
 * AIE Resource Library
 *
 * Hardware resource management for a tiled AI-engine array: per-module slot
 * pools, a shared resource lifecycle, and combo event resources that program
 * event-combination channels through a pluggable register backend.
 */

pub mod bitmap;
pub mod core;
pub mod device;
pub mod event;
pub mod io;
pub mod monitoring;
pub mod resource;

// Re-exports
pub use bitmap::{BitmapAllocator, BitmapStats, PoolStats, RscBitmap, SlotHandle};
pub use core::{
    ConfigError, GridGeometry, ModuleKind, RscError, RscResult, SessionConfig, TileLocation,
};
pub use device::{DeviceHandle, DeviceSession, DeviceSessionBuilder};
pub use event::{ComboChannel, ComboOp, EventTranslator, LogicalEvent, PhysicalEvent, RegisterTranslator};
pub use io::{BackendKind, DeviceIo, IoError, NoopIo, SimIo};
pub use monitoring::init_tracing;
pub use resource::{ComboEvent, ResourceKind, ResourceState, TileResource};
