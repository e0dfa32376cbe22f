/*!
 * Bitmap Types
 * Slot handles and allocator statistics
 */

use crate::core::types::{BitId, ModuleKind, SlotId, TileLocation};
use serde::{Deserialize, Serialize};

/// One allocated slot in a module pool.
///
/// Deliberately neither `Clone` nor `Copy`: the allocator hands a handle to
/// exactly one owner and takes it back on release.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct SlotHandle {
    location: TileLocation,
    module: ModuleKind,
    slot: SlotId,
    bit: BitId,
}

impl SlotHandle {
    pub(crate) fn new(location: TileLocation, module: ModuleKind, slot: SlotId, bit: BitId) -> Self {
        Self {
            location,
            module,
            slot,
            bit,
        }
    }

    #[inline]
    pub fn location(&self) -> TileLocation {
        self.location
    }

    #[inline]
    pub fn module(&self) -> ModuleKind {
        self.module
    }

    /// Tile-local slot index
    #[inline]
    pub fn slot(&self) -> SlotId {
        self.slot
    }

    /// Bit position in the module pool
    #[inline]
    pub fn bit(&self) -> BitId {
        self.bit
    }
}

/// Usage of one module pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    pub module: ModuleKind,
    pub used: u32,
    pub total: u32,
}

impl PoolStats {
    pub fn available(&self) -> u32 {
        self.total - self.used
    }

    pub fn usage_percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.used as f64 / self.total as f64) * 100.0
    }
}

/// Allocator statistics across all module pools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitmapStats {
    pub core: PoolStats,
    pub memory: PoolStats,
    pub shim: PoolStats,
}

impl BitmapStats {
    pub fn get(&self, module: ModuleKind) -> &PoolStats {
        match module {
            ModuleKind::Core => &self.core,
            ModuleKind::Memory => &self.memory,
            ModuleKind::Shim => &self.shim,
        }
    }

    pub fn total_used(&self) -> u32 {
        self.core.used + self.memory.used + self.shim.used
    }
}
