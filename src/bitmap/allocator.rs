/*!
 * Bitmap Allocator
 * Per-module slot pools with strict per-tile windows
 */

use super::types::{BitmapStats, PoolStats, SlotHandle};
use crate::core::errors::{RscError, RscResult};
use crate::core::types::{BitId, GridGeometry, ModuleKind, TileLocation};
use std::ops::Range;
use tracing::{debug, trace, warn};

const WORD_BITS: u32 = u64::BITS;

/// Fixed-capacity bit vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RscBitmap {
    words: Vec<u64>,
    size: u32,
}

impl RscBitmap {
    pub fn new(size: u32) -> Self {
        let words = size.div_ceil(WORD_BITS) as usize;
        Self {
            words: vec![0; words],
            size,
        }
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    fn locate(bit: BitId) -> (usize, u64) {
        ((bit / WORD_BITS) as usize, 1u64 << (bit % WORD_BITS))
    }

    #[inline]
    pub fn is_set(&self, bit: BitId) -> bool {
        if bit >= self.size {
            return false;
        }
        let (word, mask) = Self::locate(bit);
        self.words[word] & mask != 0
    }

    #[inline]
    fn set(&mut self, bit: BitId) {
        let (word, mask) = Self::locate(bit);
        self.words[word] |= mask;
    }

    #[inline]
    fn clear(&mut self, bit: BitId) {
        let (word, mask) = Self::locate(bit);
        self.words[word] &= !mask;
    }

    /// Number of set bits in `range`
    pub fn count_set(&self, range: Range<BitId>) -> u32 {
        range.filter(|&bit| self.is_set(bit)).count() as u32
    }

    /// Number of set bits in the whole vector
    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    fn clear_all(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
    }
}

/// Slot allocator for every module kind of the grid.
///
/// Each tile owns a window of `slots_per_tile` bits in its module's pool.
/// Scans never leave the requesting tile's window, so two tiles can never
/// alias a slot.
#[derive(Debug, Clone)]
pub struct BitmapAllocator {
    geometry: GridGeometry,
    pools: [RscBitmap; 3],
}

impl BitmapAllocator {
    pub fn new(geometry: GridGeometry) -> Self {
        debug!(
            columns = geometry.columns,
            rows = geometry.rows_per_column,
            slots_per_tile = geometry.slots_per_tile,
            "Bitmap allocator initialized"
        );
        Self {
            geometry,
            pools: ModuleKind::ALL.map(|m| RscBitmap::new(geometry.pool_size(m))),
        }
    }

    #[inline]
    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    /// Read-only view of a module pool
    #[inline]
    pub fn pool(&self, module: ModuleKind) -> &RscBitmap {
        &self.pools[module.index()]
    }

    /// Check that `module` exists at `loc` on this grid
    pub fn check_location(&self, module: ModuleKind, loc: TileLocation) -> RscResult<()> {
        if !self.geometry.contains(loc) {
            return Err(RscError::invalid_argument(format!(
                "tile {} is outside the {}x{} grid",
                loc,
                self.geometry.columns,
                self.geometry.rows_per_column as u32 + 1
            )));
        }
        if !module.fits(loc) {
            return Err(RscError::invalid_argument(format!(
                "no {} module at tile {}",
                module, loc
            )));
        }
        Ok(())
    }

    /// Bit range owned by the tile in its module pool
    pub fn window(&self, module: ModuleKind, loc: TileLocation) -> RscResult<Range<BitId>> {
        self.check_location(module, loc)?;
        let base = self.geometry.window_base(module, loc);
        Ok(base..base + self.geometry.slots_per_tile)
    }

    /// Free slots left in the tile's window
    pub fn free_slots(&self, module: ModuleKind, loc: TileLocation) -> RscResult<u32> {
        let window = self.window(module, loc)?;
        let used = self.pool(module).count_set(window);
        Ok(self.geometry.slots_per_tile - used)
    }

    /// Allocate `count` consecutive free bits inside the tile's window.
    ///
    /// Returns the lowest bit of the run. Nothing is set unless the whole run
    /// fits, so a failed call leaves the pool untouched.
    pub fn allocate_contiguous(
        &mut self,
        module: ModuleKind,
        loc: TileLocation,
        count: u32,
    ) -> RscResult<BitId> {
        let window = self.window(module, loc)?;
        if count == 0 {
            return Err(RscError::invalid_argument("cannot allocate an empty slot run"));
        }

        let pool = &mut self.pools[module.index()];
        // A run longer than the window finds no start and reports exhaustion
        let last_start = window.end.checked_sub(count).filter(|&s| s >= window.start);
        let found = last_start.and_then(|last| {
            (window.start..=last).find(|&start| (start..start + count).all(|bit| !pool.is_set(bit)))
        });

        match found {
            Some(start) => {
                (start..start + count).for_each(|bit| pool.set(bit));
                trace!(module = %module, tile = %loc, start, count, "Allocated slot bits");
                Ok(start)
            }
            None => {
                let available = self.geometry.slots_per_tile - pool.count_set(window);
                debug!(
                    module = %module,
                    tile = %loc,
                    requested = count,
                    available,
                    "Slot window exhausted"
                );
                Err(RscError::ResourceExhausted {
                    module,
                    location: loc,
                    requested: count,
                    available,
                })
            }
        }
    }

    /// Clear a bit; already-free or out-of-range bits are left alone
    pub fn free(&mut self, module: ModuleKind, bit: BitId) {
        let pool = &mut self.pools[module.index()];
        if bit >= pool.size() {
            warn!(module = %module, bit, "Attempted to free out-of-range slot bit");
            return;
        }
        if !pool.is_set(bit) {
            warn!(module = %module, bit, "Attempted to free slot bit that is already free");
            return;
        }
        pool.clear(bit);
        trace!(module = %module, bit, "Freed slot bit");
    }

    /// Allocate a single slot and wrap it in an owned handle
    pub fn allocate(&mut self, module: ModuleKind, loc: TileLocation) -> RscResult<SlotHandle> {
        let bit = self.allocate_contiguous(module, loc, 1)?;
        let slot = bit - self.geometry.window_base(module, loc);
        Ok(SlotHandle::new(loc, module, slot, bit))
    }

    /// Return a slot to its pool
    pub fn release(&mut self, handle: SlotHandle) {
        self.free(handle.module(), handle.bit());
    }

    #[inline]
    pub fn is_allocated(&self, module: ModuleKind, bit: BitId) -> bool {
        self.pool(module).is_set(bit)
    }

    pub fn stats(&self) -> BitmapStats {
        let pool_stats = |module: ModuleKind| PoolStats {
            module,
            used: self.pool(module).count_ones(),
            total: self.pool(module).size(),
        };
        BitmapStats {
            core: pool_stats(ModuleKind::Core),
            memory: pool_stats(ModuleKind::Memory),
            shim: pool_stats(ModuleKind::Shim),
        }
    }

    /// Free every slot of every pool (session teardown)
    pub fn reset(&mut self) {
        self.pools.iter_mut().for_each(RscBitmap::clear_all);
    }
}
