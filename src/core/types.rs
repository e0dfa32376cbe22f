/*!
 * Core Types
 * Common types used across the resource manager
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Column index within the tile grid
pub type Column = u8;

/// Row index within the tile grid (row 0 is the shim row)
pub type Row = u8;

/// Bit position inside a module's slot pool
pub type BitId = u32;

/// Tile-local slot index
pub type SlotId = u32;

/// Grid position of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileLocation {
    pub col: Column,
    pub row: Row,
}

impl TileLocation {
    #[inline]
    pub const fn new(col: Column, row: Row) -> Self {
        Self { col, row }
    }

    /// Shim tiles sit on row 0
    #[inline]
    pub const fn is_shim_row(&self) -> bool {
        self.row == 0
    }
}

impl fmt::Display for TileLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.col, self.row)
    }
}

/// Functional module inside a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    /// Compute core module
    Core,
    /// Local data memory module
    Memory,
    /// Grid-interface shim (PL) module
    Shim,
}

impl ModuleKind {
    pub const ALL: [ModuleKind; 3] = [ModuleKind::Core, ModuleKind::Memory, ModuleKind::Shim];

    /// Whether this module can exist at the given location.
    ///
    /// Shim modules only exist on row 0, core and memory modules never do.
    #[inline]
    pub const fn fits(&self, loc: TileLocation) -> bool {
        match self {
            ModuleKind::Shim => loc.is_shim_row(),
            ModuleKind::Core | ModuleKind::Memory => !loc.is_shim_row(),
        }
    }

    #[inline]
    pub(crate) const fn index(&self) -> usize {
        match self {
            ModuleKind::Core => 0,
            ModuleKind::Memory => 1,
            ModuleKind::Shim => 2,
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleKind::Core => write!(f, "CORE"),
            ModuleKind::Memory => write!(f, "MEM"),
            ModuleKind::Shim => write!(f, "SHIM"),
        }
    }
}

/// Fixed dimensions of the tile grid and its per-tile slot capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridGeometry {
    pub columns: u8,
    /// Number of core/memory rows per column (rows 1..=rows_per_column)
    pub rows_per_column: u8,
    pub slots_per_tile: u32,
}

impl GridGeometry {
    pub const fn new(columns: u8, rows_per_column: u8, slots_per_tile: u32) -> Self {
        Self {
            columns,
            rows_per_column,
            slots_per_tile,
        }
    }

    #[inline]
    pub const fn contains(&self, loc: TileLocation) -> bool {
        loc.col < self.columns && loc.row <= self.rows_per_column
    }

    /// Number of tiles carrying the given module kind
    pub const fn tiles_for(&self, module: ModuleKind) -> u32 {
        match module {
            ModuleKind::Shim => self.columns as u32,
            ModuleKind::Core | ModuleKind::Memory => {
                self.columns as u32 * self.rows_per_column as u32
            }
        }
    }

    /// Total bits needed to cover every tile of a module kind
    pub const fn pool_size(&self, module: ModuleKind) -> u32 {
        self.tiles_for(module) * self.slots_per_tile
    }

    /// First bit of the tile's window in the module pool.
    ///
    /// Caller guarantees `module.fits(loc)` and `self.contains(loc)`.
    pub const fn window_base(&self, module: ModuleKind, loc: TileLocation) -> BitId {
        match module {
            ModuleKind::Shim => loc.col as u32 * self.slots_per_tile,
            ModuleKind::Core | ModuleKind::Memory => {
                (loc.col as u32 * self.rows_per_column as u32 + (loc.row as u32 - 1))
                    * self.slots_per_tile
            }
        }
    }
}
