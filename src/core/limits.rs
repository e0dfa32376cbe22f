/*!
 * System Limits and Constants
 *
 * Centralized location for grid dimensions, slot capacities, register
 * layout and timing defaults. Grouped by domain.
 */

// =============================================================================
// GRID GEOMETRY
// =============================================================================

/// Default number of array columns
pub const DEFAULT_COLUMNS: u8 = 50;

/// Default number of core/memory rows per column (row 0 is the shim row)
pub const DEFAULT_ROWS_PER_COLUMN: u8 = 8;

/// Combo event slots each module exposes per tile
/// Lower half feeds combo channel 0, upper half combo channel 1
pub const COMBO_SLOTS_PER_TILE: u32 = 4;

/// Largest per-tile slot count a session config may ask for
pub const MAX_COMBO_SLOTS_PER_TILE: u32 = 8;

// =============================================================================
// COMBO EVENTS
// =============================================================================

/// Minimum input events of a combo resource
pub const MIN_COMBO_INPUTS: usize = 2;

/// Maximum input events of a combo resource
pub const MAX_COMBO_INPUTS: usize = 4;

/// Operators required once more than two inputs are combined
/// (pair0, pair1, combine)
pub const COMBO_OPS_COMPOSITE: usize = 3;

/// Fixed slot id of a composite (3-4 input) combo resource
pub const COMBO_COMBINE_SLOT: u32 = 2;

// =============================================================================
// IO / TIMING
// =============================================================================

/// Default device base address used by the simulation backend
pub const DEFAULT_BASE_ADDR: u64 = 0x2000_0000_0000;

/// Default bound for register verification polls (1ms)
pub const DEFAULT_POLL_TIMEOUT_US: u32 = 1_000;

/// Minimum poll attempts: a zero timeout still checks the register once
pub const MIN_POLL_TIMEOUT_US: u32 = 1;

/// Column shift in a tile address
pub const TILE_COL_SHIFT: u64 = 23;

/// Row shift in a tile address
pub const TILE_ROW_SHIFT: u64 = 18;
