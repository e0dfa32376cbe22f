/*!
 * Combo Event Register Map
 *
 * Tile address: (col << 23) | (row << 18)
 * Each module's event block holds a combo input register (one physical event
 * byte per input, Combo0 on bytes 0-1, Combo1 on bytes 2-3) and a combo
 * control register (3-bit op field per channel, 8 bits apart).
 */

use super::types::ComboChannel;
use crate::core::limits::{TILE_COL_SHIFT, TILE_ROW_SHIFT};
use crate::core::types::{ModuleKind, TileLocation};

pub const CORE_EVENT_BLOCK: u64 = 0x34000;
pub const MEM_EVENT_BLOCK: u64 = 0x14000;
pub const PL_EVENT_BLOCK: u64 = 0x34000;

pub const COMBO_INPUT_OFFSET: u64 = 0x400;
pub const COMBO_CONTROL_OFFSET: u64 = 0x404;

const OP_FIELD_MASK: u32 = 0x7;
const OP_FIELD_STRIDE: u32 = 8;
const INPUT_PAIR_MASK: u32 = 0xFFFF;

#[inline]
pub fn tile_base(loc: TileLocation) -> u64 {
    ((loc.col as u64) << TILE_COL_SHIFT) | ((loc.row as u64) << TILE_ROW_SHIFT)
}

#[inline]
fn event_block(module: ModuleKind) -> u64 {
    match module {
        ModuleKind::Core => CORE_EVENT_BLOCK,
        ModuleKind::Memory => MEM_EVENT_BLOCK,
        ModuleKind::Shim => PL_EVENT_BLOCK,
    }
}

pub fn combo_input_reg(loc: TileLocation, module: ModuleKind) -> u64 {
    tile_base(loc) + event_block(module) + COMBO_INPUT_OFFSET
}

pub fn combo_control_reg(loc: TileLocation, module: ModuleKind) -> u64 {
    tile_base(loc) + event_block(module) + COMBO_CONTROL_OFFSET
}

/// Shift of the channel's op field in the control register
#[inline]
pub fn op_shift(channel: ComboChannel) -> u32 {
    channel.index() as u32 * OP_FIELD_STRIDE
}

#[inline]
pub fn op_mask(channel: ComboChannel) -> u32 {
    OP_FIELD_MASK << op_shift(channel)
}

/// Mask and shift of the channel's input bytes; the combine channel has none
pub fn input_field(channel: ComboChannel) -> Option<(u32, u32)> {
    match channel {
        ComboChannel::Combo0 => Some((INPUT_PAIR_MASK, 0)),
        ComboChannel::Combo1 => Some((INPUT_PAIR_MASK << 16, 16)),
        ComboChannel::Combo2 => None,
    }
}
