/*!
 * Event Types
 * Logical/physical event identifiers and combo operators
 */

use crate::core::types::ModuleKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Portable event name, independent of the register encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogicalEvent(pub u32);

/// Hardware-encoded event id as written into event registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhysicalEvent(pub u8);

/// Logical ids owned by each module kind
pub const CORE_EVENT_RANGE: Range<u32> = 0..128;
pub const MEM_EVENT_RANGE: Range<u32> = 128..256;
pub const PL_EVENT_RANGE: Range<u32> = 256..384;

/// Hardware id of combo output 0 within every module's event space
const COMBO_EVENT_0_HW: u32 = 22;

pub const CORE_EVENT_NONE: LogicalEvent = LogicalEvent(CORE_EVENT_RANGE.start);
pub const CORE_EVENT_TRUE: LogicalEvent = LogicalEvent(CORE_EVENT_RANGE.start + 1);
pub const CORE_EVENT_PERF_CNT_0: LogicalEvent = LogicalEvent(CORE_EVENT_RANGE.start + 5);
pub const CORE_EVENT_PERF_CNT_1: LogicalEvent = LogicalEvent(CORE_EVENT_RANGE.start + 6);
pub const CORE_EVENT_ACTIVE: LogicalEvent = LogicalEvent(CORE_EVENT_RANGE.start + 28);
pub const CORE_EVENT_DISABLED: LogicalEvent = LogicalEvent(CORE_EVENT_RANGE.start + 29);
pub const CORE_EVENT_STREAM_STALL: LogicalEvent = LogicalEvent(CORE_EVENT_RANGE.start + 25);
pub const CORE_EVENT_LOCK_STALL: LogicalEvent = LogicalEvent(CORE_EVENT_RANGE.start + 26);

pub const MEM_EVENT_NONE: LogicalEvent = LogicalEvent(MEM_EVENT_RANGE.start);
pub const MEM_EVENT_TRUE: LogicalEvent = LogicalEvent(MEM_EVENT_RANGE.start + 1);
pub const MEM_EVENT_DMA_S2MM_0_FINISHED_BD: LogicalEvent = LogicalEvent(MEM_EVENT_RANGE.start + 29);
pub const MEM_EVENT_DMA_MM2S_0_FINISHED_BD: LogicalEvent = LogicalEvent(MEM_EVENT_RANGE.start + 31);

pub const PL_EVENT_NONE: LogicalEvent = LogicalEvent(PL_EVENT_RANGE.start);
pub const PL_EVENT_TRUE: LogicalEvent = LogicalEvent(PL_EVENT_RANGE.start + 1);
pub const PL_EVENT_DMA_S2MM_0_START_BD: LogicalEvent = LogicalEvent(PL_EVENT_RANGE.start + 9);
pub const PL_EVENT_DMA_MM2S_0_START_BD: LogicalEvent = LogicalEvent(PL_EVENT_RANGE.start + 13);

pub const COMBO_EVENT_0_CORE: LogicalEvent = LogicalEvent(CORE_EVENT_RANGE.start + COMBO_EVENT_0_HW);
pub const COMBO_EVENT_0_MEM: LogicalEvent = LogicalEvent(MEM_EVENT_RANGE.start + COMBO_EVENT_0_HW);
pub const COMBO_EVENT_0_PL: LogicalEvent = LogicalEvent(PL_EVENT_RANGE.start + COMBO_EVENT_0_HW);

impl LogicalEvent {
    /// Logical range owned by a module kind
    pub fn range_for(module: ModuleKind) -> Range<u32> {
        match module {
            ModuleKind::Core => CORE_EVENT_RANGE,
            ModuleKind::Memory => MEM_EVENT_RANGE,
            ModuleKind::Shim => PL_EVENT_RANGE,
        }
    }

    /// First combo output event of a module kind
    pub fn combo_base(module: ModuleKind) -> LogicalEvent {
        match module {
            ModuleKind::Core => COMBO_EVENT_0_CORE,
            ModuleKind::Memory => COMBO_EVENT_0_MEM,
            ModuleKind::Shim => COMBO_EVENT_0_PL,
        }
    }

    #[inline]
    #[must_use]
    pub fn offset(self, n: u32) -> LogicalEvent {
        LogicalEvent(self.0 + n)
    }

    #[inline]
    pub fn belongs_to(&self, module: ModuleKind) -> bool {
        Self::range_for(module).contains(&self.0)
    }
}

impl fmt::Display for LogicalEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// Boolean operator applied by a combo channel to its two inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComboOp {
    /// A & B
    And,
    /// A & !B
    AndNot,
    /// A | B
    Or,
    /// A | !B
    OrNot,
    /// A ^ B
    Xor,
}

impl ComboOp {
    /// Value of the op field in the combo control register
    #[inline]
    pub const fn encoding(&self) -> u32 {
        match self {
            ComboOp::And => 0,
            ComboOp::AndNot => 1,
            ComboOp::Or => 2,
            ComboOp::OrNot => 3,
            ComboOp::Xor => 4,
        }
    }
}

impl fmt::Display for ComboOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComboOp::And => write!(f, "AND"),
            ComboOp::AndNot => write!(f, "AND_NOT"),
            ComboOp::Or => write!(f, "OR"),
            ComboOp::OrNot => write!(f, "OR_NOT"),
            ComboOp::Xor => write!(f, "XOR"),
        }
    }
}

/// Combo hardware channel of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComboChannel {
    /// Pairwise channel over inputs 0 and 1
    Combo0,
    /// Pairwise channel over inputs 2 and 3
    Combo1,
    /// Combine channel joining the outputs of Combo0 and Combo1
    Combo2,
}

impl ComboChannel {
    #[inline]
    pub const fn index(&self) -> u8 {
        match self {
            ComboChannel::Combo0 => 0,
            ComboChannel::Combo1 => 1,
            ComboChannel::Combo2 => 2,
        }
    }

    pub const fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(ComboChannel::Combo0),
            1 => Some(ComboChannel::Combo1),
            2 => Some(ComboChannel::Combo2),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_pairwise(&self) -> bool {
        !matches!(self, ComboChannel::Combo2)
    }
}

impl fmt::Display for ComboChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "combo{}", self.index())
    }
}
