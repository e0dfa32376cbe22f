/*!
 * No-op Backend
 * Inert transport for sessions without a device behind them
 */

use super::traits::DeviceIo;
use super::types::{BackendKind, IoError, IoResult};
use crate::core::limits::MIN_POLL_TIMEOUT_US;
use crate::core::types::TileLocation;
use tracing::warn;

/// Writes vanish, reads return 0 and polls never succeed
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopIo;

impl NoopIo {
    pub fn new() -> Self {
        Self
    }
}

impl DeviceIo for NoopIo {
    fn backend(&self) -> BackendKind {
        BackendKind::Noop
    }

    fn init(&self, base_addr: u64) -> IoResult<()> {
        warn!(
            base_addr = format_args!("0x{:x}", base_addr),
            "No-op IO backend bound, register operations will have no effect"
        );
        Ok(())
    }

    fn finish(&self) -> IoResult<()> {
        Ok(())
    }

    fn write32(&self, _offset: u64, _value: u32) {}

    fn read32(&self, _offset: u64) -> u32 {
        0
    }

    fn mask_write32(&self, _offset: u64, _mask: u32, _value: u32) {}

    /// Always times out, even when the mask would match the 0 that `read32`
    /// returns: nothing was written, so nothing can be confirmed.
    fn mask_poll(&self, offset: u64, _mask: u32, _value: u32, timeout_us: u32) -> IoResult<()> {
        Err(IoError::PollTimeout {
            offset,
            timeout_us: timeout_us.max(MIN_POLL_TIMEOUT_US),
        })
    }

    fn issue_command(&self, _location: TileLocation, _opcode: u8, _word0: u32, _word1: u32, _tag: &str) {}
}
