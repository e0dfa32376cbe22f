/*!
 * IO Traits
 * Register transport abstraction consumed by the resource core
 */

use super::types::{BackendKind, IoError, IoResult};
use crate::core::limits::MIN_POLL_TIMEOUT_US;
use crate::core::types::TileLocation;
use std::time::Duration;

/// Register-level transport to one device.
///
/// Offsets are relative to the base address handed to [`DeviceIo::init`].
/// Exactly one implementation is bound per session; resource code never asks
/// which one.
pub trait DeviceIo: Send + Sync {
    /// Backend identification for logging
    fn backend(&self) -> BackendKind;

    /// Bind the backend to a device
    fn init(&self, base_addr: u64) -> IoResult<()>;

    /// Tear the backend down
    fn finish(&self) -> IoResult<()>;

    fn write32(&self, offset: u64, value: u32);

    fn read32(&self, offset: u64) -> u32;

    /// Read-modify-write of the bits selected by `mask`
    fn mask_write32(&self, offset: u64, mask: u32, value: u32) {
        let current = self.read32(offset);
        self.write32(offset, (current & !mask) | (value & mask));
    }

    /// Wait until `read32(offset) & mask == value`.
    ///
    /// Checks the register once per microsecond for at most `timeout_us`
    /// attempts. A timeout of 0 is treated as 1, so the register is always
    /// checked at least once.
    fn mask_poll(&self, offset: u64, mask: u32, value: u32, timeout_us: u32) -> IoResult<()> {
        let attempts = timeout_us.max(MIN_POLL_TIMEOUT_US);
        for remaining in (0..attempts).rev() {
            if self.read32(offset) & mask == value {
                return Ok(());
            }
            if remaining > 0 {
                std::thread::sleep(Duration::from_micros(1));
            }
        }
        Err(IoError::PollTimeout {
            offset,
            timeout_us: attempts,
        })
    }

    /// Write consecutive 32-bit words starting at `offset`
    fn block_write32(&self, offset: u64, data: &[u32]) {
        for (i, word) in data.iter().enumerate() {
            self.write32(offset + i as u64 * 4, *word);
        }
    }

    /// Fill `count` consecutive 32-bit words with `value`
    fn block_set32(&self, offset: u64, value: u32, count: u32) {
        for i in 0..count as u64 {
            self.write32(offset + i * 4, value);
        }
    }

    /// Simulator side-band signaling; backends without a simulator ignore it
    fn issue_command(&self, location: TileLocation, opcode: u8, word0: u32, word1: u32, tag: &str);
}
