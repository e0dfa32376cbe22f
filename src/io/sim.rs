/*!
 * Simulation Backend
 * In-memory register file standing in for the device
 */

use super::traits::DeviceIo;
use super::types::{BackendKind, IoError, IoResult, SimIoStats, TileCommand};
use crate::core::types::TileLocation;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct SimState {
    base_addr: Option<u64>,
    registers: HashMap<u64, u32>,
    commands: Vec<TileCommand>,
    stats: SimIoStats,
}

impl SimState {
    #[inline]
    fn address(&self, offset: u64) -> u64 {
        self.base_addr.unwrap_or_default() + offset
    }
}

/// Register file keyed by absolute address; unwritten registers read as 0
#[derive(Debug, Default)]
pub struct SimIo {
    state: Mutex<SimState>,
}

impl SimIo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a register without counting it as device traffic
    pub fn peek(&self, offset: u64) -> u32 {
        let state = self.state.lock();
        state
            .registers
            .get(&state.address(offset))
            .copied()
            .unwrap_or(0)
    }

    /// Set a register without counting it as device traffic
    pub fn poke(&self, offset: u64, value: u32) {
        let mut state = self.state.lock();
        let addr = state.address(offset);
        state.registers.insert(addr, value);
    }

    pub fn stats(&self) -> SimIoStats {
        self.state.lock().stats
    }

    /// Commands issued so far, oldest first
    pub fn commands(&self) -> Vec<TileCommand> {
        self.state.lock().commands.clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.state.lock().base_addr.is_some()
    }
}

impl DeviceIo for SimIo {
    fn backend(&self) -> BackendKind {
        BackendKind::Sim
    }

    fn init(&self, base_addr: u64) -> IoResult<()> {
        let mut state = self.state.lock();
        if let Some(existing) = state.base_addr {
            return Err(IoError::InvalidBackend(format!(
                "simulation backend already bound at 0x{:x}",
                existing
            )));
        }
        state.base_addr = Some(base_addr);
        info!(base_addr = format_args!("0x{:x}", base_addr), "Simulation IO backend initialized");
        Ok(())
    }

    fn finish(&self) -> IoResult<()> {
        let mut state = self.state.lock();
        debug!(
            reads = state.stats.reads,
            writes = state.stats.writes,
            commands = state.stats.commands,
            "Simulation IO backend finished"
        );
        *state = SimState::default();
        Ok(())
    }

    fn write32(&self, offset: u64, value: u32) {
        let mut state = self.state.lock();
        let addr = state.address(offset);
        state.registers.insert(addr, value);
        state.stats.writes += 1;
    }

    fn read32(&self, offset: u64) -> u32 {
        let mut state = self.state.lock();
        state.stats.reads += 1;
        let addr = state.address(offset);
        state.registers.get(&addr).copied().unwrap_or(0)
    }

    fn issue_command(&self, location: TileLocation, opcode: u8, word0: u32, word1: u32, tag: &str) {
        let mut state = self.state.lock();
        state.stats.commands += 1;
        state.commands.push(TileCommand {
            location,
            opcode,
            word0,
            word1,
            tag: tag.to_string(),
        });
    }
}
