/*!
 * Register Event Translator
 * Programs combo channels through a DeviceIo backend
 */

use super::registers::{combo_control_reg, combo_input_reg, input_field, op_mask, op_shift};
use super::traits::EventTranslator;
use super::types::{ComboChannel, ComboOp, LogicalEvent, PhysicalEvent};
use crate::core::errors::{RscError, RscResult};
use crate::core::types::{ModuleKind, TileLocation};
use crate::io::DeviceIo;
use std::sync::Arc;
use tracing::{debug, error};

/// Translator writing combo configuration straight into tile registers
pub struct RegisterTranslator {
    io: Arc<dyn DeviceIo>,
    /// Poll bound for read-back verification, `None` disables it
    verify_timeout_us: Option<u32>,
}

impl RegisterTranslator {
    pub fn new(io: Arc<dyn DeviceIo>) -> Self {
        Self {
            io,
            verify_timeout_us: None,
        }
    }

    /// Read back the control register after each programming call
    #[must_use]
    pub fn with_verification(mut self, timeout_us: u32) -> Self {
        self.verify_timeout_us = Some(timeout_us);
        self
    }
}

impl EventTranslator for RegisterTranslator {
    fn logical_to_physical(
        &self,
        location: TileLocation,
        module: ModuleKind,
        event: LogicalEvent,
    ) -> RscResult<PhysicalEvent> {
        let range = LogicalEvent::range_for(module);
        if !range.contains(&event.0) {
            return Err(RscError::InvalidEvent {
                event: event.0,
                module,
                location,
            });
        }
        Ok(PhysicalEvent((event.0 - range.start) as u8))
    }

    fn configure_combo_channel(
        &self,
        location: TileLocation,
        module: ModuleKind,
        channel: ComboChannel,
        op: ComboOp,
        event_a: LogicalEvent,
        event_b: LogicalEvent,
    ) -> RscResult<()> {
        // Translate before touching any register
        let inputs = match input_field(channel) {
            Some((mask, shift)) => {
                let a = self.logical_to_physical(location, module, event_a)?;
                let b = self.logical_to_physical(location, module, event_b)?;
                Some((mask, ((a.0 as u32) | ((b.0 as u32) << 8)) << shift))
            }
            None => None,
        };

        if let Some((mask, value)) = inputs {
            self.io
                .mask_write32(combo_input_reg(location, module), mask, value);
        }

        let control = combo_control_reg(location, module);
        let op_value = op.encoding() << op_shift(channel);
        self.io.mask_write32(control, op_mask(channel), op_value);

        if let Some(timeout_us) = self.verify_timeout_us {
            if let Err(e) = self
                .io
                .mask_poll(control, op_mask(channel), op_value, timeout_us)
            {
                error!(tile = %location, module = %module, channel = %channel, error = %e, "Combo control read-back failed");
                self.reset_combo_channel(location, module, channel)?;
                return Err(e.into());
            }
        }

        debug!(
            tile = %location,
            module = %module,
            channel = %channel,
            op = %op,
            "Combo channel configured"
        );
        Ok(())
    }

    fn reset_combo_channel(
        &self,
        location: TileLocation,
        module: ModuleKind,
        channel: ComboChannel,
    ) -> RscResult<()> {
        if let Some((mask, _)) = input_field(channel) {
            self.io.mask_write32(combo_input_reg(location, module), mask, 0);
        }
        self.io
            .mask_write32(combo_control_reg(location, module), op_mask(channel), 0);
        debug!(tile = %location, module = %module, channel = %channel, "Combo channel reset");
        Ok(())
    }
}
