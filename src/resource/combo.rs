/*!
 * Combo Event Resource
 *
 * Synthesizes one logical event from 2-4 input events:
 *
 * - 2 inputs: one pairwise channel, `E0 <op0> E1`
 * - 3-4 inputs: `(E0 <op0> E1) <op2> (E2 <op1> E3)` over both pairwise
 *   channels plus the combine channel (a third input is paired with itself)
 *
 * One allocator slot is reserved per input pair.
 */

use super::lifecycle::{Lifecycle, ResourceKind, ResourceState, Transition};
use super::traits::TileResource;
use crate::bitmap::SlotHandle;
use crate::core::errors::{RscError, RscResult};
use crate::core::guard::{RollbackOrder, TransactionGuard};
use crate::core::limits::{COMBO_COMBINE_SLOT, COMBO_OPS_COMPOSITE, MAX_COMBO_INPUTS, MIN_COMBO_INPUTS};
use crate::core::types::{ModuleKind, SlotId, TileLocation};
use crate::device::DeviceHandle;
use crate::event::{ComboChannel, ComboOp, LogicalEvent};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// One channel programming step of `start()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ChannelStep {
    channel: ComboChannel,
    op: ComboOp,
    inputs: (LogicalEvent, LogicalEvent),
}

/// Combo event resource of one tile module
pub struct ComboEvent {
    device: Arc<DeviceHandle>,
    lifecycle: Lifecycle,
    events: Vec<LogicalEvent>,
    ops: Vec<ComboOp>,
    slots: Vec<SlotHandle>,
    slot_id: Option<SlotId>,
    programmed: Vec<ComboChannel>,
}

impl ComboEvent {
    /// Create a combo event bound to `module` at `loc`
    pub fn new(device: Arc<DeviceHandle>, loc: TileLocation, module: ModuleKind) -> RscResult<Self> {
        let mut combo = Self::unbound(device);
        combo.initialize(loc, module)?;
        Ok(combo)
    }

    /// Create a combo event that still has to be initialized
    pub fn unbound(device: Arc<DeviceHandle>) -> Self {
        Self {
            device,
            lifecycle: Lifecycle::new(ResourceKind::ComboEvent),
            events: Vec::new(),
            ops: Vec::new(),
            slots: Vec::new(),
            slot_id: None,
            programmed: Vec::new(),
        }
    }

    /// Bind to a tile module; Uninitialized -> Initialized
    pub fn initialize(&mut self, loc: TileLocation, module: ModuleKind) -> RscResult<()> {
        let geometry = self.device.geometry();
        self.lifecycle.initialize(geometry, loc, module).map_err(|e| {
            error!(tile = %loc, module = %module, error = %e, "Combo event initialize failed");
            e
        })
    }

    /// Set the input events and combine operators (the configure step).
    ///
    /// 2 events take 1 operator; 3 or 4 events take 3 operators: pair0,
    /// pair1, then the combine operator. Every event is translated before
    /// anything is stored, so a failure keeps the previous configuration.
    pub fn set_events(&mut self, events: &[LogicalEvent], ops: &[ComboOp]) -> RscResult<()> {
        self.lifecycle.check(Transition::Configure)?;
        let (loc, module) = self.lifecycle.binding()?;

        if !(MIN_COMBO_INPUTS..=MAX_COMBO_INPUTS).contains(&events.len()) {
            warn!(tile = %loc, module = %module, count = events.len(), "Invalid number of combo input events");
            return Err(RscError::invalid_argument(format!(
                "combo event takes {} to {} input events, got {}",
                MIN_COMBO_INPUTS,
                MAX_COMBO_INPUTS,
                events.len()
            )));
        }

        let expected_ops = Self::expected_ops(events.len());
        if ops.len() != expected_ops {
            warn!(tile = %loc, module = %module, events = events.len(), ops = ops.len(), "Invalid number of combo operators");
            return Err(RscError::invalid_argument(format!(
                "{} input events need {} operators, got {}",
                events.len(),
                expected_ops,
                ops.len()
            )));
        }

        let translator = self.device.translator();
        for event in events {
            translator
                .logical_to_physical(loc, module, *event)
                .map_err(|e| {
                    error!(tile = %loc, module = %module, event = %event, "Invalid combo input event");
                    e
                })?;
        }

        self.events = events.to_vec();
        self.ops = ops.to_vec();
        self.lifecycle.advance(Transition::Configure);
        debug!(tile = %loc, module = %module, events = ?self.events, ops = ?self.ops, "Combo event configured");
        Ok(())
    }

    /// Configured input events and operators, in the order given
    pub fn input_events(&self) -> RscResult<(Vec<LogicalEvent>, Vec<ComboOp>)> {
        if self.lifecycle.state() < ResourceState::Configured {
            return Err(RscError::NotConfigured);
        }
        Ok((self.events.clone(), self.ops.clone()))
    }

    /// Events a consumer subscribes to: one per combo output this resource owns
    pub fn output_events(&self) -> RscResult<Vec<LogicalEvent>> {
        if !matches!(
            self.lifecycle.state(),
            ResourceState::Reserved | ResourceState::Started
        ) {
            return Err(RscError::NotReserved);
        }
        let (_, module) = self.lifecycle.binding()?;
        let slot_id = self.slot_id.ok_or(RscError::NotReserved)?;
        let base = LogicalEvent::combo_base(module);

        if self.events.len() <= MIN_COMBO_INPUTS {
            Ok(vec![base.offset(slot_id)])
        } else {
            Ok((0..self.ops.len() as u32).map(|i| base.offset(i)).collect())
        }
    }

    /// Combo slot id: 0 or 1 for a single pair, 2 for a composite
    #[inline]
    pub fn slot_id(&self) -> Option<SlotId> {
        self.slot_id
    }

    /// Allocator slots currently held
    #[inline]
    pub fn slots(&self) -> &[SlotHandle] {
        &self.slots
    }

    /// Channels programmed by the last successful `start()`
    #[inline]
    pub fn programmed_channels(&self) -> &[ComboChannel] {
        &self.programmed
    }

    #[inline]
    fn expected_ops(event_count: usize) -> usize {
        if event_count <= MIN_COMBO_INPUTS {
            1
        } else {
            COMBO_OPS_COMPOSITE
        }
    }

    /// Channel sequence in programming order
    fn channel_plan(&self, module: ModuleKind) -> RscResult<Vec<ChannelStep>> {
        let events = &self.events;
        let ops = &self.ops;

        if events.len() <= MIN_COMBO_INPUTS {
            let slot_id = self.slot_id.ok_or(RscError::NotReserved)?;
            let channel = ComboChannel::from_index(slot_id).ok_or_else(|| {
                RscError::invalid_argument(format!("slot {} has no pairwise channel", slot_id))
            })?;
            return Ok(vec![ChannelStep {
                channel,
                op: ops[0],
                inputs: (events[0], events[1]),
            }]);
        }

        let fourth = events.get(3).copied().unwrap_or(events[2]);
        let base = LogicalEvent::combo_base(module);
        Ok(vec![
            ChannelStep {
                channel: ComboChannel::Combo0,
                op: ops[0],
                inputs: (events[0], events[1]),
            },
            ChannelStep {
                channel: ComboChannel::Combo1,
                op: ops[1],
                inputs: (events[2], fourth),
            },
            ChannelStep {
                channel: ComboChannel::Combo2,
                op: ops[2],
                inputs: (base.offset(0), base.offset(1)),
            },
        ])
    }
}

impl TileResource for ComboEvent {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn device(&self) -> &Arc<DeviceHandle> {
        &self.device
    }

    fn do_reserve(&mut self) -> RscResult<()> {
        let (loc, module) = self.lifecycle.binding()?;
        let pairs = self.events.len().div_ceil(2) as u32;
        let device = Arc::clone(&self.device);
        let mut allocator = device.allocator();
        let available = allocator.free_slots(module, loc)?;

        let mut tx = TransactionGuard::new(
            &mut *allocator,
            RollbackOrder::Reverse,
            |alloc, slot| alloc.release(slot),
        );
        for _ in 0..pairs {
            let slot = tx.context().allocate(module, loc).map_err(|e| match e {
                RscError::ResourceExhausted { .. } => {
                    warn!(tile = %loc, module = %module, requested = pairs, available, "No free combo slots");
                    RscError::ResourceExhausted {
                        module,
                        location: loc,
                        requested: pairs,
                        available,
                    }
                }
                other => other,
            })?;
            tx.record(slot);
        }
        let slots = tx.commit();
        let slots_per_tile = allocator.geometry().slots_per_tile;
        drop(allocator);

        let slot_id = if self.events.len() <= MIN_COMBO_INPUTS {
            // Lower half of the window feeds combo 0, upper half combo 1
            if slots[0].slot() < slots_per_tile / 2 {
                0
            } else {
                1
            }
        } else {
            COMBO_COMBINE_SLOT
        };

        info!(
            tile = %loc,
            module = %module,
            slot_id,
            slots = ?slots.iter().map(SlotHandle::slot).collect::<Vec<_>>(),
            "Combo event reserved"
        );
        self.slots = slots;
        self.slot_id = Some(slot_id);
        Ok(())
    }

    fn do_release(&mut self) {
        let device = Arc::clone(&self.device);
        let mut allocator = device.allocator();
        for slot in self.slots.drain(..).rev() {
            allocator.release(slot);
        }
        drop(allocator);

        self.slot_id = None;
        self.events.clear();
        self.ops.clear();
        self.programmed.clear();
        if let Some(loc) = self.lifecycle.location() {
            debug!(tile = %loc, "Combo event released");
        }
    }

    fn do_start(&mut self) -> RscResult<()> {
        let (loc, module) = self.lifecycle.binding()?;
        let plan = self.channel_plan(module)?;
        let device = Arc::clone(&self.device);

        let mut tx = TransactionGuard::new(
            device.translator(),
            RollbackOrder::Forward,
            move |translator, channel| {
                if let Err(e) = translator.reset_combo_channel(loc, module, channel) {
                    warn!(tile = %loc, module = %module, channel = %channel, error = %e, "Rollback reset failed");
                }
            },
        );
        for step in plan {
            tx.context()
                .configure_combo_channel(loc, module, step.channel, step.op, step.inputs.0, step.inputs.1)
                .map_err(|e| {
                    error!(tile = %loc, module = %module, channel = %step.channel, error = %e, "Failed to configure combo channel");
                    RscError::HardwareProgrammingFailed {
                        channel: step.channel.index(),
                        reason: e.to_string(),
                    }
                })?;
            tx.record(step.channel);
        }
        self.programmed = tx.commit();

        info!(tile = %loc, module = %module, channels = self.programmed.len(), "Combo event started");
        Ok(())
    }

    fn do_stop(&mut self) -> RscResult<()> {
        let (loc, module) = self.lifecycle.binding()?;
        let plan: Vec<ChannelStep> = self
            .channel_plan(module)?
            .into_iter()
            .filter(|step| self.programmed.contains(&step.channel))
            .collect();
        let device = Arc::clone(&self.device);

        // A failed reset re-programs every channel this call already reset
        let mut tx = TransactionGuard::new(
            device.translator(),
            RollbackOrder::Forward,
            move |translator, step: ChannelStep| {
                if let Err(e) = translator.configure_combo_channel(
                    loc,
                    module,
                    step.channel,
                    step.op,
                    step.inputs.0,
                    step.inputs.1,
                ) {
                    warn!(tile = %loc, module = %module, channel = %step.channel, error = %e, "Rollback re-program failed");
                }
            },
        );
        for step in plan {
            tx.context()
                .reset_combo_channel(loc, module, step.channel)
                .map_err(|e| {
                    error!(tile = %loc, module = %module, channel = %step.channel, error = %e, "Failed to reset combo channel");
                    RscError::HardwareProgrammingFailed {
                        channel: step.channel.index(),
                        reason: format!("reset failed: {}", e),
                    }
                })?;
            tx.record(step);
        }
        tx.commit();
        self.programmed.clear();

        debug!(tile = %loc, module = %module, "Combo event stopped");
        Ok(())
    }
}

impl Drop for ComboEvent {
    fn drop(&mut self) {
        self.teardown();
    }
}
