/*!
 * Event Traits
 * Event translation and combo channel programming
 */

use super::types::{ComboChannel, ComboOp, LogicalEvent, PhysicalEvent};
use crate::core::errors::RscResult;
use crate::core::types::{ModuleKind, TileLocation};

/// Maps logical events to hardware ids and programs combo channels.
///
/// Implementations must leave a channel unprogrammed when they return an
/// error from [`EventTranslator::configure_combo_channel`].
pub trait EventTranslator: Send + Sync {
    /// Translate a logical event of `module` at `location`.
    ///
    /// Fails with `InvalidEvent` when the event does not exist there.
    fn logical_to_physical(
        &self,
        location: TileLocation,
        module: ModuleKind,
        event: LogicalEvent,
    ) -> RscResult<PhysicalEvent>;

    /// Program `channel` to output `event_a <op> event_b`
    fn configure_combo_channel(
        &self,
        location: TileLocation,
        module: ModuleKind,
        channel: ComboChannel,
        op: ComboOp,
        event_a: LogicalEvent,
        event_b: LogicalEvent,
    ) -> RscResult<()>;

    /// Return `channel` to its reset configuration
    fn reset_combo_channel(
        &self,
        location: TileLocation,
        module: ModuleKind,
        channel: ComboChannel,
    ) -> RscResult<()>;
}
