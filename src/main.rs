/*!
 * aie-rsc - Combo Event Demo
 *
 * Opens a device session, runs a pairwise and a composite combo event
 * through their whole lifecycle, and logs what they produced.
 *
 * Usage: `aie-rsc [config.json]`
 */

use aie_rsc::event::types::{
    CORE_EVENT_ACTIVE, CORE_EVENT_DISABLED, CORE_EVENT_LOCK_STALL, CORE_EVENT_PERF_CNT_0,
    CORE_EVENT_PERF_CNT_1, CORE_EVENT_STREAM_STALL,
};
use aie_rsc::{init_tracing, ComboOp, DeviceSession, ModuleKind, SessionConfig, TileLocation, TileResource};
use anyhow::{Context, Result};
use tracing::info;

fn main() -> Result<()> {
    init_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => SessionConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => SessionConfig::default(),
    }
    .with_env_overrides()
    .context("invalid environment override")?;

    let session = DeviceSession::open(config).context("failed to open device session")?;
    // Separate tiles: a composite drives both pairwise channels of its tile
    let pair_tile = TileLocation::new(0, 1);
    let composite_tile = TileLocation::new(1, 1);

    let mut pair = session.combo_event(pair_tile, ModuleKind::Core)?;
    pair.set_events(&[CORE_EVENT_ACTIVE, CORE_EVENT_DISABLED], &[ComboOp::And])?;
    pair.reserve()?;
    pair.start()?;
    let outputs = pair.output_events()?;
    info!(slot_id = ?pair.slot_id(), outputs = ?outputs, "Pairwise combo running");

    let mut composite = session.combo_event(composite_tile, ModuleKind::Core)?;
    composite.set_events(
        &[
            CORE_EVENT_STREAM_STALL,
            CORE_EVENT_LOCK_STALL,
            CORE_EVENT_PERF_CNT_0,
            CORE_EVENT_PERF_CNT_1,
        ],
        &[ComboOp::Or, ComboOp::Or, ComboOp::And],
    )?;
    composite.reserve()?;
    composite.start()?;
    let outputs = composite.output_events()?;
    info!(slot_id = ?composite.slot_id(), outputs = ?outputs, "Composite combo running");

    let stats = session.stats();
    info!(
        core_used = stats.core.used,
        core_total = stats.core.total,
        "Allocator usage"
    );

    for combo in [&mut composite, &mut pair] {
        combo.stop()?;
        combo.release()?;
    }
    info!(used = session.stats().total_used(), "All combo events released");
    Ok(())
}
