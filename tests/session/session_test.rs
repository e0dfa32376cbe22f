/*!
 * Device Session Tests
 * Shared allocator across resources and backend injection
 */

use aie_rsc::event::types::{MEM_EVENT_DMA_MM2S_0_FINISHED_BD, MEM_EVENT_DMA_S2MM_0_FINISHED_BD};
use aie_rsc::{
    BackendKind, ComboOp, DeviceSession, ModuleKind, NoopIo, RscError, SessionConfig,
    TileLocation, TileResource,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::thread;

const EVENTS: [aie_rsc::LogicalEvent; 2] =
    [MEM_EVENT_DMA_S2MM_0_FINISHED_BD, MEM_EVENT_DMA_MM2S_0_FINISHED_BD];

#[test]
fn test_resources_share_one_allocator() {
    let session = DeviceSession::open(SessionConfig::small()).unwrap();
    let loc = TileLocation::new(3, 4);

    let mut combos = Vec::new();
    for _ in 0..4 {
        let mut combo = session.combo_event(loc, ModuleKind::Memory).unwrap();
        combo.set_events(&EVENTS, &[ComboOp::And]).unwrap();
        combo.reserve().unwrap();
        combos.push(combo);
    }
    let slots: Vec<u32> = combos.iter().map(|c| c.slots()[0].slot()).collect();
    assert_eq!(slots, vec![0, 1, 2, 3]);
    assert_eq!(session.stats().memory.used, 4);

    let mut extra = session.combo_event(loc, ModuleKind::Memory).unwrap();
    extra.set_events(&EVENTS, &[ComboOp::And]).unwrap();
    assert!(extra.reserve().is_err());

    combos.clear();
    assert_eq!(session.stats().memory.used, 0);
}

#[test]
fn test_concurrent_reservations_never_oversubscribe() {
    let session = DeviceSession::open(SessionConfig::small()).unwrap();
    let loc = TileLocation::new(1, 1);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let session = session.clone();
            thread::spawn(move || {
                let mut combo = session.combo_event(loc, ModuleKind::Memory).unwrap();
                combo.set_events(&EVENTS, &[ComboOp::Or]).unwrap();
                combo.reserve().ok().map(|_| combo)
            })
        })
        .collect();

    let held: Vec<_> = handles
        .into_iter()
        .filter_map(|h| h.join().unwrap())
        .collect();
    assert_eq!(held.len(), 4);
    assert_eq!(session.stats().memory.used, 4);
}

#[test]
fn test_injected_backend_overrides_config() {
    let session = DeviceSession::builder()
        .with_config(SessionConfig::small().with_backend(BackendKind::Sim))
        .with_io(Arc::new(NoopIo::new()))
        .build()
        .unwrap();
    assert_eq!(session.handle().io().backend(), BackendKind::Noop);
}

#[test]
fn test_sessions_have_distinct_ids() {
    let a = DeviceSession::open(SessionConfig::small()).unwrap();
    let b = DeviceSession::open(SessionConfig::small()).unwrap();
    assert_ne!(a.handle().id(), b.handle().id());
}

#[test]
fn test_oversized_slot_count_fails_open() {
    let mut config = SessionConfig::small();
    config.combo_slots_per_tile = 0x4000_0000;
    assert!(matches!(
        DeviceSession::open(config),
        Err(RscError::InvalidArgument(_))
    ));
}
