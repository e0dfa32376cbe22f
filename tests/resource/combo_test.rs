/*!
 * Combo Event Tests
 * Configuration rules, slot reservation and channel programming on the
 * simulation backend
 */

use aie_rsc::event::registers::{combo_control_reg, combo_input_reg};
use aie_rsc::event::types::*;
use aie_rsc::{
    ComboChannel, ComboEvent, ComboOp, DeviceSession, ModuleKind, ResourceState, RscError,
    SessionConfig, SimIo, TileLocation, TileResource,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

const TILE: TileLocation = TileLocation::new(1, 1);

const FOUR: [LogicalEvent; 4] = [
    CORE_EVENT_ACTIVE,
    CORE_EVENT_DISABLED,
    CORE_EVENT_STREAM_STALL,
    CORE_EVENT_LOCK_STALL,
];

fn sim_session() -> (DeviceSession, Arc<SimIo>) {
    let io = Arc::new(SimIo::new());
    let session = DeviceSession::builder()
        .with_config(SessionConfig::small())
        .with_io(io.clone())
        .build()
        .unwrap();
    (session, io)
}

fn core_combo(session: &DeviceSession) -> ComboEvent {
    session.combo_event(TILE, ModuleKind::Core).unwrap()
}

#[test]
fn test_valid_event_and_operator_counts() {
    let (session, _io) = sim_session();
    let cases: [(&[LogicalEvent], &[ComboOp]); 3] = [
        (&FOUR[..2], &[ComboOp::And]),
        (&FOUR[..3], &[ComboOp::And, ComboOp::Or, ComboOp::Xor]),
        (&FOUR, &[ComboOp::AndNot, ComboOp::OrNot, ComboOp::And]),
    ];
    for (events, ops) in cases {
        let mut combo = core_combo(&session);
        combo.set_events(events, ops).unwrap();
        assert_eq!(combo.state(), ResourceState::Configured);
    }
}

#[test]
fn test_invalid_event_counts() {
    let (session, _io) = sim_session();
    let mut combo = core_combo(&session);
    let six = [FOUR[0], FOUR[1], FOUR[2], FOUR[3], CORE_EVENT_TRUE, CORE_EVENT_NONE];

    for events in [&six[..1], &six[..5], &six[..]] {
        assert!(matches!(
            combo.set_events(events, &[ComboOp::And, ComboOp::Or, ComboOp::Xor]),
            Err(RscError::InvalidArgument(_))
        ));
    }
    assert_eq!(combo.state(), ResourceState::Initialized);
}

#[test]
fn test_mismatched_operator_counts() {
    let (session, _io) = sim_session();
    let mut combo = core_combo(&session);

    assert!(matches!(
        combo.set_events(&FOUR[..2], &[ComboOp::And, ComboOp::Or]),
        Err(RscError::InvalidArgument(_))
    ));
    assert!(matches!(
        combo.set_events(&FOUR[..2], &[]),
        Err(RscError::InvalidArgument(_))
    ));
    assert!(matches!(
        combo.set_events(&FOUR, &[ComboOp::And]),
        Err(RscError::InvalidArgument(_))
    ));
    assert!(matches!(
        combo.set_events(&FOUR[..3], &[ComboOp::And, ComboOp::Or]),
        Err(RscError::InvalidArgument(_))
    ));
    assert_eq!(combo.state(), ResourceState::Initialized);
}

#[test]
fn test_untranslatable_event_keeps_previous_configuration() {
    let (session, _io) = sim_session();
    let mut combo = core_combo(&session);
    combo.set_events(&FOUR[..2], &[ComboOp::Or]).unwrap();

    let result = combo.set_events(&[CORE_EVENT_TRUE, MEM_EVENT_TRUE], &[ComboOp::And]);
    assert_eq!(
        result,
        Err(RscError::InvalidEvent {
            event: MEM_EVENT_TRUE.0,
            module: ModuleKind::Core,
            location: TILE,
        })
    );
    assert_eq!(
        combo.input_events().unwrap(),
        (FOUR[..2].to_vec(), vec![ComboOp::Or])
    );
}

#[test]
fn test_input_events_round_trip_and_reconfigure() {
    let (session, _io) = sim_session();
    let mut combo = core_combo(&session);
    assert_eq!(combo.input_events(), Err(RscError::NotConfigured));

    let ops = [ComboOp::Xor, ComboOp::And, ComboOp::OrNot];
    combo.set_events(&FOUR, &ops).unwrap();
    assert_eq!(combo.input_events().unwrap(), (FOUR.to_vec(), ops.to_vec()));
    assert_eq!(combo.input_events().unwrap(), (FOUR.to_vec(), ops.to_vec()));

    // Configured -> Configured replaces the lists
    combo.set_events(&FOUR[2..], &[ComboOp::And]).unwrap();
    assert_eq!(
        combo.input_events().unwrap(),
        (FOUR[2..].to_vec(), vec![ComboOp::And])
    );

    combo.reserve().unwrap();
    combo.start().unwrap();
    assert_eq!(
        combo.input_events().unwrap(),
        (FOUR[2..].to_vec(), vec![ComboOp::And])
    );
}

#[test]
fn test_output_events_require_reservation() {
    let (session, _io) = sim_session();
    let mut combo = core_combo(&session);
    assert_eq!(combo.output_events(), Err(RscError::NotReserved));
    combo.set_events(&FOUR[..2], &[ComboOp::And]).unwrap();
    assert_eq!(combo.output_events(), Err(RscError::NotReserved));
}

#[test]
fn test_pair_on_empty_window() {
    let (session, io) = sim_session();
    let mut combo = core_combo(&session);
    combo
        .set_events(&[CORE_EVENT_ACTIVE, CORE_EVENT_DISABLED], &[ComboOp::And])
        .unwrap();
    combo.reserve().unwrap();

    let window = session
        .handle()
        .allocator()
        .window(ModuleKind::Core, TILE)
        .unwrap();
    assert_eq!(combo.slots().len(), 1);
    assert_eq!(combo.slots()[0].bit(), window.start);
    assert_eq!(combo.slot_id(), Some(0));
    assert_eq!(combo.output_events().unwrap(), vec![COMBO_EVENT_0_CORE]);

    combo.start().unwrap();
    assert_eq!(combo.programmed_channels(), &[ComboChannel::Combo0]);
    assert_eq!(
        io.peek(combo_input_reg(TILE, ModuleKind::Core)) & 0xFFFF,
        28 | (29 << 8)
    );
    assert_eq!(combo.output_events().unwrap(), vec![COMBO_EVENT_0_CORE]);

    combo.stop().unwrap();
    assert_eq!(io.peek(combo_input_reg(TILE, ModuleKind::Core)), 0);
    assert!(combo.programmed_channels().is_empty());
}

#[test]
fn test_composite_reserves_and_programs_all_channels() {
    let (session, io) = sim_session();
    let mut combo = core_combo(&session);
    combo
        .set_events(&FOUR, &[ComboOp::And, ComboOp::Or, ComboOp::Xor])
        .unwrap();
    combo.reserve().unwrap();

    assert_eq!(combo.slots().len(), 2);
    assert_eq!(combo.slot_id(), Some(2));
    assert_eq!(session.stats().core.used, 2);
    assert_eq!(
        combo.output_events().unwrap(),
        vec![
            COMBO_EVENT_0_CORE,
            COMBO_EVENT_0_CORE.offset(1),
            COMBO_EVENT_0_CORE.offset(2),
        ]
    );

    combo.start().unwrap();
    assert_eq!(
        combo.programmed_channels(),
        &[ComboChannel::Combo0, ComboChannel::Combo1, ComboChannel::Combo2]
    );
    assert_eq!(
        io.peek(combo_input_reg(TILE, ModuleKind::Core)),
        (28 | (29 << 8)) | ((25 | (26 << 8)) << 16)
    );
    assert_eq!(
        io.peek(combo_control_reg(TILE, ModuleKind::Core)),
        ComboOp::Or.encoding() << 8 | ComboOp::Xor.encoding() << 16
    );

    combo.stop().unwrap();
    assert_eq!(io.peek(combo_input_reg(TILE, ModuleKind::Core)), 0);
    assert_eq!(io.peek(combo_control_reg(TILE, ModuleKind::Core)), 0);

    combo.release().unwrap();
    assert_eq!(session.stats().core.used, 0);
}

#[test]
fn test_reserve_exhaustion_rolls_back() {
    let (session, _io) = sim_session();
    let mut holders = Vec::new();
    for _ in 0..3 {
        let mut combo = core_combo(&session);
        combo.set_events(&FOUR[..2], &[ComboOp::And]).unwrap();
        combo.reserve().unwrap();
        holders.push(combo);
    }

    let mut composite = core_combo(&session);
    composite
        .set_events(&FOUR, &[ComboOp::And, ComboOp::Or, ComboOp::Xor])
        .unwrap();
    let result = composite.reserve();
    assert_eq!(
        result,
        Err(RscError::ResourceExhausted {
            module: ModuleKind::Core,
            location: TILE,
            requested: 2,
            available: 1,
        })
    );
    assert_eq!(composite.state(), ResourceState::Configured);
    assert!(composite.slots().is_empty());
    assert_eq!(session.stats().core.used, 3);

    holders.pop();
    composite.reserve().unwrap();
    assert_eq!(session.stats().core.used, 4);
}

#[test]
fn test_stop_keeps_reservation() {
    let (session, _io) = sim_session();
    let mut combo = core_combo(&session);
    combo.set_events(&FOUR[..3], &[ComboOp::And, ComboOp::Or, ComboOp::And]).unwrap();
    combo.reserve().unwrap();
    combo.start().unwrap();
    combo.stop().unwrap();

    assert_eq!(combo.state(), ResourceState::Reserved);
    assert_eq!(session.stats().core.used, 2);
    combo.start().unwrap();
    assert_eq!(combo.state(), ResourceState::Started);
}

#[test]
fn test_verified_writes_on_sim_backend() {
    let session = DeviceSession::open(SessionConfig::small().with_verify_writes(true)).unwrap();
    let mut combo = session
        .combo_event(TileLocation::new(2, 0), ModuleKind::Shim)
        .unwrap();
    combo
        .set_events(&[PL_EVENT_DMA_S2MM_0_START_BD, PL_EVENT_DMA_MM2S_0_START_BD], &[ComboOp::OrNot])
        .unwrap();
    combo.reserve().unwrap();
    combo.start().unwrap();
    assert_eq!(combo.output_events().unwrap(), vec![COMBO_EVENT_0_PL]);
}

#[test]
fn test_verified_writes_fail_on_noop_backend() {
    let config = SessionConfig::small()
        .with_backend(aie_rsc::BackendKind::Noop)
        .with_verify_writes(true)
        .with_poll_timeout_us(0);
    let session = DeviceSession::open(config).unwrap();
    let mut combo = core_combo(&session);
    combo.set_events(&FOUR[..2], &[ComboOp::Xor]).unwrap();
    combo.reserve().unwrap();

    assert!(matches!(
        combo.start(),
        Err(RscError::HardwareProgrammingFailed { channel: 0, .. })
    ));
    assert_eq!(combo.state(), ResourceState::Reserved);
    assert!(combo.programmed_channels().is_empty());
}
