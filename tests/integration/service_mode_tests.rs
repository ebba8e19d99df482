//! Boot → service-mode cadence → normal cadence.

use sensornode::app::events::Report;
use sensornode::app::ports::SensorKind;
use sensornode::config::PollConfig;
use sensornode::events::{NodeEvent, SensorEvent};
use sensornode::{NodeConfig, NodeService};

use super::mock_hw::{BoardCall, Harness, MockBoard, RecordingSink};

#[test]
fn boot_sequence_order() {
    let mut node = NodeService::with_dice(NodeConfig::push_button(), 0);
    let mut board = MockBoard::new();
    let mut sink = RecordingSink::new();
    node.start(0, &mut board, &mut sink);

    assert_eq!(
        board.calls,
        vec![
            BoardCall::Interval {
                sensor: SensorKind::Thermometer,
                ms: 1_000
            },
            BoardCall::Interval {
                sensor: SensorKind::Accelerometer,
                ms: 1_000
            },
            BoardCall::Interval {
                sensor: SensorKind::Battery,
                ms: 3_600_000
            },
            BoardCall::Pulse { ms: 2_000 },
        ]
    );
    match &sink.reports[..] {
        [Report::PairingRequest { name, .. }] => assert_eq!(name.as_str(), "push-button"),
        other => panic!("unexpected boot reports: {other:?}"),
    }
}

#[test]
fn downgrade_happens_exactly_once_at_duration() {
    let mut h = Harness::start(NodeConfig::push_button());
    let d = 15 * 60 * 1000;

    // Polling in 1 s steps through twice the window.
    let mut fired = 0;
    for now in (0..=2 * d).step_by(1_000) {
        fired += h.timers(now);
        if now < d {
            assert!(h.board.calls.is_empty(), "downgrade before {d} ms at {now}");
        }
    }
    assert_eq!(fired, 1);
    assert_eq!(
        h.board.intervals(),
        vec![
            (SensorKind::Thermometer, 10_000),
            (SensorKind::Accelerometer, 10_000)
        ]
    );
    assert!(!h.node.in_service_mode());
}

#[test]
fn kit_profile_downgrades_thermometer_after_an_hour() {
    let mut h = Harness::start(NodeConfig::kit_push_button());
    let d = 60 * 60 * 1000;
    assert_eq!(h.timers(d - 1), 0);
    assert_eq!(h.timers(d), 1);
    assert_eq!(h.board.intervals(), vec![(SensorKind::Thermometer, 10_000)]);
}

#[test]
fn custom_intervals_are_honoured() {
    let mut config = NodeConfig::push_button();
    config.service_mode_duration_ms = 5_000;
    config.temperature.poll = PollConfig {
        service_interval_ms: 250,
        normal_interval_ms: 30_000,
    };
    config.accelerometer = None;
    config.validate().unwrap();

    let mut h = Harness::start(config);
    h.timers(5_000);
    assert_eq!(h.board.interval_of(SensorKind::Thermometer), Some(30_000));
    assert_eq!(h.board.interval_of(SensorKind::Accelerometer), None);
}

#[test]
fn events_still_flow_after_service_mode() {
    let mut h = Harness::start(NodeConfig::push_button());
    h.timers(15 * 60 * 1000);
    h.event(
        NodeEvent::Thermometer(SensorEvent::Update(Some(19.0))),
        15 * 60 * 1000 + 10,
    );
    assert_eq!(h.sink.reports.len(), 1);
}
