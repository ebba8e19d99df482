//! Full loop: simulated board → event queue → node → radio frames.

#![cfg(feature = "sim")]

use sensornode::adapters::sim::{SimBoard, SimProfile};
use sensornode::adapters::{FRAME_LEN, LogPublishSink, ManualClock, RadioFrameSink, RadioTransport};
use sensornode::app::ports::{SensorKind, TickClock};
use sensornode::error::PublishError;
use sensornode::events::EventQueue;
use sensornode::{NodeConfig, NodeService};

#[derive(Default)]
struct Air {
    frames: Vec<Vec<u8>>,
}

impl RadioTransport for Air {
    fn send(&mut self, frame: &[u8]) -> Result<(), PublishError> {
        self.frames.push(frame.to_vec());
        Ok(())
    }
}

#[test]
fn twenty_simulated_minutes() {
    let clock = ManualClock::new(0);
    let queue = EventQueue::new();
    let mut board = SimBoard::new(SimProfile {
        press_gap_ms: 20_000,
        ..SimProfile::default()
    });
    let mut sink = (RadioFrameSink::new(Air::default()), LogPublishSink::new());
    let mut node = NodeService::with_dice(NodeConfig::push_button(), 0);
    node.start(0, &mut board, &mut sink);
    assert_eq!(board.interval(SensorKind::Thermometer), 1_000);

    while clock.now() < 20 * 60 * 1000 {
        let now = clock.advance(10);
        board.step(now, &queue);
        queue.drain(|e| node.handle_event(e, now, &mut board, &mut sink));
        node.poll_timers(now, &mut board);
    }

    assert!(!node.in_service_mode());
    assert_eq!(board.interval(SensorKind::Thermometer), 10_000);
    assert_eq!(board.interval(SensorKind::Accelerometer), 10_000);
    assert_eq!(queue.dropped(), 0);

    let stats = node.stats();
    let (radio, log) = &sink;
    assert_eq!(radio.sent(), stats.reports_published);
    assert_eq!(log.published(), stats.reports_published);
    assert!(radio.transport().frames.iter().all(|f| f.len() <= FRAME_LEN));
    // Pairing request, initial heartbeat, at least one press.
    assert!(stats.reports_published >= 3);
    assert!(board.led_pulses() >= 2);
}
