//! Fuzz target: `NodeService::handle_event` / `poll_timers`
//!
//! Decodes arbitrary bytes into a stream of driver events and time steps
//! and drives them through a started node. Asserts that it never panics,
//! that every report fits a radio frame, and that the service-mode
//! downgrade happens at most once per sensor.
//!
//! cargo fuzz run fuzz_event_stream

#![no_main]

use libfuzzer_sys::fuzz_target;
use sensornode::adapters::{FRAME_LEN, RadioFrameSink};
use sensornode::app::events::Report;
use sensornode::app::ports::{PublishSink, SamplingControl, SensorKind, StatusLed};
use sensornode::error::SensorError;
use sensornode::events::{ButtonGesture, NodeEvent, SensorEvent, Vector3};
use sensornode::{NodeConfig, NodeService};

#[derive(Default)]
struct Board {
    downgrades: usize,
}

impl SamplingControl for Board {
    fn set_update_interval(&mut self, _sensor: SensorKind, interval_ms: u32) {
        if interval_ms == 10_000 {
            self.downgrades += 1;
        }
    }
}

impl StatusLed for Board {
    fn pulse(&mut self, _duration_ms: u32) {}
}

struct FrameCheck;

impl PublishSink for FrameCheck {
    fn publish(&mut self, report: &Report) {
        let mut buf = [0u8; FRAME_LEN];
        assert!(
            RadioFrameSink::<NoRadio>::encode(u16::MAX, report, &mut buf).is_ok(),
            "report does not fit a frame: {report:?}"
        );
    }
}

struct NoRadio;

impl sensornode::adapters::RadioTransport for NoRadio {
    fn send(&mut self, _frame: &[u8]) -> Result<(), sensornode::error::PublishError> {
        Ok(())
    }
}

fn f32_from(bytes: &[u8]) -> f32 {
    let mut raw = [0u8; 4];
    raw[..bytes.len().min(4)].copy_from_slice(&bytes[..bytes.len().min(4)]);
    f32::from_le_bytes(raw)
}

fuzz_target!(|data: &[u8]| {
    let mut node = NodeService::with_dice(NodeConfig::push_button(), 0);
    let mut board = Board::default();
    let mut sink = FrameCheck;
    node.start(0, &mut board, &mut sink);
    let boot_downgrades = board.downgrades;

    let mut now = 0u64;
    for chunk in data.chunks(6) {
        let op = chunk[0];
        let rest = &chunk[1..];
        now += u64::from(op >> 4) * 60_000;
        let event = match op & 0x0f {
            0 => NodeEvent::Button(ButtonGesture::Press),
            1 => NodeEvent::Button(ButtonGesture::Release),
            2 => NodeEvent::Button(ButtonGesture::Click),
            3 => NodeEvent::Button(ButtonGesture::Hold),
            4 => NodeEvent::Thermometer(SensorEvent::Update(Some(f32_from(rest)))),
            5 => NodeEvent::Thermometer(SensorEvent::Update(None)),
            6 => NodeEvent::Battery(SensorEvent::Update(Some(f32_from(rest)))),
            7 => {
                let b = |i: usize| f32::from(rest.get(i).copied().unwrap_or(0) as i8) / 64.0;
                NodeEvent::Accelerometer(SensorEvent::Update(Some(Vector3::new(b(0), b(1), b(2)))))
            }
            8 => NodeEvent::Accelerometer(SensorEvent::Error(SensorError::Timeout)),
            _ => {
                node.poll_timers(now, &mut board);
                continue;
            }
        };
        node.handle_event(event, now, &mut board, &mut sink);
    }

    node.poll_timers(u64::MAX, &mut board);
    assert!(board.downgrades - boot_downgrades <= 2);
});
