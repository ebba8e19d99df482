//! Mock board and sink for integration tests.
//!
//! Records every port call so tests can assert on the full history without
//! a simulated environment in the way.

use sensornode::app::events::Report;
use sensornode::app::ports::{PublishSink, SamplingControl, SensorKind, StatusLed};
use sensornode::{NodeConfig, NodeService, Tick};

// ── Board call record ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardCall {
    Interval { sensor: SensorKind, ms: u32 },
    Pulse { ms: u32 },
}

// ── MockBoard ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockBoard {
    pub calls: Vec<BoardCall>,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intervals(&self) -> Vec<(SensorKind, u32)> {
        self.calls
            .iter()
            .filter_map(|c| match *c {
                BoardCall::Interval { sensor, ms } => Some((sensor, ms)),
                BoardCall::Pulse { .. } => None,
            })
            .collect()
    }

    pub fn pulses(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match *c {
                BoardCall::Pulse { ms } => Some(ms),
                BoardCall::Interval { .. } => None,
            })
            .collect()
    }

    /// Interval most recently applied to `sensor`.
    pub fn interval_of(&self, sensor: SensorKind) -> Option<u32> {
        self.intervals()
            .into_iter()
            .rev()
            .find_map(|(s, ms)| (s == sensor).then_some(ms))
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl SamplingControl for MockBoard {
    fn set_update_interval(&mut self, sensor: SensorKind, interval_ms: u32) {
        self.calls.push(BoardCall::Interval {
            sensor,
            ms: interval_ms,
        });
    }
}

impl StatusLed for MockBoard {
    fn pulse(&mut self, duration_ms: u32) {
        self.calls.push(BoardCall::Pulse { ms: duration_ms });
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub reports: Vec<Report>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<Report> {
        std::mem::take(&mut self.reports)
    }
}

impl PublishSink for RecordingSink {
    fn publish(&mut self, report: &Report) {
        self.reports.push(report.clone());
    }
}

// ── Harness ───────────────────────────────────────────────────

/// A started node with its mocks; the boot reports and calls are cleared.
pub struct Harness {
    pub node: NodeService,
    pub board: MockBoard,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl Harness {
    pub fn start(config: NodeConfig) -> Self {
        let mut node = NodeService::with_dice(config, 0);
        let mut board = MockBoard::new();
        let mut sink = RecordingSink::new();
        node.start(0, &mut board, &mut sink);
        board.clear();
        sink.reports.clear();
        Self { node, board, sink }
    }

    pub fn event(&mut self, event: sensornode::events::NodeEvent, now: Tick) {
        self.node
            .handle_event(event, now, &mut self.board, &mut self.sink);
    }

    pub fn timers(&mut self, now: Tick) -> usize {
        self.node.poll_timers(now, &mut self.board)
    }
}
