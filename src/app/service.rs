//! Node service: the hexagonal core.
//!
//! [`NodeService`] owns every piece of remembered state (publish gate,
//! button and orientation trackers, service-mode timer, scheduler) and turns
//! driver events into reports. All I/O goes through port traits handed in at
//! call sites, so the whole service runs against mock adapters in tests.
//!
//! ```text
//!  NodeEvent ──▶ ┌──────────────────────────────┐ ──▶ PublishSink
//!                │         NodeService           │
//!  poll_timers ─▶│ Gate · Gesture · Orientation  │ ──▶ SamplingControl
//!                │ ServiceModeTimer · Scheduler  │ ──▶ StatusLed
//!                └──────────────────────────────┘
//! ```

use log::{debug, error, info};

use crate::config::NodeConfig;
use crate::events::{NodeEvent, SensorEvent, Vector3};
use crate::filters::{
    ButtonAction, ButtonGestureTracker, FaceClassifier, OrientationTracker, PublishGate,
};
use crate::scheduler::{Scheduler, SchedulerDelegate, TaskControl};
use crate::sensors::dice::Dice;
use crate::service_mode::ServiceModeTimer;

use super::events::Report;
use super::ports::{PublishSink, SamplingControl, SensorKind, StatusLed, Tick};

/// Deferred work owned by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeTask {
    ExitServiceMode,
}

/// Running counters, for the simulator summary and for tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeStats {
    pub events_handled: u32,
    pub reports_published: u32,
    /// `Update(None)` and non-finite samples.
    pub samples_skipped: u32,
    pub sensor_errors: u32,
}

pub struct NodeService<C = Dice> {
    config: NodeConfig,
    gate: PublishGate,
    buttons: ButtonGestureTracker,
    orientation: OrientationTracker<C>,
    service_mode: ServiceModeTimer,
    scheduler: Scheduler<NodeTask>,
    stats: NodeStats,
    started: bool,
}

impl NodeService<Dice> {
    /// Service with the default dice classifier.
    pub fn with_dice(config: NodeConfig, boot_tick: Tick) -> Self {
        Self::new(config, Dice::default(), boot_tick)
    }
}

impl<C: FaceClassifier> NodeService<C> {
    /// Build the service. Nothing is published or scheduled until
    /// [`start`](Self::start).
    pub fn new(config: NodeConfig, classifier: C, boot_tick: Tick) -> Self {
        let gate = PublishGate::new(
            config.temperature.heartbeat_interval_ms,
            config.temperature.change_threshold_c,
            boot_tick,
        );
        let buttons =
            ButtonGestureTracker::new(config.count_trigger).with_holds(config.report_holds);
        let service_mode = ServiceModeTimer::from_config(&config);
        Self {
            gate,
            buttons,
            orientation: OrientationTracker::new(classifier),
            service_mode,
            scheduler: Scheduler::new(),
            stats: NodeStats::default(),
            started: false,
            config,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Boot sequence: service-mode cadence, pairing request, service-mode
    /// timer, boot pulse. A second call is ignored.
    pub fn start(
        &mut self,
        now: Tick,
        hw: &mut (impl SamplingControl + StatusLed),
        sink: &mut impl PublishSink,
    ) {
        if self.started {
            return;
        }
        self.started = true;
        info!(
            "Node '{}' v{} reset at {} ms",
            self.config.pairing_name, self.config.firmware_version, now
        );

        hw.set_update_interval(
            SensorKind::Thermometer,
            self.config.temperature.poll.service_interval_ms,
        );
        if let Some(accel) = &self.config.accelerometer {
            hw.set_update_interval(SensorKind::Accelerometer, accel.service_interval_ms);
        }
        hw.set_update_interval(SensorKind::Battery, self.config.battery_interval_ms);

        self.emit(
            sink,
            &Report::PairingRequest {
                name: self.config.pairing_name.clone(),
                version: self.config.firmware_version.clone(),
            },
        );

        self.service_mode
            .arm(&mut self.scheduler, NodeTask::ExitServiceMode, now);
        hw.pulse(self.config.pulses.boot_ms);
    }

    // ── Event dispatch ────────────────────────────────────────

    /// Handle one driver event. Runs to completion; never blocks.
    pub fn handle_event(
        &mut self,
        event: NodeEvent,
        now: Tick,
        hw: &mut (impl SamplingControl + StatusLed),
        sink: &mut impl PublishSink,
    ) {
        self.stats.events_handled = self.stats.events_handled.wrapping_add(1);
        match event {
            NodeEvent::Thermometer(SensorEvent::Update(Some(celsius))) => {
                self.on_temperature(celsius, now, sink);
            }
            NodeEvent::Accelerometer(SensorEvent::Update(Some(sample))) => {
                self.on_acceleration(sample, sink);
            }
            NodeEvent::Battery(SensorEvent::Update(Some(volts))) => {
                if volts.is_finite() {
                    self.emit(sink, &Report::BatteryVoltage(volts));
                } else {
                    self.skip("battery");
                }
            }
            NodeEvent::Button(gesture) => {
                if let Some(action) = self.buttons.handle(gesture, now) {
                    self.on_button_action(action, hw, sink);
                }
            }
            NodeEvent::Thermometer(SensorEvent::Update(None)) => self.skip("thermometer"),
            NodeEvent::Accelerometer(SensorEvent::Update(None)) => self.skip("accelerometer"),
            NodeEvent::Battery(SensorEvent::Update(None)) => self.skip("battery"),
            NodeEvent::Thermometer(SensorEvent::Error(e)) => self.sensor_error("thermometer", e),
            NodeEvent::Accelerometer(SensorEvent::Error(e)) => {
                self.sensor_error("accelerometer", e);
            }
            NodeEvent::Battery(SensorEvent::Error(e)) => self.sensor_error("battery", e),
        }
    }

    /// Run due scheduler tasks. Returns the number of tasks run.
    pub fn poll_timers(&mut self, now: Tick, hw: &mut impl SamplingControl) -> usize {
        let mut runner = TaskRunner {
            service_mode: &mut self.service_mode,
            hw,
        };
        self.scheduler.tick(now, &mut runner)
    }

    fn on_temperature(&mut self, celsius: f32, now: Tick, sink: &mut impl PublishSink) {
        if !celsius.is_finite() {
            self.skip("thermometer");
            return;
        }
        match self.gate.offer(celsius, now) {
            Some(reason) => {
                debug!("Temperature {:.2} °C published ({:?})", celsius, reason);
                self.emit(
                    sink,
                    &Report::Temperature {
                        channel: self.config.temperature.channel,
                        celsius,
                    },
                );
            }
            None => debug!("Temperature {:.2} °C suppressed", celsius),
        }
    }

    fn on_acceleration(&mut self, sample: Vector3, sink: &mut impl PublishSink) {
        if self.config.accelerometer.is_none() {
            return;
        }
        if !sample.is_finite() {
            self.skip("accelerometer");
            return;
        }
        if let Some(face) = self.orientation.feed(sample) {
            self.emit(
                sink,
                &Report::Orientation {
                    topic: self.config.orientation_topic.clone(),
                    face: face.code(),
                },
            );
        }
    }

    fn on_button_action(
        &mut self,
        action: ButtonAction,
        hw: &mut impl StatusLed,
        sink: &mut impl PublishSink,
    ) {
        match action {
            ButtonAction::Counted(count) => {
                hw.pulse(self.config.pulses.click_ms);
                self.emit(sink, &Report::ButtonCount(count));
            }
            ButtonAction::Held(count) => {
                hw.pulse(self.config.pulses.hold_ms);
                self.emit(sink, &Report::HoldCount(count));
            }
            ButtonAction::HoldReleased { duration_ms } => {
                self.emit(sink, &Report::HoldDuration(duration_ms));
            }
        }
    }

    fn emit(&mut self, sink: &mut impl PublishSink, report: &Report) {
        info!("Publish {}", report);
        sink.publish(report);
        self.stats.reports_published = self.stats.reports_published.wrapping_add(1);
    }

    fn skip(&mut self, source: &str) {
        debug!("{}: no valid data, sample skipped", source);
        self.stats.samples_skipped = self.stats.samples_skipped.wrapping_add(1);
    }

    fn sensor_error(&mut self, source: &str, err: crate::error::SensorError) {
        error!("{}: {}", source, err);
        self.stats.sensor_errors = self.stats.sensor_errors.wrapping_add(1);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn stats(&self) -> NodeStats {
        self.stats
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn gate(&self) -> &PublishGate {
        &self.gate
    }

    pub fn buttons(&self) -> &ButtonGestureTracker {
        &self.buttons
    }

    pub fn orientation(&self) -> &OrientationTracker<C> {
        &self.orientation
    }

    /// Whether sensors are still on the service-mode cadence.
    pub fn in_service_mode(&self) -> bool {
        self.service_mode.is_active()
    }

    pub fn scheduler(&self) -> &Scheduler<NodeTask> {
        &self.scheduler
    }
}

/// Scheduler delegate borrowing only the parts of the service a task needs.
struct TaskRunner<'a, H: ?Sized> {
    service_mode: &'a mut ServiceModeTimer,
    hw: &'a mut H,
}

impl<H: SamplingControl + ?Sized> SchedulerDelegate<NodeTask> for TaskRunner<'_, H> {
    fn on_task_due(&mut self, task: NodeTask, ctl: &mut TaskControl<'_, NodeTask>) {
        match task {
            NodeTask::ExitServiceMode => self.service_mode.expire(self.hw, ctl),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CountTrigger;
    use crate::error::SensorError;
    use crate::events::ButtonGesture;

    #[derive(Default)]
    struct Hw {
        intervals: Vec<(SensorKind, u32)>,
        pulses: Vec<u32>,
    }

    impl SamplingControl for Hw {
        fn set_update_interval(&mut self, sensor: SensorKind, interval_ms: u32) {
            self.intervals.push((sensor, interval_ms));
        }
    }

    impl StatusLed for Hw {
        fn pulse(&mut self, duration_ms: u32) {
            self.pulses.push(duration_ms);
        }
    }

    #[derive(Default)]
    struct Sink(Vec<Report>);

    impl PublishSink for Sink {
        fn publish(&mut self, report: &Report) {
            self.0.push(report.clone());
        }
    }

    fn started(config: NodeConfig) -> (NodeService, Hw, Sink) {
        let mut node = NodeService::with_dice(config, 0);
        let mut hw = Hw::default();
        let mut sink = Sink::default();
        node.start(0, &mut hw, &mut sink);
        (node, hw, sink)
    }

    #[test]
    fn start_applies_service_cadence_and_pairs() {
        let (node, hw, sink) = started(NodeConfig::push_button());
        assert_eq!(
            hw.intervals,
            vec![
                (SensorKind::Thermometer, 1_000),
                (SensorKind::Accelerometer, 1_000),
                (SensorKind::Battery, 3_600_000),
            ]
        );
        assert_eq!(hw.pulses, vec![2_000]);
        assert!(matches!(sink.0[..], [Report::PairingRequest { .. }]));
        assert!(node.in_service_mode());
        assert_eq!(node.scheduler().len(), 1);
    }

    #[test]
    fn start_twice_is_ignored() {
        let (mut node, mut hw, mut sink) = started(NodeConfig::push_button());
        node.start(10, &mut hw, &mut sink);
        assert_eq!(sink.0.len(), 1);
        assert_eq!(node.scheduler().len(), 1);
    }

    #[test]
    fn first_temperature_is_heartbeat() {
        let (mut node, mut hw, mut sink) = started(NodeConfig::push_button());
        sink.0.clear();
        let ev = NodeEvent::Thermometer(SensorEvent::Update(Some(21.5)));
        node.handle_event(ev, 100, &mut hw, &mut sink);
        node.handle_event(ev, 1_100, &mut hw, &mut sink);
        assert_eq!(
            sink.0,
            vec![Report::Temperature {
                channel: 1,
                celsius: 21.5
            }]
        );
    }

    #[test]
    fn no_data_and_errors_are_counted_not_published() {
        let (mut node, mut hw, mut sink) = started(NodeConfig::push_button());
        sink.0.clear();
        for ev in [
            NodeEvent::Thermometer(SensorEvent::Update(None)),
            NodeEvent::Thermometer(SensorEvent::Update(Some(f32::NAN))),
            NodeEvent::Battery(SensorEvent::Error(SensorError::Timeout)),
        ] {
            node.handle_event(ev, 5, &mut hw, &mut sink);
        }
        assert!(sink.0.is_empty());
        let stats = node.stats();
        assert_eq!(stats.samples_skipped, 2);
        assert_eq!(stats.sensor_errors, 1);
        assert_eq!(stats.events_handled, 3);
        assert_eq!(node.gate().last_published(), None);
    }

    #[test]
    fn battery_published_on_every_update() {
        let (mut node, mut hw, mut sink) = started(NodeConfig::push_button());
        sink.0.clear();
        let ev = NodeEvent::Battery(SensorEvent::Update(Some(3.01)));
        node.handle_event(ev, 1, &mut hw, &mut sink);
        node.handle_event(ev, 2, &mut hw, &mut sink);
        assert_eq!(sink.0, vec![Report::BatteryVoltage(3.01); 2]);
    }

    #[test]
    fn click_pulses_led_and_counts() {
        let (mut node, mut hw, mut sink) = started(NodeConfig::push_button());
        sink.0.clear();
        hw.pulses.clear();
        node.handle_event(NodeEvent::Button(ButtonGesture::Click), 50, &mut hw, &mut sink);
        assert_eq!(sink.0, vec![Report::ButtonCount(1)]);
        assert_eq!(hw.pulses, vec![100]);
    }

    #[test]
    fn kit_hold_is_silent() {
        let (mut node, mut hw, mut sink) = started(NodeConfig::kit_push_button());
        sink.0.clear();
        hw.pulses.clear();
        for (g, now) in [
            (ButtonGesture::Press, 1_000),
            (ButtonGesture::Hold, 3_000),
            (ButtonGesture::Release, 3_500),
        ] {
            node.handle_event(NodeEvent::Button(g), now, &mut hw, &mut sink);
        }
        assert_eq!(sink.0, vec![Report::ButtonCount(1)]);
        assert_eq!(hw.pulses, vec![100]);
    }

    #[test]
    fn accelerometer_ignored_without_one_configured() {
        let config = NodeConfig::kit_push_button();
        assert_eq!(config.count_trigger, CountTrigger::Press);
        let (mut node, mut hw, mut sink) = started(config);
        sink.0.clear();
        let ev = NodeEvent::Accelerometer(SensorEvent::Update(Some(Vector3::new(0.0, 0.0, 1.0))));
        node.handle_event(ev, 10, &mut hw, &mut sink);
        assert!(sink.0.is_empty());
    }

    #[test]
    fn service_mode_expires_once() {
        let config = NodeConfig::push_button();
        let d = u64::from(config.service_mode_duration_ms);
        let (mut node, mut hw, _sink) = started(config);
        hw.intervals.clear();

        assert_eq!(node.poll_timers(d - 1, &mut hw), 0);
        assert_eq!(node.poll_timers(d, &mut hw), 1);
        assert_eq!(node.poll_timers(d * 2, &mut hw), 0);
        assert_eq!(
            hw.intervals,
            vec![
                (SensorKind::Thermometer, 10_000),
                (SensorKind::Accelerometer, 10_000)
            ]
        );
        assert!(!node.in_service_mode());
        assert!(node.scheduler().is_empty());
    }
}
