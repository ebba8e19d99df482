//! Port traits: the boundary between the publish-decision core and the
//! collaborators around it.
//!
//! ```text
//!   Driver ──▶ NodeEvent ──▶ NodeService (domain) ──▶ PublishSink
//!                                  │
//!                                  ▼
//!                     SamplingControl · StatusLed
//! ```
//!
//! Adapters (simulated board, radio transport, log output) implement these
//! traits. The [`NodeService`](super::service::NodeService) consumes them via
//! generics, so the core never touches hardware directly. Every call is
//! synchronous and fire-and-forget from the core's point of view.

use super::events::Report;
use crate::scheduler::{MAX_TASKS, TaskControl};

/// Milliseconds since boot.
pub type Tick = u64;

// ───────────────────────────────────────────────────────────────
// Time
// ───────────────────────────────────────────────────────────────

/// Monotonic, non-decreasing millisecond clock.
pub trait TickClock {
    fn now(&self) -> Tick;
}

// ───────────────────────────────────────────────────────────────
// Publish sink (core → radio / log)
// ───────────────────────────────────────────────────────────────

/// Receives every report the core decides to emit. Implementations must
/// not block and must swallow their own failures; the core never retries.
pub trait PublishSink {
    fn publish(&mut self, report: &Report);
}

/// Fan a report out to two sinks, left first.
impl<A: PublishSink, B: PublishSink> PublishSink for (A, B) {
    fn publish(&mut self, report: &Report) {
        self.0.publish(report);
        self.1.publish(report);
    }
}

// ───────────────────────────────────────────────────────────────
// Sensor cadence (core → polled drivers)
// ───────────────────────────────────────────────────────────────

/// Polled collaborators whose cadence the core controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Thermometer,
    Accelerometer,
    Battery,
}

/// Reconfigure how often a driver samples. Takes effect for subsequent
/// polls.
pub trait SamplingControl {
    fn set_update_interval(&mut self, sensor: SensorKind, interval_ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Visual feedback
// ───────────────────────────────────────────────────────────────

/// Single status LED.
pub trait StatusLed {
    /// Light the LED for `duration_ms`, then turn it off.
    fn pulse(&mut self, duration_ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate
// ───────────────────────────────────────────────────────────────

/// Callback the [`Scheduler`](crate::scheduler::Scheduler) invokes for each
/// due task. The delegate receives a [`TaskControl`](crate::scheduler::TaskControl)
/// so the task can unregister or re-plan itself, the same way a cooperative
/// scheduler task would.
pub trait SchedulerDelegate<T, const N: usize = MAX_TASKS> {
    fn on_task_due(&mut self, task: T, ctl: &mut TaskControl<'_, T, N>);
}
