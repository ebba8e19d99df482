//! Heartbeat + change-threshold publish gate for one scalar signal.
//!
//! A sample is published when the heartbeat deadline has passed, or when
//! it moved at least `change_threshold` away from the last published value.
//! Until something has been published there is no baseline and only the
//! heartbeat applies.

use crate::app::ports::Tick;

/// Why a sample passed the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishReason {
    /// The heartbeat deadline was reached.
    Heartbeat,
    /// The value moved past the change threshold.
    Changed,
}

/// Publish decision state for one signal.
#[derive(Debug, Clone)]
pub struct PublishGate {
    heartbeat_interval_ms: u32,
    change_threshold: f32,
    last_published: Option<f32>,
    next_heartbeat: Tick,
}

impl PublishGate {
    /// `boot_tick` is the first heartbeat deadline, so the first sample at or
    /// after boot is always published.
    pub fn new(heartbeat_interval_ms: u32, change_threshold: f32, boot_tick: Tick) -> Self {
        Self {
            heartbeat_interval_ms,
            change_threshold,
            last_published: None,
            next_heartbeat: boot_tick,
        }
    }

    /// Pure decision, no state change.
    pub fn evaluate(&self, value: f32, now: Tick) -> Option<PublishReason> {
        if now >= self.next_heartbeat {
            return Some(PublishReason::Heartbeat);
        }
        match self.last_published {
            Some(baseline) if (value - baseline).abs() >= self.change_threshold => {
                Some(PublishReason::Changed)
            }
            _ => None,
        }
    }

    /// Decide and, on publish, commit `value` as the new baseline and push
    /// the heartbeat deadline out. The caller emits the report.
    pub fn offer(&mut self, value: f32, now: Tick) -> Option<PublishReason> {
        let reason = self.evaluate(value, now)?;
        self.last_published = Some(value);
        self.next_heartbeat = now.saturating_add(u64::from(self.heartbeat_interval_ms));
        Some(reason)
    }

    pub fn last_published(&self) -> Option<f32> {
        self.last_published
    }

    pub fn next_heartbeat(&self) -> Tick {
        self.next_heartbeat
    }

    pub fn heartbeat_interval_ms(&self) -> u32 {
        self.heartbeat_interval_ms
    }

    pub fn change_threshold(&self) -> f32 {
        self.change_threshold
    }
}
