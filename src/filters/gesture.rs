//! Button gesture tracker.
//!
//! Turns the raw `Press` / `Release` / `Click` / `Hold` stream of the button
//! driver into counter and duration reports.
//!
//! ```text
//!            Press                Hold
//!   Idle ──────────▶ Pressed ──────────▶ HeldReported
//!     ▲                 │                     │
//!     │     Release     │       Release       │
//!     └─────────────────┴─────────────────────┘
//!                (no report)        (hold-duration report)
//! ```
//!
//! Counters are 16-bit and wrap silently. With holds disabled, `Hold` is
//! ignored and a release never reports a duration.

use log::warn;

use crate::app::ports::Tick;
use crate::config::CountTrigger;
use crate::events::ButtonGesture;

/// What the service has to publish after a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    /// Press counter advanced; carries the new value.
    Counted(u16),
    /// Hold counter advanced; carries the new value.
    Held(u16),
    /// A held button was released after `duration_ms`.
    HoldReleased { duration_ms: i32 },
}

#[derive(Debug, Clone)]
pub struct ButtonGestureTracker {
    trigger: CountTrigger,
    track_holds: bool,
    click_count: u16,
    hold_count: u16,
    press_start: Option<Tick>,
    hold_active: bool,
}

impl ButtonGestureTracker {
    pub fn new(trigger: CountTrigger) -> Self {
        Self {
            trigger,
            track_holds: true,
            click_count: 0,
            hold_count: 0,
            press_start: None,
            hold_active: false,
        }
    }

    /// Enable or disable hold counting and hold-duration reports.
    pub fn with_holds(mut self, enabled: bool) -> Self {
        self.track_holds = enabled;
        self
    }

    pub fn handle(&mut self, gesture: ButtonGesture, now: Tick) -> Option<ButtonAction> {
        match gesture {
            ButtonGesture::Press => {
                self.hold_active = false;
                self.press_start = Some(now);
                match self.trigger {
                    CountTrigger::Press => Some(self.count()),
                    CountTrigger::Click => None,
                }
            }
            ButtonGesture::Click => match self.trigger {
                CountTrigger::Click => Some(self.count()),
                CountTrigger::Press => None,
            },
            ButtonGesture::Hold if !self.track_holds => None,
            ButtonGesture::Hold => {
                self.hold_count = self.hold_count.wrapping_add(1);
                self.hold_active = true;
                Some(ButtonAction::Held(self.hold_count))
            }
            ButtonGesture::Release => {
                let start = self.press_start.take();
                if !core::mem::take(&mut self.hold_active) {
                    return None;
                }
                let Some(start) = start else {
                    warn!("Button: release after hold without a recorded press");
                    return None;
                };
                let held = now.saturating_sub(start);
                Some(ButtonAction::HoldReleased {
                    duration_ms: i32::try_from(held).unwrap_or(i32::MAX),
                })
            }
        }
    }

    fn count(&mut self) -> ButtonAction {
        self.click_count = self.click_count.wrapping_add(1);
        ButtonAction::Counted(self.click_count)
    }

    pub fn click_count(&self) -> u16 {
        self.click_count
    }

    pub fn hold_count(&self) -> u16 {
        self.hold_count
    }

    pub fn hold_active(&self) -> bool {
        self.hold_active
    }

    pub fn press_start(&self) -> Option<Tick> {
        self.press_start
    }

    #[cfg(test)]
    fn with_counts(mut self, clicks: u16, holds: u16) -> Self {
        self.click_count = clicks;
        self.hold_count = holds;
        self
    }
}
