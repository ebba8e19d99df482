//! Debounced push-button driver.
//!
//! ## Hardware
//!
//! Momentary switch on a GPIO, active-low with a pull-up by default. The
//! main loop samples the pin through [`ButtonDriver::poll`]; a level change
//! only counts once it has been stable for the debounce time.
//!
//! ## Gesture detection
//!
//! | Gesture   | Condition                                   |
//! |-----------|---------------------------------------------|
//! | `Press`   | Debounced press edge                        |
//! | `Hold`    | Still pressed after the hold time, once     |
//! | `Release` | Debounced release edge                      |
//! | `Click`   | Follows `Release` when released before the click timeout and no `Hold` fired |

use embedded_hal::digital::InputPin;
use heapless::Vec;

use crate::app::ports::Tick;
use crate::error::SensorError;
use crate::events::ButtonGesture;

/// Gestures produced by one sample; at most `Release` + `Click`.
pub type Gestures = Vec<ButtonGesture, 2>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonTimings {
    pub debounce_ms: u32,
    pub click_timeout_ms: u32,
    pub hold_ms: u32,
}

impl Default for ButtonTimings {
    fn default() -> Self {
        Self {
            debounce_ms: 20,
            click_timeout_ms: 1000,
            hold_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureState {
    Released,
    Pressed { since: Tick, hold_fired: bool },
}

pub struct ButtonDriver<P> {
    pin: P,
    active_low: bool,
    timings: ButtonTimings,
    state: GestureState,
    /// Last raw level and when it was first seen.
    raw: bool,
    raw_since: Tick,
}

impl<P: InputPin> ButtonDriver<P> {
    /// Sample the pin and run the gesture state machine.
    pub fn poll(&mut self, now: Tick) -> Result<Gestures, SensorError> {
        let low = self.pin.is_low().map_err(|_| SensorError::Communication)?;
        Ok(self.update(low == self.active_low, now))
    }

    pub fn pin_mut(&mut self) -> &mut P {
        &mut self.pin
    }
}

impl<P> ButtonDriver<P> {
    pub fn new(pin: P, active_low: bool, timings: ButtonTimings) -> Self {
        Self {
            pin,
            active_low,
            timings,
            state: GestureState::Released,
            raw: false,
            raw_since: 0,
        }
    }

    pub fn is_pressed(&self) -> bool {
        matches!(self.state, GestureState::Pressed { .. })
    }

    /// Feed one raw level (already polarity-corrected). Separate from the
    /// pin so the state machine can be driven directly.
    pub fn update(&mut self, pressed: bool, now: Tick) -> Gestures {
        let mut out = Gestures::new();
        if pressed != self.raw {
            self.raw = pressed;
            self.raw_since = now;
        }
        let stable = now.saturating_sub(self.raw_since) >= u64::from(self.timings.debounce_ms);

        match self.state {
            GestureState::Released => {
                if stable && self.raw {
                    self.state = GestureState::Pressed {
                        since: now,
                        hold_fired: false,
                    };
                    let _ = out.push(ButtonGesture::Press);
                }
            }
            GestureState::Pressed { since, hold_fired } => {
                let held = now.saturating_sub(since);
                if stable && !self.raw {
                    self.state = GestureState::Released;
                    let _ = out.push(ButtonGesture::Release);
                    if !hold_fired && held < u64::from(self.timings.click_timeout_ms) {
                        let _ = out.push(ButtonGesture::Click);
                    }
                } else if !hold_fired && held >= u64::from(self.timings.hold_ms) {
                    self.state = GestureState::Pressed {
                        since,
                        hold_fired: true,
                    };
                    let _ = out.push(ButtonGesture::Hold);
                }
            }
        }
        out
    }
}
