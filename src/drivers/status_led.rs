//! Single-colour status LED with timed pulses.
//!
//! `pulse` switches the pin on and records when it should go off; the main
//! loop calls `tick` to end the pulse. A new pulse while one is running
//! restarts the timer.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::Tick;

pub struct PulseLed<P> {
    pin: P,
    off_at: Option<Tick>,
    pulses: u32,
}

impl<P: OutputPin> PulseLed<P> {
    pub fn new(mut pin: P) -> Self {
        if pin.set_low().is_err() {
            warn!("Status LED: failed to drive pin low at init");
        }
        Self {
            pin,
            off_at: None,
            pulses: 0,
        }
    }

    /// Light the LED for `duration_ms` starting at `now`.
    pub fn pulse(&mut self, duration_ms: u32, now: Tick) {
        if self.pin.set_high().is_err() {
            warn!("Status LED: set_high failed");
            return;
        }
        self.off_at = Some(now.saturating_add(u64::from(duration_ms)));
        self.pulses = self.pulses.wrapping_add(1);
    }

    /// Turn the LED off once the running pulse has elapsed.
    pub fn tick(&mut self, now: Tick) {
        match self.off_at {
            Some(off_at) if now >= off_at => {
                if self.pin.set_low().is_err() {
                    warn!("Status LED: set_low failed");
                }
                self.off_at = None;
            }
            _ => {}
        }
    }

    pub fn is_on(&self) -> bool {
        self.off_at.is_some()
    }

    /// Pulses started since construction.
    pub fn pulse_count(&self) -> u32 {
        self.pulses
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }
}
