//! Peripheral drivers built on `embedded-hal` pin traits.

pub mod button;
pub mod status_led;

pub use button::{ButtonDriver, ButtonTimings};
pub use status_led::PulseLed;
