//! Deployment configuration.
//!
//! Every constant that differed between the push-button firmware
//! generations lives here, so one core serves all of them. Presets cover
//! the two known deployments; a JSON document can override any field.

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Radio sub-address of the thermometer on the core module (I2C0, alternate
/// address 0x49).
pub const CHANNEL_R1_I2C0_ADDRESS_ALTERNATE: u8 = 0x01;

/// Sampling cadence of one polled sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Update interval while service mode is active (milliseconds).
    pub service_interval_ms: u32,
    /// Update interval after service mode has expired (milliseconds).
    pub normal_interval_ms: u32,
}

/// Publish policy and cadence of the thermometer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureConfig {
    pub poll: PollConfig,
    /// Maximum time between two temperature reports (milliseconds).
    pub heartbeat_interval_ms: u32,
    /// Change against the last published value that forces a report (°C).
    pub change_threshold_c: f32,
    /// Radio channel the temperature is published on.
    pub channel: u8,
}

/// Which button event increments the press counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountTrigger {
    /// Count completed clicks (short press + release).
    Click,
    /// Count every press edge, including the start of a hold.
    Press,
}

/// LED feedback durations (milliseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PulseConfig {
    pub boot_ms: u32,
    pub click_ms: u32,
    pub hold_ms: u32,
}

/// Complete per-deployment configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    // --- Identity ---
    /// Name sent in the pairing request.
    pub pairing_name: String<32>,
    /// Firmware version sent in the pairing request.
    pub firmware_version: String<16>,

    // --- Timing ---
    /// Delay after boot before polling drops to the normal cadence.
    pub service_mode_duration_ms: u32,
    /// Battery gauge update interval (milliseconds).
    pub battery_interval_ms: u32,

    // --- Sensors ---
    pub temperature: TemperatureConfig,
    /// `None` for single-sensor variants without an accelerometer.
    pub accelerometer: Option<PollConfig>,
    /// Topic the orientation face is published on.
    pub orientation_topic: String<32>,

    // --- Button ---
    pub count_trigger: CountTrigger,
    /// Track holds and publish hold count and hold duration.
    #[serde(default = "reports_holds")]
    pub report_holds: bool,
    pub pulses: PulseConfig,
}

impl NodeConfig {
    /// Push-button firmware: thermometer + accelerometer, 15 minute service
    /// window, click-counted button.
    pub fn push_button() -> Self {
        Self {
            pairing_name: label("push-button"),
            firmware_version: label(env!("CARGO_PKG_VERSION")),
            service_mode_duration_ms: 15 * 60 * 1000,
            battery_interval_ms: 60 * 60 * 1000,
            temperature: TemperatureConfig {
                poll: PollConfig {
                    service_interval_ms: 1000,
                    normal_interval_ms: 10 * 1000,
                },
                heartbeat_interval_ms: 15 * 60 * 1000,
                change_threshold_c: 0.2,
                channel: CHANNEL_R1_I2C0_ADDRESS_ALTERNATE,
            },
            accelerometer: Some(PollConfig {
                service_interval_ms: 1000,
                normal_interval_ms: 10 * 1000,
            }),
            orientation_topic: label("orientation"),
            count_trigger: CountTrigger::Click,
            report_holds: true,
            pulses: PulseConfig {
                boot_ms: 2000,
                click_ms: 100,
                hold_ms: 250,
            },
        }
    }

    /// Older kit firmware: thermometer only, one hour service window,
    /// every press edge counted, holds not reported.
    pub fn kit_push_button() -> Self {
        Self {
            pairing_name: label("kit-push-button"),
            service_mode_duration_ms: 60 * 60 * 1000,
            temperature: TemperatureConfig {
                poll: PollConfig {
                    service_interval_ms: 5 * 1000,
                    normal_interval_ms: 10 * 1000,
                },
                ..Self::push_button().temperature
            },
            accelerometer: None,
            count_trigger: CountTrigger::Press,
            report_holds: false,
            ..Self::push_button()
        }
    }

    /// Parse a JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stall or flood the node. Invalid values are
    /// refused, not clamped.
    pub fn validate(&self) -> Result<()> {
        if self.service_mode_duration_ms == 0 {
            return Err(Error::Config("service_mode_duration_ms must be > 0"));
        }
        if self.battery_interval_ms == 0 {
            return Err(Error::Config("battery_interval_ms must be > 0"));
        }
        let t = &self.temperature;
        if t.heartbeat_interval_ms == 0 {
            return Err(Error::Config("heartbeat_interval_ms must be > 0"));
        }
        if !t.change_threshold_c.is_finite() || t.change_threshold_c <= 0.0 {
            return Err(Error::Config("change_threshold_c must be finite and > 0"));
        }
        validate_poll(&t.poll)?;
        if let Some(accel) = &self.accelerometer {
            validate_poll(accel)?;
        }
        Ok(())
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self::push_button()
    }
}

fn validate_poll(poll: &PollConfig) -> Result<()> {
    if poll.service_interval_ms == 0 || poll.normal_interval_ms == 0 {
        return Err(Error::Config("poll intervals must be > 0"));
    }
    if poll.normal_interval_ms < poll.service_interval_ms {
        return Err(Error::Config("normal interval shorter than service interval"));
    }
    Ok(())
}

fn reports_holds() -> bool {
    true
}

/// Build a fixed-capacity string, truncating at capacity.
pub(crate) fn label<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
