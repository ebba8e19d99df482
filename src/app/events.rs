//! Outbound reports.
//!
//! The [`NodeService`](super::service::NodeService) hands these to the
//! [`PublishSink`](super::ports::PublishSink) port. Adapters on the other
//! side decide what to do with them: log to serial, pack into a radio
//! frame, record in a test.

use core::fmt;
use std::borrow::Cow;

use heapless::String;
use serde::Serialize;

pub const TOPIC_PAIRING: &str = "pairing";
pub const TOPIC_BUTTON_COUNT: &str = "push-button/-/event-count";
pub const TOPIC_HOLD_COUNT: &str = "push-button/-/hold-count";
pub const TOPIC_HOLD_DURATION: &str = "push-button/-/hold-duration";
pub const TOPIC_BATTERY: &str = "battery/-/voltage";

/// A single radio message decided by the core.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Report {
    /// Sent once at boot so the gateway can pair the node.
    PairingRequest {
        name: String<32>,
        version: String<16>,
    },
    /// Lifetime button press counter.
    ButtonCount(u16),
    /// Lifetime button hold counter.
    HoldCount(u16),
    /// Time between press and release of a held button (milliseconds).
    HoldDuration(i32),
    Temperature { channel: u8, celsius: f32 },
    BatteryVoltage(f32),
    /// Dice face code, `0` when the classifier is uncertain.
    Orientation { topic: String<32>, face: i32 },
}

impl Report {
    /// Topic the transport publishes on. Temperature topics carry the
    /// sensor channel.
    pub fn topic(&self) -> Cow<'_, str> {
        match self {
            Self::PairingRequest { .. } => Cow::Borrowed(TOPIC_PAIRING),
            Self::ButtonCount(_) => Cow::Borrowed(TOPIC_BUTTON_COUNT),
            Self::HoldCount(_) => Cow::Borrowed(TOPIC_HOLD_COUNT),
            Self::HoldDuration(_) => Cow::Borrowed(TOPIC_HOLD_DURATION),
            Self::Temperature { channel, .. } => {
                Cow::Owned(format!("thermometer/{channel}/temperature"))
            }
            Self::BatteryVoltage(_) => Cow::Borrowed(TOPIC_BATTERY),
            Self::Orientation { topic, .. } => Cow::Borrowed(topic.as_str()),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PairingRequest { name, version } => {
                write!(f, "{} = {} {}", TOPIC_PAIRING, name, version)
            }
            Self::ButtonCount(n) | Self::HoldCount(n) => write!(f, "{} = {}", self.topic(), n),
            Self::HoldDuration(ms) => write!(f, "{} = {} ms", TOPIC_HOLD_DURATION, ms),
            Self::Temperature { celsius, .. } => {
                write!(f, "{} = {:.2} \u{00b0}C", self.topic(), celsius)
            }
            Self::BatteryVoltage(v) => write!(f, "{} = {:.2} V", TOPIC_BATTERY, v),
            Self::Orientation { topic, face } => write!(f, "{} = {}", topic, face),
        }
    }
}
