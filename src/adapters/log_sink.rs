//! Log-based publish sink.
//!
//! Implements [`PublishSink`] by writing each report to the `log` facade,
//! one line per publish. Used by the simulator and as the second leg of a
//! `(radio, log)` fan-out.

use log::info;

use crate::app::events::Report;
use crate::app::ports::PublishSink;

#[derive(Debug, Default)]
pub struct LogPublishSink {
    published: u32,
}

impl LogPublishSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> u32 {
        self.published
    }
}

impl PublishSink for LogPublishSink {
    fn publish(&mut self, report: &Report) {
        self.published = self.published.wrapping_add(1);
        match report {
            Report::PairingRequest { name, version } => {
                info!("PAIR  | {} v{}", name, version);
            }
            Report::Temperature { channel, celsius } => {
                info!("TEMP  | ch={} T={:.2}\u{00b0}C", channel, celsius);
            }
            Report::BatteryVoltage(volts) => info!("BATT  | {:.3} V", volts),
            Report::ButtonCount(n) => info!("CLICK | count={}", n),
            Report::HoldCount(n) => info!("HOLD  | count={}", n),
            Report::HoldDuration(ms) => info!("HOLD  | duration={} ms", ms),
            Report::Orientation { topic, face } => info!("FACE  | {}={}", topic, face),
        }
    }
}
