//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                   | Connects to                  |
//! |------------|------------------------------|------------------------------|
//! | `log_sink` | PublishSink                  | `log` output                 |
//! | `radio`    | PublishSink                  | Any `RadioTransport`         |
//! | `sim`      | SamplingControl, StatusLed   | Synthetic sensors and button |
//! | `time`     | TickClock                    | Manually advanced time       |

pub mod log_sink;
pub mod radio;
#[cfg(feature = "sim")]
pub mod sim;
pub mod time;

pub use log_sink::LogPublishSink;
pub use radio::{FRAME_LEN, RadioFrameSink, RadioTransport};
pub use time::ManualClock;
