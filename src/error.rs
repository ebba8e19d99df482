//! Unified error types for the sensor node core.
//!
//! A single `Error` enum that every subsystem converts into. All variants
//! are `Copy` so they can be logged and counted from inside event handlers
//! without allocation. None of them is fatal: the node keeps running and
//! simply skips the cycle that produced the error.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor collaborator reported a fault.
    Sensor(SensorError),
    /// A report could not be handed to the transport.
    Publish(PublishError),
    /// The event queue was full and the event was dropped.
    QueueFull,
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Publish(e) => write!(f, "publish: {e}"),
            Self::QueueFull => write!(f, "event queue full"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Driver-level faults. "No valid data" is not an error; it arrives as an
/// update without a value and is skipped silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Bus transaction failed (NACK, arbitration loss).
    Communication,
    /// The sensor did not answer within the measurement window.
    Timeout,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Communication => write!(f, "bus communication failed"),
            Self::Timeout => write!(f, "measurement timed out"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Publish errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishError {
    /// The report did not fit into a radio frame.
    Encode,
    /// The transport refused the frame (busy, not paired).
    TransportBusy,
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode => write!(f, "frame encoding failed"),
            Self::TransportBusy => write!(f, "transport busy"),
        }
    }
}

impl From<PublishError> for Error {
    fn from(e: PublishError) -> Self {
        Self::Publish(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
