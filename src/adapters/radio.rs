//! Radio publish sink.
//!
//! Serialises each [`Report`] with `postcard` into a fixed frame buffer,
//! prefixed by a wrapping sequence number, and hands the frame to a
//! [`RadioTransport`]. Delivery is best effort: failures are logged and
//! counted, never retried and never reported back to the core.
//!
//! ```text
//!  ┌───────────────┬───────────────────────────┐
//!  │ seq (varint)  │ Report (postcard)         │   ≤ FRAME_LEN bytes
//!  └───────────────┴───────────────────────────┘
//! ```

use log::{debug, warn};

use crate::app::events::Report;
use crate::app::ports::PublishSink;
use crate::error::PublishError;

/// Radio payload limit.
pub const FRAME_LEN: usize = 64;

/// Link layer that puts one frame on the air.
pub trait RadioTransport {
    fn send(&mut self, frame: &[u8]) -> Result<(), PublishError>;
}

pub struct RadioFrameSink<T> {
    transport: T,
    seq: u16,
    sent: u32,
    failed: u32,
}

impl<T: RadioTransport> RadioFrameSink<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            seq: 0,
            sent: 0,
            failed: 0,
        }
    }

    /// Encode `report` into `buf`; returns the frame length.
    pub fn encode(
        seq: u16,
        report: &Report,
        buf: &mut [u8; FRAME_LEN],
    ) -> Result<usize, PublishError> {
        postcard::to_slice(&(seq, report), buf)
            .map(|frame| frame.len())
            .map_err(|_| PublishError::Encode)
    }

    fn try_send(&mut self, report: &Report) -> Result<(), PublishError> {
        let mut buf = [0u8; FRAME_LEN];
        let len = Self::encode(self.seq, report, &mut buf)?;
        self.transport.send(&buf[..len])?;
        debug!("Radio: frame #{} ({} bytes) {}", self.seq, len, report.topic());
        Ok(())
    }

    pub fn sent(&self) -> u32 {
        self.sent
    }

    pub fn failed(&self) -> u32 {
        self.failed
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: RadioTransport> PublishSink for RadioFrameSink<T> {
    fn publish(&mut self, report: &Report) {
        match self.try_send(report) {
            Ok(()) => self.sent = self.sent.wrapping_add(1),
            Err(e) => {
                self.failed = self.failed.wrapping_add(1);
                warn!("Radio: dropped '{}' report: {}", report.topic(), e);
            }
        }
        // Sequence advances on failures too, so gaps are visible downstream.
        self.seq = self.seq.wrapping_add(1);
    }
}
