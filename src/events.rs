//! Driver event queue.
//!
//! Events are produced by:
//! - Button gesture classification
//! - Thermometer / accelerometer / battery gauge poll completions
//! - Driver fault reports
//!
//! Events are consumed by the main loop, which hands them one at a time,
//! in arrival order, to [`NodeService::handle_event`](crate::app::service::NodeService::handle_event).
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Button      │────▶│              │     │              │
//! │ Thermometer │────▶│  EventQueue  │────▶│  Main Loop   │
//! │ Accel       │────▶│  (bounded)   │     │  (consumer)  │
//! │ Battery     │────▶│              │     │              │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! Everything runs in one execution context, so the channel is guarded by a
//! no-op mutex.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;

use crate::error::{Error, Result, SensorError};

/// Maximum number of pending events.
pub const EVENT_QUEUE_CAP: usize = 16;

/// Raw button events, in the vocabulary of the button driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonGesture {
    /// Debounced press edge.
    Press,
    /// Debounced release edge.
    Release,
    /// Press and release within the click timeout, no hold.
    Click,
    /// Still pressed after the hold time. Fires once per press.
    Hold,
}

/// Outcome of one sensor poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorEvent<T> {
    /// Poll completed; `None` when the driver has no valid data.
    Update(Option<T>),
    /// Driver-level fault, distinct from "no data".
    Error(SensorError),
}

/// Acceleration in units of g.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Everything a collaborator driver can report to the core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeEvent {
    Button(ButtonGesture),
    /// Temperature in °C.
    Thermometer(SensorEvent<f32>),
    Accelerometer(SensorEvent<Vector3>),
    /// Battery voltage in V.
    Battery(SensorEvent<f32>),
}

/// Bounded FIFO of [`NodeEvent`]s.
pub struct EventQueue {
    channel: Channel<NoopRawMutex, NodeEvent, EVENT_QUEUE_CAP>,
    dropped: Cell<u32>,
}

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            dropped: Cell::new(0),
        }
    }

    /// Push an event. Returns [`Error::QueueFull`] (and drops the event)
    /// when the queue is full.
    pub fn push(&self, event: NodeEvent) -> Result<()> {
        self.channel.try_send(event).map_err(|_| {
            self.dropped.set(self.dropped.get().wrapping_add(1));
            Error::QueueFull
        })
    }

    /// Pop the oldest event, `None` when empty.
    pub fn pop(&self) -> Option<NodeEvent> {
        self.channel.try_receive().ok()
    }

    /// Hand every pending event to `handler` in FIFO order. Events pushed
    /// by the handler itself are processed in the same drain.
    pub fn drain(&self, mut handler: impl FnMut(NodeEvent)) -> usize {
        let mut n = 0;
        while let Some(event) = self.pop() {
            handler(event);
            n += 1;
        }
        n
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// Events lost to overflow since boot.
    pub fn dropped(&self) -> u32 {
        self.dropped.get()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
