//! Stateful publish-decision filters.
//!
//! Each filter owns the state it needs to remember between samples and
//! answers one question: does this sample warrant a report?

pub mod gesture;
pub mod orientation;
pub mod publish_gate;

pub use gesture::{ButtonAction, ButtonGestureTracker};
pub use orientation::{Face, FaceClassifier, OrientationTracker};
pub use publish_gate::{PublishGate, PublishReason};
