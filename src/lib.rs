//! Publish-decision core for a battery-powered sensor node.
//!
//! Decides when readings from a push button, a thermometer, an
//! accelerometer and a battery gauge are worth a radio message. The core
//! ([`app::service::NodeService`]) is pure logic driven through port traits;
//! adapters for a simulated board, log output and a framed radio sink live
//! in [`adapters`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod events;
pub mod filters;
pub mod scheduler;
pub mod sensors;
pub mod service_mode;

pub use app::ports::Tick;
pub use app::service::{NodeService, NodeStats};
pub use config::NodeConfig;
