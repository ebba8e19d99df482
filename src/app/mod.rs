//! Application core: pure domain logic, zero I/O.
//!
//! The publish decisions for the node live here. All interaction with
//! drivers and the radio happens through the **port traits** in [`ports`],
//! so this layer is fully testable without peripherals.

pub mod events;
pub mod ports;
pub mod service;
