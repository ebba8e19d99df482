//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises one flow through the
//! node service against mock adapters. Everything runs on the host.

mod button_flow_tests;
mod mock_hw;
mod service_mode_tests;
mod sim_flow_tests;
