//! Sensor-side classifiers.

pub mod dice;

pub use dice::Dice;
