//! Pad light drivers

pub mod pwm;

pub use pwm::{intensity_to_percent, LightError, PwmLight};
