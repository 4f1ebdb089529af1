//! Hub input drivers
//!
//! Touch pads and the food machine position sensors. Both are sampled
//! once per hub run and debounced by sample count.

pub mod feeder;
pub mod pad;

pub use feeder::{Foodmachine, FoodmachineConfig};
pub use pad::{Pad, PadConfig};

/// Errors from input pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// Pin read failed
    Pin,
}
