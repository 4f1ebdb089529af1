//! Hardware abstraction traits
//!
//! These traits define the interface between the light sequence
//! and the hub driver implementation.

pub mod hub;

pub use hub::{
    AudioClip, FoodmachineState, HubDriver, LightColor, LightPosition, MAX_INTENSITY,
};
