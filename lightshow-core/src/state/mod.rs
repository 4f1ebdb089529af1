//! Phase machine for the light sequence
//!
//! The phase machine is explicit, finite, and deterministic. Timing is
//! handled by the stepper, which feeds it events.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{LightStep, Phase};
