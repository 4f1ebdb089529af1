//! Light sequence stepper
//!
//! Runs passes of the light pattern one poll at a time and reports what
//! happened on each poll.

pub mod stepper;

pub use stepper::{LightShow, ShowEvent};
