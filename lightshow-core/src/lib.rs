//! Board-agnostic core logic for the hub light show
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hub driver trait and light/food machine types
//! - Start gate (readiness, food machine, pads)
//! - Phase machine for one pass of the light pattern
//! - Cooperative stepper polled from the main loop
//! - Configuration types and the `show.toml` parser

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod gate;
pub mod sequence;
pub mod state;
pub mod traits;
