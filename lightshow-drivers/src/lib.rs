//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in lightshow-core, built on the `embedded-hal` 1.0 traits:
//!
//! - Pad lights (PWM RGB LEDs)
//! - Touch pads (debounced input pins)
//! - Food machine state (tray and carousel sensors)
//! - A complete hub driver combining the above

#![no_std]
#![deny(unsafe_code)]

pub mod hub;
pub mod input;
pub mod light;
