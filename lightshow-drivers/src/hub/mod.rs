//! Hub driver implementations

pub mod gpio;

pub use gpio::{GpioHub, HubFault};
