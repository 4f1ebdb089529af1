//! Start gate
//!
//! Decides when the hub is calm enough to begin a pass.

pub mod monitor;

pub use monitor::{check_gate, GateBlocker, GateMonitor, GateStatus};
