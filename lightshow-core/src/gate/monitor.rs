//! Gate monitor implementation
//!
//! A pass may only start when the hub is ready, the food machine is idle
//! and no pad is held. The monitor re-checks this on every poll and, if a
//! timeout is configured, reports a gate that has stayed shut too long.

use crate::traits::{FoodmachineState, HubDriver};

/// Condition currently holding the gate shut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GateBlocker {
    /// Device layer not usable yet
    NotReady,
    /// Food machine is not idle
    FoodmachineBusy(FoodmachineState),
    /// A pad is held down
    ButtonPressed,
}

/// Result of polling the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GateStatus {
    /// All conditions met
    Open,
    /// Still waiting
    Blocked(GateBlocker),
    /// Still waiting, and the timeout window just expired
    TimedOut(GateBlocker),
}

impl GateStatus {
    /// Check if a pass may start
    pub fn is_open(&self) -> bool {
        matches!(self, GateStatus::Open)
    }
}

/// Check the gate conditions once
///
/// Conditions are checked in order: readiness, food machine, pads. The
/// first one that fails is reported.
pub fn check_gate<H: HubDriver>(hub: &H) -> Result<(), GateBlocker> {
    if !hub.is_ready() {
        return Err(GateBlocker::NotReady);
    }

    let state = hub.foodmachine_state();
    if !state.is_idle() {
        return Err(GateBlocker::FoodmachineBusy(state));
    }

    if hub.any_button_pressed() {
        return Err(GateBlocker::ButtonPressed);
    }

    Ok(())
}

/// Gate monitor with optional timeout reporting
#[derive(Debug, Clone)]
pub struct GateMonitor {
    /// Timeout window (ms); None never times out
    timeout_ms: Option<u32>,
    /// Start of the current timeout window
    window_start_ms: Option<u64>,
    /// Number of expired windows since the gate last opened
    timeouts: u16,
}

impl Default for GateMonitor {
    fn default() -> Self {
        Self::new(None)
    }
}

impl GateMonitor {
    /// Create a new gate monitor
    pub fn new(timeout_ms: Option<u32>) -> Self {
        Self {
            timeout_ms,
            window_start_ms: None,
            timeouts: 0,
        }
    }

    /// Poll the gate
    ///
    /// # Arguments
    /// - `hub`: Hub to check
    /// - `now_ms`: Current monotonic time
    pub fn poll<H: HubDriver>(&mut self, hub: &H, now_ms: u64) -> GateStatus {
        let blocker = match check_gate(hub) {
            Ok(()) => {
                self.reset();
                return GateStatus::Open;
            }
            Err(blocker) => blocker,
        };

        let start = *self.window_start_ms.get_or_insert(now_ms);

        if let Some(timeout) = self.timeout_ms {
            if now_ms.saturating_sub(start) >= timeout as u64 {
                // Open a fresh window so the report repeats at the same rate
                self.window_start_ms = Some(now_ms);
                self.timeouts = self.timeouts.saturating_add(1);
                return GateStatus::TimedOut(blocker);
            }
        }

        GateStatus::Blocked(blocker)
    }

    /// Forget any wait in progress
    pub fn reset(&mut self) {
        self.window_start_ms = None;
        self.timeouts = 0;
    }

    /// Number of timeouts reported since the gate last opened
    pub fn timeouts(&self) -> u16 {
        self.timeouts
    }

    /// Get the configured timeout
    pub fn timeout_ms(&self) -> Option<u32> {
        self.timeout_ms
    }
}
