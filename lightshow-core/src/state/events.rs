//! Events that trigger phase transitions

/// Events that can trigger phase transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Hub is ready, food machine idle, no pad held
    GateOpened,
    /// Current phase has been held long enough
    HoldElapsed,
    /// Pass cancelled from outside
    Abort,
}
