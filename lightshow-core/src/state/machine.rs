//! Phase machine definition
//!
//! A pass is a fixed walk through these phases. Each phase has one side
//! effect on entry and one hold time before the next phase may begin.

use super::events::Event;
use crate::config::ShowConfig;
use crate::traits::LightPosition;

/// Light sequence phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Waiting for the hub to be ready, idle and untouched
    Gate,
    /// Reward sound placeholder; lock held, nothing audible
    RewardSound,
    /// Left pad lit
    LeftOn,
    /// Middle pad lit
    MiddleOn,
    /// Right pad lit
    RightOn,
    /// Right pad dark again
    RightOff,
    /// Middle pad dark again
    MiddleOff,
    /// Left pad dark again, last hold before the pass ends
    LeftOff,
}

/// Light change made on entry to a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightStep {
    /// Pad to change
    pub position: LightPosition,
    /// True to light it, false for all channels off
    pub on: bool,
}

impl Phase {
    /// The six light stages in pass order
    pub const STAGES: [Phase; 6] = [
        Phase::LeftOn,
        Phase::MiddleOn,
        Phase::RightOn,
        Phase::RightOff,
        Phase::MiddleOff,
        Phase::LeftOff,
    ];

    /// Check if a pass is in progress
    pub fn is_running(&self) -> bool {
        !matches!(self, Phase::Gate)
    }

    /// Check if the recalibration lock must be held in this phase
    pub fn holds_lock(&self) -> bool {
        self.is_running()
    }

    /// Light change for this phase, if any
    pub fn light_step(&self) -> Option<LightStep> {
        use LightPosition::*;

        let (position, on) = match self {
            Phase::Gate | Phase::RewardSound => return None,
            Phase::LeftOn => (Left, true),
            Phase::MiddleOn => (Middle, true),
            Phase::RightOn => (Right, true),
            Phase::RightOff => (Right, false),
            Phase::MiddleOff => (Middle, false),
            Phase::LeftOff => (Left, false),
        };

        Some(LightStep { position, on })
    }

    /// Position of this phase within [`Phase::STAGES`]
    pub fn stage_index(&self) -> Option<usize> {
        Self::STAGES.iter().position(|s| s == self)
    }

    /// How long this phase lasts before the next may begin (ms)
    pub fn hold_ms(&self, config: &ShowConfig) -> u32 {
        match self {
            Phase::Gate => 0,
            Phase::RewardSound => config.reward_delay_ms,
            _ => config.light_timing_ms,
        }
    }

    /// Process an event and return the next phase
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use Phase::*;

        match (self, event) {
            (Gate, GateOpened) => RewardSound,

            (RewardSound, HoldElapsed) => LeftOn,
            (LeftOn, HoldElapsed) => MiddleOn,
            (MiddleOn, HoldElapsed) => RightOn,
            (RightOn, HoldElapsed) => RightOff,
            (RightOff, HoldElapsed) => MiddleOff,
            (MiddleOff, HoldElapsed) => LeftOff,
            (LeftOff, HoldElapsed) => Gate,

            (_, Abort) => Gate,

            // Default: stay in current phase
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_opens_into_reward_sound() {
        assert_eq!(Phase::Gate.transition(Event::GateOpened), Phase::RewardSound);
    }

    #[test]
    fn test_gate_ignores_hold_elapsed() {
        assert_eq!(Phase::Gate.transition(Event::HoldElapsed), Phase::Gate);
    }

    #[test]
    fn test_running_ignores_gate_opened() {
        for phase in Phase::STAGES {
            assert_eq!(phase.transition(Event::GateOpened), phase);
        }
    }

    #[test]
    fn test_full_walk() {
        let mut phase = Phase::Gate.transition(Event::GateOpened);
        let mut visited = heapless::Vec::<Phase, 8>::new();

        while phase != Phase::Gate {
            visited.push(phase).unwrap();
            phase = phase.transition(Event::HoldElapsed);
        }

        assert_eq!(visited[0], Phase::RewardSound);
        assert_eq!(&visited[1..], &Phase::STAGES);
    }

    #[test]
    fn test_abort_from_any_phase() {
        let mut phases = heapless::Vec::<Phase, 8>::new();
        phases.push(Phase::RewardSound).unwrap();
        phases.extend_from_slice(&Phase::STAGES).unwrap();

        for phase in phases {
            assert_eq!(phase.transition(Event::Abort), Phase::Gate);
        }
    }

    #[test]
    fn test_light_steps() {
        use LightPosition::*;

        let steps: heapless::Vec<(LightPosition, bool), 6> = Phase::STAGES
            .iter()
            .filter_map(|p| p.light_step())
            .map(|s| (s.position, s.on))
            .collect();

        assert_eq!(
            &steps[..],
            &[
                (Left, true),
                (Middle, true),
                (Right, true),
                (Right, false),
                (Middle, false),
                (Left, false),
            ]
        );
        assert!(Phase::Gate.light_step().is_none());
        assert!(Phase::RewardSound.light_step().is_none());
    }

    #[test]
    fn test_hold_times() {
        let config = ShowConfig::default();
        assert_eq!(Phase::Gate.hold_ms(&config), 0);
        assert_eq!(Phase::RewardSound.hold_ms(&config), 1200);
        for phase in Phase::STAGES {
            assert_eq!(phase.hold_ms(&config), 1000);
        }
    }

    #[test]
    fn test_lock_held_while_running() {
        assert!(!Phase::Gate.holds_lock());
        assert!(Phase::RewardSound.holds_lock());
        assert!(Phase::LeftOff.holds_lock());
    }

    #[test]
    fn test_stage_index() {
        assert_eq!(Phase::LeftOn.stage_index(), Some(0));
        assert_eq!(Phase::LeftOff.stage_index(), Some(5));
        assert_eq!(Phase::RewardSound.stage_index(), None);
    }
}
