//! Cooperative light sequence stepper
//!
//! The stepper is polled from the main loop, right after the hub driver
//! has had its time slice. Each poll does at most one thing: check the
//! gate, or move to the next phase once the current one has been held
//! long enough. It never blocks.
//!
//! ```ignore
//! let mut show = LightShow::new(ShowConfig::default());
//! loop {
//!     hub.run(show.config().hub_budget_ms);
//!     if show.step(&mut hub, now_ms()) {
//!         // one full pass just finished
//!     }
//! }
//! ```

use crate::config::ShowConfig;
use crate::gate::{GateBlocker, GateMonitor, GateStatus};
use crate::state::{Event, Phase};
use crate::traits::{HubDriver, LightColor, LightPosition};

/// What a single poll did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShowEvent {
    /// Gate opened; lock taken, reward delay started
    PassStarted,
    /// A pad light was changed
    LightChanged {
        position: LightPosition,
        color: LightColor,
    },
    /// Final hold elapsed; lock released
    PassComplete,
    /// Gate has been shut for a whole timeout window
    GateTimedOut(GateBlocker),
    /// Running pass was cancelled
    Aborted,
}

/// Light sequence stepper
///
/// Owns the sequence progress: the current phase and the time it was
/// entered. The hub is borrowed for each call only.
#[derive(Debug, Clone)]
pub struct LightShow {
    /// Timing and color settings
    config: ShowConfig,
    /// Current phase
    phase: Phase,
    /// Time the current phase was entered (ms)
    entered_at_ms: u64,
    /// Start gate with optional timeout
    gate: GateMonitor,
    /// Completed passes since creation
    passes: u32,
}

impl Default for LightShow {
    fn default() -> Self {
        Self::new(ShowConfig::default())
    }
}

impl LightShow {
    /// Create a new stepper, waiting at the gate
    pub fn new(config: ShowConfig) -> Self {
        let gate = GateMonitor::new(config.gate_timeout_ms);
        Self {
            config,
            phase: Phase::Gate,
            entered_at_ms: 0,
            gate,
            passes: 0,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &ShowConfig {
        &self.config
    }

    /// Get the current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Check if a pass is in progress
    pub fn is_running(&self) -> bool {
        self.phase.is_running()
    }

    /// Number of passes that ran to completion
    pub fn passes_completed(&self) -> u32 {
        self.passes
    }

    /// Position of the current light stage (0-5), None outside the stages
    pub fn stage(&self) -> Option<usize> {
        self.phase.stage_index()
    }

    /// Get the start gate monitor
    pub fn gate(&self) -> &GateMonitor {
        &self.gate
    }

    /// Time left in the current phase (ms), 0 at the gate
    pub fn remaining_ms(&self, now_ms: u64) -> u32 {
        let held = now_ms.saturating_sub(self.entered_at_ms);
        (self.phase.hold_ms(&self.config) as u64).saturating_sub(held) as u32
    }

    /// Poll once
    ///
    /// Returns true exactly on the poll that completes a pass. The next
    /// poll starts over at the gate.
    pub fn step<H: HubDriver>(&mut self, hub: &mut H, now_ms: u64) -> bool {
        matches!(self.poll(hub, now_ms), Some(ShowEvent::PassComplete))
    }

    /// Poll once and report what happened
    pub fn poll<H: HubDriver>(&mut self, hub: &mut H, now_ms: u64) -> Option<ShowEvent> {
        if self.phase == Phase::Gate {
            return self.poll_gate(hub, now_ms);
        }

        let held = now_ms.saturating_sub(self.entered_at_ms);
        if held < self.phase.hold_ms(&self.config) as u64 {
            return None;
        }

        match self.phase.transition(Event::HoldElapsed) {
            Phase::Gate => Some(self.finish_pass(hub)),
            next => self.enter(hub, next, now_ms),
        }
    }

    /// Cancel a running pass
    ///
    /// Turns every pad dark, releases the recalibration lock and returns
    /// to the gate. Does nothing while waiting at the gate.
    pub fn abort<H: HubDriver>(&mut self, hub: &mut H) -> Option<ShowEvent> {
        if !self.is_running() {
            return None;
        }

        for position in LightPosition::ALL {
            hub.set_light(position, LightColor::OFF);
        }

        self.phase = self.phase.transition(Event::Abort);
        hub.set_recalibration_lock(self.phase.holds_lock());
        self.gate.reset();
        Some(ShowEvent::Aborted)
    }

    /// Check the gate and start a pass if it is open
    fn poll_gate<H: HubDriver>(&mut self, hub: &mut H, now_ms: u64) -> Option<ShowEvent> {
        match self.gate.poll(hub, now_ms) {
            GateStatus::Open => {
                self.phase = self.phase.transition(Event::GateOpened);
                self.entered_at_ms = now_ms;

                // Pad recalibration would disturb the pattern
                hub.set_recalibration_lock(self.phase.holds_lock());
                self.play_reward_sound(hub);
                Some(ShowEvent::PassStarted)
            }
            GateStatus::Blocked(_) => None,
            GateStatus::TimedOut(blocker) => Some(ShowEvent::GateTimedOut(blocker)),
        }
    }

    /// Reward sound slot
    ///
    /// Silent in this demo. The phase and its delay stay so the light
    /// timing is unchanged.
    fn play_reward_sound<H: HubDriver>(&mut self, _hub: &mut H) {}

    /// Enter a phase and apply its light change
    fn enter<H: HubDriver>(&mut self, hub: &mut H, phase: Phase, now_ms: u64) -> Option<ShowEvent> {
        self.phase = phase;
        self.entered_at_ms = now_ms;

        let step = phase.light_step()?;
        let color = if step.on {
            self.config.on_color()
        } else {
            LightColor::OFF
        };
        hub.set_light(step.position, color);

        Some(ShowEvent::LightChanged {
            position: step.position,
            color,
        })
    }

    /// Release the lock and go back to the gate
    fn finish_pass<H: HubDriver>(&mut self, hub: &mut H) -> ShowEvent {
        self.phase = Phase::Gate;
        hub.set_recalibration_lock(self.phase.holds_lock());
        self.passes = self.passes.wrapping_add(1);
        ShowEvent::PassComplete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{AudioClip, FoodmachineState};
    use heapless::Vec;

    /// Mock hub recording every light and lock call
    struct MockHub {
        ready: bool,
        food: FoodmachineState,
        pressed: bool,
        locked: bool,
        lights: [LightColor; 3],
        light_calls: Vec<(LightPosition, LightColor), 32>,
        lock_calls: Vec<bool, 16>,
        audio_calls: u8,
    }

    impl MockHub {
        fn new() -> Self {
            Self {
                ready: true,
                food: FoodmachineState::Idle,
                pressed: false,
                locked: false,
                lights: [LightColor::OFF; 3],
                light_calls: Vec::new(),
                lock_calls: Vec::new(),
                audio_calls: 0,
            }
        }

        fn light(&self, position: LightPosition) -> LightColor {
            self.lights[position.index()]
        }
    }

    impl HubDriver for MockHub {
        fn initialize(&mut self, _app_name: &str) {}

        fn is_ready(&self) -> bool {
            self.ready
        }

        fn foodmachine_state(&self) -> FoodmachineState {
            self.food
        }

        fn any_button_pressed(&self) -> bool {
            self.pressed
        }

        fn set_recalibration_lock(&mut self, locked: bool) {
            self.locked = locked;
            let _ = self.lock_calls.push(locked);
        }

        fn set_light(&mut self, position: LightPosition, color: LightColor) {
            self.lights[position.index()] = color;
            let _ = self.light_calls.push((position, color));
        }

        fn play_audio(&mut self, _clip: AudioClip, _volume: u8) {
            self.audio_calls += 1;
        }

        fn run(&mut self, _budget_ms: u32) {}
    }

    const GREEN: LightColor = LightColor::green(99);

    #[test]
    fn test_starts_at_gate() {
        let show = LightShow::default();
        assert_eq!(show.phase(), Phase::Gate);
        assert!(!show.is_running());
        assert_eq!(show.passes_completed(), 0);
    }

    #[test]
    fn test_gate_pass_takes_lock() {
        let mut hub = MockHub::new();
        let mut show = LightShow::default();

        assert_eq!(show.poll(&mut hub, 0), Some(ShowEvent::PassStarted));
        assert!(hub.locked);
        assert_eq!(show.phase(), Phase::RewardSound);
        assert!(hub.light_calls.is_empty());
        assert_eq!(hub.audio_calls, 0);
    }

    #[test]
    fn test_reward_delay_before_first_light() {
        let mut hub = MockHub::new();
        let mut show = LightShow::default();

        show.poll(&mut hub, 0);
        assert_eq!(show.poll(&mut hub, 600), None);
        assert_eq!(show.poll(&mut hub, 1199), None);
        assert!(hub.light_calls.is_empty());
        assert_eq!(show.remaining_ms(1199), 1);

        assert_eq!(
            show.poll(&mut hub, 1200),
            Some(ShowEvent::LightChanged {
                position: LightPosition::Left,
                color: GREEN,
            })
        );
        assert_eq!(hub.light(LightPosition::Left), GREEN);
    }

    #[test]
    fn test_concrete_timeline() {
        use LightPosition::*;

        let mut hub = MockHub::new();
        let mut show = LightShow::default();

        assert!(!show.step(&mut hub, 0));

        assert!(!show.step(&mut hub, 1200));
        assert_eq!(hub.light(Left), GREEN);

        assert!(!show.step(&mut hub, 2200));
        assert_eq!(hub.light(Middle), GREEN);
        assert_eq!(hub.light(Left), GREEN);

        assert!(!show.step(&mut hub, 3200));
        assert_eq!(hub.light(Right), GREEN);

        assert!(!show.step(&mut hub, 4200));
        assert_eq!(hub.light(Right), LightColor::OFF);

        assert!(!show.step(&mut hub, 5200));
        assert_eq!(hub.light(Middle), LightColor::OFF);

        assert!(!show.step(&mut hub, 6200));
        assert_eq!(hub.light(Left), LightColor::OFF);
        assert!(hub.locked);

        assert!(show.step(&mut hub, 7200));
        assert!(!hub.locked);
        assert_eq!(show.passes_completed(), 1);
        assert_eq!(
            &hub.light_calls[..],
            &[
                (Left, GREEN),
                (Middle, GREEN),
                (Right, GREEN),
                (Right, LightColor::OFF),
                (Middle, LightColor::OFF),
                (Left, LightColor::OFF),
            ]
        );
        assert_eq!(&hub.lock_calls[..], &[true, false]);
    }

    #[test]
    fn test_one_phase_per_poll() {
        let mut hub = MockHub::new();
        let mut show = LightShow::default();

        show.poll(&mut hub, 0);
        // Far past the whole pass, still only one change
        show.poll(&mut hub, 60_000);
        assert_eq!(hub.light_calls.len(), 1);
        assert_eq!(show.phase(), Phase::LeftOn);
    }

    #[test]
    fn test_hold_measured_from_entry_poll() {
        let mut hub = MockHub::new();
        let mut show = LightShow::default();

        show.poll(&mut hub, 0);
        // Late poll: Left comes on at 1500, not 1200
        show.poll(&mut hub, 1500);
        assert_eq!(show.phase(), Phase::LeftOn);

        assert_eq!(show.poll(&mut hub, 2200), None);
        assert_eq!(show.poll(&mut hub, 2499), None);
        assert!(show.poll(&mut hub, 2500).is_some());
        assert_eq!(show.phase(), Phase::MiddleOn);
    }

    #[test]
    fn test_restarts_at_gate_after_pass() {
        let mut hub = MockHub::new();
        let mut show = LightShow::default();

        let mut t = 0;
        while !show.step(&mut hub, t) {
            t += 100;
        }
        assert_eq!(show.phase(), Phase::Gate);

        // Next poll checks the gate, no seventh stage
        hub.pressed = true;
        let calls = hub.light_calls.len();
        assert_eq!(show.poll(&mut hub, t + 5_000), None);
        assert_eq!(hub.light_calls.len(), calls);
        assert!(!hub.locked);

        hub.pressed = false;
        assert_eq!(show.poll(&mut hub, t + 5_100), Some(ShowEvent::PassStarted));
        assert!(hub.locked);
    }

    #[test]
    fn test_button_held_blocks_everything() {
        let mut hub = MockHub::new();
        hub.pressed = true;
        let mut show = LightShow::default();

        for t in (0..100_000).step_by(250) {
            assert!(!show.step(&mut hub, t));
        }

        assert!(hub.light_calls.is_empty());
        assert!(hub.lock_calls.is_empty());
        assert!(!hub.locked);
    }

    #[test]
    fn test_waits_for_ready_and_idle_foodmachine() {
        let mut hub = MockHub::new();
        hub.ready = false;
        hub.food = FoodmachineState::Dispensing;
        let mut show = LightShow::default();

        assert_eq!(show.poll(&mut hub, 0), None);
        hub.ready = true;
        assert_eq!(show.poll(&mut hub, 10), None);
        hub.food = FoodmachineState::Idle;
        assert_eq!(show.poll(&mut hub, 20), Some(ShowEvent::PassStarted));
    }

    #[test]
    fn test_gate_only_checked_at_pass_start() {
        let mut hub = MockHub::new();
        let mut show = LightShow::default();

        show.poll(&mut hub, 0);
        hub.pressed = true;
        hub.ready = false;

        assert!(show.poll(&mut hub, 1200).is_some());
        assert_eq!(show.phase(), Phase::LeftOn);
    }

    #[test]
    fn test_gate_timeout_reported() {
        let mut hub = MockHub::new();
        hub.food = FoodmachineState::Spinning;
        let mut config = ShowConfig::default();
        config.gate_timeout_ms = Some(10_000);
        let mut show = LightShow::new(config);

        assert_eq!(show.poll(&mut hub, 0), None);
        assert_eq!(show.poll(&mut hub, 9_999), None);
        assert_eq!(
            show.poll(&mut hub, 10_000),
            Some(ShowEvent::GateTimedOut(GateBlocker::FoodmachineBusy(
                FoodmachineState::Spinning
            )))
        );
        assert!(!hub.locked);
        assert!(hub.light_calls.is_empty());

        hub.food = FoodmachineState::Idle;
        assert_eq!(show.poll(&mut hub, 10_050), Some(ShowEvent::PassStarted));
    }

    #[test]
    fn test_abort_releases_lock_and_darkens() {
        let mut hub = MockHub::new();
        let mut show = LightShow::default();

        show.poll(&mut hub, 0);
        show.poll(&mut hub, 1200);
        show.poll(&mut hub, 2200);
        assert!(hub.locked);

        assert_eq!(show.abort(&mut hub), Some(ShowEvent::Aborted));
        assert!(!hub.locked);
        assert_eq!(show.phase(), Phase::Gate);
        for position in LightPosition::ALL {
            assert_eq!(hub.light(position), LightColor::OFF);
        }
        assert_eq!(show.passes_completed(), 0);
    }

    #[test]
    fn test_abort_at_gate_is_noop() {
        let mut hub = MockHub::new();
        let mut show = LightShow::default();

        assert_eq!(show.abort(&mut hub), None);
        assert!(hub.light_calls.is_empty());
        assert!(hub.lock_calls.is_empty());
    }

    #[test]
    fn test_stage_follows_lights() {
        let mut hub = MockHub::new();
        let mut show = LightShow::default();

        show.poll(&mut hub, 0);
        assert_eq!(show.stage(), None);

        let mut t = 1200;
        for expected in 0..6 {
            show.poll(&mut hub, t);
            assert_eq!(show.stage(), Some(expected));
            t += 1000;
        }

        assert!(show.step(&mut hub, t));
        assert_eq!(show.stage(), None);
    }

    #[test]
    fn test_gate_timeouts_counted() {
        let mut hub = MockHub::new();
        hub.pressed = true;
        let mut config = ShowConfig::default();
        config.gate_timeout_ms = Some(1_000);
        let mut show = LightShow::new(config);

        assert_eq!(show.gate().timeout_ms(), Some(1_000));
        show.poll(&mut hub, 0);
        show.poll(&mut hub, 1_000);
        show.poll(&mut hub, 2_000);
        assert_eq!(show.gate().timeouts(), 2);

        hub.pressed = false;
        assert_eq!(show.poll(&mut hub, 2_100), Some(ShowEvent::PassStarted));
        assert_eq!(show.gate().timeouts(), 0);
    }

    #[test]
    fn test_custom_timing_and_intensity() {
        let mut hub = MockHub::new();
        let mut config = ShowConfig::default();
        config.reward_delay_ms = 0;
        config.light_timing_ms = 50;
        config.intensity = 40;
        let mut show = LightShow::new(config);

        show.poll(&mut hub, 0);
        assert_eq!(
            show.poll(&mut hub, 0),
            Some(ShowEvent::LightChanged {
                position: LightPosition::Left,
                color: LightColor::green(40),
            })
        );
        assert_eq!(show.poll(&mut hub, 49), None);
        assert!(show.poll(&mut hub, 50).is_some());
    }
}
