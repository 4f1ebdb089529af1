//! Hub driver trait
//!
//! The hub driver owns the physical device: three pads with RGB lights,
//! the food dispensing machine and the speaker. The light sequence only
//! ever talks to the hub through this trait, so tests can swap in a fake.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest channel intensity accepted by the hub lights
pub const MAX_INTENSITY: u8 = 99;

/// Pad light position on the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LightPosition {
    Left,
    Middle,
    Right,
}

impl LightPosition {
    /// All positions, left to right
    pub const ALL: [LightPosition; 3] = [
        LightPosition::Left,
        LightPosition::Middle,
        LightPosition::Right,
    ];

    /// Index of this position (0 = left)
    pub const fn index(self) -> usize {
        match self {
            LightPosition::Left => 0,
            LightPosition::Middle => 1,
            LightPosition::Right => 2,
        }
    }
}

/// Channel intensities for one pad light (each 0-99)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LightColor {
    /// Red channel
    pub red: u8,
    /// Green channel
    pub green: u8,
    /// Blue channel
    pub blue: u8,
}

impl LightColor {
    /// All channels off
    pub const OFF: LightColor = LightColor::new(0, 0, 0);

    /// Create a color, clamping each channel to [`MAX_INTENSITY`]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: clamp_intensity(red),
            green: clamp_intensity(green),
            blue: clamp_intensity(blue),
        }
    }

    /// Green only, at the given intensity
    pub const fn green(intensity: u8) -> Self {
        Self::new(0, intensity, 0)
    }

    /// Check if every channel is zero
    pub const fn is_off(&self) -> bool {
        self.red == 0 && self.green == 0 && self.blue == 0
    }
}

const fn clamp_intensity(value: u8) -> u8 {
    if value > MAX_INTENSITY {
        MAX_INTENSITY
    } else {
        value
    }
}

/// Food dispensing machine state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FoodmachineState {
    /// Not spinning, not dispensing, tray retracted
    #[default]
    Idle,
    /// Carousel turning to the next food slot
    Spinning,
    /// Presenting food (tray moving out)
    Dispensing,
    /// Tray extended and waiting
    TrayExtended,
    /// Tray moving back in
    Retracting,
}

impl FoodmachineState {
    /// Check if the machine is idle
    pub fn is_idle(&self) -> bool {
        matches!(self, FoodmachineState::Idle)
    }
}

/// Audio clips stored on the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AudioClip {
    /// Reward sound
    Positive,
    /// Wrong-answer sound
    Negative,
    /// Neutral "do something" prompt
    DoCue,
}

/// Hub driver interface
///
/// All operations are infallible from the caller's point of view; a
/// driver that hits a hardware fault handles it internally.
pub trait HubDriver {
    /// Bring up the hub for the named application
    fn initialize(&mut self, app_name: &str);

    /// Check if the device layer is usable
    fn is_ready(&self) -> bool;

    /// Get the food machine state
    fn foodmachine_state(&self) -> FoodmachineState;

    /// Check if any pad is currently held
    fn any_button_pressed(&self) -> bool;

    /// Suppress (true) or allow (false) autonomous pad recalibration
    fn set_recalibration_lock(&mut self, locked: bool);

    /// Set the light of one pad
    fn set_light(&mut self, position: LightPosition, color: LightColor);

    /// Play an audio clip at the given volume (0-100)
    fn play_audio(&mut self, clip: AudioClip, volume: u8);

    /// Advance the driver's own state machine, spending at most
    /// `budget_ms` milliseconds
    fn run(&mut self, budget_ms: u32);
}
