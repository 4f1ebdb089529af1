//! Configuration type definitions
//!
//! These types hold the light show settings. The firmware fills them in
//! from the embedded `show.toml`; anything missing keeps its default.

use heapless::String;

use crate::traits::{LightColor, MAX_INTENSITY};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum label length
pub const MAX_LABEL_LEN: usize = 16;

/// Name the hub is initialized with
pub const APP_NAME: &str = "Light Show";

/// Default player name
pub const DEFAULT_PLAYER_NAME: &str = "Foosball";

/// Delay after the (silent) reward sound before the first light (ms)
pub const SOUND_FOODTREAT_DELAY_MS: u32 = 1200;

/// Time each light stage is held (ms)
pub const LIGHT_TIMING_MS: u32 = 1000;

/// Time budget given to the hub driver per loop iteration (ms)
pub const HUB_RUN_BUDGET_MS: u32 = 20;

/// Light show configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShowConfig {
    /// Name of the animal playing (logging only)
    pub player_name: String<MAX_LABEL_LEN>,
    /// Wait after the reward sound placeholder (ms)
    pub reward_delay_ms: u32,
    /// Wait after each light stage (ms)
    pub light_timing_ms: u32,
    /// Green intensity for a lit pad (0-99)
    pub intensity: u8,
    /// Hub driver time budget per loop iteration (ms)
    pub hub_budget_ms: u32,
    /// Report a blocked gate after this long (ms); None waits silently
    pub gate_timeout_ms: Option<u32>,
}

impl Default for ShowConfig {
    fn default() -> Self {
        let mut player_name = String::new();
        let _ = player_name.push_str(DEFAULT_PLAYER_NAME);
        Self {
            player_name,
            reward_delay_ms: SOUND_FOODTREAT_DELAY_MS,
            light_timing_ms: LIGHT_TIMING_MS,
            intensity: MAX_INTENSITY,
            hub_budget_ms: HUB_RUN_BUDGET_MS,
            gate_timeout_ms: None,
        }
    }
}

impl ShowConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Color of a lit pad
    pub fn on_color(&self) -> LightColor {
        LightColor::green(self.intensity)
    }

    /// Replace the player name, truncating to [`MAX_LABEL_LEN`] bytes
    pub fn set_player_name(&mut self, name: &str) {
        self.player_name.clear();
        for c in name.chars() {
            if self.player_name.push(c).is_err() {
                break;
            }
        }
    }

    /// Total length of one pass, gate excluded (ms)
    pub fn pass_duration_ms(&self) -> u32 {
        self.reward_delay_ms
            .saturating_add(self.light_timing_ms.saturating_mul(6))
    }
}
