//! Configuration loading
//!
//! The show configuration is compiled into the firmware from `show.toml`.
//! The build script checks it with the `toml` crate, and the core crate's
//! `shipped_config` tests run the on-device parser over the same file.
//! A parse failure here falls back to the defaults and says so.

use defmt::*;
use lightshow_core::config::{parse_config, ShowConfig};

/// Embedded configuration (compiled into firmware)
/// Edit show.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../show.toml");

/// Load the embedded configuration, or the defaults if it does not parse
pub fn load_config() -> ShowConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Config loaded: player={}, reward_delay={}ms, light_timing={}ms, intensity={}",
                config.player_name.as_str(),
                config.reward_delay_ms,
                config.light_timing_ms,
                config.intensity
            );
            config
        }
        Err(e) => {
            warn!("Embedded config rejected ({}), using defaults", e);
            ShowConfig::default()
        }
    }
}
