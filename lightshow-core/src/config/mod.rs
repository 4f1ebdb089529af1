//! Configuration types and parsing
//!
//! Board-agnostic settings for the light show, plus the small TOML
//! parser the firmware uses for its embedded `show.toml`.

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ParseError};
pub use types::*;
