//! Simple TOML parser for the light show configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! `show.toml`. It does NOT support the full TOML grammar.
//!
//! Supported features:
//! - Key = value pairs (string, integer)
//! - [section] headers
//! - Comments (# ...), whole-line or trailing, outside quoted strings
//!
//! Unknown keys are skipped. Unknown sections are an error.

use super::types::{ShowConfig, MAX_LABEL_LEN};
use crate::traits::MAX_INTENSITY;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid section header
    InvalidSection,
    /// Invalid value type or out of range
    InvalidValue,
    /// String longer than the label capacity
    TooLong,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Player,
    Timing,
    Lights,
}

/// Parse TOML configuration into ShowConfig
///
/// Keys that are absent keep their default value.
pub fn parse_config(input: &str) -> Result<ShowConfig, ParseError> {
    let mut config = ShowConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        // Skip empty and comment-only lines
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            if !line.ends_with(']') {
                return Err(ParseError::InvalidSection);
            }
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config)?;
        }
    }

    Ok(config)
}

/// Parse section header like "timing"
fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "player" => Ok(Section::Player),
        "timing" => Ok(Section::Timing),
        "lights" => Ok(Section::Lights),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Cut a line at the first `#` outside a quoted string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }

    line
}

/// Parse "key = value" line (comment already stripped)
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut ShowConfig,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Player, "name") => {
            let name = parse_string(value);
            if name.len() > MAX_LABEL_LEN {
                return Err(ParseError::TooLong);
            }
            config.set_player_name(name);
        }

        (Section::Timing, "reward_delay_ms") => config.reward_delay_ms = parse_int(value)?,
        (Section::Timing, "light_timing_ms") => config.light_timing_ms = parse_int(value)?,
        (Section::Timing, "hub_budget_ms") => config.hub_budget_ms = parse_int(value)?,
        (Section::Timing, "gate_timeout_ms") => {
            // 0 disables the timeout
            let timeout: u32 = parse_int(value)?;
            config.gate_timeout_ms = (timeout > 0).then_some(timeout);
        }

        (Section::Lights, "intensity") => {
            let intensity: u8 = parse_int(value)?;
            if intensity > MAX_INTENSITY {
                return Err(ParseError::InvalidValue);
            }
            config.intensity = intensity;
        }

        _ => {}
    }

    Ok(())
}
