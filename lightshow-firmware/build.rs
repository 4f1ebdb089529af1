//! Build script for lightshow-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates show.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Highest pad light intensity the hub accepts
const MAX_INTENSITY: i64 = 99;

/// Longest player name the firmware stores
const MAX_NAME_LEN: usize = 16;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate show.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=show.toml");

    let config_path = Path::new("show.toml");
    if !config_path.exists() {
        fail(
            "show.toml not found!",
            &[
                "The firmware requires a show.toml configuration file.".to_string(),
                "Please create one in the lightshow-firmware directory.".to_string(),
            ],
        );
    }

    let config_content = fs::read_to_string(config_path)
        .unwrap_or_else(|e| fail("Failed to read show.toml", &[format!("Error: {}", e)]));

    let config: toml::Value = toml::from_str(&config_content).unwrap_or_else(|e| {
        let lines: Vec<String> = e.to_string().lines().map(str::to_string).collect();
        fail("Invalid TOML syntax in show.toml", &lines)
    });

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_player(&config, &mut errors);
    validate_timing(&config, &mut errors);
    validate_lights(&config, &mut errors);

    if !errors.is_empty() {
        let bullets: Vec<String> = errors.iter().map(|e| format!("• {}", e)).collect();
        fail("Invalid light show configuration", &bullets);
    }

    println!("cargo:warning=show.toml validated successfully");
}

/// Abort the build with a boxed error message
fn fail(title: &str, lines: &[String]) -> ! {
    const WIDTH: usize = 64;
    let rule = "═".repeat(WIDTH + 2);

    let body = lines
        .iter()
        .map(|line| {
            let truncated = if line.chars().count() > WIDTH {
                format!("{}...", line.chars().take(WIDTH - 3).collect::<String>())
            } else {
                line.clone()
            };
            format!("║  {:<w$} ║", truncated, w = WIDTH)
        })
        .collect::<Vec<_>>()
        .join("\n");

    panic!(
        "\n╔{rule}╗\n║  {:<w$} ║\n╠{rule}╣\n{}\n╚{rule}╝\n",
        format!("ERROR: {}", title),
        body,
        rule = rule,
        w = WIDTH
    );
}

/// Only [player], [timing] and [lights] are understood by the firmware parser
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let table = match config.as_table() {
        Some(t) => t,
        None => return,
    };

    for (name, value) in table {
        match (name.as_str(), value) {
            ("player" | "timing" | "lights", toml::Value::Table(_)) => {}
            ("player" | "timing" | "lights", _) => {
                errors.push(format!("[{}] must be a table", name));
            }
            _ => errors.push(format!("unknown section [{}]", name)),
        }
    }
}

fn validate_player(config: &toml::Value, errors: &mut Vec<String>) {
    match config.get("player").and_then(|p| p.get("name")) {
        Some(toml::Value::String(name)) => {
            if name.len() > MAX_NAME_LEN {
                errors.push(format!(
                    "[player] name must be at most {} bytes",
                    MAX_NAME_LEN
                ));
            }
        }
        Some(_) => errors.push("[player] name must be a string".to_string()),
        None => {}
    }
}

fn validate_timing(config: &toml::Value, errors: &mut Vec<String>) {
    let timing = match config.get("timing") {
        Some(t) => t,
        None => return,
    };

    for key in [
        "reward_delay_ms",
        "light_timing_ms",
        "hub_budget_ms",
        "gate_timeout_ms",
    ] {
        match timing.get(key) {
            Some(toml::Value::Integer(ms)) => {
                if *ms < 0 || *ms > u32::MAX as i64 {
                    errors.push(format!("[timing] {} must be 0-{}", key, u32::MAX));
                }
            }
            Some(_) => errors.push(format!("[timing] {} must be an integer", key)),
            None => {}
        }
    }
}

fn validate_lights(config: &toml::Value, errors: &mut Vec<String>) {
    match config.get("lights").and_then(|l| l.get("intensity")) {
        Some(toml::Value::Integer(intensity)) => {
            if *intensity < 0 || *intensity > MAX_INTENSITY {
                errors.push(format!("[lights] intensity must be 0-{}", MAX_INTENSITY));
            }
        }
        Some(_) => errors.push("[lights] intensity must be an integer".to_string()),
        None => {}
    }
}
