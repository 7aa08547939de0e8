//! Build script for latchkey-panel-fw
//!
//! The panel shares lock.toml with the control firmware so both sides agree
//! on the link baud rate and the sequence timing. Only the sections the
//! panel uses are validated here.

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

const CONFIG_PATH: &str = "../../latchkey-firmware/lock.toml";

fn main() {
    setup_linker();
    generate_constants(&load_config());
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

fn load_config() -> toml::Value {
    println!("cargo:rerun-if-changed={}", CONFIG_PATH);

    let content = match fs::read_to_string(Path::new(CONFIG_PATH)) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read latchkey-firmware/lock.toml               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in lock.toml                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e.to_string()
                    .lines()
                    .map(|line| format!("║  {:<64} ║", line))
                    .collect::<Vec<_>>()
                    .join("\n")
            );
        }
    }
}

fn integer(
    config: &toml::Value,
    section: &str,
    key: &str,
    range: RangeInclusive<i64>,
    errors: &mut Vec<String>,
) -> i64 {
    match config.get(section).and_then(|s| s.get(key)) {
        Some(toml::Value::Integer(n)) if range.contains(n) => *n,
        Some(_) => {
            errors.push(format!(
                "[{}] {} must be an integer {}-{}",
                section,
                key,
                range.start(),
                range.end()
            ));
            *range.start()
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            *range.start()
        }
    }
}

/// Write `lock_config.rs` into OUT_DIR
fn generate_constants(config: &toml::Value) {
    let mut errors = Vec::new();

    let baudrate = integer(config, "link", "baudrate", 300..=921_600, &mut errors);
    let kick_ms = integer(config, "timing", "kick_ms", 1..=60_000, &mut errors);
    let door_tick_ms = integer(config, "timing", "door_tick_ms", 1..=600_000, &mut errors);
    let alarm_tick_ms = integer(config, "timing", "alarm_tick_ms", 1..=600_000, &mut errors);
    let hold_off_ms = integer(config, "keypad", "hold_off_ms", 0..=10_000, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid panel configuration in lock.toml                 ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("lock_config.rs")).unwrap();

    writeln!(f, "// Generated from lock.toml by build.rs").unwrap();
    writeln!(f, "pub const LINK_BAUDRATE: u32 = {};", baudrate).unwrap();
    writeln!(f, "pub const KICK_MS: u32 = {};", kick_ms).unwrap();
    writeln!(f, "pub const DOOR_TICK_MS: u32 = {};", door_tick_ms).unwrap();
    writeln!(f, "pub const ALARM_TICK_MS: u32 = {};", alarm_tick_ms).unwrap();
    writeln!(f, "pub const KEYPAD_HOLD_OFF_MS: u32 = {};", hold_off_ms).unwrap();
}
