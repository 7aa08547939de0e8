//! Build script for latchkey-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates lock.toml at compile time
//! - Generates the `lock_config.rs` constants included by the firmware

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// Digits in a stored secret
const SECRET_LEN: i64 = 5;

fn main() {
    setup_linker();
    let config = load_config();
    let lock = validate_config(&config);
    generate_constants(&lock);
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

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read and parse lock.toml
fn load_config() -> toml::Value {
    println!("cargo:rerun-if-changed=lock.toml");

    let config_path = Path::new("lock.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: lock.toml not found!                                     ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a lock.toml configuration file.           ║\n\
            ║  Please create one in the latchkey-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read lock.toml                                 ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in lock.toml                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            // Count chars, not bytes: TOML errors quote the offending line,
            // which may contain multi-byte UTF-8
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fail the build with a list of problems
fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Validated lock.toml values
struct Lock {
    baudrate: i64,
    secret_address: i64,
    settle_ms: i64,
    capacity: i64,
    max_failed_attempts: i64,
    kick_ms: i64,
    door_tick_ms: i64,
    alarm_tick_ms: i64,
    hold_off_ms: i64,
}

/// Look up `[section] key` and check it lies in `range`
fn integer(
    config: &toml::Value,
    section: &str,
    key: &str,
    range: RangeInclusive<i64>,
    errors: &mut Vec<String>,
) -> i64 {
    let value = match config.get(section) {
        Some(toml::Value::Table(table)) => table.get(key),
        Some(_) => {
            errors.push(format!("[{}] must be a table", section));
            return *range.start();
        }
        None => {
            errors.push(format!("Missing [{}] section", section));
            return *range.start();
        }
    };

    match value {
        Some(toml::Value::Integer(n)) if range.contains(n) => *n,
        Some(toml::Value::Integer(_)) => {
            errors.push(format!(
                "[{}] {} must be {}-{}",
                section,
                key,
                range.start(),
                range.end()
            ));
            *range.start()
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            *range.start()
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            *range.start()
        }
    }
}

/// Validate every section the firmware reads
fn validate_config(config: &toml::Value) -> Lock {
    let mut errors = Vec::new();

    let lock = Lock {
        baudrate: integer(config, "link", "baudrate", 300..=921_600, &mut errors),
        secret_address: integer(config, "storage", "secret_address", 0..=0xFFFF, &mut errors),
        settle_ms: integer(config, "storage", "settle_ms", 0..=1000, &mut errors),
        capacity: integer(config, "storage", "capacity", SECRET_LEN..=0xFFFF, &mut errors),
        max_failed_attempts: integer(config, "lockout", "max_failed_attempts", 1..=255, &mut errors),
        kick_ms: integer(config, "timing", "kick_ms", 1..=60_000, &mut errors),
        door_tick_ms: integer(config, "timing", "door_tick_ms", 1..=600_000, &mut errors),
        alarm_tick_ms: integer(config, "timing", "alarm_tick_ms", 1..=600_000, &mut errors),
        hold_off_ms: integer(config, "keypad", "hold_off_ms", 0..=10_000, &mut errors),
    };
    report("Invalid lock.toml configuration", &errors);

    if lock.secret_address + SECRET_LEN > lock.capacity {
        report(
            "Secret does not fit in the EEPROM",
            &[format!(
                "[storage] secret_address + {} must be <= capacity ({})",
                SECRET_LEN, lock.capacity
            )],
        );
    }

    println!("cargo:warning=lock.toml validated successfully");
    lock
}

/// Write `lock_config.rs` into OUT_DIR
fn generate_constants(lock: &Lock) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("lock_config.rs")).unwrap();

    writeln!(f, "// Generated from lock.toml by build.rs").unwrap();
    writeln!(f, "pub const LINK_BAUDRATE: u32 = {};", lock.baudrate).unwrap();
    writeln!(f, "pub const SECRET_ADDRESS: u16 = {:#06x};", lock.secret_address).unwrap();
    writeln!(f, "pub const EEPROM_SETTLE_MS: u32 = {};", lock.settle_ms).unwrap();
    writeln!(f, "pub const EEPROM_CAPACITY: u16 = {};", lock.capacity).unwrap();
    writeln!(f, "pub const MAX_FAILED_ATTEMPTS: u8 = {};", lock.max_failed_attempts).unwrap();
    writeln!(f, "pub const KICK_MS: u32 = {};", lock.kick_ms).unwrap();
    writeln!(f, "pub const DOOR_TICK_MS: u32 = {};", lock.door_tick_ms).unwrap();
    writeln!(f, "pub const ALARM_TICK_MS: u32 = {};", lock.alarm_tick_ms).unwrap();
    writeln!(f, "pub const KEYPAD_HOLD_OFF_MS: u32 = {};", lock.hold_off_ms).unwrap();
}
