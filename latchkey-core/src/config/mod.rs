//! Configuration types
//!
//! The lock is configured at build time. Firmware crates generate their
//! constants from `lock.toml`; [`LockConfig::DEFAULT`] carries the same
//! values for host builds and tests.

/// Timer periods used by the actuation sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequenceTiming {
    /// Short first period that starts a sequence almost immediately
    pub kick_ms: u32,
    /// Steady period of the door sequence
    pub door_tick_ms: u32,
    /// Steady period of the alarm sequence
    pub alarm_tick_ms: u32,
}

impl SequenceTiming {
    /// Default timing: 3 s door phases, ~8.4 s alarm phases
    pub const DEFAULT: Self = Self {
        kick_ms: 2,
        door_tick_ms: 3000,
        alarm_tick_ms: 8389,
    };
}

impl Default for SequenceTiming {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Control controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LockConfig {
    /// Storage address of the first secret digit
    pub secret_base: u16,
    /// Consecutive failed verifications that trigger the alarm
    pub max_failed_attempts: u8,
    /// Sequence timer periods
    pub timing: SequenceTiming,
}

impl LockConfig {
    pub const DEFAULT: Self = Self {
        secret_base: 0x0001,
        max_failed_attempts: 3,
        timing: SequenceTiming::DEFAULT,
    };
}

impl Default for LockConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
