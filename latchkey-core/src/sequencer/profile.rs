//! Sequence profiles
//!
//! Control and panel run the same tick schedule independently; each side
//! only carries the cues for the outputs it owns.

use super::{BoltMotion, Notice, Output};
use crate::config::SequenceTiming;

/// Ticks in the door sequence
pub const DOOR_TICKS: u8 = 12;

/// Ticks in the alarm sequence
pub const ALARM_TICKS: u8 = 7;

/// An output to apply on a given tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cue {
    /// Tick number, starting at 1
    pub tick: u8,
    pub output: Output,
}

impl Cue {
    pub const fn new(tick: u8, output: Output) -> Self {
        Self { tick, output }
    }
}

/// Open on tick 1, stop on 6, close on 7, stop on 12
pub const DOOR_BOLT_CUES: &[Cue] = &[
    Cue::new(1, Output::Bolt(BoltMotion::Open)),
    Cue::new(6, Output::Bolt(BoltMotion::Stop)),
    Cue::new(7, Output::Bolt(BoltMotion::Close)),
    Cue::new(12, Output::Bolt(BoltMotion::Stop)),
];

pub const DOOR_NOTICE_CUES: &[Cue] = &[
    Cue::new(1, Output::Show(Notice::Unlocking)),
    Cue::new(6, Output::Show(Notice::DoorOpen)),
    Cue::new(7, Output::Show(Notice::Locking)),
];

/// Buzzer on for ticks 1 through 6
pub const ALARM_BUZZER_CUES: &[Cue] = &[
    Cue::new(1, Output::Alarm(true)),
    Cue::new(7, Output::Alarm(false)),
];

pub const ALARM_NOTICE_CUES: &[Cue] = &[Cue::new(1, Output::Show(Notice::Error))];

/// A timed multi-phase sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Profile {
    total_ticks: u8,
    kick_period_ms: u32,
    period_ms: u32,
    cues: &'static [Cue],
}

impl Profile {
    /// Create a profile
    ///
    /// `total_ticks` is at least one so every activation terminates.
    pub const fn new(total_ticks: u8, kick_period_ms: u32, period_ms: u32, cues: &'static [Cue]) -> Self {
        Self {
            total_ticks: if total_ticks == 0 { 1 } else { total_ticks },
            kick_period_ms,
            period_ms,
            cues,
        }
    }

    /// Door sequence as driven by control (bolt motor)
    pub const fn control_door(timing: &SequenceTiming) -> Self {
        Self::new(DOOR_TICKS, timing.kick_ms, timing.door_tick_ms, DOOR_BOLT_CUES)
    }

    /// Alarm sequence as driven by control (buzzer)
    pub const fn control_alarm(timing: &SequenceTiming) -> Self {
        Self::new(ALARM_TICKS, timing.kick_ms, timing.alarm_tick_ms, ALARM_BUZZER_CUES)
    }

    /// Door sequence as replayed by the panel (notices)
    pub const fn panel_door(timing: &SequenceTiming) -> Self {
        Self::new(DOOR_TICKS, timing.kick_ms, timing.door_tick_ms, DOOR_NOTICE_CUES)
    }

    /// Alarm sequence as replayed by the panel (error notice)
    pub const fn panel_alarm(timing: &SequenceTiming) -> Self {
        Self::new(ALARM_TICKS, timing.kick_ms, timing.alarm_tick_ms, ALARM_NOTICE_CUES)
    }

    pub fn total_ticks(&self) -> u8 {
        self.total_ticks
    }

    /// Period programmed when the sequence is armed
    pub fn kick_period_ms(&self) -> u32 {
        self.kick_period_ms
    }

    /// Period programmed on the first tick
    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    pub fn cues(&self) -> &'static [Cue] {
        self.cues
    }

    /// Approximate wall time of one activation
    pub fn duration_ms(&self) -> u32 {
        self.kick_period_ms
            .saturating_add(self.period_ms.saturating_mul(u32::from(self.total_ticks) - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cues_stay_within_sequence() {
        let timing = SequenceTiming::DEFAULT;
        for profile in [
            Profile::control_door(&timing),
            Profile::control_alarm(&timing),
            Profile::panel_door(&timing),
            Profile::panel_alarm(&timing),
        ] {
            for cue in profile.cues() {
                assert!(cue.tick >= 1 && cue.tick <= profile.total_ticks());
            }
        }
    }

    #[test]
    fn test_zero_ticks_clamped() {
        let profile = Profile::new(0, 1, 1, &[]);
        assert_eq!(profile.total_ticks(), 1);
    }

    #[test]
    fn test_door_duration() {
        let profile = Profile::control_door(&SequenceTiming::DEFAULT);
        assert_eq!(profile.duration_ms(), 2 + 11 * 3000);
    }
}
