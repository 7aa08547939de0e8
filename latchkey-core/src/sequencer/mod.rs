//! Tick-driven actuation sequencer
//!
//! A sequence is a [`Profile`]: a total tick count, a short kick period for
//! the first tick, a steady period for the rest, and a table of [`Cue`]s to
//! apply on given ticks. The [`Sequencer`] holds the tick counter and the
//! freeze flag; [`run`] drives it from a [`TickTimer`].

mod profile;

pub use profile::{
    Cue, Profile, ALARM_BUZZER_CUES, ALARM_NOTICE_CUES, ALARM_TICKS, DOOR_BOLT_CUES,
    DOOR_NOTICE_CUES, DOOR_TICKS,
};

use latchkey_hal::TickTimer;

/// Bolt motor command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoltMotion {
    /// Retract the bolt
    Open,
    /// Extend the bolt
    Close,
    /// Remove power
    Stop,
}

/// Panel notice shown during a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Notice {
    Unlocking,
    DoorOpen,
    Locking,
    Error,
}

/// One output change applied by a cue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Output {
    /// Drive the bolt motor
    Bolt(BoltMotion),
    /// Switch the buzzer
    Alarm(bool),
    /// Show a notice on the panel
    Show(Notice),
}

/// Receiver of sequence outputs
///
/// Each side implements this for the outputs it owns and ignores the rest.
pub trait OutputSink {
    type Error;

    /// Apply one output
    fn apply(&mut self, output: Output) -> Result<(), Self::Error>;
}

/// What the timer must do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickEffect {
    /// Keep the current period
    Continue,
    /// Switch to the given period
    Reprogram(u32),
    /// Sequence complete; deactivate the timer
    Finished,
}

/// Result of dispatching one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Tick number within the activation, starting at 1
    pub number: u8,
    /// Required timer action
    pub effect: TickEffect,
    cues: &'static [Cue],
}

impl Tick {
    /// Outputs cued for this tick, in table order
    pub fn outputs(&self) -> impl Iterator<Item = Output> + '_ {
        let number = self.number;
        self.cues
            .iter()
            .filter(move |cue| cue.tick == number)
            .map(|cue| cue.output)
    }
}

/// Tick counter and freeze flag of one side
#[derive(Debug, Default)]
pub struct Sequencer {
    profile: Option<Profile>,
    tick: u8,
    frozen: bool,
}

impl Sequencer {
    /// Create an idle sequencer
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an activation and return the period to program first
    ///
    /// Sets the freeze flag; only the final tick clears it.
    pub fn arm(&mut self, profile: Profile) -> u32 {
        let kick = profile.kick_period_ms();
        self.profile = Some(profile);
        self.tick = 0;
        self.frozen = true;
        kick
    }

    /// Advance the counter and report the cues and timer action
    pub fn tick(&mut self) -> Tick {
        let Some(profile) = self.profile else {
            return Tick {
                number: 0,
                effect: TickEffect::Finished,
                cues: &[],
            };
        };

        self.tick = self.tick.saturating_add(1);
        let number = self.tick;

        let effect = if number >= profile.total_ticks() {
            self.tick = 0;
            self.frozen = false;
            self.profile = None;
            TickEffect::Finished
        } else if number == 1 {
            TickEffect::Reprogram(profile.period_ms())
        } else {
            TickEffect::Continue
        };

        Tick {
            number,
            effect,
            cues: profile.cues(),
        }
    }

    /// Check if an activation is in progress
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Ticks dispatched in the current activation
    pub fn current_tick(&self) -> u8 {
        self.tick
    }
}

/// Run a whole sequence, blocking until its final tick
///
/// Output failures do not stop the sequence: every tick is dispatched and
/// the first failure is returned once the timer has been deactivated.
/// Returns the number of ticks dispatched.
pub fn run<T, K>(
    sequencer: &mut Sequencer,
    profile: Profile,
    timer: &mut T,
    sink: &mut K,
) -> Result<u8, K::Error>
where
    T: TickTimer,
    K: OutputSink,
{
    timer.start(sequencer.arm(profile));

    let mut dispatched = 0u8;
    let mut first_error = None;

    while sequencer.is_frozen() {
        timer.wait_tick();
        let tick = sequencer.tick();
        dispatched = dispatched.saturating_add(1);

        for output in tick.outputs() {
            if let Err(err) = sink.apply(output) {
                first_error.get_or_insert(err);
            }
        }

        match tick.effect {
            TickEffect::Continue => {}
            TickEffect::Reprogram(period_ms) => timer.start(period_ms),
            TickEffect::Finished => timer.stop(),
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(dispatched),
    }
}
