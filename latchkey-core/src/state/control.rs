//! Control controller main loop
//!
//! One [`ControlMachine::step`] is one outer loop iteration: announce the
//! current state, run that state's round, apply the transition.

use latchkey_hal::{ByteStorage, TickTimer, Uart};
use latchkey_protocol::{AppState, ControlLink, MenuKey};

use super::events::Event;
use super::machine::transition;
use crate::config::{LockConfig, SequenceTiming};
use crate::error::{ActuatorError, ControlError};
use crate::password::{create, verify, Creation, LockoutPolicy, SecretStore, Verdict};
use crate::sequencer::{self, BoltMotion, Output, OutputSink, Profile, Sequencer};
use crate::traits::{AlarmOutput, Direction, MotorDriver};

/// Bolt motor speed used for opening and closing
pub const BOLT_SPEED_PERCENT: u8 = 100;

/// Record of one loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub from: AppState,
    pub event: Event,
    pub to: AppState,
    /// First actuator failure seen while a sequence ran
    pub fault: Option<ActuatorError>,
}

impl Transition {
    /// Check if the state changed
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Sequence output sink for the bolt motor and the buzzer
///
/// Panel notices are ignored.
pub struct Actuators<'a, M, B> {
    pub motor: &'a mut M,
    pub alarm: &'a mut B,
}

impl<M: MotorDriver, B: AlarmOutput> OutputSink for Actuators<'_, M, B> {
    type Error = ActuatorError;

    fn apply(&mut self, output: Output) -> Result<(), Self::Error> {
        match output {
            Output::Bolt(BoltMotion::Open) => {
                self.motor.rotate(Direction::Clockwise, BOLT_SPEED_PERCENT)?
            }
            Output::Bolt(BoltMotion::Close) => {
                self.motor.rotate(Direction::CounterClockwise, BOLT_SPEED_PERCENT)?
            }
            Output::Bolt(BoltMotion::Stop) => self.motor.stop()?,
            Output::Alarm(active) => self.alarm.set_active(active)?,
            Output::Show(_) => {}
        }
        Ok(())
    }
}

/// Control-side application state machine
pub struct ControlMachine<U, S, M, B, T> {
    link: ControlLink<U>,
    store: SecretStore<S>,
    motor: M,
    alarm: B,
    timer: T,
    sequencer: Sequencer,
    lockout: LockoutPolicy,
    timing: SequenceTiming,
    state: AppState,
}

impl<U, S, M, B, T> ControlMachine<U, S, M, B, T>
where
    U: Uart,
    S: ByteStorage,
    M: MotorDriver,
    B: AlarmOutput,
    T: TickTimer,
{
    /// Create a machine in the password creation state
    pub fn new(
        config: &LockConfig,
        link: ControlLink<U>,
        storage: S,
        motor: M,
        alarm: B,
        timer: T,
    ) -> Self {
        Self {
            link,
            store: SecretStore::new(storage, config.secret_base),
            motor,
            alarm,
            timer,
            sequencer: Sequencer::new(),
            lockout: LockoutPolicy::new(config.max_failed_attempts),
            timing: config.timing,
            state: AppState::CreatingPassword,
        }
    }

    /// Put the bolt motor and buzzer in their idle state
    pub fn park(&mut self) -> Result<(), ControlError> {
        self.timer.stop();
        self.motor.stop()?;
        self.alarm.set_active(false)?;
        Ok(())
    }

    /// Run one outer loop iteration
    ///
    /// On error the state is left unchanged and the next iteration announces
    /// it again.
    pub fn step(&mut self) -> Result<Transition, ControlError> {
        let from = self.state;
        self.link.announce(from)?;

        let (event, fault) = match from {
            AppState::CreatingPassword => (self.create_password()?, None),
            AppState::MainMenu => (self.read_menu()?, None),
            AppState::OpeningDoor | AppState::ChangingPassword => (self.check_password()?, None),
            AppState::UnlockingDoor => {
                let profile = Profile::control_door(&self.timing);
                (Event::SequenceComplete, self.run_sequence(profile))
            }
            AppState::Alarm => {
                let profile = Profile::control_alarm(&self.timing);
                (Event::SequenceComplete, self.run_sequence(profile))
            }
        };

        let to = transition(from, event);
        if to == AppState::CreatingPassword && from != to {
            self.lockout.reset();
        }
        self.state = to;

        Ok(Transition {
            from,
            event,
            to,
            fault,
        })
    }

    fn create_password(&mut self) -> Result<Event, ControlError> {
        let link = &mut self.link;
        let outcome = create(
            || link.receive_payload().map_err(ControlError::from),
            &mut self.store,
        )?;

        Ok(match outcome {
            Creation::Saved(_) => Event::PasswordCreated,
            Creation::Mismatch => Event::PasswordMismatch,
        })
    }

    fn read_menu(&mut self) -> Result<Event, ControlError> {
        let byte = self.link.receive_payload()?;
        Ok(match MenuKey::from_u8(byte) {
            Some(key) => Event::MenuSelected(key),
            None => Event::MenuIgnored(byte),
        })
    }

    fn check_password(&mut self) -> Result<Event, ControlError> {
        let link = &mut self.link;
        let matched = verify(
            || link.receive_payload().map_err(ControlError::from),
            &mut self.store,
        )?;

        if matched {
            self.lockout.reset();
            return Ok(Event::Verified);
        }

        Ok(match self.lockout.record_failure() {
            Verdict::Retry { failures } => Event::VerificationFailed { failures },
            Verdict::Lockout => Event::LockedOut,
        })
    }

    fn run_sequence(&mut self, profile: Profile) -> Option<ActuatorError> {
        let mut sink = Actuators {
            motor: &mut self.motor,
            alarm: &mut self.alarm,
        };
        sequencer::run(&mut self.sequencer, profile, &mut self.timer, &mut sink).err()
    }

    /// Current canonical state
    pub fn state(&self) -> AppState {
        self.state
    }

    /// Consecutive failed verifications
    pub fn failures(&self) -> u8 {
        self.lockout.failures()
    }

    /// Check if a sequence is holding the loop
    pub fn is_frozen(&self) -> bool {
        self.sequencer.is_frozen()
    }

    pub fn link(&self) -> &ControlLink<U> {
        &self.link
    }

    pub fn store(&self) -> &SecretStore<S> {
        &self.store
    }

    pub fn motor(&self) -> &M {
        &self.motor
    }

    pub fn alarm(&self) -> &B {
        &self.alarm
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{AlarmError, MotorError};
    use latchkey_hal::mock::{ManualTicker, MemoryStorage, ScriptedUart};
    use latchkey_hal::StorageError;
    use latchkey_protocol::LinkError;

    const READY: u8 = 0x02;
    const ASK: u8 = 0x03;

    #[derive(Default)]
    struct RecordingMotor {
        log: Vec<Option<Direction>>,
        current: Option<Direction>,
        failing: bool,
    }

    impl MotorDriver for RecordingMotor {
        fn rotate(&mut self, direction: Direction, speed_percent: u8) -> Result<(), MotorError> {
            assert_eq!(speed_percent, BOLT_SPEED_PERCENT);
            if self.failing {
                return Err(MotorError::Pin);
            }
            self.current = Some(direction);
            self.log.push(Some(direction));
            Ok(())
        }

        fn stop(&mut self) -> Result<(), MotorError> {
            self.current = None;
            self.log.push(None);
            Ok(())
        }

        fn direction(&self) -> Option<Direction> {
            self.current
        }
    }

    #[derive(Default)]
    struct RecordingAlarm {
        log: Vec<bool>,
    }

    impl AlarmOutput for RecordingAlarm {
        fn set_active(&mut self, active: bool) -> Result<(), AlarmError> {
            self.log.push(active);
            Ok(())
        }

        fn is_active(&self) -> bool {
            self.log.last().copied().unwrap_or(false)
        }
    }

    /// Bytes the panel would send for a sequence of loop iterations
    #[derive(Default)]
    struct Script(Vec<u8>);

    impl Script {
        fn payloads(mut self, bytes: &[u8]) -> Self {
            self.0.push(READY);
            for &byte in bytes {
                self.0.extend_from_slice(&[ASK, byte]);
            }
            self
        }

        fn create(self, first: [u8; 5], second: [u8; 5]) -> Self {
            let pairs: Vec<u8> = first
                .iter()
                .zip(second.iter())
                .flat_map(|(&a, &b)| [a, b])
                .collect();
            self.payloads(&pairs)
        }

        fn menu(self, key: u8) -> Self {
            self.payloads(&[key])
        }

        fn verify(self, digits: [u8; 5]) -> Self {
            self.payloads(&digits)
        }

        fn sequence(self) -> Self {
            self.payloads(&[])
        }
    }

    type Machine = ControlMachine<
        ScriptedUart,
        MemoryStorage<64>,
        RecordingMotor,
        RecordingAlarm,
        ManualTicker,
    >;

    fn machine(script: Script) -> Machine {
        machine_with(script, MemoryStorage::new(), RecordingMotor::default())
    }

    fn machine_with(script: Script, storage: MemoryStorage<64>, motor: RecordingMotor) -> Machine {
        ControlMachine::new(
            &LockConfig::DEFAULT,
            ControlLink::new(ScriptedUart::with_script(&script.0)),
            storage,
            motor,
            RecordingAlarm::default(),
            ManualTicker::new(),
        )
    }

    const PIN: [u8; 5] = [1, 2, 3, 4, 5];
    const WRONG: [u8; 5] = [9, 9, 9, 9, 9];

    #[test]
    fn test_starts_in_creation() {
        let machine = machine(Script::default());
        assert_eq!(machine.state(), AppState::CreatingPassword);
        assert_eq!(machine.failures(), 0);
        assert!(!machine.is_frozen());
    }

    #[test]
    fn test_step_announces_state_first() {
        let mut machine = machine(Script::default().create(PIN, PIN));
        machine.step().unwrap();
        let sent = machine.link().uart().sent();
        assert_eq!(&sent[..2], &[0x01, AppState::CreatingPassword.as_u8()]);
        // One READY_FROM_CONTROL per received digit
        assert_eq!(sent[2..].iter().filter(|&&b| b == 0x04).count(), 10);
    }

    #[test]
    fn test_creation_mismatch_stays() {
        let mut machine = machine(Script::default().create(PIN, [1, 2, 3, 4, 6]));
        let step = machine.step().unwrap();
        assert_eq!(step.event, Event::PasswordMismatch);
        assert_eq!(step.to, AppState::CreatingPassword);
        assert!(!step.changed());
        assert_eq!(machine.store().storage().writes(), 0);
    }

    #[test]
    fn test_unknown_menu_key_is_ignored() {
        let mut machine = machine(Script::default().create(PIN, PIN).menu(b'*').menu(b'-'));
        machine.step().unwrap();

        let ignored = machine.step().unwrap();
        assert_eq!(ignored.event, Event::MenuIgnored(b'*'));
        assert_eq!(ignored.to, AppState::MainMenu);

        let selected = machine.step().unwrap();
        assert_eq!(selected.to, AppState::ChangingPassword);
    }

    #[test]
    fn test_full_scenario() {
        let script = Script::default()
            .create(PIN, PIN)
            .menu(b'+')
            .verify(PIN)
            .sequence()
            .menu(b'+')
            .verify(WRONG)
            .verify(WRONG)
            .verify(WRONG)
            .sequence();
        let mut machine = machine(script);

        let created = machine.step().unwrap();
        assert_eq!(created.to, AppState::MainMenu);
        assert_eq!(machine.store().storage().slice(0x0001, 5), &PIN);

        assert_eq!(machine.step().unwrap().to, AppState::OpeningDoor);

        let verified = machine.step().unwrap();
        assert_eq!(verified.event, Event::Verified);
        assert_eq!(verified.to, AppState::UnlockingDoor);
        assert_eq!(machine.failures(), 0);

        let door = machine.step().unwrap();
        assert_eq!(door.event, Event::SequenceComplete);
        assert_eq!(door.to, AppState::MainMenu);
        assert_eq!(door.fault, None);
        assert_eq!(machine.timer().ticks(), 12);
        assert!(!machine.is_frozen());
        assert_eq!(
            machine.motor().log,
            vec![
                Some(Direction::Clockwise),
                None,
                Some(Direction::CounterClockwise),
                None
            ]
        );

        assert_eq!(machine.step().unwrap().to, AppState::OpeningDoor);

        let first = machine.step().unwrap();
        assert_eq!(first.event, Event::VerificationFailed { failures: 1 });
        assert_eq!(first.to, AppState::OpeningDoor);
        let second = machine.step().unwrap();
        assert_eq!(second.event, Event::VerificationFailed { failures: 2 });
        let third = machine.step().unwrap();
        assert_eq!(third.event, Event::LockedOut);
        assert_eq!(third.to, AppState::Alarm);
        assert_eq!(machine.failures(), 0);

        let alarm = machine.step().unwrap();
        assert_eq!(alarm.to, AppState::MainMenu);
        assert_eq!(machine.timer().ticks(), 12 + 7);
        assert_eq!(machine.alarm().log, vec![true, false]);
        assert_eq!(machine.link().uart().remaining(), 0);
    }

    #[test]
    fn test_success_resets_failure_count() {
        let script = Script::default()
            .create(PIN, PIN)
            .menu(b'+')
            .verify(WRONG)
            .verify(WRONG)
            .verify(PIN)
            .sequence()
            .menu(b'+')
            .verify(WRONG)
            .verify(WRONG);
        let mut machine = machine(script);

        let mut states = Vec::new();
        for _ in 0..9 {
            states.push(machine.step().unwrap().to);
        }

        assert!(!states.contains(&AppState::Alarm));
        assert_eq!(machine.state(), AppState::OpeningDoor);
        assert_eq!(machine.failures(), 2);
    }

    #[test]
    fn test_change_password_flow() {
        let script = Script::default()
            .create(PIN, PIN)
            .menu(b'-')
            .verify(PIN)
            .create([5, 5, 5, 5, 5], [5, 5, 5, 5, 5])
            .menu(b'+')
            .verify(PIN);
        let mut machine = machine(script);

        machine.step().unwrap();
        machine.step().unwrap();
        assert_eq!(machine.step().unwrap().to, AppState::CreatingPassword);
        assert_eq!(machine.step().unwrap().to, AppState::MainMenu);
        assert_eq!(machine.store().storage().slice(0x0001, 5), &[5; 5]);

        machine.step().unwrap();
        let old = machine.step().unwrap();
        assert_eq!(old.event, Event::VerificationFailed { failures: 1 });
    }

    #[test]
    fn test_storage_fault_keeps_state() {
        let mut storage = MemoryStorage::new();
        storage.set_faulty(true);
        let mut machine = machine_with(
            Script::default().create(PIN, PIN),
            storage,
            RecordingMotor::default(),
        );

        assert_eq!(
            machine.step(),
            Err(ControlError::Storage(StorageError::Bus))
        );
        assert_eq!(machine.state(), AppState::CreatingPassword);
    }

    #[test]
    fn test_link_failure_keeps_state() {
        let mut machine = machine(Script::default());
        assert_eq!(machine.step(), Err(ControlError::Link(LinkError::Serial)));
        assert_eq!(machine.state(), AppState::CreatingPassword);
    }

    #[test]
    fn test_motor_fault_reported_after_sequence() {
        let script = Script::default()
            .create(PIN, PIN)
            .menu(b'+')
            .verify(PIN)
            .sequence();
        let motor = RecordingMotor {
            failing: true,
            ..Default::default()
        };
        let mut machine = machine_with(script, MemoryStorage::new(), motor);

        for _ in 0..3 {
            machine.step().unwrap();
        }
        let door = machine.step().unwrap();

        assert_eq!(door.to, AppState::MainMenu);
        assert_eq!(door.fault, Some(ActuatorError::Motor(MotorError::Pin)));
        assert_eq!(machine.timer().ticks(), 12);
        assert!(!machine.is_frozen());
    }

    #[test]
    fn test_park_stops_outputs() {
        let mut machine = machine(Script::default());
        machine.park().unwrap();
        assert_eq!(machine.motor().log, vec![None]);
        assert_eq!(machine.alarm().log, vec![false]);
    }
}
