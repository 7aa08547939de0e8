//! Panel side of the control/panel handshake
//!
//! One [`PanelMachine::step`] answers one announcement: it performs the
//! keypad and display work for the announced state, sends the user's input
//! to control, and returns to waiting.

use heapless::Vec;
use latchkey_core::password::{Secret, PASSWORD_LEN};
use latchkey_core::sequencer::{self, Output, OutputSink, Profile, Sequencer};
use latchkey_core::SequenceTiming;
use latchkey_hal::{TickTimer, Uart};
use latchkey_protocol::{AppState, InterfaceLink, MenuKey};

use crate::backend::{DisplayBackend, DisplayError};
use crate::error::PanelError;
use crate::keypad::{Key, Keypad};
use crate::messages::{self, Prompt, ENTER_PASSWORD, REENTER_PASSWORD};

/// What the panel is doing between announcements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelMode {
    /// Blocked on the next announcement
    Waiting,
    /// Handling the announced state
    Announced(AppState),
}

/// Sequence output sink that shows notices
///
/// Bolt and buzzer outputs belong to control and are ignored.
pub struct ScreenSink<'a, D> {
    pub display: &'a mut D,
}

impl<D: DisplayBackend> OutputSink for ScreenSink<'_, D> {
    type Error = DisplayError;

    fn apply(&mut self, output: Output) -> Result<(), Self::Error> {
        match output {
            Output::Show(notice) => self
                .display
                .show_lines(messages::notice_text(notice), ""),
            Output::Bolt(_) | Output::Alarm(_) => Ok(()),
        }
    }
}

/// Panel-side application state machine
pub struct PanelMachine<U, K, D, T> {
    link: InterfaceLink<U>,
    keypad: K,
    display: D,
    timer: T,
    sequencer: Sequencer,
    timing: SequenceTiming,
    mode: PanelMode,
}

impl<U, K, D, T> PanelMachine<U, K, D, T>
where
    U: Uart,
    K: Keypad,
    D: DisplayBackend,
    T: TickTimer,
{
    pub fn new(
        timing: SequenceTiming,
        link: InterfaceLink<U>,
        keypad: K,
        display: D,
        timer: T,
    ) -> Self {
        Self {
            link,
            keypad,
            display,
            timer,
            sequencer: Sequencer::new(),
            timing,
            mode: PanelMode::Waiting,
        }
    }

    /// Answer one announcement
    ///
    /// Returns the announced state. The panel is back in
    /// [`PanelMode::Waiting`] afterwards, whatever the outcome.
    pub fn step(&mut self) -> Result<AppState, PanelError> {
        self.mode = PanelMode::Waiting;
        let state = self.link.await_announcement()?;

        self.mode = PanelMode::Announced(state);
        let result = self.handle(state);
        self.mode = PanelMode::Waiting;

        result.map(|()| state)
    }

    fn handle(&mut self, state: AppState) -> Result<(), PanelError> {
        match state {
            AppState::CreatingPassword => self.create_password(),
            AppState::MainMenu => self.select_menu(),
            AppState::OpeningDoor | AppState::ChangingPassword => {
                let secret = self.collect_password(ENTER_PASSWORD)?;
                for &digit in secret.digits() {
                    self.link.send_payload(digit)?;
                }
                Ok(())
            }
            AppState::UnlockingDoor => self.replay(Profile::panel_door(&self.timing)),
            AppState::Alarm => self.replay(Profile::panel_alarm(&self.timing)),
        }
    }

    /// Collect both entries, then send them as interleaved pairs
    fn create_password(&mut self) -> Result<(), PanelError> {
        let first = self.collect_password(ENTER_PASSWORD)?;
        let second = self.collect_password(REENTER_PASSWORD)?;

        for (&digit, &confirmation) in first.digits().iter().zip(second.digits()) {
            self.link.send_payload(digit)?;
            self.link.send_payload(confirmation)?;
        }
        Ok(())
    }

    fn select_menu(&mut self) -> Result<(), PanelError> {
        self.display
            .show_lines(messages::MENU_OPEN, messages::MENU_CHANGE)?;

        let selection = loop {
            let key = self.keypad.read_key()?;
            if let Some(selection) = MenuKey::from_u8(key.as_byte()) {
                break selection;
            }
        };

        self.link.send_payload(selection.as_u8())?;
        Ok(())
    }

    /// Read digits until the field is full, then wait for enter
    ///
    /// Non-digit keys are ignored; each digit is echoed masked.
    fn collect_password(&mut self, prompt: Prompt) -> Result<Secret, PanelError> {
        self.display.show_lines(prompt.title, prompt.label)?;

        let mut digits: Vec<u8, PASSWORD_LEN> = Vec::new();
        while !digits.is_full() {
            if let Some(digit) = self.keypad.read_key()?.digit() {
                let _ = digits.push(digit);
                self.display.write_str(messages::MASK)?;
            }
        }

        while self.keypad.read_key()? != Key::Enter {}

        let mut entry = [0u8; PASSWORD_LEN];
        entry.copy_from_slice(&digits);
        Ok(Secret::new(entry))
    }

    fn replay(&mut self, profile: Profile) -> Result<(), PanelError> {
        let mut sink = ScreenSink {
            display: &mut self.display,
        };
        sequencer::run(&mut self.sequencer, profile, &mut self.timer, &mut sink)?;
        Ok(())
    }

    pub fn mode(&self) -> PanelMode {
        self.mode
    }

    /// Check if a replayed sequence is holding the loop
    pub fn is_frozen(&self) -> bool {
        self.sequencer.is_frozen()
    }

    pub fn link(&self) -> &InterfaceLink<U> {
        &self.link
    }

    pub fn keypad(&self) -> &K {
        &self.keypad
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypad::KeypadError;
    use crate::screen::Screen;
    use latchkey_hal::mock::{ManualTicker, ScriptedUart};
    use std::collections::VecDeque;

    const ASK: u8 = 0x01;
    const READY: u8 = 0x04;

    struct KeyQueue(VecDeque<Key>);

    impl KeyQueue {
        fn new(keys: &[Key]) -> Self {
            Self(keys.iter().copied().collect())
        }
    }

    impl Keypad for KeyQueue {
        fn read_key(&mut self) -> Result<Key, KeypadError> {
            self.0.pop_front().ok_or(KeypadError::Exhausted)
        }
    }

    type Machine = PanelMachine<ScriptedUart, KeyQueue, Screen, ManualTicker>;

    fn machine(script: &[u8], keys: &[Key]) -> Machine {
        PanelMachine::new(
            SequenceTiming::DEFAULT,
            InterfaceLink::new(ScriptedUart::with_script(script)),
            KeyQueue::new(keys),
            Screen::new(),
            ManualTicker::new(),
        )
    }

    fn announce(state: AppState) -> [u8; 2] {
        [ASK, state.as_u8()]
    }

    fn digit_keys(digits: &[u8]) -> std::vec::Vec<Key> {
        digits.iter().map(|&d| Key::Digit(d)).collect()
    }

    fn entry(digits: &[u8]) -> std::vec::Vec<Key> {
        let mut keys = digit_keys(digits);
        keys.push(Key::Enter);
        keys
    }

    /// Payload bytes the panel transmitted, with handshake tokens removed
    fn payloads(sent: &[u8]) -> std::vec::Vec<u8> {
        sent.chunks(2)
            .filter(|round| round[0] == 0x03)
            .map(|round| round[1])
            .collect()
    }

    #[test]
    fn test_starts_waiting() {
        let machine = machine(&[], &[]);
        assert_eq!(machine.mode(), PanelMode::Waiting);
    }

    #[test]
    fn test_menu_ignores_other_keys() {
        let mut script = announce(AppState::MainMenu).to_vec();
        script.push(READY);
        let mut machine = machine(&script, &[Key::Digit(4), Key::Enter, Key::Minus]);

        assert_eq!(machine.step(), Ok(AppState::MainMenu));
        assert_eq!(machine.link().uart().sent(), &[0x02, 0x03, b'-']);
        assert_eq!(machine.display().line(0), Some("+:Open Door"));
        assert_eq!(machine.display().line(1), Some("-:Change Pass"));
        assert_eq!(machine.mode(), PanelMode::Waiting);
    }

    #[test]
    fn test_verification_sends_five_digits() {
        let mut script = announce(AppState::OpeningDoor).to_vec();
        script.extend_from_slice(&[READY; 5]);
        let mut keys = vec![Key::Digit(1), Key::Plus, Key::Digit(2), Key::Digit(3)];
        keys.extend(entry(&[4, 5]));
        let mut machine = machine(&script, &keys);

        machine.step().unwrap();

        let sent = machine.link().uart().sent();
        assert_eq!(sent[0], 0x02);
        assert_eq!(payloads(&sent[1..]), vec![1, 2, 3, 4, 5]);
        assert_eq!(machine.display().line(0), Some("Enter Password:"));
        assert_eq!(machine.display().line(1), Some("*****"));
    }

    #[test]
    fn test_nothing_sent_before_enter() {
        let mut script = announce(AppState::ChangingPassword).to_vec();
        script.extend_from_slice(&[READY; 5]);
        // Five digits but no enter key
        let mut machine = machine(&script, &digit_keys(&[1, 2, 3, 4, 5]));

        assert_eq!(
            machine.step(),
            Err(PanelError::Keypad(KeypadError::Exhausted))
        );
        assert_eq!(machine.link().uart().sent(), &[0x02]);
        assert_eq!(machine.mode(), PanelMode::Waiting);
    }

    #[test]
    fn test_creation_interleaves_pairs() {
        let mut script = announce(AppState::CreatingPassword).to_vec();
        script.extend_from_slice(&[READY; 10]);
        let mut keys = entry(&[1, 2, 3, 4, 5]);
        keys.extend(entry(&[6, 7, 8, 9, 0]));
        let mut machine = machine(&script, &keys);

        machine.step().unwrap();

        let sent = machine.link().uart().sent();
        assert_eq!(
            payloads(&sent[1..]),
            vec![1, 6, 2, 7, 3, 8, 4, 9, 5, 0]
        );
        assert_eq!(machine.display().line(0), Some("Re-enter the"));
        assert_eq!(machine.display().line(1), Some("same pass: *****"));
    }

    #[test]
    fn test_door_replay_shows_notices() {
        let script = announce(AppState::UnlockingDoor);
        let mut machine = machine(&script, &[]);

        machine.step().unwrap();

        assert_eq!(machine.timer().ticks(), 12);
        assert!(!machine.is_frozen());
        assert_eq!(machine.display().line(0), Some("Locking Door"));
        // One clear per notice
        assert_eq!(machine.display().clears(), 3);
    }

    #[test]
    fn test_alarm_replay_shows_error() {
        let script = announce(AppState::Alarm);
        let mut machine = machine(&script, &[]);

        machine.step().unwrap();

        assert_eq!(machine.timer().ticks(), 7);
        assert_eq!(machine.display().line(0), Some("ERROR!!!!"));
        assert_eq!(machine.link().uart().sent(), &[0x02]);
    }

    #[test]
    fn test_unknown_state_reported() {
        let mut machine = machine(&[ASK, 9], &[]);
        assert_eq!(
            machine.step(),
            Err(PanelError::Link(latchkey_protocol::LinkError::UnknownState(9)))
        );
    }
}
