//! Transition table
//!
//! The next state is a function of the current state and an event only.

use latchkey_protocol::{AppState, MenuKey};

use super::events::Event;

/// Process an event and return the next state
///
/// Pairs not listed keep the current state.
pub fn transition(state: AppState, event: Event) -> AppState {
    use AppState::*;
    use Event::*;

    match (state, event) {
        // Creation
        (CreatingPassword, PasswordCreated) => MainMenu,

        // Menu
        (MainMenu, MenuSelected(MenuKey::OpenDoor)) => OpeningDoor,
        (MainMenu, MenuSelected(MenuKey::ChangePassword)) => ChangingPassword,

        // Verification
        (OpeningDoor, Verified) => UnlockingDoor,
        (ChangingPassword, Verified) => CreatingPassword,
        (OpeningDoor | ChangingPassword, LockedOut) => Alarm,

        // Sequences
        (UnlockingDoor | Alarm, SequenceComplete) => MainMenu,

        // Default: stay in current state
        _ => state,
    }
}
