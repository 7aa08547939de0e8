//! Application state codes and panel key bytes
//!
//! The control side owns the canonical [`AppState`]; the panel learns it
//! from the announce round and keeps it only for the rest of that round.

/// Enter/confirm key byte
pub const ENTER_KEY: u8 = b'=';

/// Application states, transmitted as their discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AppState {
    /// Collecting a new password and its confirmation
    CreatingPassword = 0,
    /// Waiting for the user to pick open door or change password
    MainMenu = 1,
    /// Verifying the password before unlocking
    OpeningDoor = 2,
    /// Verifying the password before replacing it
    ChangingPassword = 3,
    /// Running the bolt open/hold/close sequence
    UnlockingDoor = 4,
    /// Lockout: buzzer sounding after too many failed attempts
    Alarm = 5,
}

impl AppState {
    /// All states in wire order
    pub const ALL: [AppState; 6] = [
        AppState::CreatingPassword,
        AppState::MainMenu,
        AppState::OpeningDoor,
        AppState::ChangingPassword,
        AppState::UnlockingDoor,
        AppState::Alarm,
    ];

    /// Get the wire code
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode a wire code
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }
}

/// Main menu selections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MenuKey {
    /// `'+'`: open the door
    OpenDoor = b'+',
    /// `'-'`: change the password
    ChangePassword = b'-',
}

impl MenuKey {
    /// Get the key byte
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode a key byte; any other key is not a menu selection
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            b'+' => Some(MenuKey::OpenDoor),
            b'-' => Some(MenuKey::ChangePassword),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_state_codes_follow_declaration_order() {
        assert_eq!(AppState::CreatingPassword.as_u8(), 0);
        assert_eq!(AppState::MainMenu.as_u8(), 1);
        assert_eq!(AppState::OpeningDoor.as_u8(), 2);
        assert_eq!(AppState::ChangingPassword.as_u8(), 3);
        assert_eq!(AppState::UnlockingDoor.as_u8(), 4);
        assert_eq!(AppState::Alarm.as_u8(), 5);
    }

    #[test]
    fn test_menu_keys() {
        assert_eq!(MenuKey::from_u8(b'+'), Some(MenuKey::OpenDoor));
        assert_eq!(MenuKey::from_u8(b'-'), Some(MenuKey::ChangePassword));
        assert_eq!(MenuKey::from_u8(ENTER_KEY), None);
        assert_eq!(MenuKey::from_u8(7), None);
    }

    proptest! {
        #[test]
        fn test_only_six_codes_decode(code in any::<u8>()) {
            match AppState::from_u8(code) {
                Some(state) => prop_assert_eq!(state.as_u8(), code),
                None => prop_assert!(code > 5),
            }
        }
    }
}
