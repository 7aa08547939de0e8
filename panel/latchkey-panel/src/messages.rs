//! Panel texts
//!
//! Every text fits one 16-column row.

use latchkey_core::sequencer::Notice;

/// Main menu, first row
pub const MENU_OPEN: &str = "+:Open Door";

/// Main menu, second row
pub const MENU_CHANGE: &str = "-:Change Pass";

/// Character echoed for each typed digit
pub const MASK: &str = "*";

/// A password entry screen
///
/// Masked digits are echoed on the second row after `label`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prompt {
    pub title: &'static str,
    pub label: &'static str,
}

/// First entry of a password
pub const ENTER_PASSWORD: Prompt = Prompt {
    title: "Enter Password:",
    label: "",
};

/// Confirmation entry while creating a password
pub const REENTER_PASSWORD: Prompt = Prompt {
    title: "Re-enter the",
    label: "same pass: ",
};

/// Text shown for a sequence notice
pub fn notice_text(notice: Notice) -> &'static str {
    match notice {
        Notice::Unlocking => "Unlocking Door",
        Notice::DoorOpen => "Door is open",
        Notice::Locking => "Locking Door",
        Notice::Error => "ERROR!!!!",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SCREEN_COLS;
    use latchkey_core::password::PASSWORD_LEN;

    #[test]
    fn test_texts_fit_a_row() {
        for text in [MENU_OPEN, MENU_CHANGE, ENTER_PASSWORD.title, REENTER_PASSWORD.title] {
            assert!(text.len() <= SCREEN_COLS);
        }
        for notice in [Notice::Unlocking, Notice::DoorOpen, Notice::Locking, Notice::Error] {
            assert!(notice_text(notice).len() <= SCREEN_COLS);
        }
    }

    #[test]
    fn test_masked_digits_fit_after_label() {
        for prompt in [ENTER_PASSWORD, REENTER_PASSWORD] {
            assert!(prompt.label.len() + PASSWORD_LEN <= SCREEN_COLS);
        }
    }
}
