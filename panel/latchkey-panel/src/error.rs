//! Panel error types

use latchkey_protocol::LinkError;

use crate::backend::DisplayError;
use crate::keypad::KeypadError;

/// Errors that abort one panel round
///
/// The panel keeps no state between rounds, so the next announcement
/// starts afresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError {
    /// Serial link failed
    Link(LinkError),
    /// Display failed
    Display(DisplayError),
    /// Keypad failed
    Keypad(KeypadError),
}

impl From<LinkError> for PanelError {
    fn from(err: LinkError) -> Self {
        PanelError::Link(err)
    }
}

impl From<DisplayError> for PanelError {
    fn from(err: DisplayError) -> Self {
        PanelError::Display(err)
    }
}

impl From<KeypadError> for PanelError {
    fn from(err: KeypadError) -> Self {
        PanelError::Keypad(err)
    }
}
