//! Events that trigger state transitions

use latchkey_protocol::MenuKey;

/// Events produced by one control loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Creation events
    /// Entry and confirmation matched and were saved
    PasswordCreated,
    /// Entry and confirmation differed
    PasswordMismatch,

    // Menu events
    /// A menu key was received
    MenuSelected(MenuKey),
    /// A byte that is not a menu key was received
    MenuIgnored(u8),

    // Verification events
    /// Entered password matched the stored one
    Verified,
    /// Entered password did not match; below the lockout limit
    VerificationFailed { failures: u8 },
    /// Entered password did not match and the lockout limit was reached
    LockedOut,

    // Sequence events
    /// Door or alarm sequence ran to its final tick
    SequenceComplete,
}

impl Event {
    /// Check if this event reports a wrong password
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::PasswordMismatch | Event::VerificationFailed { .. } | Event::LockedOut
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_events() {
        assert!(Event::LockedOut.is_failure());
        assert!(Event::VerificationFailed { failures: 1 }.is_failure());
        assert!(Event::PasswordMismatch.is_failure());
        assert!(!Event::Verified.is_failure());
        assert!(!Event::MenuIgnored(b'*').is_failure());
    }
}
