//! Reserved handshake bytes

/// Control bytes of the request/ready handshake
///
/// Values must match on both controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Token {
    /// Control wants to announce its state
    AskFromControl = 0x01,
    /// Panel is ready to receive the announced state
    ReadyFromInterface = 0x02,
    /// Panel wants to send one payload byte
    AskFromInterface = 0x03,
    /// Control is ready to receive the payload byte
    ReadyFromControl = 0x04,
}

impl Token {
    /// Get the token as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_values_are_fixed() {
        assert_eq!(Token::AskFromControl.as_u8(), 0x01);
        assert_eq!(Token::ReadyFromInterface.as_u8(), 0x02);
        assert_eq!(Token::AskFromInterface.as_u8(), 0x03);
        assert_eq!(Token::ReadyFromControl.as_u8(), 0x04);
    }
}
