//! Secret value type

use core::fmt;

/// Number of digits in a password
pub const PASSWORD_LEN: usize = 5;

/// A password as stored: one raw digit value (0-9) per byte
///
/// `Debug` output never shows the digits.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Secret([u8; PASSWORD_LEN]);

impl Secret {
    /// Wrap raw digit bytes
    pub const fn new(digits: [u8; PASSWORD_LEN]) -> Self {
        Self(digits)
    }

    /// Raw digit bytes in entry order
    pub fn digits(&self) -> &[u8; PASSWORD_LEN] {
        &self.0
    }
}

impl From<[u8; PASSWORD_LEN]> for Secret {
    fn from(digits: [u8; PASSWORD_LEN]) -> Self {
        Self(digits)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(*****)")
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Secret {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Secret(*****)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_masked() {
        let secret = Secret::new([1, 2, 3, 4, 5]);
        let shown = format!("{:?}", secret);
        assert_eq!(shown, "Secret(*****)");
        assert!(!shown.contains('1'));
    }
}
