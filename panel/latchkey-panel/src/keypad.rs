//! Keypad trait and key values

use latchkey_protocol::ENTER_KEY;

/// Keypad errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeypadError {
    /// A row or column pin could not be driven or read
    Pin,
    /// No further keys will arrive
    Exhausted,
}

/// A key on the 4x4 panel keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    /// Digit 0-9
    Digit(u8),
    /// `%`
    Percent,
    /// `*`
    Multiply,
    /// `-`
    Minus,
    /// `+`
    Plus,
    /// `=`, confirms an entry
    Enter,
    /// `ON`
    On,
}

impl Key {
    /// Byte sent over the link for this key
    ///
    /// Digits travel as raw values, everything else as ASCII.
    pub fn as_byte(self) -> u8 {
        match self {
            Key::Digit(d) => d,
            Key::Percent => b'%',
            Key::Multiply => b'*',
            Key::Minus => b'-',
            Key::Plus => b'+',
            Key::Enter => ENTER_KEY,
            Key::On => b'\r',
        }
    }

    /// Digit value, if this is a digit key
    pub fn digit(self) -> Option<u8> {
        match self {
            Key::Digit(d) if d <= 9 => Some(d),
            _ => None,
        }
    }
}

/// Blocking keypad
pub trait Keypad {
    /// Block until a key is pressed and return it
    fn read_key(&mut self) -> Result<Key, KeypadError>;
}

impl<T: Keypad + ?Sized> Keypad for &mut T {
    fn read_key(&mut self) -> Result<Key, KeypadError> {
        (**self).read_key()
    }
}
