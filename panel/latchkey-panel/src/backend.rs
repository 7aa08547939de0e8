//! Display backend trait
//!
//! Defines the interface for character displays.

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Invalid coordinates
    InvalidCoordinates,
    /// Character the display cannot show
    InvalidCharacter,
}

/// Display backend trait
///
/// A cursor-addressed character display. Text is written at the cursor,
/// which advances one column per character.
pub trait DisplayBackend {
    /// Clear the display and home the cursor
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Move the cursor
    ///
    /// - `row`: Row number (0-based)
    /// - `col`: Column number in characters (0-based)
    fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), DisplayError>;

    /// Write ASCII text at the cursor
    fn write_str(&mut self, text: &str) -> Result<(), DisplayError>;

    /// Get the display dimensions
    ///
    /// Returns (columns, rows) in character units
    fn dimensions(&self) -> (u8, u8);

    /// Draw text at the specified row and column
    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        self.set_cursor(row, col)?;
        self.write_str(text)
    }

    /// Clear the display and show up to two lines
    ///
    /// The cursor is left after the second line.
    fn show_lines(&mut self, first: &str, second: &str) -> Result<(), DisplayError> {
        self.clear()?;
        self.draw_text(0, 0, first)?;
        self.draw_text(1, 0, second)
    }
}

impl<T: DisplayBackend + ?Sized> DisplayBackend for &mut T {
    fn clear(&mut self) -> Result<(), DisplayError> {
        (**self).clear()
    }

    fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), DisplayError> {
        (**self).set_cursor(row, col)
    }

    fn write_str(&mut self, text: &str) -> Result<(), DisplayError> {
        (**self).write_str(text)
    }

    fn dimensions(&self) -> (u8, u8) {
        (**self).dimensions()
    }
}
