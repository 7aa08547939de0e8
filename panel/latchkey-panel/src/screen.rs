//! Screen buffer
//!
//! A character buffer with the geometry of a 16x2 LCD. Used as the display
//! in host tests and simulations.

/// Number of character rows
pub const SCREEN_ROWS: usize = 2;

/// Number of character columns
pub const SCREEN_COLS: usize = 16;

/// In-memory 16x2 character display
#[derive(Clone)]
pub struct Screen {
    cells: [[u8; SCREEN_COLS]; SCREEN_ROWS],
    cursor: (usize, usize),
    clears: u32,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    /// Create a blank screen
    pub fn new() -> Self {
        Self {
            cells: [[b' '; SCREEN_COLS]; SCREEN_ROWS],
            cursor: (0, 0),
            clears: 0,
        }
    }

    /// Content of a row without trailing blanks
    pub fn line(&self, row: usize) -> Option<&str> {
        let cells = self.cells.get(row)?;
        let text = core::str::from_utf8(cells).ok()?;
        Some(text.trim_end())
    }

    /// All rows without trailing blanks
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        (0..SCREEN_ROWS).filter_map(|row| self.line(row))
    }

    /// Current cursor as (row, col)
    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    /// Number of times the screen was cleared
    pub fn clears(&self) -> u32 {
        self.clears
    }
}

impl crate::backend::DisplayBackend for Screen {
    fn clear(&mut self) -> Result<(), crate::DisplayError> {
        self.cells = [[b' '; SCREEN_COLS]; SCREEN_ROWS];
        self.cursor = (0, 0);
        self.clears += 1;
        Ok(())
    }

    fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), crate::DisplayError> {
        let (row, col) = (row as usize, col as usize);
        if row >= SCREEN_ROWS || col >= SCREEN_COLS {
            return Err(crate::DisplayError::InvalidCoordinates);
        }
        self.cursor = (row, col);
        Ok(())
    }

    fn write_str(&mut self, text: &str) -> Result<(), crate::DisplayError> {
        if !text.is_ascii() {
            return Err(crate::DisplayError::InvalidCharacter);
        }
        let (row, col) = self.cursor;
        for (offset, byte) in text.bytes().enumerate() {
            // Characters past the last column are dropped, like on the LCD
            if let Some(cell) = self.cells[row].get_mut(col + offset) {
                *cell = byte;
            }
        }
        self.cursor.1 = col + text.len();
        Ok(())
    }

    fn dimensions(&self) -> (u8, u8) {
        (SCREEN_COLS as u8, SCREEN_ROWS as u8)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Screen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Screen[");
        for (i, line) in self.lines().enumerate() {
            if i > 0 {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "{}", line);
        }
        defmt::write!(f, "]");
    }
}
