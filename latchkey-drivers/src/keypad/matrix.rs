//! 4x4 matrix keypad
//!
//! Rows are outputs held high; columns are inputs with pull-ups. A scan
//! drives one row low at a time and reports the first column reading low.
//! After an accepted key the driver waits out a hold-off period so a single
//! press is not read twice.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use latchkey_panel::{Key, Keypad, KeypadError};

/// Default hold-off after an accepted key
pub const DEFAULT_HOLD_OFF_MS: u32 = 500;

/// Pause between idle scans
const SCAN_INTERVAL_MS: u32 = 1;

/// Row settle time after driving a row low
const ROW_SETTLE_US: u32 = 5;

/// Key at each (row, column)
pub const LAYOUT: [[Key; 4]; 4] = [
    [Key::Digit(7), Key::Digit(8), Key::Digit(9), Key::Percent],
    [Key::Digit(4), Key::Digit(5), Key::Digit(6), Key::Multiply],
    [Key::Digit(1), Key::Digit(2), Key::Digit(3), Key::Minus],
    [Key::On, Key::Digit(0), Key::Enter, Key::Plus],
];

/// 4x4 matrix keypad
pub struct MatrixKeypad<R, C, D> {
    rows: [R; 4],
    cols: [C; 4],
    delay: D,
    hold_off_ms: u32,
}

impl<R, C, D> MatrixKeypad<R, C, D>
where
    R: OutputPin,
    C: InputPin,
    D: DelayNs,
{
    /// Create a keypad and release every row
    pub fn new(rows: [R; 4], cols: [C; 4], delay: D) -> Result<Self, KeypadError> {
        let mut keypad = Self {
            rows,
            cols,
            delay,
            hold_off_ms: DEFAULT_HOLD_OFF_MS,
        };
        for row in keypad.rows.iter_mut() {
            row.set_high().map_err(|_| KeypadError::Pin)?;
        }
        Ok(keypad)
    }

    /// Override the hold-off period
    pub fn with_hold_off_ms(mut self, hold_off_ms: u32) -> Self {
        self.hold_off_ms = hold_off_ms;
        self
    }

    /// Scan the matrix once
    pub fn scan(&mut self) -> Result<Option<Key>, KeypadError> {
        for (r, row) in self.rows.iter_mut().enumerate() {
            row.set_low().map_err(|_| KeypadError::Pin)?;
            self.delay.delay_us(ROW_SETTLE_US);

            let mut found = None;
            for (c, col) in self.cols.iter_mut().enumerate() {
                if col.is_low().map_err(|_| KeypadError::Pin)? {
                    found = Some(LAYOUT[r][c]);
                    break;
                }
            }

            row.set_high().map_err(|_| KeypadError::Pin)?;
            if found.is_some() {
                return Ok(found);
            }
        }
        Ok(None)
    }
}

impl<R, C, D> Keypad for MatrixKeypad<R, C, D>
where
    R: OutputPin,
    C: InputPin,
    D: DelayNs,
{
    fn read_key(&mut self) -> Result<Key, KeypadError> {
        loop {
            if let Some(key) = self.scan()? {
                self.delay.delay_ms(self.hold_off_ms);
                return Ok(key);
            }
            self.delay.delay_ms(SCAN_INTERVAL_MS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    /// Wiring shared by the mock pins
    #[derive(Default)]
    struct Matrix {
        driven_row: Cell<Option<usize>>,
        pressed: Cell<Option<(usize, usize)>>,
        scans: Cell<u32>,
    }

    struct RowPin<'a> {
        index: usize,
        matrix: &'a Matrix,
    }

    struct ColPin<'a> {
        index: usize,
        matrix: &'a Matrix,
    }

    impl ErrorType for RowPin<'_> {
        type Error = Infallible;
    }

    impl ErrorType for ColPin<'_> {
        type Error = Infallible;
    }

    impl OutputPin for RowPin<'_> {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.matrix.driven_row.set(Some(self.index));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            if self.matrix.driven_row.get() == Some(self.index) {
                self.matrix.driven_row.set(None);
            }
            Ok(())
        }
    }

    impl InputPin for ColPin<'_> {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.is_low()?)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            let low = match (self.matrix.driven_row.get(), self.matrix.pressed.get()) {
                (Some(row), Some((pressed_row, pressed_col))) => {
                    row == pressed_row && self.index == pressed_col
                }
                _ => false,
            };
            Ok(low)
        }
    }

    /// Delay that presses a key after a number of idle scans
    struct PressLater<'a> {
        matrix: &'a Matrix,
        press_after: u32,
        key: (usize, usize),
        total_ms: u64,
    }

    impl DelayNs for PressLater<'_> {
        fn delay_ns(&mut self, _ns: u32) {}

        fn delay_ms(&mut self, ms: u32) {
            self.total_ms += u64::from(ms);
            let scans = self.matrix.scans.get() + 1;
            self.matrix.scans.set(scans);
            if scans >= self.press_after {
                self.matrix.pressed.set(Some(self.key));
            }
        }
    }

    type TestKeypad<'a> = MatrixKeypad<RowPin<'a>, ColPin<'a>, PressLater<'a>>;

    fn keypad<'a>(matrix: &'a Matrix, delay: PressLater<'a>) -> TestKeypad<'a> {
        let rows = core::array::from_fn(|index| RowPin { index, matrix });
        let cols = core::array::from_fn(|index| ColPin { index, matrix });
        MatrixKeypad::new(rows, cols, delay).unwrap()
    }

    #[test]
    fn test_scan_reports_layout_key() {
        let matrix = Matrix::default();
        let delay = PressLater {
            matrix: &matrix,
            press_after: u32::MAX,
            key: (0, 0),
            total_ms: 0,
        };
        let mut keypad = keypad(&matrix, delay);

        assert_eq!(keypad.scan(), Ok(None));

        matrix.pressed.set(Some((3, 2)));
        assert_eq!(keypad.scan(), Ok(Some(Key::Enter)));
        matrix.pressed.set(Some((2, 3)));
        assert_eq!(keypad.scan(), Ok(Some(Key::Minus)));
        matrix.pressed.set(Some((1, 1)));
        assert_eq!(keypad.scan(), Ok(Some(Key::Digit(5))));

        // Every row released after the scan
        assert_eq!(matrix.driven_row.get(), None);
    }

    #[test]
    fn test_read_key_blocks_until_press_then_holds_off() {
        let matrix = Matrix::default();
        let delay = PressLater {
            matrix: &matrix,
            press_after: 3,
            key: (3, 3),
            total_ms: 0,
        };
        let mut keypad = keypad(&matrix, delay).with_hold_off_ms(500);

        assert_eq!(keypad.read_key(), Ok(Key::Plus));
        // Three idle scan pauses, then the hold-off
        assert_eq!(keypad.delay.total_ms, 3 + 500);
    }

    #[test]
    fn test_layout_digits() {
        let digits: u32 = LAYOUT
            .iter()
            .flatten()
            .filter_map(|key| key.digit())
            .map(u32::from)
            .sum();
        assert_eq!(digits, 45);
    }
}
