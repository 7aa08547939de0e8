//! HD44780 character LCD, 4-bit bus
//!
//! Write-only wiring: RS, E and D4-D7 are outputs, R/W is tied low. Every
//! byte is sent as two nibbles, high nibble first, each latched on the
//! falling edge of E. Busy-flag polling is replaced by fixed delays.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use latchkey_panel::{DisplayBackend, DisplayError};

const CLEAR: u8 = 0x01;
const ENTRY_MODE_INCREMENT: u8 = 0x06;
const DISPLAY_ON_CURSOR_OFF: u8 = 0x0C;
const FUNCTION_SET_4BIT_2LINE: u8 = 0x28;
const SET_DDRAM_ADDRESS: u8 = 0x80;

/// DDRAM address of the first column of each row
const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

pub const COLS: u8 = 16;
pub const ROWS: u8 = 2;

/// HD44780 on a 4-bit bus
pub struct Hd44780<P, D> {
    rs: P,
    en: P,
    data: [P; 4],
    delay: D,
}

impl<P: OutputPin, D: DelayNs> Hd44780<P, D> {
    /// Create a driver and run the power-on initialisation sequence
    ///
    /// `data` holds D4-D7 in that order.
    pub fn new(rs: P, en: P, data: [P; 4], delay: D) -> Result<Self, DisplayError> {
        let mut lcd = Self { rs, en, data, delay };
        lcd.init()?;
        Ok(lcd)
    }

    /// Release the pins and delay
    pub fn release(self) -> (P, P, [P; 4], D) {
        (self.rs, self.en, self.data, self.delay)
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        self.delay.delay_ms(50);
        self.set_pin_rs(false)?;

        // Reset into 8-bit mode three times, then switch to 4-bit
        self.write_nibble(0x03)?;
        self.delay.delay_ms(5);
        self.write_nibble(0x03)?;
        self.delay.delay_ms(1);
        self.write_nibble(0x03)?;
        self.write_nibble(0x02)?;

        self.command(FUNCTION_SET_4BIT_2LINE)?;
        self.command(DISPLAY_ON_CURSOR_OFF)?;
        self.command(ENTRY_MODE_INCREMENT)?;
        self.clear()
    }

    fn command(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.set_pin_rs(false)?;
        self.write_byte(byte)
    }

    fn write_data(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.set_pin_rs(true)?;
        self.write_byte(byte)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.write_nibble(byte >> 4)?;
        self.write_nibble(byte & 0x0F)
    }

    fn write_nibble(&mut self, nibble: u8) -> Result<(), DisplayError> {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            pin.set_state(PinState::from(nibble & (1 << bit) != 0))
                .map_err(|_| DisplayError::Communication)?;
        }

        self.en.set_high().map_err(|_| DisplayError::Communication)?;
        self.delay.delay_us(1);
        self.en.set_low().map_err(|_| DisplayError::Communication)?;
        // Execution time of most instructions
        self.delay.delay_us(50);
        Ok(())
    }

    fn set_pin_rs(&mut self, high: bool) -> Result<(), DisplayError> {
        self.rs
            .set_state(PinState::from(high))
            .map_err(|_| DisplayError::Communication)
    }
}

impl<P: OutputPin, D: DelayNs> DisplayBackend for Hd44780<P, D> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.command(CLEAR)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), DisplayError> {
        if row >= ROWS || col >= COLS {
            return Err(DisplayError::InvalidCoordinates);
        }
        self.command(SET_DDRAM_ADDRESS | (ROW_OFFSETS[row as usize] + col))
    }

    fn write_str(&mut self, text: &str) -> Result<(), DisplayError> {
        if !text.is_ascii() {
            return Err(DisplayError::InvalidCharacter);
        }
        for byte in text.bytes() {
            self.write_data(byte)?;
        }
        Ok(())
    }

    fn dimensions(&self) -> (u8, u8) {
        (COLS, ROWS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use heapless::Vec;

    const RS: usize = 4;
    const EN: usize = 5;

    /// Bus recorder: pin levels plus every nibble latched by E
    #[derive(Default)]
    struct Bus {
        levels: [bool; 6],
        latched: Vec<(bool, u8), 512>,
    }

    impl Bus {
        /// Reassemble latched nibble pairs into (is_data, byte)
        fn bytes(&self, skip: usize) -> Vec<(bool, u8), 256> {
            self.latched[skip..]
                .chunks(2)
                .filter(|pair| pair.len() == 2)
                .map(|pair| (pair[0].0, pair[0].1 << 4 | pair[1].1))
                .collect()
        }
    }

    struct BusPin<'a> {
        line: usize,
        bus: &'a RefCell<Bus>,
    }

    impl ErrorType for BusPin<'_> {
        type Error = Infallible;
    }

    impl OutputPin for BusPin<'_> {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            let mut bus = self.bus.borrow_mut();
            if self.line == EN && bus.levels[EN] {
                let nibble = (0..4).fold(0u8, |acc, bit| acc | (u8::from(bus.levels[bit]) << bit));
                let rs = bus.levels[RS];
                let _ = bus.latched.push((rs, nibble));
            }
            bus.levels[self.line] = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.bus.borrow_mut().levels[self.line] = true;
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn lcd(bus: &RefCell<Bus>) -> Hd44780<BusPin<'_>, NoDelay> {
        let pin = |line| BusPin { line, bus };
        Hd44780::new(pin(RS), pin(EN), [pin(0), pin(1), pin(2), pin(3)], NoDelay).unwrap()
    }

    #[test]
    fn test_init_sequence() {
        let bus = RefCell::new(Bus::default());
        let _lcd = lcd(&bus);

        let bus = bus.borrow();
        let resets: Vec<u8, 4> = bus.latched[..4].iter().map(|&(_, n)| n).collect();
        assert_eq!(&resets[..], &[0x03, 0x03, 0x03, 0x02]);
        assert_eq!(
            &bus.bytes(4)[..],
            &[
                (false, FUNCTION_SET_4BIT_2LINE),
                (false, DISPLAY_ON_CURSOR_OFF),
                (false, ENTRY_MODE_INCREMENT),
                (false, CLEAR),
            ]
        );
    }

    #[test]
    fn test_draw_text_on_second_row() {
        let bus = RefCell::new(Bus::default());
        let mut lcd = lcd(&bus);
        let skip = bus.borrow().latched.len();

        lcd.draw_text(1, 2, "Hi").unwrap();

        assert_eq!(
            &bus.borrow().bytes(skip)[..],
            &[(false, 0x80 | 0x42), (true, b'H'), (true, b'i')]
        );
    }

    #[test]
    fn test_rejects_bad_input() {
        let bus = RefCell::new(Bus::default());
        let mut lcd = lcd(&bus);
        assert_eq!(lcd.set_cursor(0, 16), Err(DisplayError::InvalidCoordinates));
        assert_eq!(lcd.write_str("°"), Err(DisplayError::InvalidCharacter));
        assert_eq!(lcd.dimensions(), (16, 2));
    }
}
