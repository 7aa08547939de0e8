//! 24Cxx I2C EEPROM
//!
//! Small serial EEPROMs (24C02 to 24C16) take one word-address byte. The
//! upper address bits of the larger parts travel in the low three bits of
//! the device address, so a 24C16 answers on 0x50-0x57.
//!
//! Every access is followed by a fixed settling delay; the device ignores
//! the bus while its internal write cycle runs.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use latchkey_hal::{ByteStorage, StorageError};

/// Base 7-bit device address
pub const BASE_ADDRESS: u8 = 0x50;

/// Capacity of a 24C16 (11-bit address space)
pub const AT24C16_CAPACITY: u16 = 2048;

/// Settling delay after each access
pub const DEFAULT_SETTLE_MS: u32 = 15;

/// 24Cxx EEPROM on an I2C bus
pub struct At24<I2C, D> {
    i2c: I2C,
    delay: D,
    capacity: u16,
    settle_ms: u32,
}

impl<I2C: I2c, D: DelayNs> At24<I2C, D> {
    /// Create a driver for a 24C16
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self {
            i2c,
            delay,
            capacity: AT24C16_CAPACITY,
            settle_ms: DEFAULT_SETTLE_MS,
        }
    }

    /// Override the settling delay
    pub fn with_settle_ms(mut self, settle_ms: u32) -> Self {
        self.settle_ms = settle_ms;
        self
    }

    /// Override the capacity for a smaller part
    ///
    /// Capped at the 24C16 size.
    pub fn with_capacity(mut self, capacity: u16) -> Self {
        self.capacity = capacity.min(AT24C16_CAPACITY);
        self
    }

    /// Release the bus and delay
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn locate(&self, address: u16) -> Result<(u8, u8), StorageError> {
        if address >= self.capacity {
            return Err(StorageError::OutOfRange);
        }
        let device = BASE_ADDRESS | ((address >> 8) as u8 & 0x07);
        Ok((device, address as u8))
    }
}

impl<I2C: I2c, D: DelayNs> ByteStorage for At24<I2C, D> {
    fn capacity(&self) -> u16 {
        self.capacity
    }

    fn read_byte(&mut self, address: u16) -> Result<u8, StorageError> {
        let (device, word) = self.locate(address)?;
        let mut buf = [0u8; 1];
        let result = self.i2c.write_read(device, &[word], &mut buf);
        self.delay.delay_ms(self.settle_ms);
        result.map_err(|_| StorageError::Bus)?;
        Ok(buf[0])
    }

    fn write_byte(&mut self, address: u16, value: u8) -> Result<(), StorageError> {
        let (device, word) = self.locate(address)?;
        let result = self.i2c.write(device, &[word, value]);
        self.delay.delay_ms(self.settle_ms);
        result.map_err(|_| StorageError::Bus)
    }
}
