//! Byte-addressed persistent storage
//!
//! The lock keeps its secret in a small external EEPROM. Every access is a
//! single byte at an absolute address; implementations are responsible for
//! any write-cycle settling time the device needs before the next access.

/// Errors from persistent storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Bus transaction with the device failed
    Bus,
    /// Address lies outside the device
    OutOfRange,
}

/// Byte storage trait
///
/// Implementations should return only after the device has completed the
/// access, so that back-to-back calls never overlap a write cycle.
pub trait ByteStorage {
    /// Number of addressable bytes
    fn capacity(&self) -> u16;

    /// Read one byte at `address`
    fn read_byte(&mut self, address: u16) -> Result<u8, StorageError>;

    /// Write one byte at `address`
    fn write_byte(&mut self, address: u16, value: u8) -> Result<(), StorageError>;

    /// Check that `len` bytes starting at `address` fit in the device
    fn contains(&self, address: u16, len: u16) -> bool {
        address
            .checked_add(len)
            .is_some_and(|end| end <= self.capacity())
    }
}

impl<T: ByteStorage + ?Sized> ByteStorage for &mut T {
    fn capacity(&self) -> u16 {
        (**self).capacity()
    }

    fn read_byte(&mut self, address: u16) -> Result<u8, StorageError> {
        (**self).read_byte(address)
    }

    fn write_byte(&mut self, address: u16, value: u8) -> Result<(), StorageError> {
        (**self).write_byte(address, value)
    }
}
