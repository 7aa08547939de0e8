//! Secret store adapter
//!
//! Maps the secret onto consecutive storage bytes from a fixed base
//! address, entry order, no header.

use latchkey_hal::{ByteStorage, StorageError};

use super::secret::{Secret, PASSWORD_LEN};

/// Secret persisted in byte storage
#[derive(Debug)]
pub struct SecretStore<S> {
    storage: S,
    base: u16,
}

impl<S: ByteStorage> SecretStore<S> {
    /// Create a store for a secret starting at `base`
    pub fn new(storage: S, base: u16) -> Self {
        Self { storage, base }
    }

    /// Persist all digits, one byte per address
    pub fn save(&mut self, secret: &Secret) -> Result<(), StorageError> {
        self.check_range()?;
        for (offset, &digit) in (0u16..).zip(secret.digits()) {
            self.storage.write_byte(self.base + offset, digit)?;
        }
        Ok(())
    }

    /// Read the digit at `index` (0-based)
    pub fn load_digit(&mut self, index: usize) -> Result<u8, StorageError> {
        if index >= PASSWORD_LEN {
            return Err(StorageError::OutOfRange);
        }
        self.check_range()?;
        self.storage.read_byte(self.base + index as u16)
    }

    /// Read the whole secret
    pub fn load(&mut self) -> Result<Secret, StorageError> {
        let mut digits = [0u8; PASSWORD_LEN];
        for (index, digit) in digits.iter_mut().enumerate() {
            *digit = self.load_digit(index)?;
        }
        Ok(Secret::new(digits))
    }

    /// Access the underlying storage
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Access the underlying storage mutably
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Release the underlying storage
    pub fn into_inner(self) -> S {
        self.storage
    }

    fn check_range(&self) -> Result<(), StorageError> {
        if self.storage.contains(self.base, PASSWORD_LEN as u16) {
            Ok(())
        } else {
            Err(StorageError::OutOfRange)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latchkey_hal::mock::MemoryStorage;

    #[test]
    fn test_save_writes_consecutive_bytes() {
        let mut store = SecretStore::new(MemoryStorage::<16>::new(), 0x0001);
        store.save(&Secret::new([1, 2, 3, 4, 5])).unwrap();

        let storage = store.storage();
        assert_eq!(storage.slice(0x0001, 5), &[1, 2, 3, 4, 5]);
        assert_eq!(storage.bytes()[0], 0xFF);
        assert_eq!(storage.bytes()[6], 0xFF);
        assert_eq!(storage.writes(), 5);
    }

    #[test]
    fn test_load_reads_back() {
        let mut store = SecretStore::new(MemoryStorage::<16>::new(), 4);
        store.save(&Secret::new([9, 8, 7, 6, 5])).unwrap();
        assert_eq!(store.load().unwrap(), Secret::new([9, 8, 7, 6, 5]));
        assert_eq!(store.load_digit(2), Ok(7));
    }

    #[test]
    fn test_secret_must_fit() {
        let mut store = SecretStore::new(MemoryStorage::<8>::new(), 4);
        assert_eq!(
            store.save(&Secret::new([0; PASSWORD_LEN])),
            Err(StorageError::OutOfRange)
        );
        assert_eq!(store.storage().writes(), 0);
        assert_eq!(store.load_digit(5), Err(StorageError::OutOfRange));
    }
}
