//! Password creation and verification rounds
//!
//! Both rounds pull digits from a caller-supplied source, normally the
//! control link's payload receive. Every expected byte is always consumed so
//! the panel and control stay in lockstep whatever the outcome.

use latchkey_hal::{ByteStorage, StorageError};

use super::secret::{Secret, PASSWORD_LEN};
use super::store::SecretStore;

/// Outcome of a creation round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Creation {
    /// Entry and confirmation matched; the secret was persisted
    Saved(Secret),
    /// Entry and confirmation differed; nothing was written
    Mismatch,
}

/// Run a creation round
///
/// Receives five interleaved (digit, confirmation) pairs. Only when every
/// pair matches are the digits written to storage.
pub fn create<S, E, F>(mut next: F, store: &mut SecretStore<S>) -> Result<Creation, E>
where
    S: ByteStorage,
    E: From<StorageError>,
    F: FnMut() -> Result<u8, E>,
{
    let mut digits = [0u8; PASSWORD_LEN];
    let mut matched = true;

    for digit in digits.iter_mut() {
        *digit = next()?;
        let confirmation = next()?;
        matched &= *digit == confirmation;
    }

    if !matched {
        return Ok(Creation::Mismatch);
    }

    let secret = Secret::new(digits);
    store.save(&secret)?;
    Ok(Creation::Saved(secret))
}

/// Run a verification round
///
/// Receives five digits and compares each against the stored digit at the
/// same position. All five receives and reads happen even after a mismatch.
pub fn verify<S, E, F>(mut next: F, store: &mut SecretStore<S>) -> Result<bool, E>
where
    S: ByteStorage,
    E: From<StorageError>,
    F: FnMut() -> Result<u8, E>,
{
    let mut matched = true;
    for index in 0..PASSWORD_LEN {
        let entered = next()?;
        let stored = store.load_digit(index)?;
        matched &= entered == stored;
    }
    Ok(matched)
}
