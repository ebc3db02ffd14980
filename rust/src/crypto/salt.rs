//! Salt generation backed by the operating system CSPRNG. There is no
//! fallback generator: if the OS source fails, the caller gets an error.

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

use crate::error::HashError;

/// Number of random bytes drawn when no explicit length is configured.
pub const DEFAULT_SALT_LEN: usize = 32;

/// Draws `length` bytes from the OS random source and returns them as
/// lowercase hex, so the result is always `2 * length` characters long.
pub fn generate_salt(length: usize) -> Result<String, HashError> {
    salt_from(&mut OsRng, length)
}

pub(crate) fn salt_from<R: RngCore>(rng: &mut R, length: usize) -> Result<String, HashError> {
    if length == 0 {
        return Err(HashError::InvalidSaltLength);
    }

    let mut bytes = vec![0u8; length];
    rng.try_fill_bytes(&mut bytes)
        .map_err(|e| HashError::EntropySourceUnavailable(format!("{e}")))?;
    let encoded = hex::encode(&bytes);
    bytes.zeroize();
    Ok(encoded)
}

/// [`generate_salt`] with [`DEFAULT_SALT_LEN`].
pub fn generate_default_salt() -> Result<String, HashError> {
    generate_salt(DEFAULT_SALT_LEN)
}
