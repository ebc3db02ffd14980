//! Error taxonomy for the credential core. Callers get one enum for every
//! failure the hasher can surface; nothing is retried internally.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashError {
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("secure random source unavailable: {0}")]
    EntropySourceUnavailable(String),
    #[error("salt length must be at least one byte")]
    InvalidSaltLength,
    #[error("password is {len} bytes; bcrypt accepts at most {max}")]
    PasswordTooLong { len: usize, max: usize },
    #[error("bcrypt failed: {0}")]
    Bcrypt(String),
    #[error("background worker failed: {0}")]
    Worker(String),
}
