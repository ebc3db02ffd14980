//! Salted, algorithm-tagged password hashing and verification.
//!
//! Callers hand a plaintext password and an [`Algorithm`] to
//! [`CredentialHasher::hash`], persist the returned [`CredentialRecord`]
//! however they like, and later pass it back to [`CredentialHasher::verify`].
//!
//! ```
//! use credhash::{Algorithm, CredentialHasher};
//!
//! let hasher = CredentialHasher::default();
//! let record = hasher.hash("hunter22", Algorithm::Sha256).unwrap();
//! assert!(hasher.verify("hunter22", &record).unwrap());
//! assert!(!hasher.verify("hunter23", &record).unwrap());
//! ```

pub mod config;
pub mod crypto;
pub mod error;

pub use config::{load_config, ConfigError, HasherConfig};
pub use crypto::algorithm::{algorithm_table, Algorithm, AlgorithmInfo, SecurityTier};
pub use crypto::digest::Md5Mode;
pub use crypto::hasher::{hash_password, verify_password, CredentialHasher};
pub use crypto::record::CredentialRecord;
pub use crypto::salt::{generate_default_salt, generate_salt, DEFAULT_SALT_LEN};
pub use error::HashError;
