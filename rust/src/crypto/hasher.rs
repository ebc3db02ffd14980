//! Credential hashing and verification.
//!
//! Digest algorithms hash `password ++ salt` with a fresh hex salt per call and
//! store both. bcrypt embeds its own salt and cost in the encoded hash, so its
//! records carry an empty salt and verification is delegated to bcrypt itself.

use std::sync::Once;

use subtle::ConstantTimeEq;
use tracing::{debug, warn};
use zeroize::{Zeroize, Zeroizing};

use crate::config::HasherConfig;
use crate::crypto::algorithm::{Algorithm, Scheme};
use crate::crypto::digest::{digest_hex, DigestKind, Md5Mode};
use crate::crypto::record::CredentialRecord;
use crate::crypto::salt::generate_salt;
use crate::error::HashError;

static MD5_COMPAT_WARNING: Once = Once::new();

/// bcrypt reads at most 72 bytes including the trailing NUL it appends.
/// Anything longer would be silently truncated, so it is refused instead.
pub const BCRYPT_MAX_PASSWORD_BYTES: usize = 71;

/// Stateless hasher. Cloning is cheap and every call is independent, so one
/// instance can be shared freely across threads and tasks.
#[derive(Debug, Clone, Default)]
pub struct CredentialHasher {
    config: HasherConfig,
}

impl CredentialHasher {
    pub fn new(config: HasherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HasherConfig {
        &self.config
    }

    /// Produces a storable record for `password`. The password is taken as-is;
    /// length and composition policy belong to the caller.
    pub fn hash(&self, password: &str, algorithm: Algorithm) -> Result<CredentialRecord, HashError> {
        debug!(algorithm = %algorithm, "hashing credential");
        match self.scheme_for(algorithm) {
            Scheme::SelfSalting => {
                if password.len() > BCRYPT_MAX_PASSWORD_BYTES {
                    return Err(HashError::PasswordTooLong {
                        len: password.len(),
                        max: BCRYPT_MAX_PASSWORD_BYTES,
                    });
                }
                let encoded = bcrypt::non_truncating_hash(password, self.config.bcrypt_cost)
                    .map_err(|e| HashError::Bcrypt(format!("{e}")))?;
                Ok(CredentialRecord::new(encoded, String::new(), algorithm))
            }
            Scheme::Digest(kind) => {
                let salt = generate_salt(self.config.salt_length)?;
                let hash = salted_digest(kind, password, &salt);
                Ok(CredentialRecord::new(hash, salt, algorithm))
            }
        }
    }

    /// Checks `password` against a stored record. Only an unknown algorithm
    /// tag is an error; a malformed stored hash, or a password too long for
    /// bcrypt, simply does not match.
    pub fn verify(&self, password: &str, record: &CredentialRecord) -> Result<bool, HashError> {
        let algorithm = record.algorithm()?;
        debug!(algorithm = %algorithm, "verifying credential");
        match self.scheme_for(algorithm) {
            Scheme::SelfSalting => {
                if password.len() > BCRYPT_MAX_PASSWORD_BYTES {
                    debug!(len = password.len(), "password exceeds bcrypt input limit");
                    return Ok(false);
                }
                match bcrypt::non_truncating_verify(password, &record.hash) {
                    Ok(matched) => Ok(matched),
                    Err(e) => {
                        debug!(error = %e, "stored bcrypt hash could not be checked");
                        Ok(false)
                    }
                }
            }
            Scheme::Digest(kind) => {
                let candidate = Zeroizing::new(salted_digest(kind, password, &record.salt));
                Ok(constant_time_eq(&candidate, &record.hash))
            }
        }
    }

    /// Whether a record should be re-hashed on the next successful login:
    /// it uses a non-preferred algorithm, a weaker bcrypt cost, or a shorter
    /// salt than currently configured.
    pub fn needs_rehash(&self, record: &CredentialRecord) -> Result<bool, HashError> {
        let algorithm = record.algorithm()?;
        if algorithm != self.config.preferred_algorithm {
            return Ok(true);
        }
        if algorithm.is_self_salting() {
            return Ok(bcrypt_cost(&record.hash).map_or(true, |cost| cost < self.config.bcrypt_cost));
        }
        Ok(record.salt.len() < self.config.salt_length * 2)
    }

    /// [`hash`](Self::hash) on a blocking worker thread, for callers running
    /// on an event loop that must not stall for the bcrypt work factor.
    ///
    /// Must be awaited inside a Tokio runtime; `spawn_blocking` panics when
    /// no runtime is entered (e.g. under `futures::executor::block_on`).
    pub async fn hash_async(
        &self,
        password: String,
        algorithm: Algorithm,
    ) -> Result<CredentialRecord, HashError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || {
            let password = Zeroizing::new(password);
            hasher.hash(&password, algorithm)
        })
        .await
        .map_err(|e| HashError::Worker(format!("{e}")))?
    }

    /// [`verify`](Self::verify) on a blocking worker thread.
    ///
    /// Same runtime requirement as [`hash_async`](Self::hash_async).
    pub async fn verify_async(
        &self,
        password: String,
        record: CredentialRecord,
    ) -> Result<bool, HashError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || {
            let password = Zeroizing::new(password);
            hasher.verify(&password, &record)
        })
        .await
        .map_err(|e| HashError::Worker(format!("{e}")))?
    }

    fn scheme_for(&self, algorithm: Algorithm) -> Scheme {
        if algorithm == Algorithm::Md5 && self.config.md5_mode == Md5Mode::Sha256Compat {
            MD5_COMPAT_WARNING.call_once(|| {
                warn!("MD5 tag is computing SHA-256 (md5_mode = sha256_compat)");
            });
        }
        algorithm.scheme(self.config.md5_mode)
    }
}

/// Digest over the UTF-8 bytes of `password` followed by `salt`.
fn salted_digest(kind: DigestKind, password: &str, salt: &str) -> String {
    let mut message = Vec::with_capacity(password.len() + salt.len());
    message.extend_from_slice(password.as_bytes());
    message.extend_from_slice(salt.as_bytes());
    let hex = digest_hex(kind, &message);
    message.zeroize();
    hex
}

/// Compares every byte regardless of where the inputs first differ. Unequal
/// lengths return false; lengths are fixed per algorithm and not secret.
fn constant_time_eq(a: &str, b: &str) -> bool {
    a.len() == b.len() && bool::from(a.as_bytes().ct_eq(b.as_bytes()))
}

/// Cost field of a `$2b$NN$...` string.
fn bcrypt_cost(encoded: &str) -> Option<u32> {
    let mut parts = encoded.split('$');
    if !parts.next()?.is_empty() {
        return None;
    }
    let _version = parts.next()?;
    parts.next()?.parse().ok()
}

/// Hashes with the default configuration.
pub fn hash_password(password: &str, algorithm: Algorithm) -> Result<CredentialRecord, HashError> {
    CredentialHasher::default().hash(password, algorithm)
}

/// Verifies with the default configuration.
pub fn verify_password(password: &str, record: &CredentialRecord) -> Result<bool, HashError> {
    CredentialHasher::default().verify(password, record)
}

#[cfg(test)]
mod tests {
    use super::{
        bcrypt_cost, constant_time_eq, hash_password, salted_digest, verify_password,
        CredentialHasher, BCRYPT_MAX_PASSWORD_BYTES,
    };
    use crate::config::HasherConfig;
    use crate::crypto::algorithm::Algorithm;
    use crate::crypto::digest::{DigestKind, Md5Mode};
    use crate::crypto::record::CredentialRecord;
    use crate::error::HashError;

    const PASSWORD: &str = "correcthorsebatterystaple1";
    const SHA256_GOLDEN: &str = "23158217b910f0652fa81a5fef3721a458f65a5ea70e6f21a1b0c1a84cb5dce7";

    const DIGESTS: [Algorithm; 4] = [
        Algorithm::Md5,
        Algorithm::Sha1,
        Algorithm::Sha256,
        Algorithm::Sha512,
    ];

    fn zero_salt() -> String {
        "00".repeat(32)
    }

    fn fast_bcrypt() -> CredentialHasher {
        CredentialHasher::new(HasherConfig {
            bcrypt_cost: 4,
            ..HasherConfig::default()
        })
    }

    fn genuine_md5() -> CredentialHasher {
        CredentialHasher::new(HasherConfig {
            md5_mode: Md5Mode::Genuine,
            ..HasherConfig::default()
        })
    }

    #[test]
    fn pins_golden_vectors() {
        let salt = zero_salt();
        assert_eq!(salted_digest(DigestKind::Sha256, PASSWORD, &salt), SHA256_GOLDEN);
        assert_eq!(
            salted_digest(DigestKind::Sha1, PASSWORD, &salt),
            "26f54077323a359e5a0811c7c1c411cb176f27c9"
        );
        assert_eq!(
            salted_digest(DigestKind::Md5, PASSWORD, &salt),
            "c4d74ba810fca36a789ec5dd1519ab15"
        );
        assert_eq!(
            salted_digest(DigestKind::Sha512, PASSWORD, &salt),
            "13d982bc44fc78a3e33d15d3b2fc810001a6dd546ed6d2e422c70b86db1017cb\
             3a709edc5e0e1eae466e2449eeea582da889c2c4c37be26de1d5c878d64eb198"
        );
    }

    #[test]
    fn verifies_fixed_sha256_record() {
        let record = CredentialRecord::new(SHA256_GOLDEN.to_string(), zero_salt(), Algorithm::Sha256);
        assert_eq!(verify_password(PASSWORD, &record), Ok(true));
        assert_eq!(verify_password("correcthorsebatterystaple2", &record), Ok(false));
    }

    #[test]
    fn salt_is_appended_not_prepended() {
        let salt = zero_salt();
        let appended = salted_digest(DigestKind::Sha256, PASSWORD, &salt);
        let prepended = salted_digest(DigestKind::Sha256, &salt, PASSWORD);
        assert_ne!(appended, prepended);
        assert_eq!(
            prepended,
            "a3c0e0c0a0280af45d0aa81eee2cfe310238bafc0cfcba89f48295281ac09fdf"
        );
    }

    #[test]
    fn digest_algorithms_round_trip() {
        let hasher = CredentialHasher::default();
        for algorithm in DIGESTS {
            let record = hasher.hash(PASSWORD, algorithm).expect("hash should succeed");
            assert_eq!(record.salt.len(), 64);
            assert_ne!(record.hash, PASSWORD);
            assert_eq!(record.algorithm(), Ok(algorithm));
            assert_eq!(hasher.verify(PASSWORD, &record), Ok(true));
            assert_eq!(hasher.verify("wrong-password", &record), Ok(false));
        }
    }

    #[test]
    fn each_hash_gets_a_fresh_salt() {
        for algorithm in DIGESTS {
            let first = hash_password(PASSWORD, algorithm).expect("hash");
            let second = hash_password(PASSWORD, algorithm).expect("hash");
            assert_ne!(first.salt, second.salt);
            assert_ne!(first.hash, second.hash);
        }
    }

    #[test]
    fn md5_compat_mode_computes_sha256() {
        let record = hash_password(PASSWORD, Algorithm::Md5).expect("hash");
        assert_eq!(record.hash.len(), 64);
        assert_eq!(record.hash, salted_digest(DigestKind::Sha256, PASSWORD, &record.salt));
    }

    #[test]
    fn md5_genuine_mode_computes_md5() {
        let hasher = genuine_md5();
        let record = hasher.hash(PASSWORD, Algorithm::Md5).expect("hash");
        assert_eq!(record.hash.len(), 32);
        assert_eq!(hasher.verify(PASSWORD, &record), Ok(true));
        // A record written in one mode does not verify in the other.
        assert_eq!(verify_password(PASSWORD, &record), Ok(false));
    }

    #[test]
    fn bcrypt_embeds_salt_and_cost() {
        let record = hash_password(PASSWORD, Algorithm::Bcrypt).expect("hash");
        assert!(record.salt.is_empty());
        assert!(record.hash.starts_with("$2b$10$"));
        assert_eq!(verify_password(PASSWORD, &record), Ok(true));
        assert_eq!(verify_password("not-the-password", &record), Ok(false));
    }

    #[test]
    fn bcrypt_refuses_passwords_it_would_truncate() {
        let hasher = fast_bcrypt();
        let long = format!("{}X", "a".repeat(72));
        assert_eq!(
            hasher.hash(&long, Algorithm::Bcrypt).unwrap_err(),
            HashError::PasswordTooLong {
                len: 73,
                max: BCRYPT_MAX_PASSWORD_BYTES
            }
        );
    }

    #[test]
    fn bcrypt_long_passwords_sharing_a_prefix_do_not_verify() {
        let hasher = fast_bcrypt();
        let prefix = "a".repeat(BCRYPT_MAX_PASSWORD_BYTES);
        let record = hasher.hash(&prefix, Algorithm::Bcrypt).expect("hash at the limit");
        assert_eq!(hasher.verify(&prefix, &record), Ok(true));

        let first = format!("{}X", "a".repeat(72));
        let second = format!("{}Y", "a".repeat(72));
        assert_eq!(hasher.verify(&first, &record), Ok(false));
        assert_eq!(hasher.verify(&second, &record), Ok(false));
    }

    #[test]
    fn bcrypt_ignores_stored_salt() {
        let hasher = fast_bcrypt();
        let mut record = hasher.hash(PASSWORD, Algorithm::Bcrypt).expect("hash");
        record.salt = "ff".repeat(32);
        assert_eq!(hasher.verify(PASSWORD, &record), Ok(true));
    }

    #[test]
    fn malformed_bcrypt_hash_does_not_match() {
        let record = CredentialRecord::new("not-a-bcrypt-hash".into(), String::new(), Algorithm::Bcrypt);
        assert_eq!(verify_password(PASSWORD, &record), Ok(false));
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        let record = CredentialRecord {
            hash: SHA256_GOLDEN.to_string(),
            salt: zero_salt(),
            algorithm: "ROT13".to_string(),
        };
        for password in [PASSWORD, "", "anything"] {
            assert_eq!(
                verify_password(password, &record),
                Err(HashError::UnsupportedAlgorithm("ROT13".to_string()))
            );
        }
    }

    #[test]
    fn verify_rejects_retagged_records() {
        let hasher = CredentialHasher::default();
        let record = hasher.hash(PASSWORD, Algorithm::Sha256).expect("hash");
        for tag in ["s-h-a-2-5-6", "sha_256", "Sha256"] {
            let retagged = CredentialRecord {
                algorithm: tag.to_string(),
                ..record.clone()
            };
            assert_eq!(
                hasher.verify(PASSWORD, &retagged),
                Err(HashError::UnsupportedAlgorithm(tag.to_string()))
            );
        }
    }

    #[test]
    fn truncated_or_tampered_hash_fails() {
        let hasher = CredentialHasher::default();
        let mut record = hasher.hash(PASSWORD, Algorithm::Sha256).expect("hash");
        record.hash.truncate(63);
        assert_eq!(hasher.verify(PASSWORD, &record), Ok(false));

        let mut record = hasher.hash(PASSWORD, Algorithm::Sha256).expect("hash");
        record.hash = record.hash.to_uppercase();
        assert_eq!(hasher.verify(PASSWORD, &record), Ok(false));
    }

    #[test]
    fn zero_salt_length_surfaces_error() {
        let hasher = CredentialHasher::new(HasherConfig {
            salt_length: 0,
            ..HasherConfig::default()
        });
        assert_eq!(
            hasher.hash(PASSWORD, Algorithm::Sha1).unwrap_err(),
            HashError::InvalidSaltLength
        );
    }

    #[test]
    fn invalid_bcrypt_cost_surfaces_error() {
        let hasher = CredentialHasher::new(HasherConfig {
            bcrypt_cost: 2,
            ..HasherConfig::default()
        });
        assert!(matches!(
            hasher.hash(PASSWORD, Algorithm::Bcrypt),
            Err(HashError::Bcrypt(_))
        ));
    }

    #[test]
    fn flags_records_for_rehash() {
        let hasher = fast_bcrypt();
        let sha = hasher.hash(PASSWORD, Algorithm::Sha256).expect("hash");
        assert_eq!(hasher.needs_rehash(&sha), Ok(true));

        let current = hasher.hash(PASSWORD, Algorithm::Bcrypt).expect("hash");
        assert_eq!(hasher.needs_rehash(&current), Ok(false));

        let stronger = CredentialHasher::new(HasherConfig {
            bcrypt_cost: 5,
            ..HasherConfig::default()
        });
        assert_eq!(stronger.needs_rehash(&current), Ok(true));

        let sha_preferred = CredentialHasher::new(HasherConfig {
            preferred_algorithm: Algorithm::Sha256,
            ..HasherConfig::default()
        });
        assert_eq!(sha_preferred.needs_rehash(&sha), Ok(false));
        let short_salt = CredentialRecord::new(sha.hash.clone(), "00".repeat(8), Algorithm::Sha256);
        assert_eq!(sha_preferred.needs_rehash(&short_salt), Ok(true));
    }

    #[test]
    fn parses_bcrypt_cost() {
        assert_eq!(bcrypt_cost("$2b$10$abcdefghijklmnopqrstuv"), Some(10));
        assert_eq!(bcrypt_cost("$2y$04$abc"), Some(4));
        assert_eq!(bcrypt_cost("2b$10$abc"), None);
        assert_eq!(bcrypt_cost("garbage"), None);
    }

    #[test]
    fn constant_time_eq_requires_full_match() {
        assert!(constant_time_eq("abcdef", "abcdef"));
        assert!(!constant_time_eq("abcdef", "abcdeg"));
        assert!(!constant_time_eq("abcdef", "abcde"));
        assert!(constant_time_eq("", ""));
    }

    #[tokio::test]
    async fn async_variants_match_sync_behaviour() {
        let hasher = fast_bcrypt();
        for algorithm in [Algorithm::Sha512, Algorithm::Bcrypt] {
            let record = hasher
                .hash_async(PASSWORD.to_string(), algorithm)
                .await
                .expect("hash");
            assert!(hasher
                .verify_async(PASSWORD.to_string(), record.clone())
                .await
                .expect("verify"));
            assert!(!hasher
                .verify_async("nope".to_string(), record)
                .await
                .expect("verify"));
        }
    }

    #[tokio::test]
    async fn async_verify_rejects_unknown_algorithm() {
        let record = CredentialRecord {
            hash: String::new(),
            salt: String::new(),
            algorithm: "ROT13".to_string(),
        };
        let err = CredentialHasher::default()
            .verify_async(PASSWORD.to_string(), record)
            .await
            .unwrap_err();
        assert_eq!(err, HashError::UnsupportedAlgorithm("ROT13".to_string()));
    }
}
