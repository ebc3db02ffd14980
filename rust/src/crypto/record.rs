//! Persisted output of a hash operation. Records are opaque to the store:
//! `{hash, salt, algorithm}` is everything needed to verify later.

use serde::{Deserialize, Serialize};

use crate::crypto::algorithm::Algorithm;
use crate::error::HashError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Lowercase hex digest, or the self-describing bcrypt string.
    pub hash: String,
    /// Hex salt for digest algorithms; empty for bcrypt.
    pub salt: String,
    /// Stored algorithm tag. Kept as text so a record written by another
    /// version with an unknown tag still loads and fails on verify instead.
    pub algorithm: String,
}

impl CredentialRecord {
    pub fn new(hash: String, salt: String, algorithm: Algorithm) -> Self {
        Self {
            hash,
            salt,
            algorithm: algorithm.tag().to_string(),
        }
    }

    /// Resolves the stored tag against the supported set.
    pub fn algorithm(&self) -> Result<Algorithm, HashError> {
        self.algorithm.parse()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
