//! Configuration loader for the hasher. Every field is optional in the JSON
//! file; missing fields fall back to the defaults below.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::algorithm::Algorithm;
use crate::crypto::digest::Md5Mode;
use crate::crypto::salt::DEFAULT_SALT_LEN;

/// bcrypt work factor: 2^10 internal rounds.
pub const DEFAULT_BCRYPT_COST: u32 = 10;
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file unreadable: {0}")]
    Io(String),
    #[error("config parse failed: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HasherConfig {
    pub bcrypt_cost: u32,
    /// Salt length in bytes for digest algorithms.
    pub salt_length: usize,
    pub md5_mode: Md5Mode,
    /// Algorithm new credentials should use; records in anything else are
    /// reported by `needs_rehash`.
    pub preferred_algorithm: Algorithm,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            salt_length: DEFAULT_SALT_LEN,
            md5_mode: Md5Mode::default(),
            preferred_algorithm: Algorithm::Bcrypt,
        }
    }
}

impl HasherConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return Err(ConfigError::Invalid(format!(
                "bcrypt_cost must be between {MIN_BCRYPT_COST} and {MAX_BCRYPT_COST}, got {}",
                self.bcrypt_cost
            )));
        }
        if self.salt_length == 0 {
            return Err(ConfigError::Invalid(
                "salt_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loads and validates a JSON hasher configuration.
pub fn load_config(path: impl AsRef<Path>) -> Result<HasherConfig, ConfigError> {
    let raw_json = fs::read_to_string(&path).map_err(|e| ConfigError::Io(format!("{e}")))?;
    let config: HasherConfig =
        serde_json::from_str(&raw_json).map_err(|e| ConfigError::Parse(format!("{e}")))?;
    config.validate()?;
    Ok(config)
}
