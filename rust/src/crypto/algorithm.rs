//! The closed set of supported hashing schemes and their display metadata.
//! Metadata is informational only; dispatch never looks at it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::crypto::digest::{DigestKind, Md5Mode};
use crate::error::HashError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Algorithm {
    Md5,
    Sha1,
    Sha256,
    Sha512,
    Bcrypt,
}

/// Qualitative strength rating shown next to each algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityTier {
    Broken,
    Weak,
    Moderate,
    Strong,
}

impl fmt::Display for SecurityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SecurityTier::Broken => "broken",
            SecurityTier::Weak => "weak",
            SecurityTier::Moderate => "moderate",
            SecurityTier::Strong => "strong",
        };
        f.pad(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlgorithmInfo {
    pub algorithm: Algorithm,
    pub name: &'static str,
    pub description: &'static str,
    pub security_tier: SecurityTier,
}

/// How a scheme handles salt. Digest schemes take an externally generated
/// salt; self-salting schemes embed their own salt and cost in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scheme {
    Digest(DigestKind),
    SelfSalting,
}

const ALGORITHM_TABLE: [AlgorithmInfo; 5] = [
    AlgorithmInfo {
        algorithm: Algorithm::Md5,
        name: "MD5",
        description: "Legacy 128-bit digest, kept for comparison only",
        security_tier: SecurityTier::Broken,
    },
    AlgorithmInfo {
        algorithm: Algorithm::Sha1,
        name: "SHA-1",
        description: "160-bit digest with practical collision attacks",
        security_tier: SecurityTier::Weak,
    },
    AlgorithmInfo {
        algorithm: Algorithm::Sha256,
        name: "SHA-256",
        description: "Fast 256-bit digest from the SHA-2 family",
        security_tier: SecurityTier::Moderate,
    },
    AlgorithmInfo {
        algorithm: Algorithm::Sha512,
        name: "SHA-512",
        description: "Fast 512-bit digest from the SHA-2 family",
        security_tier: SecurityTier::Moderate,
    },
    AlgorithmInfo {
        algorithm: Algorithm::Bcrypt,
        name: "bcrypt",
        description: "Adaptive, self-salting password hash with a tunable cost",
        security_tier: SecurityTier::Strong,
    },
];

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Md5,
        Algorithm::Sha1,
        Algorithm::Sha256,
        Algorithm::Sha512,
        Algorithm::Bcrypt,
    ];

    /// Canonical tag used when a record is persisted.
    pub fn tag(self) -> &'static str {
        match self {
            Algorithm::Md5 => "MD5",
            Algorithm::Sha1 => "SHA1",
            Algorithm::Sha256 => "SHA256",
            Algorithm::Sha512 => "SHA512",
            Algorithm::Bcrypt => "BCRYPT",
        }
    }

    pub fn info(self) -> &'static AlgorithmInfo {
        let index = match self {
            Algorithm::Md5 => 0,
            Algorithm::Sha1 => 1,
            Algorithm::Sha256 => 2,
            Algorithm::Sha512 => 3,
            Algorithm::Bcrypt => 4,
        };
        &ALGORITHM_TABLE[index]
    }

    pub fn is_self_salting(self) -> bool {
        matches!(self, Algorithm::Bcrypt)
    }

    pub(crate) fn scheme(self, md5_mode: Md5Mode) -> Scheme {
        match self {
            Algorithm::Md5 => Scheme::Digest(md5_mode.digest_kind()),
            Algorithm::Sha1 => Scheme::Digest(DigestKind::Sha1),
            Algorithm::Sha256 => Scheme::Digest(DigestKind::Sha256),
            Algorithm::Sha512 => Scheme::Digest(DigestKind::Sha512),
            Algorithm::Bcrypt => Scheme::SelfSalting,
        }
    }
}

/// Read-only metadata for every supported algorithm, in declaration order.
pub fn algorithm_table() -> &'static [AlgorithmInfo] {
    &ALGORITHM_TABLE
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.tag())
    }
}

impl Algorithm {
    /// Operator-friendly parse for command-line input: case-insensitive,
    /// ignoring dashes and underscores (`sha-256` resolves to `SHA256`).
    /// Stored records go through the strict [`FromStr`] impl instead.
    pub fn parse_loose(s: &str) -> Result<Self, HashError> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_uppercase();
        normalized
            .parse()
            .map_err(|_| HashError::UnsupportedAlgorithm(s.to_string()))
    }
}

impl FromStr for Algorithm {
    type Err = HashError;

    /// Accepts exactly the canonical tags returned by [`Algorithm::tag`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.tag() == s)
            .ok_or_else(|| HashError::UnsupportedAlgorithm(s.to_string()))
    }
}
