//! Raw digest primitives. Each one returns lowercase hex so callers can store
//! and compare the output as plain strings.

use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

/// Concrete digest function behind a digest-style algorithm tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestKind {
    Md5,
    Sha1,
    Sha256,
    Sha512,
}

/// What the `MD5` tag actually computes.
///
/// `Sha256Compat` keeps the historical behaviour where records labelled MD5
/// were produced with SHA-256. Stores created that way only verify in this
/// mode. `Genuine` computes a real MD5 digest instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Md5Mode {
    #[default]
    Sha256Compat,
    Genuine,
}

impl Md5Mode {
    pub(crate) fn digest_kind(self) -> DigestKind {
        match self {
            Md5Mode::Sha256Compat => DigestKind::Sha256,
            Md5Mode::Genuine => DigestKind::Md5,
        }
    }
}

impl DigestKind {
    /// Length of the hex encoding produced by [`digest_hex`].
    pub fn hex_len(self) -> usize {
        match self {
            DigestKind::Md5 => 32,
            DigestKind::Sha1 => 40,
            DigestKind::Sha256 => 64,
            DigestKind::Sha512 => 128,
        }
    }
}

fn hex_of<D: Digest>(data: &[u8]) -> String {
    let mut hasher = D::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Computes the digest of `data` and returns it as lowercase hex.
pub fn digest_hex(kind: DigestKind, data: &[u8]) -> String {
    match kind {
        DigestKind::Md5 => hex_of::<Md5>(data),
        DigestKind::Sha1 => hex_of::<Sha1>(data),
        DigestKind::Sha256 => hex_of::<Sha256>(data),
        DigestKind::Sha512 => hex_of::<Sha512>(data),
    }
}
