//! Credential cryptography: algorithm metadata, salt generation, digest
//! primitives, the persisted record shape, and the hasher that ties them
//! together. Callers normally only need `hasher` and `record`; the other
//! modules are its building blocks.

pub mod algorithm;
pub mod digest;
pub mod hasher;
pub mod record;
pub mod salt;
