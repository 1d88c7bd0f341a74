//! Ring coordinates.
//!
//! Every position on the ring, for virtual nodes and lookup keys alike, is a
//! `u64` produced by a [`RingHasher`]. The built-in [`HashAlgorithm`]s read the
//! first 8 bytes of a digest as a big-endian integer. That truncation is only
//! good for spreading positions around the ring; it carries none of the
//! digest's collision guarantees.

use serde::{Deserialize, Serialize};
use sha2::Digest;
use strum::{AsRefStr, Display, EnumIter, EnumString};
use xxhash_rust::xxh3::xxh3_64;

use crate::error::{HashRingError, Result};

/// Maps arbitrary bytes to a position on the ring.
///
/// Implementations must be pure: the same input always yields the same
/// coordinate for the lifetime of the ring that uses them.
pub trait RingHasher {
    fn coordinate(&self, input: &[u8]) -> u64;
}

/// Digest algorithms selectable by name.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Sha1,
    Sha256,
    Sha512,
    /// Non-cryptographic, much faster than the digests.
    Xxh3,
}

impl HashAlgorithm {
    pub fn from_name(name: &str) -> Result<Self> {
        name.parse()
            .map_err(|_| HashRingError::UnsupportedHashAlgorithm(name.to_string()))
    }
}

impl RingHasher for HashAlgorithm {
    fn coordinate(&self, input: &[u8]) -> u64 {
        match self {
            HashAlgorithm::Md5 => leading_u64(&md5::compute(input).0),
            HashAlgorithm::Sha1 => leading_u64(&sha1::Sha1::digest(input)),
            HashAlgorithm::Sha256 => leading_u64(&sha2::Sha256::digest(input)),
            HashAlgorithm::Sha512 => leading_u64(&sha2::Sha512::digest(input)),
            HashAlgorithm::Xxh3 => xxh3_64(input),
        }
    }
}

// All supported digests are at least 16 bytes wide.
fn leading_u64(digest: &[u8]) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}
