mod address;
mod key_pair;
mod message;

pub mod error;

pub use address::*;
pub use error::CryptoError;
pub use key_pair::*;
pub use message::*;

pub use ed25519_dalek::{Signature, VerifyingKey as PublicKey};

use sha2::{Digest, Sha256};

pub const HASH_SIZE: usize = 32; // 32 bytes / 256 bits

// Hash a byte array using SHA-256
#[inline(always)]
pub fn hash(value: &[u8]) -> [u8; HASH_SIZE] {
    Sha256::digest(value).into()
}

// Numeric identifier used by addresses and transaction ids:
// the first 8 bytes of the SHA-256 digest, read little-endian
pub fn short_id(value: &[u8]) -> u64 {
    let digest = hash(value);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
