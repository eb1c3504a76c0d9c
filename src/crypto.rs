//! Injected crypto capability.
//!
//! The engine never reaches for a hidden global hasher: everything flows
//! through a [`CryptoSuite`] so tests can substitute fixed vectors and
//! integrators can swap in hardware-backed primitives.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

/// Hashing and MAC primitives the engine depends on.
pub trait CryptoSuite {
    /// SHA-256 of `data`.
    fn sha256(&self, data: &[u8]) -> [u8; 32];

    /// HMAC-SHA256 of `message` keyed by `key`.
    fn hmac_sha256(&self, key: &[u8], message: &[u8]) -> [u8; 32];
}

/// Default suite backed by the RustCrypto `sha2` / `hmac` implementations.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdCrypto;

impl CryptoSuite for StdCrypto {
    fn sha256(&self, data: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hasher.finalize().into()
    }

    fn hmac_sha256(&self, key: &[u8], message: &[u8]) -> [u8; 32] {
        // HMAC accepts keys of any length, so this construction is infallible.
        let mut mac = <Hmac<Sha256>>::new_from_slice(key).expect("HMAC key of any length");
        mac.update(message);
        mac.finalize().into_bytes().into()
    }
}

/// Verify a revealed server seed against its published SHA-256 commitment.
///
/// This is the round-end check the commitment exists for: any player can
/// recompute it from the revealed seed alone.
pub fn verify_commitment(server_seed: &str, expected_hash_hex: &str) -> bool {
    hex::encode(StdCrypto.sha256(server_seed.as_bytes())) == expected_hash_hex.to_lowercase()
}

/// A 256-bit unsigned integer built from a full digest, big-endian.
///
/// Kept independent from the 52-bit float path, which draws its mantissa
/// from its own byte window.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct U256 {
    // Most-significant limb first, so the derived ordering is numeric.
    limbs: [u64; 4],
}

impl U256 {
    /// Interpret 32 bytes as a big-endian 256-bit unsigned integer.
    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        let mut limbs = [0u64; 4];
        for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks_exact(8)) {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            *limb = u64::from_be_bytes(buf);
        }
        Self { limbs }
    }

    /// The value as 32 big-endian bytes.
    pub fn to_be_bytes(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (chunk, limb) in out.chunks_exact_mut(8).zip(self.limbs) {
            chunk.copy_from_slice(&limb.to_be_bytes());
        }
        out
    }

    /// Lowercase hex, fixed width (64 characters).
    pub fn to_hex(self) -> String {
        hex::encode(self.to_be_bytes())
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl fmt::Debug for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U256({})", self)
    }
}
