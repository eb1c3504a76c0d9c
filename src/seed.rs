//! Seed material and counter state.
//!
//! One [`SeedState`] exists per round (or per player session in index mode)
//! and is owned exclusively by it. The counter only ever moves through
//! [`SeedState::advance`], one unit at a time.

use rand::RngCore;
use rand::rngs::OsRng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::core::{EngineError, Result};
use crate::crypto::CryptoSuite;

/// Client seed input: a single seed, or several joined with `|` in the
/// order given.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientSeed {
    Single(String),
    Many(Vec<String>),
}

impl ClientSeed {
    /// The exact string mixed into the HMAC material.
    pub fn join(self) -> String {
        match self {
            ClientSeed::Single(seed) => seed,
            ClientSeed::Many(parts) => parts.join("|"),
        }
    }
}

impl From<&str> for ClientSeed {
    fn from(seed: &str) -> Self {
        ClientSeed::Single(seed.to_string())
    }
}

impl From<String> for ClientSeed {
    fn from(seed: String) -> Self {
        ClientSeed::Single(seed)
    }
}

impl From<Vec<String>> for ClientSeed {
    fn from(parts: Vec<String>) -> Self {
        ClientSeed::Many(parts)
    }
}

impl From<&[&str]> for ClientSeed {
    fn from(parts: &[&str]) -> Self {
        ClientSeed::Many(parts.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ClientSeed {
    fn from(parts: [&str; N]) -> Self {
        ClientSeed::Many(parts.iter().map(|s| s.to_string()).collect())
    }
}

/// The advancing counter. Which variant is active is fixed at construction
/// and never changes afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Counter {
    /// Default mode: the nonce itself advances draw to draw.
    Nonce { nonce: u64 },
    /// Alternate mode: the nonce is frozen and a separate index advances.
    Index { nonce: u64, index: u64 },
}

impl Counter {
    /// The active counter value.
    pub fn value(&self) -> u64 {
        match self {
            Counter::Nonce { nonce } => *nonce,
            Counter::Index { index, .. } => *index,
        }
    }

    fn advance(&mut self) -> u64 {
        match self {
            Counter::Nonce { nonce } => {
                *nonce += 1;
                *nonce
            }
            Counter::Index { index, .. } => {
                *index += 1;
                *index
            }
        }
    }
}

/// Seed pair, hash commitment, and counter for one round.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeedState {
    server_seed: String,
    server_seed_hash: String,
    client_seed: Option<String>,
    counter: Counter,
}

impl SeedState {
    /// Build the state, generating a 64-hex-char server seed when none is
    /// supplied, and committing to it immediately.
    pub(crate) fn create<C: CryptoSuite>(
        crypto: &C,
        client_seed: Option<ClientSeed>,
        server_seed: Option<String>,
        counter: Counter,
    ) -> Result<Self> {
        let server_seed = match server_seed {
            Some(seed) if seed.is_empty() => {
                return Err(EngineError::Configuration(
                    "server seed must not be empty".to_string(),
                ));
            }
            Some(seed) => seed,
            None => random_hex(64),
        };
        let server_seed_hash = hex::encode(crypto.sha256(server_seed.as_bytes()));
        Ok(Self {
            server_seed,
            server_seed_hash,
            client_seed: client_seed.map(ClientSeed::join),
            counter,
        })
    }

    /// Secret until revealed at round end. Immutable after construction.
    pub fn server_seed(&self) -> &str {
        &self.server_seed
    }

    /// Hex SHA-256 of the exact server seed bytes, computed once at
    /// construction so it can be published before play.
    pub fn server_seed_hash(&self) -> &str {
        &self.server_seed_hash
    }

    /// The client seed, generating a 32-hex-char one on first use when the
    /// player supplied none.
    pub fn client_seed(&mut self) -> &str {
        self.client_seed.get_or_insert_with(|| random_hex(32))
    }

    /// Replace the client seed. Takes effect from the next digest.
    pub fn set_client_seed(&mut self, seed: impl Into<ClientSeed>) {
        self.client_seed = Some(seed.into().join());
    }

    pub fn counter(&self) -> Counter {
        self.counter
    }

    /// Advance the active counter by one and return its new value. The only
    /// counter mutator.
    pub fn advance(&mut self) -> u64 {
        self.counter.advance()
    }

    /// Exact HMAC message for the current counter value, reproducible
    /// byte-for-byte by an external verifier.
    pub fn material(&mut self) -> String {
        let counter = self.counter;
        let client = self.client_seed();
        match counter {
            Counter::Nonce { nonce } => format!("{client}-{nonce}"),
            Counter::Index { nonce, index } => format!("{client}-{nonce}-{index}"),
        }
    }
}

/// `len` hex characters from OS entropy.
fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len.div_ceil(2)];
    OsRng.fill_bytes(&mut bytes);
    let mut encoded = hex::encode(bytes);
    encoded.truncate(len);
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::StdCrypto;

    fn state(client: Option<ClientSeed>, server: Option<&str>, counter: Counter) -> SeedState {
        SeedState::create(&StdCrypto, client, server.map(str::to_string), counter).unwrap()
    }

    #[test]
    fn nonce_mode_material() {
        let mut s = state(Some("abc".into()), Some("server"), Counter::Nonce { nonce: 0 });
        assert_eq!(s.material(), "abc-0");
        assert_eq!(s.advance(), 1);
        assert_eq!(s.material(), "abc-1");
    }

    #[test]
    fn index_mode_keeps_nonce_frozen() {
        let mut s = state(
            Some("abc".into()),
            Some("server"),
            Counter::Index { nonce: 3, index: 0 },
        );
        assert_eq!(s.material(), "abc-3-0");
        assert_eq!(s.advance(), 1);
        assert_eq!(s.advance(), 2);
        assert_eq!(s.material(), "abc-3-2");
        assert!(matches!(s.counter(), Counter::Index { nonce: 3, index: 2 }));
    }

    #[test]
    fn multiple_client_seeds_join_in_order() {
        let seed: ClientSeed = ["a", "b", "c"].into();
        assert_eq!(seed.join(), "a|b|c");
    }

    #[test]
    fn commitment_is_sha256_of_server_seed() {
        let s = state(Some("c".into()), Some("serverSeed"), Counter::Nonce { nonce: 0 });
        assert_eq!(
            s.server_seed_hash(),
            "b96b19e8e9b1def2fd5c15e59cebadafb618344a70c2311fb67d38615f46e6c5"
        );
    }

    #[test]
    fn generated_seeds_have_requested_shape() {
        let mut s = state(None, None, Counter::Nonce { nonce: 0 });
        assert_eq!(s.server_seed().len(), 64);
        assert!(s.server_seed().chars().all(|c| c.is_ascii_hexdigit()));
        let client = s.client_seed().to_string();
        assert_eq!(client.len(), 32);
        assert!(client.chars().all(|c| c.is_ascii_hexdigit()));
        // stable once generated
        assert_eq!(s.client_seed(), client);
    }

    #[test]
    fn set_client_seed_replaces_generated_seed() {
        let mut s = state(None, Some("server"), Counter::Nonce { nonce: 0 });
        s.client_seed();
        s.set_client_seed("chosen");
        assert_eq!(s.client_seed(), "chosen");
        assert_eq!(s.material(), "chosen-0");
    }

    #[test]
    fn empty_server_seed_rejected() {
        let err =
            SeedState::create(&StdCrypto, None, Some(String::new()), Counter::Nonce { nonce: 0 })
                .unwrap_err();
        assert!(matches!(err, crate::core::EngineError::Configuration(_)));
    }

    #[test]
    fn counter_only_moves_through_advance() {
        let mut s = state(Some("abc".into()), Some("server"), Counter::Nonce { nonce: 5 });
        s.material();
        s.material();
        assert_eq!(s.counter().value(), 5);
    }
}
