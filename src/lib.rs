//! Provably fair deterministic random number engine for gambling-style
//! games.
//!
//! Given a server seed (committed to via SHA-256 before play), a client
//! seed, and a monotonically advancing counter, [`FairRng`] produces a
//! cryptographically verifiable stream of numbers and the distributions
//! games need on top of it: uniform floats, unbiased integers, weighted
//! choice, Fisher-Yates shuffles, unique-subset sampling, crash
//! multipliers, and the pump balloon game.
//!
//! Every outcome is a deterministic function of the seed pair and the
//! counter value at the time it was drawn, so a player holding the revealed
//! server seed can recompute the whole round byte-for-byte.
//!
//! # Example
//!
//! ```
//! use fairseed::FairRng;
//!
//! let mut rng = FairRng::new("serverSeed", "clientSeed", 0).unwrap();
//! // Publish the commitment before play.
//! let commitment = rng.server_seed_hash_hex().to_string();
//!
//! let roll = rng.next_int(1, 6).unwrap();
//! assert!((1..=6).contains(&roll));
//!
//! // After the round, reveal the seed so the player can verify.
//! assert!(fairseed::verify_commitment(rng.reveal_server_seed(), &commitment));
//! ```

pub mod core;
pub mod crypto;
mod draw;
pub mod engine;
pub mod games;
pub mod seed;

pub use crate::core::{EngineError, Result};
pub use crate::crypto::{CryptoSuite, StdCrypto, U256, verify_commitment};
pub use crate::engine::{FairRng, FairRngBuilder};
pub use crate::games::PumpGame;
pub use crate::seed::{ClientSeed, Counter, SeedState};
