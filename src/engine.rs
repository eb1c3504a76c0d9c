//! The deterministic stream engine: digest computation and the uniform layer.
//!
//! Operations split into two families. Peek operations (`uniform_float`,
//! `unbiased_int`'s accepting path, `rounded_float`, `crash`) read the
//! stream at the current counter value and leave it there; calling one twice
//! without an intervening [`FairRng::advance`] returns the identical result.
//! The `next_*` wrappers advance exactly once and then delegate to the peek
//! form. The single sanctioned internal advance is the rejection redraw
//! inside [`FairRng::unbiased_int`].

use crate::core::{EngineError, Result};
use crate::crypto::{CryptoSuite, StdCrypto, U256};
use crate::seed::{ClientSeed, Counter, SeedState};

/// Number of distinct values a single 32-bit draw can cover.
const DRAW_SPAN: u64 = 1 << 32;

/// Provably fair deterministic generator for one round or session.
///
/// Generic over [`CryptoSuite`] so the hashing primitives are an injected
/// capability rather than a hidden global.
#[derive(Clone, Debug)]
pub struct FairRng<C: CryptoSuite = StdCrypto> {
    seed: SeedState,
    crypto: C,
}

impl FairRng<StdCrypto> {
    /// Common round setup: explicit seeds, nonce mode.
    pub fn new(server_seed: &str, client_seed: &str, nonce: u64) -> Result<Self> {
        Self::builder()
            .server_seed(server_seed)
            .client_seed(client_seed)
            .nonce(nonce)
            .build()
    }

    /// Full construction surface, including index mode and generated seeds.
    pub fn builder() -> FairRngBuilder {
        FairRngBuilder::default()
    }
}

impl<C: CryptoSuite> FairRng<C> {
    /// Published commitment: hex SHA-256 of the server seed, available
    /// before any digest is consumed.
    pub fn server_seed_hash_hex(&self) -> &str {
        self.seed.server_seed_hash()
    }

    /// Round-end disclosure for auditing.
    pub fn reveal_server_seed(&self) -> &str {
        self.seed.server_seed()
    }

    /// The client seed, generated lazily when the player supplied none.
    pub fn client_seed(&mut self) -> &str {
        self.seed.client_seed()
    }

    /// Replace the client seed. Takes effect from the next digest.
    pub fn set_client_seed(&mut self, seed: impl Into<ClientSeed>) {
        self.seed.set_client_seed(seed);
    }

    pub fn counter(&self) -> Counter {
        self.seed.counter()
    }

    /// Advance the counter by one and return its new value. Callers decide
    /// when a round consumes a fresh stream position.
    pub fn advance(&mut self) -> u64 {
        self.seed.advance()
    }

    /// Exact message string the next digest will authenticate.
    pub fn material(&mut self) -> String {
        self.seed.material()
    }

    /// HMAC-SHA256 digest for the current counter value, keyed by the
    /// server seed. Pure: identical until the counter advances.
    pub fn digest(&mut self) -> [u8; 32] {
        let message = self.seed.material();
        self.crypto
            .hmac_sha256(self.seed.server_seed().as_bytes(), message.as_bytes())
    }

    /// The full digest as a 256-bit unsigned integer, big-endian.
    pub fn random_long(&mut self) -> U256 {
        U256::from_be_bytes(self.digest())
    }

    /// Uniform `f64` in `[0, 1)`.
    ///
    /// The digest's first 7 bytes give 56 bits; the top 52 exactly fill a
    /// double mantissa `m`, and the result is `m / 2^52`. Never advances
    /// the counter.
    pub fn uniform_float(&mut self) -> f64 {
        let digest = self.digest();
        let mut acc: u64 = 0;
        for &byte in &digest[..7] {
            acc = (acc << 8) | u64::from(byte);
        }
        let mantissa = acc >> 4;
        let value = mantissa as f64 / (1u64 << 52) as f64;
        // mantissa < 2^52 keeps this below 1.0; the clamp pins the
        // half-open contract even so.
        value.min(1.0 - f64::EPSILON / 2.0)
    }

    /// Unbiased integer in `[min, max]` by rejection sampling.
    ///
    /// An accepting draw leaves the counter untouched; a rejected draw
    /// advances it and retries, which keeps every residue class equally
    /// likely. Expected redraw count is below 2 for any valid range.
    pub fn unbiased_int(&mut self, min: i64, max: i64) -> Result<i64> {
        if max < min {
            return Err(EngineError::Range(format!(
                "max ({max}) is less than min ({min})"
            )));
        }
        let span = max as i128 - min as i128 + 1;
        if span > i128::from(DRAW_SPAN) {
            return Err(EngineError::InvalidParameter(format!(
                "range of {span} values exceeds the 2^32 draw width"
            )));
        }
        let range = span as u64;
        let limit = (DRAW_SPAN / range) * range;
        loop {
            let x = (self.uniform_float() * DRAW_SPAN as f64).floor() as u64;
            if x >= limit {
                // Past the largest multiple of `range`: keeping it would
                // bias the low residues.
                self.advance();
                continue;
            }
            return Ok(min + (x % range) as i64);
        }
    }

    /// Uniform float in `[min, max]`, rounded half-away-from-zero to
    /// `precision` decimal digits. Does not advance the counter.
    pub fn rounded_float(&mut self, min: f64, max: f64, precision: u32) -> Result<f64> {
        if !min.is_finite() || !max.is_finite() {
            return Err(EngineError::InvalidParameter(format!(
                "bounds must be finite, got [{min}, {max}]"
            )));
        }
        if max < min {
            return Err(EngineError::Range(format!(
                "max ({max}) is less than min ({min})"
            )));
        }
        let value = self.uniform_float() * (max - min) + min;
        let factor = 10f64.powi(precision as i32);
        Ok((value * factor).round() / factor)
    }

    /// Advance once, then draw the float at the new position.
    pub fn next_float(&mut self) -> f64 {
        self.advance();
        self.uniform_float()
    }

    /// `n` successive advanced draws.
    pub fn next_floats(&mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.next_float()).collect()
    }

    /// Advance once, then draw an unbiased integer at the new position.
    pub fn next_int(&mut self, min: i64, max: i64) -> Result<i64> {
        self.advance();
        self.unbiased_int(min, max)
    }

    /// Advance once, then draw a rounded float at the new position.
    pub fn next_rounded_float(&mut self, min: f64, max: f64, precision: u32) -> Result<f64> {
        self.advance();
        self.rounded_float(min, max, precision)
    }
}

/// Builder covering the full construction surface of [`FairRng`].
#[derive(Debug, Default)]
pub struct FairRngBuilder {
    client_seed: Option<ClientSeed>,
    server_seed: Option<String>,
    nonce: u64,
    index: Option<u64>,
}

impl FairRngBuilder {
    /// Player-supplied seed: a single string, or several joined with `|`.
    pub fn client_seed(mut self, seed: impl Into<ClientSeed>) -> Self {
        self.client_seed = Some(seed.into());
        self
    }

    /// Operator secret. When omitted, 64 random hex characters are
    /// generated at build time.
    pub fn server_seed(mut self, seed: impl Into<String>) -> Self {
        self.server_seed = Some(seed.into());
        self
    }

    /// Initial nonce (default 0).
    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    /// Switch to index mode with the given initial index; the nonce is
    /// frozen at its configured value.
    pub fn index(mut self, index: u64) -> Self {
        self.index = Some(index);
        self
    }

    pub fn build(self) -> Result<FairRng<StdCrypto>> {
        self.build_with_crypto(StdCrypto)
    }

    /// Build with injected primitives (fixed-vector tests, alternate
    /// backends).
    pub fn build_with_crypto<C: CryptoSuite>(self, crypto: C) -> Result<FairRng<C>> {
        let counter = match self.index {
            Some(index) => Counter::Index { nonce: self.nonce, index },
            None => Counter::Nonce { nonce: self.nonce },
        };
        let seed = SeedState::create(&crypto, self.client_seed, self.server_seed, counter)?;
        Ok(FairRng { seed, crypto })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> FairRng {
        FairRng::new("serverSeed", "clientSeed", 0).unwrap()
    }

    #[test]
    fn digest_is_pure_between_advances() {
        let mut rng = rng();
        let first = rng.digest();
        assert_eq!(rng.digest(), first);
        rng.advance();
        assert_ne!(rng.digest(), first);
    }

    #[test]
    fn uniform_float_is_in_unit_interval_and_pure() {
        let mut rng = rng();
        let v = rng.uniform_float();
        assert!((0.0..1.0).contains(&v));
        assert_eq!(v, rng.uniform_float());
        assert_eq!(rng.counter().value(), 0);
    }

    #[test]
    fn next_wrappers_advance_exactly_once() {
        let mut rng = rng();
        rng.next_float();
        assert_eq!(rng.counter().value(), 1);
        // 2^32 is divisible by 256, so no rejection redraw is possible
        rng.next_int(0, 255).unwrap();
        assert_eq!(rng.counter().value(), 2);
        rng.next_rounded_float(0.0, 1.0, 4).unwrap();
        assert_eq!(rng.counter().value(), 3);
    }

    #[test]
    fn reversed_bounds_are_range_errors() {
        let mut rng = rng();
        assert!(matches!(rng.unbiased_int(5, 4), Err(EngineError::Range(_))));
        assert!(matches!(
            rng.rounded_float(1.0, 0.0, 2),
            Err(EngineError::Range(_))
        ));
    }

    #[test]
    fn oversized_range_is_rejected_not_looped() {
        let mut rng = rng();
        let err = rng.unbiased_int(0, 1i64 << 32).unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter(_)));
    }

    #[test]
    fn full_draw_width_range_is_accepted() {
        let mut rng = rng();
        let v = rng.unbiased_int(0, (1i64 << 32) - 1).unwrap();
        assert!((0..(1i64 << 32)).contains(&v));
    }

    #[test]
    fn degenerate_range_returns_the_single_value_without_advancing() {
        let mut rng = rng();
        assert_eq!(rng.unbiased_int(42, 42).unwrap(), 42);
        assert_eq!(rng.counter().value(), 0);
        assert_eq!(rng.rounded_float(2.5, 2.5, 2).unwrap(), 2.5);
    }

    #[test]
    fn negative_ranges_sample_correctly() {
        let mut rng = rng();
        for _ in 0..20 {
            let v = rng.next_int(-10, -1).unwrap();
            assert!((-10..=-1).contains(&v));
        }
    }

    #[test]
    fn non_finite_float_bounds_rejected() {
        let mut rng = rng();
        assert!(rng.rounded_float(f64::NAN, 1.0, 2).is_err());
        assert!(rng.rounded_float(0.0, f64::INFINITY, 2).is_err());
    }

    #[test]
    fn builder_defaults_to_nonce_zero() {
        let rng = FairRng::builder().server_seed("s").build().unwrap();
        assert!(matches!(rng.counter(), Counter::Nonce { nonce: 0 }));
    }

    #[test]
    fn builder_index_mode_freezes_nonce() {
        let mut rng = FairRng::builder()
            .server_seed("s")
            .client_seed("c")
            .nonce(9)
            .index(2)
            .build()
            .unwrap();
        assert_eq!(rng.material(), "c-9-2");
        rng.advance();
        assert_eq!(rng.material(), "c-9-3");
    }

    #[test]
    fn set_client_seed_changes_the_stream() {
        let mut rng = rng();
        let before = rng.digest();
        rng.set_client_seed("other");
        assert_ne!(rng.digest(), before);
        assert_eq!(rng.material(), "other-0");
    }

    #[test]
    fn random_long_matches_digest_bytes() {
        let mut rng = rng();
        let digest = rng.digest();
        assert_eq!(rng.random_long().to_be_bytes(), digest);
    }
}
