//! Derived draws on top of the uniform layer: weighted choice, Fisher-Yates
//! shuffling, and unique-subset sampling.

use std::collections::HashSet;

use crate::core::{EngineError, Result};
use crate::crypto::CryptoSuite;
use crate::engine::FairRng;

impl<C: CryptoSuite> FairRng<C> {
    /// Weighted choice over an ordered slice of (label, weight) pairs.
    ///
    /// Non-finite and non-positive weights are discarded; with no valid
    /// entries left the draw is empty (`None`), not an error. Entries are
    /// walked in slice order, and floating drift resolves to the last valid
    /// entry. Peek only: the counter does not move.
    pub fn pick<'a, L>(&mut self, entries: &'a [(L, f64)]) -> Option<&'a L> {
        let valid: Vec<(&'a L, f64)> = entries
            .iter()
            .filter(|(_, weight)| weight.is_finite() && *weight > 0.0)
            .map(|(label, weight)| (label, *weight))
            .collect();
        if valid.is_empty() {
            return None;
        }
        let total: f64 = valid.iter().map(|(_, weight)| weight).sum();
        let mut t = self.uniform_float() * total;
        for &(label, weight) in &valid {
            t -= weight;
            if t < 0.0 {
                return Some(label);
            }
        }
        valid.last().map(|(label, _)| *label)
    }

    /// Uniform in-place permutation (Fisher-Yates), advancing the counter
    /// once per element.
    pub fn shuffle<T>(&mut self, items: &mut [T]) -> Result<()> {
        for m in (1..=items.len()).rev() {
            let i = self.next_int(0, m as i64 - 1)?;
            items.swap(m - 1, i as usize);
        }
        Ok(())
    }

    /// Up to `size` distinct integers from `[min, max]`, in draw order.
    ///
    /// A `size` larger than the domain clamps to the domain; duplicated
    /// draws are discarded and redrawn.
    pub fn sample_unique(&mut self, min: i64, max: i64, size: usize) -> Result<Vec<i64>> {
        if max < min {
            return Err(EngineError::Range(format!(
                "max ({max}) is less than min ({min})"
            )));
        }
        let domain = (max as i128 - min as i128 + 1) as u128;
        let target = if (size as u128) > domain {
            domain as usize
        } else {
            size
        };
        let mut picked = Vec::with_capacity(target);
        let mut seen = HashSet::with_capacity(target);
        while picked.len() < target {
            let v = self.next_int(min, max)?;
            if seen.insert(v) {
                picked.push(v);
            }
        }
        Ok(picked)
    }
}
