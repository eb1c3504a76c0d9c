// Pump (balloon) game: burst positions hidden among `size` slots, with a
// hypergeometric survival curve and fixed-point payouts.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::crash::normalize_edge;
use crate::core::{EngineError, Result};
use crate::crypto::CryptoSuite;
use crate::engine::FairRng;

/// One dealt round of the pump game.
///
/// The balloon survives pump `k` while `k` stays below the pop point; the
/// pop point is one past the smallest burst position.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PumpGame {
    size: u32,
    burst_count: u32,
    edge: f64,
    burst_positions: Vec<u32>,
    pop_point: u32,
}

impl<C: CryptoSuite> FairRng<C> {
    /// Deal a pump round: `burst_count` distinct burst positions hidden in
    /// `size` slots, chosen by partial Fisher-Yates over `[0, size)`.
    /// Advances the counter once per selection.
    pub fn pump(&mut self, burst_count: u32, size: u32, edge: f64) -> Result<PumpGame> {
        if size < 2 {
            return Err(EngineError::InvalidParameter(format!(
                "pump size must be at least 2, got {size}"
            )));
        }
        if burst_count == 0 || burst_count > size {
            return Err(EngineError::InvalidParameter(format!(
                "burst count must be in [1, {size}], got {burst_count}"
            )));
        }
        let edge = normalize_edge(edge)?;

        let mut slots: Vec<u32> = (0..size).collect();
        for t in 0..burst_count as usize {
            let j = self.next_int(t as i64, i64::from(size) - 1)?;
            slots.swap(t, j as usize);
        }
        let mut burst_positions = slots[..burst_count as usize].to_vec();
        burst_positions.sort_unstable();
        let pop_point = 1 + burst_positions[0];

        Ok(PumpGame {
            size,
            burst_count,
            edge,
            burst_positions,
            pop_point,
        })
    }
}

impl PumpGame {
    /// Pump number at which the balloon bursts, in `[1, size]`.
    pub fn pop_point(&self) -> u32 {
        self.pop_point
    }

    /// Burst positions as 0-based slot indices, ascending.
    pub fn burst_positions(&self) -> &[u32] {
        &self.burst_positions
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn burst_count(&self) -> u32 {
        self.burst_count
    }

    /// Normalized edge fraction in [0, 1].
    pub fn edge(&self) -> f64 {
        self.edge
    }

    /// Largest number of pumps that can ever succeed.
    pub fn max_safe_pumps(&self) -> u32 {
        self.size - self.burst_count
    }

    /// Probability the balloon survives `k` pumps: the hypergeometric
    /// product over draws without replacement. 1 at `k = 0`, 0 past
    /// [`PumpGame::max_safe_pumps`].
    pub fn survival_probability(&self, k: u32) -> f64 {
        if k == 0 {
            return 1.0;
        }
        if k > self.max_safe_pumps() {
            return 0.0;
        }
        let size = f64::from(self.size);
        let safe = f64::from(self.max_safe_pumps());
        let mut p = 1.0;
        for t in 0..k {
            let t = f64::from(t);
            p *= (safe - t) / (size - t);
        }
        p
    }

    /// Payout after `k` surviving pumps: `(1 - edge) / survival(k)`.
    ///
    /// The division chain runs in integer hundredths (round-half-up per
    /// step) so results are identical across platforms. Zero at or past
    /// the pop point.
    pub fn payout_multiplier(&self, k: u32) -> f64 {
        if k >= self.pop_point {
            return 0.0;
        }
        let mut cents: u128 = ((1.0 - self.edge) * 100.0).round() as u128;
        for t in 0..u128::from(k) {
            let num = u128::from(self.size) - t;
            let den = u128::from(self.max_safe_pumps()) - t;
            cents = (cents * num + den / 2) / den;
        }
        cents as f64 / 100.0
    }

    /// Whether the balloon has burst once `k` reaches the pop point.
    pub fn is_burst_at(&self, k: u32) -> bool {
        k >= self.pop_point
    }

    /// Still in play after `k` pumps.
    pub fn can_continue_at(&self, k: u32) -> bool {
        k < self.pop_point
    }

    /// Whether pump `k + 1` bursts the balloon.
    pub fn will_burst_next(&self, k: u32) -> bool {
        k.saturating_add(1) >= self.pop_point
    }
}
