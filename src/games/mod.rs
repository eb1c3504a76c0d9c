//! Game-specific numeric models built on the deterministic stream.

mod crash;
mod pump;

pub use pump::PumpGame;
