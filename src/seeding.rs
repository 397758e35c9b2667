// src/seeding.rs

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Builds a generator for one period, derived from `(seed, period)` rather
/// than from a sequentially advanced global generator. Querying period 7
/// before period 3, or the same period twice, always yields the same draws,
/// which keeps every run restartable and every sequence queryable out of
/// order.
pub fn period_rng(seed: u64, period: usize) -> StdRng {
    // Golden-ratio multiplier spreads consecutive periods across the seed
    // space (splitmix64 increment).
    let mixed = seed ^ (period as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    StdRng::seed_from_u64(mixed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn same_seed_and_period_give_same_draws() {
        let a: f64 = period_rng(42, 7).gen();
        let b: f64 = period_rng(42, 7).gen();
        assert_eq!(a, b);
    }

    #[test]
    fn different_periods_give_different_draws() {
        let a: f64 = period_rng(42, 7).gen();
        let b: f64 = period_rng(42, 8).gen();
        assert_ne!(a, b);
    }
}
