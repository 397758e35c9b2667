// src/strategy/optimization.rs
//
// Newsvendor sizing for order-up-to targets: turns the holding/backlog
// cost structure and demand statistics into a base-stock level instead of
// a hand-picked number.

/// Probability of not stocking out that balances overstocking against
/// understocking: `backlog_cost / (backlog_cost + holding_cost)`.
pub fn critical_ratio(backlog_cost: f64, holding_cost: f64) -> f64 {
    let total = backlog_cost + holding_cost;
    if total == 0.0 {
        return 0.0;
    }
    backlog_cost / total
}

/// Standard-normal quantile via the Abramowitz & Stegun 26.2.23 rational
/// approximation (absolute error < 4.5e-4). Saturates at ±5 sigma.
fn inverse_normal_cdf(p: f64) -> f64 {
    if p >= 1.0 {
        return 5.0;
    }
    if p <= 0.0 {
        return -5.0;
    }
    if p == 0.5 {
        return 0.0;
    }

    // Valid for the lower tail; mirror the upper one.
    let q = p.min(1.0 - p);
    let t = (-2.0 * q.ln()).sqrt();

    const C: [f64; 3] = [2.515517, 0.802853, 0.010328];
    const D: [f64; 3] = [1.432788, 0.189269, 0.001308];

    let numerator = C[0] + C[1] * t + C[2] * t * t;
    let denominator = 1.0 + D[0] * t + D[1] * t * t + D[2] * t * t * t;
    let x = t - numerator / denominator;

    if p < 0.5 {
        -x
    } else {
        x
    }
}

/// Optimal order-up-to level for i.i.d. per-period demand.
///
/// The stock ordered now must cover demand until the next order can
/// arrive, so the risk horizon is the full lead time plus one review
/// period:
///
/// `target = mu * H + z * sigma * sqrt(H)` with `H = lead_time + 1`.
pub fn optimal_base_stock(
    backlog_cost: f64,
    holding_cost: f64,
    avg_period_demand: f64,
    std_dev_period_demand: f64,
    lead_time_periods: usize,
) -> u32 {
    let z = inverse_normal_cdf(critical_ratio(backlog_cost, holding_cost));
    let horizon = (lead_time_periods + 1) as f64;

    let mu = avg_period_demand * horizon;
    let sigma = std_dev_period_demand * horizon.sqrt();

    let target = mu + z * sigma;
    if target < 0.0 {
        0
    } else {
        target.round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_ratio_standard_costs() {
        let cr = critical_ratio(1.0, 0.5);
        assert!((cr - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(critical_ratio(0.0, 0.0), 0.0);
    }

    #[test]
    fn quantile_is_symmetric_around_half() {
        assert_eq!(inverse_normal_cdf(0.5), 0.0);
        let upper = inverse_normal_cdf(0.9);
        let lower = inverse_normal_cdf(0.1);
        assert!((upper + lower).abs() < 1e-9);
        // z(0.9) is about 1.2816 with this approximation's error bound.
        assert!((upper - 1.2816).abs() < 5e-3);
    }

    #[test]
    fn base_stock_grows_with_backlog_cost() {
        let cheap = optimal_base_stock(1.0, 0.5, 4.0, 2.0, 3);
        let dear = optimal_base_stock(10.0, 0.5, 4.0, 2.0, 3);
        assert!(dear > cheap);
    }

    #[test]
    fn base_stock_covers_mean_demand_over_horizon() {
        // Balanced costs put the target at exactly the horizon mean.
        let target = optimal_base_stock(1.0, 1.0, 4.0, 2.0, 3);
        assert_eq!(target, 16);
    }
}
