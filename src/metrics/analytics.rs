// src/metrics/analytics.rs
//
// Everything here consumes the append-only simulation log; nothing reaches
// back into engine state.

use crate::errors::ScenarioError;
use crate::io::demand::DemandPattern;
use crate::model::state::{Role, ROLES};
use crate::simulation::config::SimulationConfig;
use crate::simulation::engine::{ChainSimulation, LogRecord};
use crate::strategy::traits::OrderPolicy;
use serde::Serialize;

/// Periods dropped from the front of the log before computing bullwhip.
/// The default keeps the transient in: start-up dynamics are part of what
/// the amplification measurement is about, and dropping them silently
/// would hide exactly the ramp a step in demand produces. Callers studying
/// steady state pass their own warm-up.
pub const DEFAULT_WARM_UP: usize = 0;

/// Unbiased sample variance (n - 1). Fewer than two samples has no
/// variance, reported as NaN.
fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
}

fn per_role<'a>(log: &'a [LogRecord], role: Role) -> impl Iterator<Item = &'a LogRecord> {
    log.iter().filter(move |r| r.role == role)
}

/// Variance amplification per role: `Var(placed_order) / Var(incoming_order)`
/// over the log, after dropping the first `warm_up` periods. A role whose
/// incoming demand never varies has an undefined factor, reported as NaN —
/// degenerate, not an error.
pub fn bullwhip_by_role(log: &[LogRecord], warm_up: usize) -> Vec<(Role, f64)> {
    ROLES
        .iter()
        .map(|&role| {
            let placed: Vec<f64> = per_role(log, role)
                .filter(|r| r.period >= warm_up)
                .map(|r| f64::from(r.placed_order))
                .collect();
            let incoming: Vec<f64> = per_role(log, role)
                .filter(|r| r.period >= warm_up)
                .map(|r| f64::from(r.incoming_order))
                .collect();
            let denominator = sample_variance(&incoming);
            let factor = if denominator == 0.0 || denominator.is_nan() {
                f64::NAN
            } else {
                sample_variance(&placed) / denominator
            };
            (role, factor)
        })
        .collect()
}

/// Holding plus backlog cost summed over every role and period.
pub fn system_cost(log: &[LogRecord]) -> f64 {
    log.iter().map(|r| r.cost_holding + r.cost_backlog).sum()
}

/// Fill rate per role: fraction of periods that closed with zero backlog.
pub fn service_level_by_role(log: &[LogRecord]) -> Vec<(Role, f64)> {
    ROLES
        .iter()
        .map(|&role| {
            let mut periods = 0usize;
            let mut clean = 0usize;
            for r in per_role(log, role) {
                periods += 1;
                if r.backlog == 0 {
                    clean += 1;
                }
            }
            let rate = if periods == 0 {
                f64::NAN
            } else {
                clean as f64 / periods as f64
            };
            (role, rate)
        })
        .collect()
}

/// Mean absolute period-over-period change in placed orders, per role.
/// Zero for a perfectly steady orderer.
pub fn order_oscillation_by_role(log: &[LogRecord]) -> Vec<(Role, f64)> {
    ROLES
        .iter()
        .map(|&role| {
            let orders: Vec<f64> = per_role(log, role)
                .map(|r| f64::from(r.placed_order))
                .collect();
            let oscillation = if orders.len() < 2 {
                0.0
            } else {
                orders
                    .windows(2)
                    .map(|w| (w[1] - w[0]).abs())
                    .sum::<f64>()
                    / (orders.len() - 1) as f64
            };
            (role, oscillation)
        })
        .collect()
}

/// Headline numbers for one run, used for cross-scenario ranking.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioSummary {
    pub name: String,
    pub system_cost: f64,
    /// Mean bullwhip over roles with a defined factor; NaN when every role
    /// is degenerate.
    pub avg_bullwhip: f64,
    pub max_bullwhip: f64,
    pub avg_fill_rate: f64,
    /// 1 = cheapest.
    pub cost_rank: usize,
    /// 1 = least amplification.
    pub bullwhip_rank: usize,
}

pub fn summarize_run(name: &str, log: &[LogRecord], warm_up: usize) -> ScenarioSummary {
    let finite: Vec<f64> = bullwhip_by_role(log, warm_up)
        .into_iter()
        .map(|(_, f)| f)
        .filter(|f| f.is_finite())
        .collect();
    let (avg_bullwhip, max_bullwhip) = if finite.is_empty() {
        (f64::NAN, f64::NAN)
    } else {
        let avg = finite.iter().sum::<f64>() / finite.len() as f64;
        let max = finite.iter().cloned().fold(f64::MIN, f64::max);
        (avg, max)
    };

    let fill_rates: Vec<f64> = service_level_by_role(log).into_iter().map(|(_, f)| f).collect();
    let avg_fill_rate = fill_rates.iter().sum::<f64>() / fill_rates.len() as f64;

    ScenarioSummary {
        name: name.to_string(),
        system_cost: system_cost(log),
        avg_bullwhip,
        max_bullwhip,
        avg_fill_rate,
        cost_rank: 0,
        bullwhip_rank: 0,
    }
}

/// Ranks already-run scenarios by system cost (primary ordering of the
/// returned vector) and by average bullwhip. NaN bullwhip ranks last.
pub fn compare_runs(runs: &[(&str, &[LogRecord])], warm_up: usize) -> Vec<ScenarioSummary> {
    let mut summaries: Vec<ScenarioSummary> = runs
        .iter()
        .map(|(name, log)| summarize_run(name, log, warm_up))
        .collect();

    let mut by_bullwhip: Vec<usize> = (0..summaries.len()).collect();
    by_bullwhip.sort_by(|&a, &b| {
        let (x, y) = (summaries[a].avg_bullwhip, summaries[b].avg_bullwhip);
        match (x.is_nan(), y.is_nan()) {
            (true, true) => std::cmp::Ordering::Equal,
            (true, false) => std::cmp::Ordering::Greater,
            (false, true) => std::cmp::Ordering::Less,
            (false, false) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
        }
    });
    for (rank, &idx) in by_bullwhip.iter().enumerate() {
        summaries[idx].bullwhip_rank = rank + 1;
    }

    summaries.sort_by(|a, b| {
        a.system_cost
            .partial_cmp(&b.system_cost)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for (rank, summary) in summaries.iter_mut().enumerate() {
        summary.cost_rank = rank + 1;
    }
    summaries
}

/// One named configuration for a comparison batch. Each scenario owns its
/// policies and seeds, so every run is isolated and independently
/// reproducible.
pub struct Scenario {
    pub name: String,
    pub config: SimulationConfig,
    pub demand: DemandPattern,
    pub policies: Vec<Box<dyn OrderPolicy>>,
}

/// Runs each scenario to completion and ranks the results.
pub fn run_and_compare(
    scenarios: Vec<Scenario>,
    warm_up: usize,
) -> Result<Vec<ScenarioSummary>, ScenarioError> {
    let mut logs: Vec<(String, Vec<LogRecord>)> = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        let mut sim = ChainSimulation::new(scenario.config, scenario.demand, scenario.policies)?;
        sim.run()?;
        logs.push((scenario.name, sim.history));
    }
    let borrowed: Vec<(&str, &[LogRecord])> = logs
        .iter()
        .map(|(name, log)| (name.as_str(), log.as_slice()))
        .collect();
    Ok(compare_runs(&borrowed, warm_up))
}
