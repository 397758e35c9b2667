// src/errors.rs

use crate::model::state::Role;
use thiserror::Error;

/// Rejected configuration. Raised at construction time, before any period
/// runs; the message names the offending parameter and the constraint.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("periods must be greater than zero (got {0})")]
    NonPositivePeriods(usize),

    #[error("{name} must be non-negative and finite (got {value})")]
    InvalidCost { name: &'static str, value: f64 },

    #[error("unknown information_sharing mode `{0}` (expected `none` or `adjacent`)")]
    UnknownSharingMode(String),

    #[error("exactly 4 order policies are required, one per role (got {0})")]
    WrongPolicyCount(usize),
}

/// Engine invariant breach. If this fires the engine itself is wrong, not
/// the caller; the run aborts and reports where.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("state invariant violated at period {period} for {role}: {detail}")]
    StateInvariant {
        period: usize,
        role: Role,
        detail: String,
    },
}

/// Failures while exporting the log or scenario summaries.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Either construction or run failure of a scenario batch.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
}
