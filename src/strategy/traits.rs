// src/strategy/traits.rs

use crate::model::state::RoleState;
use std::fmt::Debug;

/// Decision-making logic for one role in the chain.
///
/// The contract: look at the period snapshot, return a non-negative order
/// quantity. The return type is signed so a misbehaving implementation can
/// be observed rather than silently wrapped; the engine clamps negatives to
/// zero and records the violation instead of aborting the run.
///
/// Implementations may keep private mutable history (forecasts, error
/// trackers). Resetting that history means constructing a fresh instance.
///
/// `Debug` lets the engine name the policy in diagnostics; `Send + Sync`
/// keeps the door open for a parallel batch runner.
pub trait OrderPolicy: Debug + Send + Sync {
    fn decide_order(&mut self, state: &RoleState) -> i64;
}
