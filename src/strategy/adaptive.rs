// src/strategy/adaptive.rs
//
// Policies that carry forecasts, beliefs, or error trackers across periods.
// Each instance owns its history; constructing a fresh instance is the only
// reset.

use crate::model::state::RoleState;
use crate::strategy::traits::OrderPolicy;

fn position(state: &RoleState) -> i64 {
    i64::from(state.inventory_on_hand) + i64::from(state.pipeline_on_order)
        - i64::from(state.backlog)
}

// =========================================================================
// 1. SignalChaser (momentum follower)
// =========================================================================

/// Treats every movement in recent demand as a trend and extrapolates it
/// aggressively, with a "don't miss the boom" buffer on upswings. Never
/// orders below current demand. Reads only its own history — neighbor
/// snapshots are ignored even when present.
#[derive(Debug, Clone)]
pub struct SignalChaser {
    trend_sensitivity: f64,
    momentum_window: usize,
    extrapolation_factor: f64,
    min_trend_threshold: f64,
    demand_history: Vec<u32>,
}

impl SignalChaser {
    pub fn new(trend_sensitivity: f64) -> Self {
        Self {
            trend_sensitivity,
            momentum_window: 3,
            extrapolation_factor: 1.8,
            min_trend_threshold: 1.0,
            demand_history: Vec::new(),
        }
    }
}

impl Default for SignalChaser {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl OrderPolicy for SignalChaser {
    fn decide_order(&mut self, state: &RoleState) -> i64 {
        let current = f64::from(state.incoming_order);
        self.demand_history.push(state.incoming_order);
        if self.demand_history.len() > self.momentum_window + 2 {
            self.demand_history.remove(0);
        }

        let len = self.demand_history.len();
        if len < 2 {
            return i64::from(state.incoming_order);
        }

        let mut trend = if len >= self.momentum_window {
            let recent = &self.demand_history[len - self.momentum_window..];
            let recent_avg =
                recent.iter().map(|&v| f64::from(v)).sum::<f64>() / recent.len() as f64;
            let older =
                &self.demand_history[len.saturating_sub(self.momentum_window + 1)..len - 1];
            let older_avg = if older.is_empty() {
                recent_avg
            } else {
                older.iter().map(|&v| f64::from(v)).sum::<f64>() / older.len() as f64
            };
            recent_avg - older_avg
        } else {
            f64::from(self.demand_history[len - 1]) - f64::from(self.demand_history[len - 2])
        };

        if trend.abs() < self.min_trend_threshold {
            trend = 0.0;
        }

        let order = if trend > 0.0 {
            let projected =
                current + trend * self.extrapolation_factor * self.trend_sensitivity;
            let boom_buffer = ((trend * 2.0) as i64).max(2) as f64;
            projected + boom_buffer
        } else if trend < 0.0 {
            // Downtrends are chased half-heartedly.
            let projected = current + trend * self.extrapolation_factor * 0.7;
            f64::max(current * 0.5, projected)
        } else if len >= 3 {
            // Flat trend: read acceleration out of the noise.
            let recent_change = f64::from(self.demand_history[len - 1])
                - f64::from(self.demand_history[len - 2]);
            let previous_change = f64::from(self.demand_history[len - 2])
                - f64::from(self.demand_history[len - 3]);
            let acceleration = recent_change - previous_change;
            if acceleration != 0.0 {
                current + acceleration * self.trend_sensitivity * 0.5
            } else {
                current
            }
        } else {
            current
        };

        // Optimists rarely order below what just sold.
        (f64::max(current, order) as i64).max(0)
    }
}

// =========================================================================
// 2. Stabilizer (system thinker)
// =========================================================================

/// Dampens amplification: exponentially smoothed demand estimate,
/// pipeline-aware order-up-to, and a hard rate limit on the correction so
/// a single bad period can't produce a shock order. Smoothing widens when
/// observed variance rises. When neighbor snapshots are attached the
/// estimate is blended with upstream and downstream signals.
#[derive(Debug, Clone)]
pub struct Stabilizer {
    target_inventory: i64,
    smoothing_alpha: f64,
    max_correction: i64,
    adapt_smoothing: bool,
    smoothed_demand: Option<f64>,
    demand_history: Vec<u32>,
}

impl Stabilizer {
    pub fn new(target_inventory: u32) -> Self {
        Self {
            target_inventory: i64::from(target_inventory),
            smoothing_alpha: 0.3,
            max_correction: 4,
            adapt_smoothing: true,
            smoothed_demand: None,
            demand_history: Vec::new(),
        }
    }

    fn current_alpha(&self) -> f64 {
        if !self.adapt_smoothing || self.demand_history.len() < 4 {
            return self.smoothing_alpha;
        }
        let start = self.demand_history.len().saturating_sub(8);
        let recent = &self.demand_history[start..];
        let mean = recent.iter().map(|&v| f64::from(v)).sum::<f64>() / recent.len() as f64;
        let variance = recent
            .iter()
            .map(|&v| (f64::from(v) - mean).powi(2))
            .sum::<f64>()
            / recent.len() as f64;
        // More variance, more smoothing.
        if variance > 4.0 {
            (self.smoothing_alpha * 0.6).max(0.1)
        } else {
            self.smoothing_alpha
        }
    }
}

impl OrderPolicy for Stabilizer {
    fn decide_order(&mut self, state: &RoleState) -> i64 {
        let demand = f64::from(state.incoming_order);
        self.demand_history.push(state.incoming_order);
        if self.demand_history.len() > 16 {
            self.demand_history.remove(0);
        }

        let alpha = self.current_alpha();
        let smoothed = match self.smoothed_demand {
            None => demand,
            Some(prev) => alpha * demand + (1.0 - alpha) * prev,
        };
        self.smoothed_demand = Some(smoothed);

        let gap = self.target_inventory - position(state);
        let correction = gap.clamp(-self.max_correction, self.max_correction);

        let mut order = (smoothed + correction as f64) as i64;

        let target = self.target_inventory as f64;
        if let Some(up) = &state.upstream {
            if f64::from(up.inventory_on_hand) > target * 1.5 {
                // Upstream is flush; supply is safe, ease off.
                order = (order as f64 * 0.75) as i64;
            } else if up.backlog > 0 || up.inventory_on_hand < 3 {
                // Upstream is struggling; don't pile on more pressure.
                order = (order as f64 * 0.85) as i64;
            }
        }
        if let Some(down) = &state.downstream {
            if f64::from(down.inventory_on_hand) > target * 1.5 {
                // Downstream glut means their orders will drop soon.
                order = (order as f64 * 0.8) as i64;
            } else if f64::from(down.backlog) > target * 0.5 {
                // Downstream is drowning; prepare to ship more, still
                // rate-limited.
                order = (order + 2).min((smoothed * 1.3) as i64);
            }
        }

        order.max(0)
    }
}

// =========================================================================
// 3. BayesianUpdater
// =========================================================================

/// Keeps a running posterior over demand (mean and variance with a
/// pseudo-count prior). Corrections toward the inventory target are
/// confidence-weighted: the more evidence accumulated, the smaller the
/// step. Never panics by construction.
#[derive(Debug, Clone)]
pub struct BayesianUpdater {
    target_inventory: i64,
    demand_mean: f64,
    demand_var: f64,
    n: u32,
}

impl BayesianUpdater {
    pub fn new(target_inventory: u32, prior_demand: f64, prior_strength: u32) -> Self {
        Self {
            target_inventory: i64::from(target_inventory),
            demand_mean: prior_demand,
            demand_var: 1.0,
            n: prior_strength,
        }
    }
}

impl Default for BayesianUpdater {
    fn default() -> Self {
        Self::new(12, 4.0, 5)
    }
}

impl OrderPolicy for BayesianUpdater {
    fn decide_order(&mut self, state: &RoleState) -> i64 {
        let obs = f64::from(state.incoming_order);
        self.n += 1;

        // Online posterior update of mean and variance.
        let old_mean = self.demand_mean;
        self.demand_mean += (obs - self.demand_mean) / f64::from(self.n);
        self.demand_var +=
            (obs - old_mean) * (obs - self.demand_mean) - self.demand_var / f64::from(self.n);

        let gap = self.target_inventory - position(state);
        let confidence = (f64::from(self.n) / 20.0).min(1.0);
        let correction = gap as f64 * (1.0 - confidence * 0.5);

        ((self.demand_mean + correction) as i64).max(0)
    }
}

// =========================================================================
// 4. Inverter (worst-case avoider)
// =========================================================================

/// Asks what the most harmful order would be and picks the opposite:
/// never zero while backlogged, never a glut order, never a large jump
/// from the previous order. The candidate is demand plus half the
/// position gap, rate-limited around the last placed order.
#[derive(Debug, Clone)]
pub struct Inverter {
    target_inventory: i64,
    max_change_rate: i64,
}

impl Inverter {
    pub fn new(target_inventory: u32, max_change_rate: u32) -> Self {
        Self {
            target_inventory: i64::from(target_inventory),
            max_change_rate: i64::from(max_change_rate),
        }
    }
}

impl Default for Inverter {
    fn default() -> Self {
        Self::new(12, 3)
    }
}

impl OrderPolicy for Inverter {
    fn decide_order(&mut self, state: &RoleState) -> i64 {
        let gap = self.target_inventory - position(state);
        let ideal = f64::from(state.incoming_order) + gap as f64 * 0.5;

        let last = i64::from(state.last_placed_order);
        let low = (last - self.max_change_rate) as f64;
        let high = (last + self.max_change_rate) as f64;
        let mut candidate = ideal.clamp(low, high);

        // Zero-ordering into a backlog is the one guaranteed failure.
        if candidate <= 0.0 && state.backlog > 0 {
            candidate = f64::from(state.incoming_order).max(1.0);
        }

        (candidate as i64).max(0)
    }
}

// =========================================================================
// 5. AntifragileAdapter
// =========================================================================

/// Learns from its own forecast errors: the safety buffer grows while
/// trailing error is high and shrinks back toward a floor when accuracy
/// returns, bounded above by `max_buffer`. Volatile stretches therefore
/// raise the target; calm stretches lower it again.
#[derive(Debug, Clone)]
pub struct AntifragileAdapter {
    target_inventory: f64,
    dynamic_buffer: f64,
    learning_rate: f64,
    max_buffer: f64,
    smoothed_demand: Option<f64>,
    last_prediction: Option<f64>,
    error_history: Vec<f64>,
}

impl AntifragileAdapter {
    pub fn new(target_inventory: u32) -> Self {
        Self {
            target_inventory: f64::from(target_inventory),
            dynamic_buffer: 1.0,
            learning_rate: 0.1,
            max_buffer: 6.0,
            smoothed_demand: None,
            last_prediction: None,
            error_history: Vec::new(),
        }
    }
}

impl OrderPolicy for AntifragileAdapter {
    fn decide_order(&mut self, state: &RoleState) -> i64 {
        let demand = f64::from(state.incoming_order);

        let smoothed = match self.smoothed_demand {
            None => demand,
            Some(prev) => 0.3 * demand + 0.7 * prev,
        };
        self.smoothed_demand = Some(smoothed);

        if let Some(prediction) = self.last_prediction {
            let error = (demand - prediction).abs();
            self.error_history.push(error);
            if self.error_history.len() > 12 {
                self.error_history.remove(0);
            }

            let avg_error =
                self.error_history.iter().sum::<f64>() / self.error_history.len() as f64;
            if avg_error > 2.0 {
                self.dynamic_buffer =
                    (self.dynamic_buffer + self.learning_rate * avg_error).min(self.max_buffer);
            } else if avg_error < 1.0 {
                self.dynamic_buffer = (self.dynamic_buffer - self.learning_rate).max(0.5);
            }
        }

        let adjusted_target = self.target_inventory + self.dynamic_buffer;
        let gap = adjusted_target - position(state) as f64;
        let mut order = (smoothed + f64::max(0.0, gap * 0.5)) as i64;

        if let Some(up) = &state.upstream {
            if f64::from(up.inventory_on_hand) > self.target_inventory {
                order = (order as f64 * 0.85) as i64;
            } else if up.backlog > 0 {
                order = (order as f64 * 0.9) as i64;
            }
        }
        if let Some(down) = &state.downstream {
            if f64::from(down.inventory_on_hand) > self.target_inventory * 1.3 {
                order = (order as f64 * 0.8) as i64;
            } else if down.backlog > 3 {
                order = (order + 1).min((smoothed * 1.2) as i64);
            }
        }

        self.last_prediction = Some(smoothed);
        order.max(0)
    }
}

// =========================================================================
// 6. InfoAware
// =========================================================================

/// Built to exploit neighbor visibility: the Stabilizer skeleton plus an
/// adjustment term read from upstream and downstream snapshots — heavier
/// downstream backlog pre-orders, downstream or upstream glut pulls back,
/// a stressed upstream is not leaned on. Without snapshots it degrades to
/// a plain pipeline-aware order-up-to.
#[derive(Debug, Clone)]
pub struct InfoAware {
    target_inventory: f64,
    smoothing_alpha: f64,
    info_weight: f64,
    smoothed_demand: Option<f64>,
}

impl InfoAware {
    pub fn new(target_inventory: u32, info_weight: f64) -> Self {
        Self {
            target_inventory: f64::from(target_inventory),
            smoothing_alpha: 0.3,
            info_weight,
            smoothed_demand: None,
        }
    }
}

impl Default for InfoAware {
    fn default() -> Self {
        Self::new(12, 0.5)
    }
}

impl OrderPolicy for InfoAware {
    fn decide_order(&mut self, state: &RoleState) -> i64 {
        let demand = f64::from(state.incoming_order);

        let smoothed = match self.smoothed_demand {
            None => demand,
            Some(prev) => self.smoothing_alpha * demand + (1.0 - self.smoothing_alpha) * prev,
        };
        self.smoothed_demand = Some(smoothed);

        let gap = self.target_inventory - position(state) as f64;
        let base_order = smoothed + gap.clamp(-3.0, 3.0);

        let mut adjustment = 0.0;

        if let Some(down) = &state.downstream {
            let down_inv = f64::from(down.inventory_on_hand);
            // Heavy downstream backlog: demand stays high, get ahead of it.
            if down.backlog > 3 {
                adjustment += (f64::from(down.backlog) * 0.3).min(3.0);
            }
            // Downstream glut: their orders will drop, pull back now.
            if down_inv > self.target_inventory * 1.5 {
                adjustment -= ((down_inv - self.target_inventory) * 0.2).min(3.0);
            }
            // Their last order is a leading indicator of ramp-up/wind-down.
            if f64::from(down.last_placed_order) > demand * 1.3 {
                adjustment += 1.0;
            } else if f64::from(down.last_placed_order) < demand * 0.7 {
                adjustment -= 1.0;
            }
        }

        if let Some(up) = &state.upstream {
            // A backlogged upstream can't fill a big order anyway.
            if up.backlog > 2 {
                adjustment -= (f64::from(up.backlog) * 0.2).min(2.0);
            }
            if f64::from(up.inventory_on_hand) > self.target_inventory * 2.0 {
                adjustment += 0.5;
            }
        }

        ((base_order + adjustment * self.info_weight) as i64).max(0)
    }
}
