// src/strategy/reactive.rs
//
// Policies that react to the current snapshot with little or no memory.

use crate::model::state::RoleState;
use crate::seeding::period_rng;
use crate::simulation::config::SimulationConfig;
use crate::strategy::optimization::optimal_base_stock;
use crate::strategy::traits::OrderPolicy;
use rand::Rng;
use std::collections::VecDeque;

// =========================================================================
// 1. PassivePipeline (order-up-to)
// =========================================================================

/// The canonical base-stock policy and the lowest-bullwhip baseline.
///
/// Order whatever is needed to bring on-hand plus on-order stock back to
/// the target after serving current demand and backlog:
///
/// `order = max(0, target + demand + backlog - (inventory + pipeline))`
#[derive(Debug, Clone)]
pub struct PassivePipeline {
    target_inventory: i64,
}

impl PassivePipeline {
    pub fn new(target_inventory: u32) -> Self {
        Self {
            target_inventory: i64::from(target_inventory),
        }
    }

    /// Sizes the target from the cost structure and demand statistics
    /// (newsvendor model) instead of a hand-picked number.
    pub fn with_optimal_target(
        config: &SimulationConfig,
        avg_demand: f64,
        std_dev_demand: f64,
    ) -> Self {
        let lead_time = config.order_lead_time + config.shipment_lead_time;
        let target = optimal_base_stock(
            config.backlog_cost,
            config.holding_cost,
            avg_demand,
            std_dev_demand,
            lead_time,
        );
        Self::new(target)
    }
}

impl OrderPolicy for PassivePipeline {
    fn decide_order(&mut self, state: &RoleState) -> i64 {
        let shortfall = self.target_inventory + i64::from(state.incoming_order)
            + i64::from(state.backlog)
            - (i64::from(state.inventory_on_hand) + i64::from(state.pipeline_on_order));
        shortfall.max(0)
    }
}

// =========================================================================
// 2. RandomBaseline
// =========================================================================

/// Orders a uniform random amount in `[low, high]`, ignoring state
/// entirely. Control case for testing whether structure in the other
/// policies matters. Draws are derived per `(seed, period)`, so runs are
/// reproducible and re-queryable.
#[derive(Debug, Clone)]
pub struct RandomBaseline {
    low: u32,
    high: u32,
    seed: u64,
}

impl RandomBaseline {
    pub fn new(low: u32, high: u32, seed: u64) -> Self {
        Self { low, high, seed }
    }
}

impl Default for RandomBaseline {
    fn default() -> Self {
        Self::new(0, 10, 42)
    }
}

impl OrderPolicy for RandomBaseline {
    fn decide_order(&mut self, state: &RoleState) -> i64 {
        let mut rng = period_rng(self.seed, state.period_index);
        i64::from(rng.gen_range(self.low..=self.high))
    }
}

// =========================================================================
// 3. AggressiveGrowthHacker
// =========================================================================

/// Over-orders to dodge stockouts at all costs. Demand increases are
/// amplified, decreases barely reduce the order, and low availability or
/// any backlog triggers a panic bonus. A strong bullwhip amplifier.
#[derive(Debug, Clone)]
pub struct AggressiveGrowthHacker {
    amplification_factor: f64,
    safety_buffer: i64,
    panic_threshold: u32,
    last_demand: i64,
}

impl AggressiveGrowthHacker {
    pub fn new(amplification_factor: f64, safety_buffer: u32, panic_threshold: u32) -> Self {
        Self {
            amplification_factor,
            safety_buffer: i64::from(safety_buffer),
            panic_threshold,
            last_demand: 4,
        }
    }
}

impl Default for AggressiveGrowthHacker {
    fn default() -> Self {
        Self::new(1.5, 3, 2)
    }
}

impl OrderPolicy for AggressiveGrowthHacker {
    fn decide_order(&mut self, state: &RoleState) -> i64 {
        let current = i64::from(state.incoming_order);
        let change = current - self.last_demand;

        // Chase increases hard, follow decreases reluctantly.
        let adjusted = if change > 0 {
            current + (change as f64 * self.amplification_factor) as i64
        } else {
            current + ((change as f64 * 0.5) as i64).max(0)
        };

        let mut base = adjusted + self.safety_buffer;

        let total_available = state.inventory_on_hand + state.pipeline_on_order;
        if total_available <= self.panic_threshold || state.backlog > 0 {
            base += i64::from(state.backlog * 2).max(3);
        }

        self.last_demand = current;
        base.max(current)
    }
}

// =========================================================================
// 4. ConservativeCustodian
// =========================================================================

/// Risk-averse minimal-inventory ordering. Consistently orders less than
/// demanded and dismisses spikes as anomalies, until a deep backlog forces
/// one large clearing order.
#[derive(Debug, Clone)]
pub struct ConservativeCustodian {
    conservation_factor: f64,
    max_inventory_target: u32,
    panic_backlog_threshold: u32,
    demand_history: VecDeque<u32>,
    spike_count: i32,
}

impl ConservativeCustodian {
    pub fn new(
        conservation_factor: f64,
        max_inventory_target: u32,
        panic_backlog_threshold: u32,
    ) -> Self {
        Self {
            conservation_factor,
            max_inventory_target,
            panic_backlog_threshold,
            demand_history: VecDeque::new(),
            spike_count: 0,
        }
    }
}

impl Default for ConservativeCustodian {
    fn default() -> Self {
        Self::new(0.8, 8, 5)
    }
}

impl OrderPolicy for ConservativeCustodian {
    fn decide_order(&mut self, state: &RoleState) -> i64 {
        let current = state.incoming_order;
        self.demand_history.push_back(current);
        if self.demand_history.len() > 8 {
            self.demand_history.pop_front();
        }

        let len = self.demand_history.len();
        let (recent_avg, is_spike) = if len >= 3 {
            let recent: u32 = self.demand_history.iter().rev().take(3).sum();
            let recent_avg = f64::from(recent) / 3.0;
            let overall: u32 = self.demand_history.iter().sum();
            let overall_avg = f64::from(overall) / len as f64;
            let is_spike = f64::from(current) > overall_avg * 1.3;
            if is_spike {
                self.spike_count += 1;
            } else {
                self.spike_count = (self.spike_count - 1).max(0);
            }
            (recent_avg, is_spike)
        } else {
            (f64::from(current), false)
        };

        let mut base = (f64::from(current) * self.conservation_factor) as i64;

        // Excess stock: trim the order down toward zero.
        if state.inventory_on_hand > self.max_inventory_target {
            let excess = i64::from(state.inventory_on_hand - self.max_inventory_target);
            base = (base - excess.min(base)).max(0);
        }

        // Deep backlog: one large clearing order.
        if state.backlog >= self.panic_backlog_threshold {
            return i64::from(state.backlog * 2 + current);
        }

        // Early spikes get dismissed as noise; order off the recent average.
        if is_spike && self.spike_count <= 2 && len >= 3 {
            base = (recent_avg * self.conservation_factor) as i64;
        }

        base.max(0)
    }
}

// =========================================================================
// 5. MyopicFirefighter
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Crisis {
    Shortage,
    Overstock,
}

/// Reactive, emotional ordering: swings between zero orders and sudden
/// large ones depending on whichever problem hurts right now. The bounded
/// random volatility term is derived per `(seed, period)`.
#[derive(Debug, Clone)]
pub struct MyopicFirefighter {
    panic_inventory_threshold: u32,
    panic_backlog_threshold: u32,
    overstock_threshold: u32,
    emotional_volatility: f64,
    seed: u64,
    last_crisis: Option<Crisis>,
    crisis_duration: u32,
}

impl MyopicFirefighter {
    pub fn new(emotional_volatility: f64, seed: u64) -> Self {
        Self {
            panic_inventory_threshold: 3,
            panic_backlog_threshold: 2,
            overstock_threshold: 15,
            emotional_volatility,
            seed,
            last_crisis: None,
            crisis_duration: 0,
        }
    }
}

impl Default for MyopicFirefighter {
    fn default() -> Self {
        Self::new(0.3, 42)
    }
}

impl OrderPolicy for MyopicFirefighter {
    fn decide_order(&mut self, state: &RoleState) -> i64 {
        let demand = f64::from(state.incoming_order);
        let mut rng = period_rng(self.seed, state.period_index);

        let inventory_crisis = state.inventory_on_hand <= self.panic_inventory_threshold;
        let backlog_crisis = state.backlog >= self.panic_backlog_threshold;
        let overstock_crisis = state.inventory_on_hand >= self.overstock_threshold;

        let current_crisis = if inventory_crisis || backlog_crisis {
            Some(Crisis::Shortage)
        } else if overstock_crisis {
            Some(Crisis::Overstock)
        } else {
            None
        };

        if current_crisis == self.last_crisis {
            self.crisis_duration += 1;
        } else {
            self.crisis_duration = 1;
            self.last_crisis = current_crisis;
        }

        // Prolonged crises make the swings bigger.
        let mut emotion = 1.0 + self.emotional_volatility * rng.gen_range(-1.0..=1.0);
        if self.crisis_duration > 3 {
            emotion *= 1.5;
        }

        if backlog_crisis {
            let panic = (f64::from(state.backlog) * 3.0 + demand * 2.0) * emotion;
            return (panic as i64).max(0);
        }

        if inventory_crisis {
            return ((demand * 2.5 * emotion) as i64).max(0);
        }

        if overstock_crisis {
            // Mostly stops ordering, with the occasional erratic exception.
            if rng.gen::<f64>() < 0.2 {
                return ((demand * emotion) as i64).max(0);
            }
            return 0;
        }

        let mut base = demand;
        if rng.gen::<f64>() < 0.3 {
            base *= rng.gen_range(0.3..=2.0);
        }
        base *= emotion;
        (base as i64).max(0)
    }
}

// =========================================================================
// 6. RationalAnalyst
// =========================================================================

/// Textbook replenishment with a deliberate blind spot: pipeline stock is
/// never counted, so every shortfall is ordered twice — once to replenish
/// and once because the in-transit shipment "doesn't exist".
#[derive(Debug, Clone)]
pub struct RationalAnalyst {
    target_inventory: i64,
    smoothing: f64,
    smoothed_demand: Option<f64>,
}

impl RationalAnalyst {
    pub fn new(target_inventory: u32, smoothing: f64) -> Self {
        Self {
            target_inventory: i64::from(target_inventory),
            smoothing,
            smoothed_demand: None,
        }
    }
}

impl Default for RationalAnalyst {
    fn default() -> Self {
        Self::new(12, 0.0)
    }
}

impl OrderPolicy for RationalAnalyst {
    fn decide_order(&mut self, state: &RoleState) -> i64 {
        let demand = f64::from(state.incoming_order);

        let smoothed = match self.smoothed_demand {
            Some(prev) if self.smoothing > 0.0 => {
                self.smoothing * prev + (1.0 - self.smoothing) * demand
            }
            _ => demand,
        };
        self.smoothed_demand = Some(smoothed);

        let gap = (self.target_inventory - i64::from(state.inventory_on_hand)).max(0);
        ((smoothed + gap as f64) as i64).max(0)
    }
}

// =========================================================================
// 7. ProductionSmoother
// =========================================================================

/// Keeps production steady: rolling average of recent demand with a small
/// gradual backlog correction, clamped to a capacity band. Ignores order
/// surges by design.
#[derive(Debug, Clone)]
pub struct ProductionSmoother {
    window_size: usize,
    min_production: i64,
    max_production: i64,
    order_history: VecDeque<u32>,
}

impl ProductionSmoother {
    pub fn new(window_size: usize, min_production: u32, max_production: u32) -> Self {
        Self {
            window_size: window_size.max(1),
            min_production: i64::from(min_production),
            max_production: i64::from(max_production),
            order_history: VecDeque::new(),
        }
    }
}

impl Default for ProductionSmoother {
    fn default() -> Self {
        Self::new(5, 2, 15)
    }
}

impl OrderPolicy for ProductionSmoother {
    fn decide_order(&mut self, state: &RoleState) -> i64 {
        self.order_history.push_back(state.incoming_order);
        if self.order_history.len() > self.window_size {
            self.order_history.pop_front();
        }

        let sum: u32 = self.order_history.iter().sum();
        let avg = f64::from(sum) / self.order_history.len() as f64;

        let backlog_adj = if state.backlog > 0 {
            i64::from(state.backlog / 3).min(2)
        } else {
            0
        };

        let production = (avg as i64) + backlog_adj;
        production.clamp(self.min_production, self.max_production)
    }
}
