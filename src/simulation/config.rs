// src/simulation/config.rs

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How much of the chain each role can see when deciding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InformationSharing {
    /// Classic setup: each role sees only its own state.
    None,
    /// Each role additionally sees a snapshot of its direct neighbors.
    Adjacent,
}

impl FromStr for InformationSharing {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(InformationSharing::None),
            "adjacent" => Ok(InformationSharing::Adjacent),
            other => Err(ConfigError::UnknownSharingMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub periods: usize,
    pub order_lead_time: usize,
    pub shipment_lead_time: usize,
    pub initial_inventory: u32,
    /// Units already in transit toward each role, one batch per inbound
    /// shipment slot (arrival periods 0..shipment_lead_time).
    pub initial_pipeline: u32,
    pub holding_cost: f64,
    pub backlog_cost: f64,
    pub random_seed: u64,
    pub information_sharing: InformationSharing,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            periods: 52,
            order_lead_time: 1,
            shipment_lead_time: 2,
            initial_inventory: 12,
            initial_pipeline: 4,
            holding_cost: 0.5,
            backlog_cost: 1.0,
            random_seed: 42,
            information_sharing: InformationSharing::None,
        }
    }
}

impl SimulationConfig {
    /// Rejects malformed parameters before any state is built. Lead times
    /// are unsigned, so negativity is unrepresentable; costs and periods
    /// still need checking.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.periods == 0 {
            return Err(ConfigError::NonPositivePeriods(self.periods));
        }
        if !self.holding_cost.is_finite() || self.holding_cost < 0.0 {
            return Err(ConfigError::InvalidCost {
                name: "holding_cost",
                value: self.holding_cost,
            });
        }
        if !self.backlog_cost.is_finite() || self.backlog_cost < 0.0 {
            return Err(ConfigError::InvalidCost {
                name: "backlog_cost",
                value: self.backlog_cost,
            });
        }
        Ok(())
    }
}
