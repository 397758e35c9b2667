// src/simulation/engine.rs

use crate::errors::{ConfigError, SimulationError};
use crate::io::demand::DemandPattern;
use crate::model::queues::LeadTimeQueue;
use crate::model::state::{NeighborState, Role, RoleState, ROLES};
use crate::simulation::config::{InformationSharing, SimulationConfig};
use crate::strategy::traits::OrderPolicy;
use log::{debug, info, warn};
use serde::Serialize;

/// One row per (period, role), appended after the period commits. Field
/// order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    pub period: usize,
    pub role: Role,
    pub incoming_order: u32,
    pub placed_order: u32,
    pub received_shipment: u32,
    pub fulfilled_shipment: u32,
    pub backlog: u32,
    pub inventory_on_hand: u32,
    pub pipeline_on_order: u32,
    pub cost_holding: f64,
    pub cost_backlog: f64,
}

/// A policy returned a negative order. The engine clamps to zero and keeps
/// going; the offence is recorded here and warned about, never fatal.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderContractViolation {
    pub period: usize,
    pub role: Role,
    pub returned: i64,
}

/// Per-role committed quantities, carried from period to period.
#[derive(Debug, Clone, Copy, Default)]
struct RoleAccount {
    inventory: u32,
    backlog: u32,
    pipeline: u32,
    last_order: u32,
}

pub struct ChainSimulation {
    config: SimulationConfig,
    demand: DemandPattern,
    policies: Vec<Box<dyn OrderPolicy>>,

    accounts: [RoleAccount; 4],

    // Orders flowing upstream: index i carries role i's orders to role i+1.
    order_queues: Vec<LeadTimeQueue>,
    // Shipments flowing downstream: index i is role i's inbound line.
    shipment_queues: Vec<LeadTimeQueue>,
    // The manufacturer replenishes itself through production.
    production_queue: LeadTimeQueue,

    pub history: Vec<LogRecord>,
    pub violations: Vec<OrderContractViolation>,
}

impl ChainSimulation {
    pub fn new(
        config: SimulationConfig,
        demand: DemandPattern,
        policies: Vec<Box<dyn OrderPolicy>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if policies.len() != ROLES.len() {
            return Err(ConfigError::WrongPolicyCount(policies.len()));
        }

        let mut shipment_queues = vec![
            LeadTimeQueue::new(),
            LeadTimeQueue::new(),
            LeadTimeQueue::new(),
        ];
        let mut production_queue = LeadTimeQueue::new();

        // Pre-simulation orders already in transit: one batch per inbound
        // slot, arriving over the first shipment_lead_time periods.
        let slots = config.shipment_lead_time;
        if config.initial_pipeline > 0 {
            for slot in 0..slots {
                for q in shipment_queues.iter_mut() {
                    q.enqueue(slot, config.initial_pipeline);
                }
                production_queue.enqueue(slot, config.initial_pipeline);
            }
        }

        let accounts = [RoleAccount {
            inventory: config.initial_inventory,
            backlog: 0,
            pipeline: config.initial_pipeline.saturating_mul(slots as u32),
            last_order: 0,
        }; 4];

        Ok(Self {
            config,
            demand,
            policies,
            accounts,
            order_queues: vec![
                LeadTimeQueue::new(),
                LeadTimeQueue::new(),
                LeadTimeQueue::new(),
            ],
            shipment_queues,
            production_queue,
            history: Vec::new(),
            violations: Vec::new(),
        })
    }

    /// Runs all configured periods. Stops only at the period count or on an
    /// engine invariant breach.
    pub fn run(&mut self) -> Result<(), SimulationError> {
        info!(
            "running {} periods, sharing={:?}",
            self.config.periods, self.config.information_sharing
        );
        for t in 0..self.config.periods {
            self.step(t)?;
        }
        info!(
            "run complete: {} log rows, {} contract violations",
            self.history.len(),
            self.violations.len()
        );
        Ok(())
    }

    fn neighbor_snapshot(&self, role: Role) -> NeighborState {
        let a = &self.accounts[role.index()];
        NeighborState {
            role,
            inventory_on_hand: a.inventory,
            backlog: a.backlog,
            last_placed_order: a.last_order,
        }
    }

    fn build_state(&self, role: Role, t: usize, incoming: u32, received: u32) -> RoleState {
        let (upstream, downstream) = match self.config.information_sharing {
            InformationSharing::None => (None, None),
            InformationSharing::Adjacent => (
                role.upstream().map(|r| self.neighbor_snapshot(r)),
                role.downstream().map(|r| self.neighbor_snapshot(r)),
            ),
        };
        let a = &self.accounts[role.index()];
        RoleState {
            period_index: t,
            role,
            incoming_order: incoming,
            received_shipment: received,
            inventory_on_hand: a.inventory,
            backlog: a.backlog,
            pipeline_on_order: a.pipeline,
            last_placed_order: a.last_order,
            upstream,
            downstream,
        }
    }

    fn step(&mut self, t: usize) -> Result<(), SimulationError> {
        // =================================================================
        // PHASE 1: ARRIVALS — drain everything due this period.
        // =================================================================
        let mut incoming = [0u32; 4];
        incoming[0] = self.demand.demand(t);
        for i in 1..4 {
            incoming[i] = self.order_queues[i - 1].release(t);
        }

        let mut received = [0u32; 4];
        for i in 0..3 {
            received[i] = self.shipment_queues[i].release(t);
        }
        received[3] = self.production_queue.release(t);

        // =================================================================
        // PHASE 2: DECISIONS — all four against the opening snapshot.
        // No role sees a sibling's same-period update.
        // =================================================================
        let states: Vec<RoleState> = ROLES
            .iter()
            .map(|&role| self.build_state(role, t, incoming[role.index()], received[role.index()]))
            .collect();

        let mut placed = [0u32; 4];
        for (i, state) in states.iter().enumerate() {
            let raw = self.policies[i].decide_order(state);
            if raw < 0 {
                warn!(
                    "period {} {}: policy returned {}, clamping to 0",
                    t, state.role, raw
                );
                self.violations.push(OrderContractViolation {
                    period: t,
                    role: state.role,
                    returned: raw,
                });
            }
            placed[i] = raw.clamp(0, i64::from(u32::MAX)) as u32;
        }

        // =================================================================
        // PHASE 3: DEPARTURES — orders upstream, production for the
        // manufacturer.
        // =================================================================
        for i in 0..3 {
            self.order_queues[i].enqueue(t + self.config.order_lead_time, placed[i]);
        }
        self.production_queue
            .enqueue(t + self.config.shipment_lead_time, placed[3]);

        // =================================================================
        // PHASE 4: FULFILLMENT & COMMIT — receipts in first, then ship what
        // inventory covers, backlog the rest.
        // =================================================================
        let mut fulfilled = [0u32; 4];
        for (i, &role) in ROLES.iter().enumerate() {
            let a = self.accounts[i];
            if received[i] > a.pipeline {
                return Err(SimulationError::StateInvariant {
                    period: t,
                    role,
                    detail: format!(
                        "received {} exceeds pipeline {}",
                        received[i], a.pipeline
                    ),
                });
            }

            let available = i64::from(a.inventory) + i64::from(received[i]);
            let owed = i64::from(incoming[i]) + i64::from(a.backlog);
            let shipped = available.min(owed);
            let new_inventory = available - shipped;
            let new_backlog = owed - shipped;
            if new_inventory < 0 || new_backlog < 0 {
                return Err(SimulationError::StateInvariant {
                    period: t,
                    role,
                    detail: format!(
                        "negative quantity after update (inventory {}, backlog {})",
                        new_inventory, new_backlog
                    ),
                });
            }

            fulfilled[i] = shipped as u32;
            self.accounts[i] = RoleAccount {
                inventory: new_inventory as u32,
                backlog: new_backlog as u32,
                pipeline: (a.pipeline - received[i]).saturating_add(placed[i]),
                last_order: placed[i],
            };
        }

        // Shipments travel downstream; the retailer's leave the system.
        for i in 1..4 {
            self.shipment_queues[i - 1].enqueue(t + self.config.shipment_lead_time, fulfilled[i]);
        }

        // =================================================================
        // PHASE 5: COSTS & LOG — closing values.
        // =================================================================
        for (i, &role) in ROLES.iter().enumerate() {
            let a = self.accounts[i];
            self.history.push(LogRecord {
                period: t,
                role,
                incoming_order: incoming[i],
                placed_order: placed[i],
                received_shipment: received[i],
                fulfilled_shipment: fulfilled[i],
                backlog: a.backlog,
                inventory_on_hand: a.inventory,
                pipeline_on_order: a.pipeline,
                cost_holding: self.config.holding_cost * f64::from(a.inventory),
                cost_backlog: self.config.backlog_cost * f64::from(a.backlog),
            });
        }

        debug!(
            "period {}: retailer inv {} backlog {} placed {}",
            t, self.accounts[0].inventory, self.accounts[0].backlog, placed[0]
        );
        Ok(())
    }
}
