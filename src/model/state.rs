// src/model/state.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// One position in the four-stage ordering chain, downstream first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Retailer,
    Wholesaler,
    Distributor,
    Manufacturer,
}

/// Chain order, customer-facing role first.
pub const ROLES: [Role; 4] = [
    Role::Retailer,
    Role::Wholesaler,
    Role::Distributor,
    Role::Manufacturer,
];

impl Role {
    /// Position in the chain, 0 = retailer.
    pub fn index(self) -> usize {
        match self {
            Role::Retailer => 0,
            Role::Wholesaler => 1,
            Role::Distributor => 2,
            Role::Manufacturer => 3,
        }
    }

    /// The neighbor this role orders from, `None` for the manufacturer.
    pub fn upstream(self) -> Option<Role> {
        match self {
            Role::Retailer => Some(Role::Wholesaler),
            Role::Wholesaler => Some(Role::Distributor),
            Role::Distributor => Some(Role::Manufacturer),
            Role::Manufacturer => None,
        }
    }

    /// The neighbor this role ships to, `None` for the retailer.
    pub fn downstream(self) -> Option<Role> {
        match self {
            Role::Retailer => None,
            Role::Wholesaler => Some(Role::Retailer),
            Role::Distributor => Some(Role::Wholesaler),
            Role::Manufacturer => Some(Role::Distributor),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Read-only view of a neighbor's position as of the start of the current
/// period. The engine copies it into the snapshot; policies never see the
/// live values.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborState {
    pub role: Role,
    pub inventory_on_hand: u32,
    pub backlog: u32,
    pub last_placed_order: u32,
}

/// Immutable per-period snapshot a policy decides from.
///
/// `inventory_on_hand`, `backlog`, `pipeline_on_order` and
/// `last_placed_order` are the previous period's committed values;
/// `incoming_order` and `received_shipment` are this period's queue
/// releases. All four roles decide against snapshots built before any
/// mutation, so no role ever observes a sibling's same-period update.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleState {
    pub period_index: usize,
    pub role: Role,
    pub incoming_order: u32,
    pub received_shipment: u32,
    pub inventory_on_hand: u32,
    pub backlog: u32,
    pub pipeline_on_order: u32,
    pub last_placed_order: u32,
    /// Upstream neighbor snapshot, present only under adjacent sharing.
    pub upstream: Option<NeighborState>,
    /// Downstream neighbor snapshot, present only under adjacent sharing.
    pub downstream: Option<NeighborState>,
}
