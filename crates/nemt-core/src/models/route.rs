//! Route planning models.

use serde::{Deserialize, Serialize};

use super::{status, CallContext};

/// Sentinel driver/vehicle id for a route nobody has been assigned to yet.
pub const UNASSIGNED: u64 = 0;

/// A planned run for one driver and one vehicle on a given date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct Route {
    pub id: u64,
    /// Assigned driver, or [`UNASSIGNED`]
    pub driver_id: u64,
    /// Assigned vehicle, or [`UNASSIGNED`]
    pub vehicle_id: u64,
    /// Service date on the logical clock
    pub date: u64,
    /// `planning`, `assigned`, `in-progress`, ...
    pub status: String,
    pub created_at: u64,
}

impl Route {
    pub fn new(ctx: &CallContext, date: u64) -> Self {
        Self {
            id: 0,
            driver_id: UNASSIGNED,
            vehicle_id: UNASSIGNED,
            date,
            status: status::PLANNING.to_string(),
            created_at: ctx.block_height,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.driver_id != UNASSIGNED && self.vehicle_id != UNASSIGNED
    }
}

/// One pickup/drop-off on a route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct RouteStop {
    pub id: u64,
    pub route_id: u64,
    /// Transport request served at this stop (not validated)
    pub request_id: u64,
    /// Position within the route (not validated for uniqueness)
    pub stop_number: u32,
    pub estimated_arrival: u64,
    pub completed: bool,
}

/// Audit record of a driver/vehicle assignment. Never modified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct RouteAssignment {
    pub id: u64,
    pub route_id: u64,
    pub driver_id: u64,
    pub vehicle_id: u64,
    /// Principal that made the assignment
    pub assigned_by: String,
    pub assigned_at: u64,
    pub status: String,
}
