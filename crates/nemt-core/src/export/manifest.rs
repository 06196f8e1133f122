//! Route manifest: what a driver carries for the day.

use serde::{Deserialize, Serialize};

use super::escape_csv;
use crate::db::Database;
use crate::registry::{require, RegistryResult};

/// Manifest for a single route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteManifest {
    /// Export metadata
    pub metadata: ManifestMetadata,
    /// Stops in stop-number order
    pub stops: Vec<ManifestStop>,
}

/// Manifest metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub route_id: u64,
    /// Service date on the logical clock
    pub date: u64,
    /// 0 when unassigned
    pub driver_id: u64,
    /// 0 when unassigned
    pub vehicle_id: u64,
    pub status: String,
    /// Export timestamp
    pub exported_at: String,
}

/// One stop with its trip details when the request id resolves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestStop {
    pub stop_id: u64,
    pub stop_number: u32,
    pub request_id: u64,
    pub estimated_arrival: u64,
    pub completed: bool,
    pub pickup_location: Option<String>,
    pub destination: Option<String>,
    pub appointment_time: Option<u64>,
    pub return_trip: Option<bool>,
    pub special_instructions: Option<String>,
}

impl RouteManifest {
    /// Number of stops not yet completed.
    pub fn remaining_stops(&self) -> usize {
        self.stops.iter().filter(|s| !s.completed).count()
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str("route_id,date,driver_id,vehicle_id,stop_number,request_id,estimated_arrival,completed,pickup_location,destination,appointment_time,return_trip,special_instructions\n");

        for stop in &self.stops {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{},{},{},{}\n",
                self.metadata.route_id,
                self.metadata.date,
                self.metadata.driver_id,
                self.metadata.vehicle_id,
                stop.stop_number,
                stop.request_id,
                stop.estimated_arrival,
                stop.completed,
                escape_csv(stop.pickup_location.as_deref().unwrap_or("")),
                escape_csv(stop.destination.as_deref().unwrap_or("")),
                stop.appointment_time.map(|t| t.to_string()).unwrap_or_default(),
                stop.return_trip.map(|r| r.to_string()).unwrap_or_default(),
                escape_csv(stop.special_instructions.as_deref().unwrap_or("")),
            ));
        }

        csv
    }
}

/// Manifest exporter.
pub struct ManifestExporter<'a> {
    db: &'a Database,
}

impl<'a> ManifestExporter<'a> {
    /// Create a new manifest exporter.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Build the manifest for a route.
    pub fn export_route(&self, route_id: u64) -> RegistryResult<RouteManifest> {
        let route = require(self.db.get_route(route_id)?, "route", route_id)?;

        let mut stops = Vec::new();
        for stop in self.db.list_stops_for_route(route_id)? {
            // request ids on stops are opaque; a dangling one just has no details
            let request = self.db.get_transport_request(stop.request_id)?;
            stops.push(ManifestStop {
                stop_id: stop.id,
                stop_number: stop.stop_number,
                request_id: stop.request_id,
                estimated_arrival: stop.estimated_arrival,
                completed: stop.completed,
                pickup_location: request.as_ref().map(|r| r.pickup_location.clone()),
                destination: request.as_ref().map(|r| r.destination.clone()),
                appointment_time: request.as_ref().map(|r| r.appointment_time),
                return_trip: request.as_ref().map(|r| r.return_trip),
                special_instructions: request.map(|r| r.special_instructions),
            });
        }

        Ok(RouteManifest {
            metadata: ManifestMetadata {
                route_id: route.id,
                date: route.date,
                driver_id: route.driver_id,
                vehicle_id: route.vehicle_id,
                status: route.status,
                exported_at: chrono::Utc::now().to_rfc3339(),
            },
            stops,
        })
    }
}
