//! Fleet readiness report for dispatch planning and audits.

use serde::{Deserialize, Serialize};

use super::escape_csv;
use crate::db::Database;
use crate::models::{Driver, Vehicle};
use crate::registry::RegistryResult;

/// Readiness of every driver and vehicle at a point on the logical clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetReadinessReport {
    /// Clock value the report was evaluated at
    pub as_of: u64,
    /// Export timestamp
    pub exported_at: String,
    pub drivers: Vec<DriverReadiness>,
    pub vehicles: Vec<VehicleReadiness>,
}

/// Driver line of the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverReadiness {
    pub driver_id: u64,
    pub name: String,
    pub certification_status: String,
    pub license_expiry: u64,
    pub license_current: bool,
    pub cpr_certified: bool,
    pub first_aid_certified: bool,
    pub certification_count: usize,
}

/// Vehicle line of the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleReadiness {
    pub vehicle_id: u64,
    pub registration_number: String,
    pub verification_status: String,
    /// 0 when never inspected
    pub last_inspection_date: u64,
    pub wheelchair_accessible: bool,
    pub stretcher_capable: bool,
    pub oxygen_equipped: bool,
    pub capacity: u32,
}

impl DriverReadiness {
    fn from_driver(driver: Driver, certification_count: usize, now: u64) -> Self {
        Self {
            license_current: driver.license_current(now),
            driver_id: driver.id,
            name: driver.name,
            certification_status: driver.certification_status,
            license_expiry: driver.license_expiry,
            cpr_certified: driver.cpr_certified,
            first_aid_certified: driver.first_aid_certified,
            certification_count,
        }
    }
}

impl From<Vehicle> for VehicleReadiness {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            vehicle_id: vehicle.id,
            registration_number: vehicle.registration_number,
            verification_status: vehicle.verification_status,
            last_inspection_date: vehicle.last_inspection_date,
            wheelchair_accessible: vehicle.wheelchair_accessible,
            stretcher_capable: vehicle.stretcher_capable,
            oxygen_equipped: vehicle.oxygen_equipped,
            capacity: vehicle.capacity,
        }
    }
}

impl FleetReadinessReport {
    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV: one row per driver, then one per vehicle.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        csv.push_str("kind,id,label,status,date,current,capabilities\n");

        for driver in &self.drivers {
            let mut skills = Vec::new();
            if driver.cpr_certified {
                skills.push("cpr");
            }
            if driver.first_aid_certified {
                skills.push("first_aid");
            }
            csv.push_str(&format!(
                "driver,{},{},{},{},{},{}\n",
                driver.driver_id,
                escape_csv(&driver.name),
                escape_csv(&driver.certification_status),
                driver.license_expiry,
                driver.license_current,
                skills.join(";"),
            ));
        }

        for vehicle in &self.vehicles {
            let mut equipment = Vec::new();
            if vehicle.wheelchair_accessible {
                equipment.push("wheelchair");
            }
            if vehicle.stretcher_capable {
                equipment.push("stretcher");
            }
            if vehicle.oxygen_equipped {
                equipment.push("oxygen");
            }
            csv.push_str(&format!(
                "vehicle,{},{},{},{},,{}\n",
                vehicle.vehicle_id,
                escape_csv(&vehicle.registration_number),
                escape_csv(&vehicle.verification_status),
                vehicle.last_inspection_date,
                equipment.join(";"),
            ));
        }

        csv
    }
}

/// Readiness report builder.
pub struct ReadinessExporter<'a> {
    db: &'a Database,
}

impl<'a> ReadinessExporter<'a> {
    /// Create a new readiness exporter.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Build the report, judging licenses against clock value `now`.
    pub fn export_all(&self, now: u64) -> RegistryResult<FleetReadinessReport> {
        let mut drivers = Vec::new();
        for driver in self.db.list_drivers()? {
            let certification_count = self.db.list_certifications_for_driver(driver.id)?.len();
            drivers.push(DriverReadiness::from_driver(driver, certification_count, now));
        }

        let vehicles = self
            .db
            .list_vehicles()?
            .into_iter()
            .map(VehicleReadiness::from)
            .collect();

        Ok(FleetReadinessReport {
            as_of: now,
            exported_at: chrono::Utc::now().to_rfc3339(),
            drivers,
            vehicles,
        })
    }
}
