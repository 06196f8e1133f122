//! Vehicle verification registry.

use tracing::info;

use super::{ensure_owner, require, RegistryResult};
use crate::db::Database;
use crate::models::{
    CallContext, Inspection, InspectionReport, Vehicle, VehicleSpec, VehicleSuitability,
};

/// Registers vehicles and records their inspections.
pub struct VehicleRegistry<'a> {
    db: &'a Database,
}

impl<'a> VehicleRegistry<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Register a vehicle owned by the caller, pending and never inspected.
    pub fn register_vehicle(&self, ctx: &CallContext, spec: VehicleSpec) -> RegistryResult<u64> {
        let vehicle = Vehicle::new(ctx, spec);
        let id = self.db.insert_vehicle(&vehicle)?;
        info!(
            vehicle_id = id,
            registration = %vehicle.registration_number,
            actor = %ctx.actor,
            "registered vehicle"
        );
        Ok(id)
    }

    pub fn get_vehicle(&self, id: u64) -> RegistryResult<Option<Vehicle>> {
        Ok(self.db.get_vehicle(id)?)
    }

    pub fn list_vehicles(&self) -> RegistryResult<Vec<Vehicle>> {
        Ok(self.db.list_vehicles()?)
    }

    /// Replace the vehicle's spec. Owner only; verification goes back to `pending`.
    pub fn update_vehicle(
        &self,
        ctx: &CallContext,
        id: u64,
        spec: VehicleSpec,
    ) -> RegistryResult<u64> {
        let vehicle = require(self.db.get_vehicle(id)?, "vehicle", id)?;
        ensure_owner(ctx, &vehicle.owner, "vehicle", id)?;

        self.db.update_vehicle_spec(id, &spec)?;
        info!(vehicle_id = id, actor = %ctx.actor, "updated vehicle, verification reset");
        Ok(id)
    }

    /// Record an inspection by any inspector.
    ///
    /// The vehicle's verification status becomes the report's safety status
    /// verbatim and its last inspection date becomes the current clock.
    pub fn record_inspection(
        &self,
        ctx: &CallContext,
        vehicle_id: u64,
        report: InspectionReport,
    ) -> RegistryResult<u64> {
        require(self.db.get_vehicle(vehicle_id)?, "vehicle", vehicle_id)?;

        let inspection = Inspection {
            id: 0,
            vehicle_id,
            inspector: report.inspector.unwrap_or_else(|| ctx.actor.clone()),
            inspection_date: ctx.block_height,
            equipment_verified: report.equipment_verified,
            safety_status: report.safety_status,
            cleanliness_status: report.cleanliness_status,
            notes: report.notes,
        };
        let id = self.db.insert_inspection(&inspection)?;
        info!(
            inspection_id = id,
            vehicle_id,
            safety_status = %inspection.safety_status,
            inspector = %inspection.inspector,
            "recorded inspection"
        );
        Ok(id)
    }

    pub fn get_inspection(&self, id: u64) -> RegistryResult<Option<Inspection>> {
        Ok(self.db.get_inspection(id)?)
    }

    /// Inspection history of a vehicle, oldest first.
    pub fn list_inspections(&self, vehicle_id: u64) -> RegistryResult<Vec<Inspection>> {
        require(self.db.get_vehicle(vehicle_id)?, "vehicle", vehicle_id)?;
        Ok(self.db.list_inspections_for_vehicle(vehicle_id)?)
    }

    /// Whether the vehicle carries the requested equipment.
    ///
    /// Only capability flags count; a vehicle can be suitable while its
    /// verification status is `pending` or failing.
    pub fn check_vehicle_suitability(
        &self,
        vehicle_id: u64,
        wheelchair_needed: bool,
        stretcher_needed: bool,
        oxygen_needed: bool,
    ) -> RegistryResult<VehicleSuitability> {
        let vehicle = require(self.db.get_vehicle(vehicle_id)?, "vehicle", vehicle_id)?;
        Ok(VehicleSuitability {
            suitable: vehicle.is_suitable(wheelchair_needed, stretcher_needed, oxygen_needed),
            verification_status: vehicle.verification_status,
        })
    }
}
