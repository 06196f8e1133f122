//! NEMT Core Library
//!
//! Record stores for non-emergency medical transport coordination.
//!
//! # Architecture
//!
//! ```text
//!   Host app (dispatch console, mobile)
//!        │  CallContext { actor, block_height }
//!        ▼
//!   ┌─────────────────────────────────────────────────────────────┐
//!   │                       TransportCore                         │
//!   └──────┬───────────────┬───────────────┬───────────────┬──────┘
//!          ▼               ▼               ▼               ▼
//!   DriverRegistry  PatientRegistry   RoutePlanner   VehicleRegistry
//!   drivers         patients          routes         vehicles
//!   certifications  transport_reqs    route_stops    inspections
//!                                     assignments
//!          └───────────────┴───────┬───────┴───────────────┘
//!                                  ▼
//!                          SQLite (Database)
//! ```
//!
//! The four registries do not call each other. They share ids only by
//! value: a route stop names a transport request id, an assignment names
//! driver and vehicle ids, and none of these are checked against the
//! other stores. Dispatch code that wants an eligible driver and a
//! suitable vehicle asks the registries itself before assigning.
//!
//! # Modules
//!
//! - [`db`]: SQLite storage, one table and id sequence per entity
//! - [`models`]: Entity types and call inputs
//! - [`registry`]: Ownership-gated operations per store
//! - [`export`]: Route manifests and fleet readiness reports
//! - [`logging`]: tracing subscriber setup

pub mod db;
pub mod export;
pub mod logging;
pub mod models;
pub mod registry;

// Re-export commonly used types
pub use db::Database;
pub use export::{FleetReadinessReport, ManifestExporter, ReadinessExporter, RouteManifest};
pub use models::{
    CallContext, Certification, Driver, DriverEligibility, DriverProfile, Inspection,
    InspectionReport, NewCertification, NewTransportRequest, Patient, PatientDetails, Route,
    RouteAssignment, RouteStop, TransportRequest, Vehicle, VehicleSpec, VehicleSuitability,
};
pub use registry::{
    DriverRegistry, PatientRegistry, RegistryError, RegistryResult, RoutePlanner,
    VehicleRegistry,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum TransportError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<db::DbError> for TransportError {
    fn from(e: db::DbError) -> Self {
        TransportError::DatabaseError(e.to_string())
    }
}

impl From<RegistryError> for TransportError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::NotFound { .. } => TransportError::NotFound(e.to_string()),
            RegistryError::Forbidden { .. } => TransportError::Forbidden(e.to_string()),
            RegistryError::Database(inner) => inner.into(),
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        TransportError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for TransportError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        TransportError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<TransportCore>, TransportError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(TransportCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<TransportCore>, TransportError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(TransportCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
///
/// Every call holds the lock for its whole duration, so each action's
/// writes are applied without interleaving.
#[derive(uniffi::Object)]
pub struct TransportCore {
    db: Arc<Mutex<Database>>,
}

#[uniffi::export]
impl TransportCore {
    // =========================================================================
    // Driver Operations
    // =========================================================================

    /// Register a driver owned by the caller.
    pub fn register_driver(
        &self,
        ctx: CallContext,
        name: String,
        profile: DriverProfile,
    ) -> Result<u64, TransportError> {
        let db = self.db.lock()?;
        Ok(DriverRegistry::new(&db).register_driver(&ctx, name, profile)?)
    }

    /// Get a driver by ID.
    pub fn get_driver(&self, id: u64) -> Result<Option<Driver>, TransportError> {
        let db = self.db.lock()?;
        Ok(DriverRegistry::new(&db).get_driver(id)?)
    }

    /// List all drivers.
    pub fn list_drivers(&self) -> Result<Vec<Driver>, TransportError> {
        let db = self.db.lock()?;
        Ok(DriverRegistry::new(&db).list_drivers()?)
    }

    /// Replace a driver's profile (owner only); resets certification.
    pub fn update_driver(
        &self,
        ctx: CallContext,
        id: u64,
        profile: DriverProfile,
    ) -> Result<u64, TransportError> {
        let db = self.db.lock()?;
        Ok(DriverRegistry::new(&db).update_driver(&ctx, id, profile)?)
    }

    /// Issue a certification to a driver.
    pub fn add_certification(
        &self,
        ctx: CallContext,
        driver_id: u64,
        certification: NewCertification,
    ) -> Result<u64, TransportError> {
        let db = self.db.lock()?;
        Ok(DriverRegistry::new(&db).add_certification(&ctx, driver_id, certification)?)
    }

    /// Get a certification by ID.
    pub fn get_certification(&self, id: u64) -> Result<Option<Certification>, TransportError> {
        let db = self.db.lock()?;
        Ok(DriverRegistry::new(&db).get_certification(id)?)
    }

    /// List certifications issued to a driver.
    pub fn list_certifications(
        &self,
        driver_id: u64,
    ) -> Result<Vec<Certification>, TransportError> {
        let db = self.db.lock()?;
        Ok(DriverRegistry::new(&db).list_certifications(driver_id)?)
    }

    /// Check whether a driver may take a trip at clock `now`.
    pub fn check_driver_eligibility(
        &self,
        driver_id: u64,
        require_cpr: bool,
        require_first_aid: bool,
        now: u64,
    ) -> Result<DriverEligibility, TransportError> {
        let db = self.db.lock()?;
        Ok(DriverRegistry::new(&db).check_driver_eligibility(
            driver_id,
            require_cpr,
            require_first_aid,
            now,
        )?)
    }

    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Register a patient owned by the caller.
    pub fn register_patient(
        &self,
        ctx: CallContext,
        name: String,
        details: PatientDetails,
    ) -> Result<u64, TransportError> {
        let db = self.db.lock()?;
        Ok(PatientRegistry::new(&db).register_patient(&ctx, name, details)?)
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: u64) -> Result<Option<Patient>, TransportError> {
        let db = self.db.lock()?;
        Ok(PatientRegistry::new(&db).get_patient(id)?)
    }

    /// Replace a patient's details (owner only).
    pub fn update_patient(
        &self,
        ctx: CallContext,
        id: u64,
        details: PatientDetails,
    ) -> Result<u64, TransportError> {
        let db = self.db.lock()?;
        Ok(PatientRegistry::new(&db).update_patient(&ctx, id, details)?)
    }

    /// Request a trip for a patient the caller owns.
    pub fn create_transport_request(
        &self,
        ctx: CallContext,
        request: NewTransportRequest,
    ) -> Result<u64, TransportError> {
        let db = self.db.lock()?;
        Ok(PatientRegistry::new(&db).create_transport_request(&ctx, request)?)
    }

    /// Get a transport request by ID.
    pub fn get_transport_request(
        &self,
        id: u64,
    ) -> Result<Option<TransportRequest>, TransportError> {
        let db = self.db.lock()?;
        Ok(PatientRegistry::new(&db).get_transport_request(id)?)
    }

    /// List a patient's transport requests.
    pub fn list_transport_requests(
        &self,
        patient_id: u64,
    ) -> Result<Vec<TransportRequest>, TransportError> {
        let db = self.db.lock()?;
        Ok(PatientRegistry::new(&db).list_transport_requests(patient_id)?)
    }

    /// Overwrite a transport request's status.
    pub fn update_request_status(
        &self,
        ctx: CallContext,
        request_id: u64,
        status: String,
    ) -> Result<u64, TransportError> {
        let db = self.db.lock()?;
        Ok(PatientRegistry::new(&db).update_request_status(&ctx, request_id, &status)?)
    }

    // =========================================================================
    // Route Operations
    // =========================================================================

    /// Create an unassigned route.
    pub fn create_route(&self, ctx: CallContext, date: u64) -> Result<u64, TransportError> {
        let db = self.db.lock()?;
        Ok(RoutePlanner::new(&db).create_route(&ctx, date)?)
    }

    /// Get a route by ID.
    pub fn get_route(&self, id: u64) -> Result<Option<Route>, TransportError> {
        let db = self.db.lock()?;
        Ok(RoutePlanner::new(&db).get_route(id)?)
    }

    /// Add a stop to a route.
    pub fn add_route_stop(
        &self,
        ctx: CallContext,
        route_id: u64,
        request_id: u64,
        stop_number: u32,
        estimated_arrival: u64,
    ) -> Result<u64, TransportError> {
        let db = self.db.lock()?;
        Ok(RoutePlanner::new(&db).add_route_stop(
            &ctx,
            route_id,
            request_id,
            stop_number,
            estimated_arrival,
        )?)
    }

    /// Get a route stop by ID.
    pub fn get_route_stop(&self, id: u64) -> Result<Option<RouteStop>, TransportError> {
        let db = self.db.lock()?;
        Ok(RoutePlanner::new(&db).get_route_stop(id)?)
    }

    /// List a route's stops in stop order.
    pub fn list_route_stops(&self, route_id: u64) -> Result<Vec<RouteStop>, TransportError> {
        let db = self.db.lock()?;
        Ok(RoutePlanner::new(&db).list_route_stops(route_id)?)
    }

    /// Assign a driver and vehicle to a route.
    pub fn assign_route(
        &self,
        ctx: CallContext,
        route_id: u64,
        driver_id: u64,
        vehicle_id: u64,
    ) -> Result<u64, TransportError> {
        let db = self.db.lock()?;
        Ok(RoutePlanner::new(&db).assign_route(&ctx, route_id, driver_id, vehicle_id)?)
    }

    /// Get an assignment record by ID.
    pub fn get_route_assignment(
        &self,
        id: u64,
    ) -> Result<Option<RouteAssignment>, TransportError> {
        let db = self.db.lock()?;
        Ok(RoutePlanner::new(&db).get_route_assignment(id)?)
    }

    /// List a route's assignment history.
    pub fn list_route_assignments(
        &self,
        route_id: u64,
    ) -> Result<Vec<RouteAssignment>, TransportError> {
        let db = self.db.lock()?;
        Ok(RoutePlanner::new(&db).list_route_assignments(route_id)?)
    }

    /// Overwrite a route's status.
    pub fn update_route_status(
        &self,
        ctx: CallContext,
        route_id: u64,
        status: String,
    ) -> Result<u64, TransportError> {
        let db = self.db.lock()?;
        Ok(RoutePlanner::new(&db).update_route_status(&ctx, route_id, &status)?)
    }

    /// Mark a stop completed.
    pub fn complete_route_stop(
        &self,
        ctx: CallContext,
        stop_id: u64,
    ) -> Result<u64, TransportError> {
        let db = self.db.lock()?;
        Ok(RoutePlanner::new(&db).complete_route_stop(&ctx, stop_id)?)
    }

    // =========================================================================
    // Vehicle Operations
    // =========================================================================

    /// Register a vehicle owned by the caller.
    pub fn register_vehicle(
        &self,
        ctx: CallContext,
        spec: VehicleSpec,
    ) -> Result<u64, TransportError> {
        let db = self.db.lock()?;
        Ok(VehicleRegistry::new(&db).register_vehicle(&ctx, spec)?)
    }

    /// Get a vehicle by ID.
    pub fn get_vehicle(&self, id: u64) -> Result<Option<Vehicle>, TransportError> {
        let db = self.db.lock()?;
        Ok(VehicleRegistry::new(&db).get_vehicle(id)?)
    }

    /// List all vehicles.
    pub fn list_vehicles(&self) -> Result<Vec<Vehicle>, TransportError> {
        let db = self.db.lock()?;
        Ok(VehicleRegistry::new(&db).list_vehicles()?)
    }

    /// Replace a vehicle's spec (owner only); resets verification.
    pub fn update_vehicle(
        &self,
        ctx: CallContext,
        id: u64,
        spec: VehicleSpec,
    ) -> Result<u64, TransportError> {
        let db = self.db.lock()?;
        Ok(VehicleRegistry::new(&db).update_vehicle(&ctx, id, spec)?)
    }

    /// Record a vehicle inspection.
    pub fn record_inspection(
        &self,
        ctx: CallContext,
        vehicle_id: u64,
        report: InspectionReport,
    ) -> Result<u64, TransportError> {
        let db = self.db.lock()?;
        Ok(VehicleRegistry::new(&db).record_inspection(&ctx, vehicle_id, report)?)
    }

    /// Get an inspection by ID.
    pub fn get_inspection(&self, id: u64) -> Result<Option<Inspection>, TransportError> {
        let db = self.db.lock()?;
        Ok(VehicleRegistry::new(&db).get_inspection(id)?)
    }

    /// List a vehicle's inspections.
    pub fn list_inspections(&self, vehicle_id: u64) -> Result<Vec<Inspection>, TransportError> {
        let db = self.db.lock()?;
        Ok(VehicleRegistry::new(&db).list_inspections(vehicle_id)?)
    }

    /// Check whether a vehicle carries the requested equipment.
    pub fn check_vehicle_suitability(
        &self,
        vehicle_id: u64,
        wheelchair_needed: bool,
        stretcher_needed: bool,
        oxygen_needed: bool,
    ) -> Result<VehicleSuitability, TransportError> {
        let db = self.db.lock()?;
        Ok(VehicleRegistry::new(&db).check_vehicle_suitability(
            vehicle_id,
            wheelchair_needed,
            stretcher_needed,
            oxygen_needed,
        )?)
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Export a route manifest as JSON.
    pub fn export_route_manifest_json(&self, route_id: u64) -> Result<String, TransportError> {
        let db = self.db.lock()?;
        let manifest = ManifestExporter::new(&db).export_route(route_id)?;
        Ok(manifest.to_json()?)
    }

    /// Export a route manifest as CSV.
    pub fn export_route_manifest_csv(&self, route_id: u64) -> Result<String, TransportError> {
        let db = self.db.lock()?;
        let manifest = ManifestExporter::new(&db).export_route(route_id)?;
        Ok(manifest.to_csv())
    }

    /// Export fleet readiness at clock `now` as JSON.
    pub fn export_fleet_readiness_json(&self, now: u64) -> Result<String, TransportError> {
        let db = self.db.lock()?;
        let report = ReadinessExporter::new(&db).export_all(now)?;
        Ok(report.to_json()?)
    }

    /// Export fleet readiness at clock `now` as CSV.
    pub fn export_fleet_readiness_csv(&self, now: u64) -> Result<String, TransportError> {
        let db = self.db.lock()?;
        let report = ReadinessExporter::new(&db).export_all(now)?;
        Ok(report.to_csv())
    }
}
