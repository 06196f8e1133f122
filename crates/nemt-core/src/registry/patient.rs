//! Patient registration and transport requests.

use tracing::info;

use super::{ensure_owner, require, RegistryResult};
use crate::db::Database;
use crate::models::{CallContext, NewTransportRequest, Patient, PatientDetails, TransportRequest};

/// Registers patients and the trips requested on their behalf.
pub struct PatientRegistry<'a> {
    db: &'a Database,
}

impl<'a> PatientRegistry<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Register a patient owned by the caller.
    pub fn register_patient(
        &self,
        ctx: &CallContext,
        name: String,
        details: PatientDetails,
    ) -> RegistryResult<u64> {
        let patient = Patient::new(ctx, name, details);
        let id = self.db.insert_patient(&patient)?;
        info!(patient_id = id, actor = %ctx.actor, "registered patient");
        Ok(id)
    }

    pub fn get_patient(&self, id: u64) -> RegistryResult<Option<Patient>> {
        Ok(self.db.get_patient(id)?)
    }

    /// Replace the patient's details (not the name). Owner only.
    pub fn update_patient(
        &self,
        ctx: &CallContext,
        id: u64,
        details: PatientDetails,
    ) -> RegistryResult<u64> {
        let patient = require(self.db.get_patient(id)?, "patient", id)?;
        ensure_owner(ctx, &patient.owner, "patient", id)?;

        self.db.update_patient_details(id, &details)?;
        info!(patient_id = id, actor = %ctx.actor, "updated patient");
        Ok(id)
    }

    /// Request a trip for a patient. Only the patient's owner may request.
    pub fn create_transport_request(
        &self,
        ctx: &CallContext,
        request: NewTransportRequest,
    ) -> RegistryResult<u64> {
        let patient_id = request.patient_id;
        let patient = require(self.db.get_patient(patient_id)?, "patient", patient_id)?;
        ensure_owner(ctx, &patient.owner, "patient", patient_id)?;

        let request = TransportRequest::new(ctx, request);
        let id = self.db.insert_transport_request(&request)?;
        info!(request_id = id, patient_id, actor = %ctx.actor, "created transport request");
        Ok(id)
    }

    pub fn get_transport_request(&self, id: u64) -> RegistryResult<Option<TransportRequest>> {
        Ok(self.db.get_transport_request(id)?)
    }

    /// Requests made for a patient, oldest first.
    pub fn list_transport_requests(
        &self,
        patient_id: u64,
    ) -> RegistryResult<Vec<TransportRequest>> {
        require(self.db.get_patient(patient_id)?, "patient", patient_id)?;
        Ok(self.db.list_requests_for_patient(patient_id)?)
    }

    /// Overwrite a request's status. Any value is accepted; the caller must
    /// own the patient the request belongs to.
    pub fn update_request_status(
        &self,
        ctx: &CallContext,
        request_id: u64,
        status: &str,
    ) -> RegistryResult<u64> {
        let request = require(
            self.db.get_transport_request(request_id)?,
            "transport request",
            request_id,
        )?;
        let patient = require(
            self.db.get_patient(request.patient_id)?,
            "patient",
            request.patient_id,
        )?;
        ensure_owner(ctx, &patient.owner, "patient", patient.id)?;

        self.db.set_request_status(request_id, status)?;
        info!(request_id, status, actor = %ctx.actor, "updated request status");
        Ok(request_id)
    }
}
