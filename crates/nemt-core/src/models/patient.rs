//! Patient and transport request models.

use serde::{Deserialize, Serialize};

use super::{status, CallContext};

/// A patient registered for non-emergency transport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct Patient {
    /// Store-assigned id (0 until inserted)
    pub id: u64,
    /// Principal that registered the patient; fixed at creation
    pub owner: String,
    /// Patient name; immutable after registration
    pub name: String,
    /// Home address
    pub address: String,
    /// Phone or other contact
    pub contact: String,
    /// Condition relevant to transport (e.g., "Dialysis patient")
    pub medical_condition: String,
    /// e.g., "Wheelchair bound", "Ambulatory"
    pub mobility_status: String,
    /// Equipment the vehicle must carry
    pub equipment_needs: String,
    /// Whether trips recur on a schedule
    pub recurring_schedule: bool,
    /// Logical clock at registration
    pub registration_date: u64,
}

/// Owner-editable patient fields. The name is not among them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct PatientDetails {
    pub address: String,
    pub contact: String,
    pub medical_condition: String,
    pub mobility_status: String,
    pub equipment_needs: String,
    pub recurring_schedule: bool,
}

impl Patient {
    pub fn new(ctx: &CallContext, name: String, details: PatientDetails) -> Self {
        Self {
            id: 0,
            owner: ctx.actor.clone(),
            name,
            address: details.address,
            contact: details.contact,
            medical_condition: details.medical_condition,
            mobility_status: details.mobility_status,
            equipment_needs: details.equipment_needs,
            recurring_schedule: details.recurring_schedule,
            registration_date: ctx.block_height,
        }
    }
}

/// A request to move a patient between two locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct TransportRequest {
    pub id: u64,
    pub patient_id: u64,
    pub pickup_location: String,
    pub destination: String,
    /// Appointment time (host-defined units, e.g., unix seconds)
    pub appointment_time: u64,
    /// Whether a return leg is needed
    pub return_trip: bool,
    pub special_instructions: String,
    /// `pending` at creation; any value afterwards
    pub status: String,
    /// Logical clock at creation
    pub request_date: u64,
}

/// Input for creating a transport request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct NewTransportRequest {
    pub patient_id: u64,
    pub pickup_location: String,
    pub destination: String,
    pub appointment_time: u64,
    pub return_trip: bool,
    pub special_instructions: String,
}

impl TransportRequest {
    pub fn new(ctx: &CallContext, request: NewTransportRequest) -> Self {
        Self {
            id: 0,
            patient_id: request.patient_id,
            pickup_location: request.pickup_location,
            destination: request.destination,
            appointment_time: request.appointment_time,
            return_trip: request.return_trip,
            special_instructions: request.special_instructions,
            status: status::PENDING.to_string(),
            request_date: ctx.block_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_request_is_pending() {
        let ctx = CallContext::new("ST1OWNER", 100);
        let request = TransportRequest::new(
            &ctx,
            NewTransportRequest {
                patient_id: 1,
                pickup_location: "123 Main St, Anytown".into(),
                destination: "City Hospital, 789 Medical Dr".into(),
                appointment_time: 1_625_097_600,
                return_trip: true,
                special_instructions: "Patient needs assistance transferring".into(),
            },
        );
        assert_eq!(request.status, "pending");
        assert_eq!(request.request_date, 100);
        assert_eq!(request.patient_id, 1);
    }
}
