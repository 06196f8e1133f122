//! Vehicle and inspection models.

use serde::{Deserialize, Serialize};

use super::{status, CallContext};

/// `last_inspection_date` of a vehicle that has never been inspected.
pub const NEVER_INSPECTED: u64 = 0;

/// A transport vehicle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct Vehicle {
    /// Store-assigned id (0 until inserted)
    pub id: u64,
    /// Principal that registered the vehicle; fixed at creation
    pub owner: String,
    /// Plate / registration number
    pub registration_number: String,
    /// e.g., "Van", "Sedan"
    pub vehicle_type: String,
    /// Passenger capacity
    pub capacity: u32,
    pub wheelchair_accessible: bool,
    pub stretcher_capable: bool,
    pub oxygen_equipped: bool,
    /// Free-form list of onboard equipment
    pub medical_equipment: String,
    /// Logical clock of the latest inspection, or [`NEVER_INSPECTED`]
    pub last_inspection_date: u64,
    /// `pending` or the latest inspection's safety status
    pub verification_status: String,
    pub registration_date: u64,
}

/// Owner-editable vehicle fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct VehicleSpec {
    pub registration_number: String,
    pub vehicle_type: String,
    pub capacity: u32,
    pub wheelchair_accessible: bool,
    pub stretcher_capable: bool,
    pub oxygen_equipped: bool,
    pub medical_equipment: String,
}

impl Vehicle {
    pub fn new(ctx: &CallContext, spec: VehicleSpec) -> Self {
        Self {
            id: 0,
            owner: ctx.actor.clone(),
            registration_number: spec.registration_number,
            vehicle_type: spec.vehicle_type,
            capacity: spec.capacity,
            wheelchair_accessible: spec.wheelchair_accessible,
            stretcher_capable: spec.stretcher_capable,
            oxygen_equipped: spec.oxygen_equipped,
            medical_equipment: spec.medical_equipment,
            last_inspection_date: NEVER_INSPECTED,
            verification_status: status::PENDING.to_string(),
            registration_date: ctx.block_height,
        }
    }

    pub fn has_been_inspected(&self) -> bool {
        self.last_inspection_date != NEVER_INSPECTED
    }

    /// Whether the vehicle carries every piece of equipment asked for.
    ///
    /// Verification status is not part of this check.
    pub fn is_suitable(
        &self,
        wheelchair_needed: bool,
        stretcher_needed: bool,
        oxygen_needed: bool,
    ) -> bool {
        (!wheelchair_needed || self.wheelchair_accessible)
            && (!stretcher_needed || self.stretcher_capable)
            && (!oxygen_needed || self.oxygen_equipped)
    }
}

/// A recorded vehicle inspection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct Inspection {
    pub id: u64,
    pub vehicle_id: u64,
    /// Principal that performed the inspection
    pub inspector: String,
    pub inspection_date: u64,
    pub equipment_verified: String,
    /// Becomes the vehicle's verification status (e.g., "passed")
    pub safety_status: String,
    pub cleanliness_status: String,
    pub notes: String,
}

/// Input for recording an inspection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct InspectionReport {
    pub equipment_verified: String,
    pub safety_status: String,
    pub cleanliness_status: String,
    pub notes: String,
    /// Defaults to the calling actor when absent
    pub inspector: Option<String>,
}

/// Result of a vehicle suitability check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct VehicleSuitability {
    pub suitable: bool,
    pub verification_status: String,
}
