//! Driver and certification models.

use serde::{Deserialize, Serialize};

use super::{status, CallContext};

/// A registered transport driver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct Driver {
    /// Store-assigned id (0 until inserted)
    pub id: u64,
    /// Principal that registered the driver; fixed at creation
    pub owner: String,
    /// Full name
    pub name: String,
    /// Driving license number
    pub license_number: String,
    /// License expiry on the logical clock
    pub license_expiry: u64,
    /// Medical training level (e.g., "EMT Basic")
    pub medical_training: String,
    pub cpr_certified: bool,
    pub first_aid_certified: bool,
    /// Free-form special training notes
    pub special_training: String,
    /// `pending`, `certified`, or a certifier-supplied value
    pub certification_status: String,
    /// Logical clock at registration
    pub registration_date: u64,
}

/// Owner-editable driver fields.
///
/// Updates replace every field here; callers resupply unchanged values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct DriverProfile {
    pub license_number: String,
    pub license_expiry: u64,
    pub medical_training: String,
    pub cpr_certified: bool,
    pub first_aid_certified: bool,
    pub special_training: String,
}

impl Driver {
    /// Build a pending driver owned by the caller.
    pub fn new(ctx: &CallContext, name: String, profile: DriverProfile) -> Self {
        Self {
            id: 0,
            owner: ctx.actor.clone(),
            name,
            license_number: profile.license_number,
            license_expiry: profile.license_expiry,
            medical_training: profile.medical_training,
            cpr_certified: profile.cpr_certified,
            first_aid_certified: profile.first_aid_certified,
            special_training: profile.special_training,
            certification_status: status::PENDING.to_string(),
            registration_date: ctx.block_height,
        }
    }

    pub fn is_certified(&self) -> bool {
        self.certification_status == status::CERTIFIED
    }

    /// License still valid strictly after `now`.
    pub fn license_current(&self, now: u64) -> bool {
        self.license_expiry > now
    }

    /// Eligibility for a trip requiring the given skills at clock `now`.
    pub fn is_eligible(&self, require_cpr: bool, require_first_aid: bool, now: u64) -> bool {
        self.is_certified()
            && (!require_cpr || self.cpr_certified)
            && (!require_first_aid || self.first_aid_certified)
            && self.license_current(now)
    }
}

/// A certification issued to a driver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct Certification {
    pub id: u64,
    pub driver_id: u64,
    /// Principal that issued the certification
    pub certifier: String,
    /// e.g., "Medical Transport"
    pub certification_type: String,
    /// Logical clock at issue
    pub issue_date: u64,
    pub expiry_date: u64,
    pub certification_details: String,
}

/// Input for issuing a certification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct NewCertification {
    pub certification_type: String,
    pub expiry_date: u64,
    pub certification_details: String,
    /// Defaults to the calling actor when absent
    pub certifier: Option<String>,
}

/// Result of a driver eligibility check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, uniffi::Record)]
pub struct DriverEligibility {
    pub eligible: bool,
    pub certification_status: String,
}
