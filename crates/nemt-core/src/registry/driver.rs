//! Driver certification registry.

use tracing::info;

use super::{ensure_owner, require, RegistryResult};
use crate::db::Database;
use crate::models::{
    CallContext, Certification, Driver, DriverEligibility, DriverProfile, NewCertification,
};

/// Registers drivers and records their certifications.
pub struct DriverRegistry<'a> {
    db: &'a Database,
}

impl<'a> DriverRegistry<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Register a driver owned by the caller. Always starts `pending`.
    pub fn register_driver(
        &self,
        ctx: &CallContext,
        name: String,
        profile: DriverProfile,
    ) -> RegistryResult<u64> {
        let driver = Driver::new(ctx, name, profile);
        let id = self.db.insert_driver(&driver)?;
        info!(driver_id = id, actor = %ctx.actor, "registered driver");
        Ok(id)
    }

    pub fn get_driver(&self, id: u64) -> RegistryResult<Option<Driver>> {
        Ok(self.db.get_driver(id)?)
    }

    pub fn list_drivers(&self) -> RegistryResult<Vec<Driver>> {
        Ok(self.db.list_drivers()?)
    }

    /// Replace the driver's profile. Only the owner may do this, and the
    /// driver drops back to `pending` until certified again.
    pub fn update_driver(
        &self,
        ctx: &CallContext,
        id: u64,
        profile: DriverProfile,
    ) -> RegistryResult<u64> {
        let driver = require(self.db.get_driver(id)?, "driver", id)?;
        ensure_owner(ctx, &driver.owner, "driver", id)?;

        self.db.update_driver_profile(id, &profile)?;
        info!(driver_id = id, actor = %ctx.actor, "updated driver, certification reset");
        Ok(id)
    }

    /// Issue a certification. Any caller may certify; the driver becomes `certified`.
    pub fn add_certification(
        &self,
        ctx: &CallContext,
        driver_id: u64,
        input: NewCertification,
    ) -> RegistryResult<u64> {
        require(self.db.get_driver(driver_id)?, "driver", driver_id)?;

        let certification = Certification {
            id: 0,
            driver_id,
            certifier: input.certifier.unwrap_or_else(|| ctx.actor.clone()),
            certification_type: input.certification_type,
            issue_date: ctx.block_height,
            expiry_date: input.expiry_date,
            certification_details: input.certification_details,
        };
        let id = self.db.insert_certification(&certification)?;
        info!(
            certification_id = id,
            driver_id,
            certifier = %certification.certifier,
            "issued certification"
        );
        Ok(id)
    }

    pub fn get_certification(&self, id: u64) -> RegistryResult<Option<Certification>> {
        Ok(self.db.get_certification(id)?)
    }

    /// Certifications issued to a driver, oldest first.
    pub fn list_certifications(&self, driver_id: u64) -> RegistryResult<Vec<Certification>> {
        require(self.db.get_driver(driver_id)?, "driver", driver_id)?;
        Ok(self.db.list_certifications_for_driver(driver_id)?)
    }

    /// Whether the driver may take a trip needing the given skills at clock `now`.
    pub fn check_driver_eligibility(
        &self,
        driver_id: u64,
        require_cpr: bool,
        require_first_aid: bool,
        now: u64,
    ) -> RegistryResult<DriverEligibility> {
        let driver = require(self.db.get_driver(driver_id)?, "driver", driver_id)?;
        Ok(DriverEligibility {
            eligible: driver.is_eligible(require_cpr, require_first_aid, now),
            certification_status: driver.certification_status,
        })
    }
}
