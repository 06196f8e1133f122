//! Driver and certification database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{u64_at, Database, DbResult, SqlU64};
use crate::models::{status, Certification, Driver, DriverProfile};

const DRIVER_COLUMNS: &str = "id, owner, name, license_number, license_expiry, medical_training, \
     cpr_certified, first_aid_certified, special_training, certification_status, registration_date";

const CERTIFICATION_COLUMNS: &str =
    "id, driver_id, certifier, certification_type, issue_date, expiry_date, certification_details";

impl Database {
    /// Insert a new driver, returning the assigned id. `driver.id` is ignored.
    pub fn insert_driver(&self, driver: &Driver) -> DbResult<u64> {
        self.conn.execute(
            r#"
            INSERT INTO drivers (
                owner, name, license_number, license_expiry, medical_training,
                cpr_certified, first_aid_certified, special_training,
                certification_status, registration_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                driver.owner,
                driver.name,
                driver.license_number,
                SqlU64(driver.license_expiry),
                driver.medical_training,
                driver.cpr_certified,
                driver.first_aid_certified,
                driver.special_training,
                driver.certification_status,
                SqlU64(driver.registration_date),
            ],
        )?;
        Ok(Self::last_id(&self.conn))
    }

    /// Get a driver by ID.
    pub fn get_driver(&self, id: u64) -> DbResult<Option<Driver>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM drivers WHERE id = ?", DRIVER_COLUMNS),
                [SqlU64(id)],
                driver_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all drivers in registration order.
    pub fn list_drivers(&self) -> DbResult<Vec<Driver>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM drivers ORDER BY id", DRIVER_COLUMNS))?;
        let rows = stmt.query_map([], driver_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Replace a driver's profile and reset certification to pending.
    pub fn update_driver_profile(&self, id: u64, profile: &DriverProfile) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE drivers SET
                license_number = ?2,
                license_expiry = ?3,
                medical_training = ?4,
                cpr_certified = ?5,
                first_aid_certified = ?6,
                special_training = ?7,
                certification_status = ?8,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                SqlU64(id),
                profile.license_number,
                SqlU64(profile.license_expiry),
                profile.medical_training,
                profile.cpr_certified,
                profile.first_aid_certified,
                profile.special_training,
                status::PENDING,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Insert a certification and mark its driver certified, atomically.
    pub fn insert_certification(&self, certification: &Certification) -> DbResult<u64> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            r#"
            INSERT INTO certifications (
                driver_id, certifier, certification_type, issue_date,
                expiry_date, certification_details
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                SqlU64(certification.driver_id),
                certification.certifier,
                certification.certification_type,
                SqlU64(certification.issue_date),
                SqlU64(certification.expiry_date),
                certification.certification_details,
            ],
        )?;
        let id = Self::last_id(&tx);
        tx.execute(
            "UPDATE drivers SET certification_status = ?2, updated_at = datetime('now') WHERE id = ?1",
            params![certification.driver_id, status::CERTIFIED],
        )?;
        tx.commit()?;
        Ok(id)
    }

    /// Get a certification by ID.
    pub fn get_certification(&self, id: u64) -> DbResult<Option<Certification>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM certifications WHERE id = ?", CERTIFICATION_COLUMNS),
                [SqlU64(id)],
                certification_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List certifications issued to a driver, oldest first.
    pub fn list_certifications_for_driver(&self, driver_id: u64) -> DbResult<Vec<Certification>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM certifications WHERE driver_id = ? ORDER BY id",
            CERTIFICATION_COLUMNS
        ))?;
        let rows = stmt.query_map([SqlU64(driver_id)], certification_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

fn driver_from_row(row: &Row<'_>) -> rusqlite::Result<Driver> {
    Ok(Driver {
        id: u64_at(row, 0)?,
        owner: row.get(1)?,
        name: row.get(2)?,
        license_number: row.get(3)?,
        license_expiry: u64_at(row, 4)?,
        medical_training: row.get(5)?,
        cpr_certified: row.get(6)?,
        first_aid_certified: row.get(7)?,
        special_training: row.get(8)?,
        certification_status: row.get(9)?,
        registration_date: u64_at(row, 10)?,
    })
}

fn certification_from_row(row: &Row<'_>) -> rusqlite::Result<Certification> {
    Ok(Certification {
        id: u64_at(row, 0)?,
        driver_id: u64_at(row, 1)?,
        certifier: row.get(2)?,
        certification_type: row.get(3)?,
        issue_date: u64_at(row, 4)?,
        expiry_date: u64_at(row, 5)?,
        certification_details: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CallContext;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn make_driver() -> Driver {
        let ctx = CallContext::new("ST1OWNER", 100);
        Driver::new(
            &ctx,
            "Jane Smith".into(),
            DriverProfile {
                license_number: "DL12345678".into(),
                license_expiry: 10_100,
                medical_training: "EMT Basic".into(),
                cpr_certified: true,
                first_aid_certified: false,
                special_training: "Elderly care".into(),
            },
        )
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();
        let id = db.insert_driver(&make_driver()).unwrap();
        assert_eq!(id, 1);

        let retrieved = db.get_driver(id).unwrap().unwrap();
        assert_eq!(retrieved.id, 1);
        assert_eq!(retrieved.name, "Jane Smith");
        assert!(retrieved.cpr_certified);
        assert!(!retrieved.first_aid_certified);
        assert_eq!(retrieved.certification_status, "pending");
    }

    #[test]
    fn test_get_missing() {
        let db = setup_db();
        assert!(db.get_driver(42).unwrap().is_none());
        assert!(db.get_certification(42).unwrap().is_none());
    }

    #[test]
    fn test_update_missing_affects_nothing() {
        let db = setup_db();
        let profile = DriverProfile {
            license_number: "DL1".into(),
            license_expiry: 1,
            medical_training: String::new(),
            cpr_certified: false,
            first_aid_certified: false,
            special_training: String::new(),
        };
        assert!(!db.update_driver_profile(7, &profile).unwrap());
    }

    #[test]
    fn test_certification_marks_driver() {
        let db = setup_db();
        let driver_id = db.insert_driver(&make_driver()).unwrap();

        let cert_id = db
            .insert_certification(&Certification {
                id: 0,
                driver_id,
                certifier: "ST2CERTIFIER".into(),
                certification_type: "Medical Transport".into(),
                issue_date: 100,
                expiry_date: 5_100,
                certification_details: "Certified".into(),
            })
            .unwrap();
        assert_eq!(cert_id, 1);

        let driver = db.get_driver(driver_id).unwrap().unwrap();
        assert_eq!(driver.certification_status, "certified");

        let certs = db.list_certifications_for_driver(driver_id).unwrap();
        assert_eq!(certs.len(), 1);
        assert_eq!(certs[0].certifier, "ST2CERTIFIER");
    }

    #[test]
    fn test_certification_for_unknown_driver_rolls_back() {
        let db = setup_db();
        let result = db.insert_certification(&Certification {
            id: 0,
            driver_id: 99,
            certifier: "ST2CERTIFIER".into(),
            certification_type: "Medical Transport".into(),
            issue_date: 100,
            expiry_date: 5_100,
            certification_details: "Certified".into(),
        });
        assert!(result.is_err());
        assert!(db.get_certification(1).unwrap().is_none());
    }
}
