//! Patient and transport request database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{u64_at, Database, DbResult, SqlU64};
use crate::models::{Patient, PatientDetails, TransportRequest};

const PATIENT_COLUMNS: &str = "id, owner, name, address, contact, medical_condition, \
     mobility_status, equipment_needs, recurring_schedule, registration_date";

const REQUEST_COLUMNS: &str = "id, patient_id, pickup_location, destination, appointment_time, \
     return_trip, special_instructions, status, request_date";

impl Database {
    /// Insert a new patient, returning the assigned id. `patient.id` is ignored.
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<u64> {
        self.conn.execute(
            r#"
            INSERT INTO patients (
                owner, name, address, contact, medical_condition,
                mobility_status, equipment_needs, recurring_schedule, registration_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                patient.owner,
                patient.name,
                patient.address,
                patient.contact,
                patient.medical_condition,
                patient.mobility_status,
                patient.equipment_needs,
                patient.recurring_schedule,
                SqlU64(patient.registration_date),
            ],
        )?;
        Ok(Self::last_id(&self.conn))
    }

    /// Replace a patient's editable details.
    pub fn update_patient_details(&self, id: u64, details: &PatientDetails) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE patients SET
                address = ?2,
                contact = ?3,
                medical_condition = ?4,
                mobility_status = ?5,
                equipment_needs = ?6,
                recurring_schedule = ?7,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                SqlU64(id),
                details.address,
                details.contact,
                details.medical_condition,
                details.mobility_status,
                details.equipment_needs,
                details.recurring_schedule,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: u64) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM patients WHERE id = ?", PATIENT_COLUMNS),
                [SqlU64(id)],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Insert a transport request, returning the assigned id.
    pub fn insert_transport_request(&self, request: &TransportRequest) -> DbResult<u64> {
        self.conn.execute(
            r#"
            INSERT INTO transport_requests (
                patient_id, pickup_location, destination, appointment_time,
                return_trip, special_instructions, status, request_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                SqlU64(request.patient_id),
                request.pickup_location,
                request.destination,
                SqlU64(request.appointment_time),
                request.return_trip,
                request.special_instructions,
                request.status,
                SqlU64(request.request_date),
            ],
        )?;
        Ok(Self::last_id(&self.conn))
    }

    /// Get a transport request by ID.
    pub fn get_transport_request(&self, id: u64) -> DbResult<Option<TransportRequest>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM transport_requests WHERE id = ?", REQUEST_COLUMNS),
                [SqlU64(id)],
                request_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List a patient's transport requests, oldest first.
    pub fn list_requests_for_patient(&self, patient_id: u64) -> DbResult<Vec<TransportRequest>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM transport_requests WHERE patient_id = ? ORDER BY id",
            REQUEST_COLUMNS
        ))?;
        let rows = stmt.query_map([SqlU64(patient_id)], request_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Overwrite a request's status.
    pub fn set_request_status(&self, id: u64, status: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE transport_requests SET status = ?2, updated_at = datetime('now') WHERE id = ?1",
            params![SqlU64(id), status],
        )?;
        Ok(rows_affected > 0)
    }
}

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: u64_at(row, 0)?,
        owner: row.get(1)?,
        name: row.get(2)?,
        address: row.get(3)?,
        contact: row.get(4)?,
        medical_condition: row.get(5)?,
        mobility_status: row.get(6)?,
        equipment_needs: row.get(7)?,
        recurring_schedule: row.get(8)?,
        registration_date: u64_at(row, 9)?,
    })
}

fn request_from_row(row: &Row<'_>) -> rusqlite::Result<TransportRequest> {
    Ok(TransportRequest {
        id: u64_at(row, 0)?,
        patient_id: u64_at(row, 1)?,
        pickup_location: row.get(2)?,
        destination: row.get(3)?,
        appointment_time: u64_at(row, 4)?,
        return_trip: row.get(5)?,
        special_instructions: row.get(6)?,
        status: row.get(7)?,
        request_date: u64_at(row, 8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CallContext, NewTransportRequest};

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn details() -> PatientDetails {
        PatientDetails {
            address: "123 Main St, Anytown".into(),
            contact: "555-123-4567".into(),
            medical_condition: "Dialysis patient".into(),
            mobility_status: "Wheelchair bound".into(),
            equipment_needs: "Wheelchair lift, oxygen support".into(),
            recurring_schedule: true,
        }
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();
        let ctx = CallContext::new("ST1OWNER", 100);
        let id = db
            .insert_patient(&Patient::new(&ctx, "John Doe".into(), details()))
            .unwrap();

        let retrieved = db.get_patient(id).unwrap().unwrap();
        assert_eq!(retrieved.name, "John Doe");
        assert_eq!(retrieved.mobility_status, "Wheelchair bound");
        assert!(retrieved.recurring_schedule);
        assert_eq!(retrieved.registration_date, 100);
    }

    #[test]
    fn test_update_details_keeps_name() {
        let db = setup_db();
        let ctx = CallContext::new("ST1OWNER", 100);
        let id = db
            .insert_patient(&Patient::new(&ctx, "John Doe".into(), details()))
            .unwrap();

        let mut updated = details();
        updated.address = "456 Oak St, Anytown".into();
        assert!(db.update_patient_details(id, &updated).unwrap());

        let retrieved = db.get_patient(id).unwrap().unwrap();
        assert_eq!(retrieved.name, "John Doe");
        assert_eq!(retrieved.address, "456 Oak St, Anytown");
    }

    #[test]
    fn test_requests_for_patient() {
        let db = setup_db();
        let ctx = CallContext::new("ST1OWNER", 100);
        let patient_id = db
            .insert_patient(&Patient::new(&ctx, "John Doe".into(), details()))
            .unwrap();

        for appointment_time in [1_000, 2_000] {
            let request = TransportRequest::new(
                &ctx,
                NewTransportRequest {
                    patient_id,
                    pickup_location: "Home".into(),
                    destination: "Clinic".into(),
                    appointment_time,
                    return_trip: false,
                    special_instructions: String::new(),
                },
            );
            db.insert_transport_request(&request).unwrap();
        }

        let requests = db.list_requests_for_patient(patient_id).unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].appointment_time, 1_000);
        assert_eq!(requests[1].appointment_time, 2_000);

        assert!(db.set_request_status(requests[0].id, "confirmed").unwrap());
        let first = db.get_transport_request(requests[0].id).unwrap().unwrap();
        assert_eq!(first.status, "confirmed");
    }
}
