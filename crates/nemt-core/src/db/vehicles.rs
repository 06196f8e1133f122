//! Vehicle and inspection database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{u64_at, Database, DbResult, SqlU64};
use crate::models::{status, Inspection, Vehicle, VehicleSpec};

const VEHICLE_COLUMNS: &str = "id, owner, registration_number, vehicle_type, capacity, \
     wheelchair_accessible, stretcher_capable, oxygen_equipped, medical_equipment, \
     last_inspection_date, verification_status, registration_date";

const INSPECTION_COLUMNS: &str = "id, vehicle_id, inspector, inspection_date, equipment_verified, \
     safety_status, cleanliness_status, notes";

impl Database {
    /// Insert a new vehicle, returning the assigned id. `vehicle.id` is ignored.
    pub fn insert_vehicle(&self, vehicle: &Vehicle) -> DbResult<u64> {
        self.conn.execute(
            r#"
            INSERT INTO vehicles (
                owner, registration_number, vehicle_type, capacity,
                wheelchair_accessible, stretcher_capable, oxygen_equipped,
                medical_equipment, last_inspection_date, verification_status,
                registration_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                vehicle.owner,
                vehicle.registration_number,
                vehicle.vehicle_type,
                vehicle.capacity,
                vehicle.wheelchair_accessible,
                vehicle.stretcher_capable,
                vehicle.oxygen_equipped,
                vehicle.medical_equipment,
                SqlU64(vehicle.last_inspection_date),
                vehicle.verification_status,
                SqlU64(vehicle.registration_date),
            ],
        )?;
        Ok(Self::last_id(&self.conn))
    }

    /// Get a vehicle by ID.
    pub fn get_vehicle(&self, id: u64) -> DbResult<Option<Vehicle>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM vehicles WHERE id = ?", VEHICLE_COLUMNS),
                [SqlU64(id)],
                vehicle_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all vehicles in registration order.
    pub fn list_vehicles(&self) -> DbResult<Vec<Vehicle>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM vehicles ORDER BY id", VEHICLE_COLUMNS))?;
        let rows = stmt.query_map([], vehicle_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Replace a vehicle's spec and reset verification to pending.
    pub fn update_vehicle_spec(&self, id: u64, spec: &VehicleSpec) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE vehicles SET
                registration_number = ?2,
                vehicle_type = ?3,
                capacity = ?4,
                wheelchair_accessible = ?5,
                stretcher_capable = ?6,
                oxygen_equipped = ?7,
                medical_equipment = ?8,
                verification_status = ?9,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                SqlU64(id),
                spec.registration_number,
                spec.vehicle_type,
                spec.capacity,
                spec.wheelchair_accessible,
                spec.stretcher_capable,
                spec.oxygen_equipped,
                spec.medical_equipment,
                status::PENDING,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Insert an inspection and stamp its vehicle, atomically.
    ///
    /// The vehicle's verification status becomes the inspection's safety status.
    pub fn insert_inspection(&self, inspection: &Inspection) -> DbResult<u64> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            r#"
            INSERT INTO inspections (
                vehicle_id, inspector, inspection_date, equipment_verified,
                safety_status, cleanliness_status, notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                SqlU64(inspection.vehicle_id),
                inspection.inspector,
                SqlU64(inspection.inspection_date),
                inspection.equipment_verified,
                inspection.safety_status,
                inspection.cleanliness_status,
                inspection.notes,
            ],
        )?;
        let id = Self::last_id(&tx);
        tx.execute(
            r#"
            UPDATE vehicles SET
                last_inspection_date = ?2,
                verification_status = ?3,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                SqlU64(inspection.vehicle_id),
                SqlU64(inspection.inspection_date),
                inspection.safety_status,
            ],
        )?;
        tx.commit()?;
        Ok(id)
    }

    /// Get an inspection by ID.
    pub fn get_inspection(&self, id: u64) -> DbResult<Option<Inspection>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM inspections WHERE id = ?", INSPECTION_COLUMNS),
                [SqlU64(id)],
                inspection_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Inspection history of a vehicle, oldest first.
    pub fn list_inspections_for_vehicle(&self, vehicle_id: u64) -> DbResult<Vec<Inspection>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM inspections WHERE vehicle_id = ? ORDER BY id",
            INSPECTION_COLUMNS
        ))?;
        let rows = stmt.query_map([SqlU64(vehicle_id)], inspection_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

fn vehicle_from_row(row: &Row<'_>) -> rusqlite::Result<Vehicle> {
    Ok(Vehicle {
        id: u64_at(row, 0)?,
        owner: row.get(1)?,
        registration_number: row.get(2)?,
        vehicle_type: row.get(3)?,
        capacity: row.get(4)?,
        wheelchair_accessible: row.get(5)?,
        stretcher_capable: row.get(6)?,
        oxygen_equipped: row.get(7)?,
        medical_equipment: row.get(8)?,
        last_inspection_date: u64_at(row, 9)?,
        verification_status: row.get(10)?,
        registration_date: u64_at(row, 11)?,
    })
}

fn inspection_from_row(row: &Row<'_>) -> rusqlite::Result<Inspection> {
    Ok(Inspection {
        id: u64_at(row, 0)?,
        vehicle_id: u64_at(row, 1)?,
        inspector: row.get(2)?,
        inspection_date: u64_at(row, 3)?,
        equipment_verified: row.get(4)?,
        safety_status: row.get(5)?,
        cleanliness_status: row.get(6)?,
        notes: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CallContext;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn spec() -> VehicleSpec {
        VehicleSpec {
            registration_number: "ABC123".into(),
            vehicle_type: "Van".into(),
            capacity: 4,
            wheelchair_accessible: true,
            stretcher_capable: true,
            oxygen_equipped: true,
            medical_equipment: "Wheelchair lift, oxygen tanks, first aid kit".into(),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();
        let ctx = CallContext::new("ST1OWNER", 100);
        let id = db.insert_vehicle(&Vehicle::new(&ctx, spec())).unwrap();

        let vehicle = db.get_vehicle(id).unwrap().unwrap();
        assert_eq!(vehicle.capacity, 4);
        assert_eq!(vehicle.last_inspection_date, 0);
        assert_eq!(vehicle.verification_status, "pending");
    }

    #[test]
    fn test_inspection_stamps_vehicle() {
        let db = setup_db();
        let ctx = CallContext::new("ST1OWNER", 100);
        let vehicle_id = db.insert_vehicle(&Vehicle::new(&ctx, spec())).unwrap();

        db.insert_inspection(&Inspection {
            id: 0,
            vehicle_id,
            inspector: "ST2INSPECTOR".into(),
            inspection_date: 150,
            equipment_verified: "Wheelchair lift".into(),
            safety_status: "failed".into(),
            cleanliness_status: "passed".into(),
            notes: "Brake lights out".into(),
        })
        .unwrap();

        let vehicle = db.get_vehicle(vehicle_id).unwrap().unwrap();
        assert_eq!(vehicle.last_inspection_date, 150);
        assert_eq!(vehicle.verification_status, "failed");
        assert_eq!(db.list_inspections_for_vehicle(vehicle_id).unwrap().len(), 1);
    }

    #[test]
    fn test_update_spec_resets_verification() {
        let db = setup_db();
        let ctx = CallContext::new("ST1OWNER", 100);
        let mut vehicle = Vehicle::new(&ctx, spec());
        vehicle.verification_status = "passed".into();
        let id = db.insert_vehicle(&vehicle).unwrap();

        let mut new_spec = spec();
        new_spec.capacity = 6;
        assert!(db.update_vehicle_spec(id, &new_spec).unwrap());

        let vehicle = db.get_vehicle(id).unwrap().unwrap();
        assert_eq!(vehicle.capacity, 6);
        assert_eq!(vehicle.verification_status, "pending");
    }
}
