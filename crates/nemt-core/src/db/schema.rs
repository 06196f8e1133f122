//! SQLite schema definition.

/// Complete database schema for the transport stores.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Drivers
-- ============================================================================

CREATE TABLE IF NOT EXISTS drivers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner TEXT NOT NULL,
    name TEXT NOT NULL,
    license_number TEXT NOT NULL,
    license_expiry INTEGER NOT NULL,
    medical_training TEXT NOT NULL,
    cpr_certified INTEGER NOT NULL,
    first_aid_certified INTEGER NOT NULL,
    special_training TEXT NOT NULL,
    certification_status TEXT NOT NULL DEFAULT 'pending',
    registration_date INTEGER NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TRIGGER IF NOT EXISTS drivers_owner_immutable BEFORE UPDATE OF owner ON drivers
WHEN new.owner != old.owner
BEGIN
    SELECT RAISE(ABORT, 'Driver owner cannot change');
END;

CREATE TABLE IF NOT EXISTS certifications (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    driver_id INTEGER NOT NULL REFERENCES drivers(id),
    certifier TEXT NOT NULL,
    certification_type TEXT NOT NULL,
    issue_date INTEGER NOT NULL,
    expiry_date INTEGER NOT NULL,
    certification_details TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_certifications_driver ON certifications(driver_id);

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner TEXT NOT NULL,
    name TEXT NOT NULL,
    address TEXT NOT NULL,
    contact TEXT NOT NULL,
    medical_condition TEXT NOT NULL,
    mobility_status TEXT NOT NULL,
    equipment_needs TEXT NOT NULL,
    recurring_schedule INTEGER NOT NULL,
    registration_date INTEGER NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TRIGGER IF NOT EXISTS patients_owner_immutable BEFORE UPDATE OF owner ON patients
WHEN new.owner != old.owner
BEGIN
    SELECT RAISE(ABORT, 'Patient owner cannot change');
END;

CREATE TABLE IF NOT EXISTS transport_requests (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id INTEGER NOT NULL REFERENCES patients(id),
    pickup_location TEXT NOT NULL,
    destination TEXT NOT NULL,
    appointment_time INTEGER NOT NULL,
    return_trip INTEGER NOT NULL,
    special_instructions TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',     -- pending, confirmed, ... (open set)
    request_date INTEGER NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_requests_patient ON transport_requests(patient_id);

-- ============================================================================
-- Routes
-- ============================================================================

-- driver_id / vehicle_id are opaque; 0 means unassigned
CREATE TABLE IF NOT EXISTS routes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    driver_id INTEGER NOT NULL DEFAULT 0,
    vehicle_id INTEGER NOT NULL DEFAULT 0,
    date INTEGER NOT NULL,
    status TEXT NOT NULL DEFAULT 'planning',    -- planning, assigned, in-progress, ... (open set)
    created_at INTEGER NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- request_id is an opaque reference
CREATE TABLE IF NOT EXISTS route_stops (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    route_id INTEGER NOT NULL REFERENCES routes(id),
    request_id INTEGER NOT NULL,
    stop_number INTEGER NOT NULL,
    estimated_arrival INTEGER NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_route_stops_route ON route_stops(route_id, stop_number);

-- Assignment audit log (append-only)
CREATE TABLE IF NOT EXISTS route_assignments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    route_id INTEGER NOT NULL REFERENCES routes(id),
    driver_id INTEGER NOT NULL,
    vehicle_id INTEGER NOT NULL,
    assigned_by TEXT NOT NULL,
    assigned_at INTEGER NOT NULL,
    status TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_route_assignments_route ON route_assignments(route_id);

CREATE TRIGGER IF NOT EXISTS route_assignments_no_update BEFORE UPDATE ON route_assignments
BEGIN
    SELECT RAISE(ABORT, 'Route assignments are append-only');
END;

CREATE TRIGGER IF NOT EXISTS route_assignments_no_delete BEFORE DELETE ON route_assignments
BEGIN
    SELECT RAISE(ABORT, 'Route assignments are append-only');
END;

-- ============================================================================
-- Vehicles
-- ============================================================================

CREATE TABLE IF NOT EXISTS vehicles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner TEXT NOT NULL,
    registration_number TEXT NOT NULL,
    vehicle_type TEXT NOT NULL,
    capacity INTEGER NOT NULL,
    wheelchair_accessible INTEGER NOT NULL,
    stretcher_capable INTEGER NOT NULL,
    oxygen_equipped INTEGER NOT NULL,
    medical_equipment TEXT NOT NULL,
    last_inspection_date INTEGER NOT NULL DEFAULT 0,  -- 0 = never inspected
    verification_status TEXT NOT NULL DEFAULT 'pending',
    registration_date INTEGER NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TRIGGER IF NOT EXISTS vehicles_owner_immutable BEFORE UPDATE OF owner ON vehicles
WHEN new.owner != old.owner
BEGIN
    SELECT RAISE(ABORT, 'Vehicle owner cannot change');
END;

CREATE TABLE IF NOT EXISTS inspections (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    vehicle_id INTEGER NOT NULL REFERENCES vehicles(id),
    inspector TEXT NOT NULL,
    inspection_date INTEGER NOT NULL,
    equipment_verified TEXT NOT NULL,
    safety_status TEXT NOT NULL,
    cleanliness_status TEXT NOT NULL,
    notes TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_inspections_vehicle ON inspections(vehicle_id);
"#;
