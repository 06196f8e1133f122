//! Property-based tests for id sequences and the dispatch predicates.

use nemt_core::db::Database;
use nemt_core::models::{CallContext, DriverProfile, NewCertification, PatientDetails, VehicleSpec};
use nemt_core::registry::{DriverRegistry, PatientRegistry, RoutePlanner, VehicleRegistry};
use proptest::prelude::*;

fn ctx() -> CallContext {
    CallContext::new("ST1OWNER", 100)
}

fn profile(license_expiry: u64, cpr: bool, first_aid: bool) -> DriverProfile {
    DriverProfile {
        license_number: "DL12345678".to_string(),
        license_expiry,
        medical_training: "Basic Life Support".to_string(),
        cpr_certified: cpr,
        first_aid_certified: first_aid,
        special_training: String::new(),
    }
}

fn vehicle(wheelchair: bool, stretcher: bool, oxygen: bool) -> VehicleSpec {
    VehicleSpec {
        registration_number: "ABC123".to_string(),
        vehicle_type: "Van".to_string(),
        capacity: 4,
        wheelchair_accessible: wheelchair,
        stretcher_capable: stretcher,
        oxygen_equipped: oxygen,
        medical_equipment: String::new(),
    }
}

fn certification() -> NewCertification {
    NewCertification {
        certification_type: "Medical Transport".to_string(),
        expiry_date: 10100,
        certification_details: String::new(),
        certifier: None,
    }
}

fn details() -> PatientDetails {
    PatientDetails {
        address: "123 Main St".to_string(),
        contact: "555-123-4567".to_string(),
        medical_condition: String::new(),
        mobility_status: "Ambulatory".to_string(),
        equipment_needs: String::new(),
        recurring_schedule: false,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Each collection numbers its records 1, 2, 3... regardless of interleaving
    #[test]
    fn test_ids_are_dense_per_collection(ops in prop::collection::vec(0u8..3, 1..40)) {
        let db = Database::open_in_memory().unwrap();
        let ctx = ctx();
        let planner = RoutePlanner::new(&db);
        let vehicles = VehicleRegistry::new(&db);
        let patients = PatientRegistry::new(&db);

        let mut counts = [0u64; 3];
        for op in ops {
            let id = match op {
                0 => planner.create_route(&ctx, 200).unwrap(),
                1 => vehicles.register_vehicle(&ctx, vehicle(false, false, false)).unwrap(),
                _ => patients.register_patient(&ctx, "John Doe".to_string(), details()).unwrap(),
            };
            counts[op as usize] += 1;
            prop_assert_eq!(id, counts[op as usize]);
        }
    }

    // Rejected calls never consume an id
    #[test]
    fn test_failed_calls_do_not_consume_ids(
        attempts in prop::collection::vec(any::<bool>(), 1..30)
    ) {
        let db = Database::open_in_memory().unwrap();
        let ctx = ctx();
        let drivers = DriverRegistry::new(&db);
        let driver_id = drivers
            .register_driver(&ctx, "Jane Smith".to_string(), profile(10100, true, true))
            .unwrap();

        let mut issued = 0u64;
        for valid in attempts {
            let target = if valid { driver_id } else { driver_id + 1000 };
            match drivers.add_certification(&ctx, target, certification()) {
                Ok(id) => {
                    prop_assert!(valid);
                    issued += 1;
                    prop_assert_eq!(id, issued);
                }
                Err(e) => {
                    prop_assert!(!valid);
                    prop_assert!(e.is_not_found());
                }
            }
        }
        prop_assert_eq!(drivers.list_certifications(driver_id).unwrap().len() as u64, issued);
    }

    #[test]
    fn test_eligibility_matches_formula(
        certified in any::<bool>(),
        cpr in any::<bool>(),
        first_aid in any::<bool>(),
        require_cpr in any::<bool>(),
        require_first_aid in any::<bool>(),
        license_expiry in prop_oneof![0u64..20_000, any::<u64>(), Just(u64::MAX)],
        now in prop_oneof![0u64..20_000, any::<u64>(), Just(u64::MAX - 1)],
        block_height in any::<u64>(),
    ) {
        let db = Database::open_in_memory().unwrap();
        let ctx = CallContext::new("ST1OWNER", block_height);
        let drivers = DriverRegistry::new(&db);
        let driver_id = drivers
            .register_driver(
                &ctx,
                "Jane Smith".to_string(),
                profile(license_expiry, cpr, first_aid),
            )
            .unwrap();
        if certified {
            drivers.add_certification(&ctx, driver_id, certification()).unwrap();
        }

        let result = drivers
            .check_driver_eligibility(driver_id, require_cpr, require_first_aid, now)
            .unwrap();

        let expected = certified
            && (!require_cpr || cpr)
            && (!require_first_aid || first_aid)
            && license_expiry > now;
        prop_assert_eq!(result.eligible, expected);
        prop_assert_eq!(
            result.certification_status,
            if certified { "certified" } else { "pending" }
        );
    }

    #[test]
    fn test_suitability_matches_formula(
        has in any::<(bool, bool, bool)>(),
        needs in any::<(bool, bool, bool)>(),
    ) {
        let db = Database::open_in_memory().unwrap();
        let vehicles = VehicleRegistry::new(&db);
        let id = vehicles.register_vehicle(&ctx(), vehicle(has.0, has.1, has.2)).unwrap();

        let result = vehicles.check_vehicle_suitability(id, needs.0, needs.1, needs.2).unwrap();

        let expected = (!needs.0 || has.0) && (!needs.1 || has.1) && (!needs.2 || has.2);
        prop_assert_eq!(result.suitable, expected);
        prop_assert_eq!(result.verification_status, "pending");
    }
}
