// Unit tests for the encoding pipeline

use energy_predict::core::{CategoryMapping, EncodeError, Encoder, MappingRegistry};
use energy_predict::models::{PredictRequest, FEATURE_ORDER};
use std::collections::HashMap;

fn mapping(name: &str, pairs: &[(&str, i64)]) -> CategoryMapping {
    let entries: HashMap<String, i64> =
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect();
    CategoryMapping::from_entries(name, entries).unwrap()
}

fn test_registry() -> MappingRegistry {
    MappingRegistry {
        building_type: mapping("BuildingType", &[("Hotel", 3), ("NonResidential", 4)]),
        primary_property_type: mapping("PrimaryPropertyType", &[("Hotel", 3), ("Office", 11)]),
        largest_property_use_type: mapping(
            "LargestPropertyUseType",
            &[("Hotel", 3), ("Office", 20)],
        ),
    }
}

fn test_request() -> PredictRequest {
    PredictRequest {
        building_type: "Hotel".to_string(),
        primary_property_type: "Hotel".to_string(),
        largest_property_use_type: "Hotel".to_string(),
        number_of_buildings: 1.0,
        number_of_floors: 2.0,
        property_gfa_total: 1000.0,
        property_gfa_buildings: 900.0,
        num_property_use_types: 1,
        year_built: 2000,
        uses_steam: false,
        uses_natural_gas: true,
        has_parking: false,
    }
}

#[test]
fn test_registry_resolve_and_miss() {
    let registry = test_registry();
    assert_eq!(registry.building_type.resolve("Hotel"), Some(3));
    assert_eq!(registry.building_type.resolve("Spaceship"), None);
}

#[test]
fn test_registry_labels_stable_order() {
    let registry = test_registry();
    assert_eq!(
        registry.primary_property_type.labels(),
        &["Hotel", "Office"]
    );
    // A second call sees the identical sequence
    assert_eq!(
        registry.primary_property_type.labels(),
        registry.primary_property_type.labels()
    );
}

#[test]
fn test_frozen_vector_positions() {
    let encoder = Encoder::new(2025, 2025);
    let registry = test_registry();
    let mut request = test_request();
    request.largest_property_use_type = "Office".to_string();

    let row = encoder.encode(&request, &registry).unwrap().to_row();

    assert_eq!(row[6], 20.0, "slot 6 must carry the largest-use code");
    assert_eq!(row[7], 25.0, "slot 7 must carry referenceYear - YearBuilt");
    assert_eq!(FEATURE_ORDER[6], "LargestPropertyUseType");
    assert_eq!(FEATURE_ORDER[7], "BuildingAge");
}

#[test]
fn test_each_flag_coerces_independently() {
    let encoder = Encoder::new(2025, 2025);
    let registry = test_registry();

    for (steam, gas, parking) in [
        (true, false, false),
        (false, true, false),
        (false, false, true),
    ] {
        let mut request = test_request();
        request.uses_steam = steam;
        request.uses_natural_gas = gas;
        request.has_parking = parking;

        let row = encoder.encode(&request, &registry).unwrap().to_row();
        assert_eq!(row[8], steam as u8 as f64);
        assert_eq!(row[9], gas as u8 as f64);
        assert_eq!(row[10], parking as u8 as f64);
    }
}

#[test]
fn test_unknown_category_reports_field_and_value() {
    let encoder = Encoder::new(2025, 2025);
    let registry = test_registry();
    let mut request = test_request();
    request.building_type = "Spaceship".to_string();

    let err = encoder.encode(&request, &registry).unwrap_err();
    assert_eq!(
        err,
        EncodeError::UnknownCategory {
            field: "BuildingType",
            value: "Spaceship".to_string(),
        }
    );
}

#[test]
fn test_categorical_resolution_precedes_numeric_checks() {
    let encoder = Encoder::new(2025, 2025);
    let registry = test_registry();
    let mut request = test_request();
    request.primary_property_type = "Warehouse".to_string();
    request.year_built = 1500;

    // The second categorical field misses before the year check runs.
    let err = encoder.encode(&request, &registry).unwrap_err();
    assert_eq!(err.field(), "PrimaryPropertyType");
}

#[test]
fn test_count_constraints() {
    let encoder = Encoder::new(2025, 2025);
    let registry = test_registry();

    let mut request = test_request();
    request.number_of_buildings = 0.0;
    let err = encoder.encode(&request, &registry).unwrap_err();
    assert_eq!(
        err,
        EncodeError::InvalidField {
            field: "NumberofBuildings",
            constraint: ">= 1",
        }
    );

    let mut request = test_request();
    request.num_property_use_types = 0;
    let err = encoder.encode(&request, &registry).unwrap_err();
    assert_eq!(err.field(), "NumPropertyUseTypes");
}

#[test]
fn test_year_bounds() {
    let encoder = Encoder::new(2025, 2025);
    let registry = test_registry();

    let mut request = test_request();
    request.year_built = 1799;
    assert_eq!(
        encoder.encode(&request, &registry).unwrap_err().field(),
        "YearBuilt"
    );

    request.year_built = 1800;
    assert!(encoder.encode(&request, &registry).is_ok());

    request.year_built = 2025;
    assert!(encoder.encode(&request, &registry).is_ok());

    request.year_built = 2026;
    assert_eq!(
        encoder.encode(&request, &registry).unwrap_err().field(),
        "YearBuilt"
    );
}

#[test]
fn test_encode_idempotent_bit_identical() {
    let encoder = Encoder::new(2025, 2025);
    let registry = test_registry();
    let request = test_request();

    let first = encoder.encode(&request, &registry).unwrap().to_row();
    let second = encoder.encode(&request, &registry).unwrap().to_row();
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
