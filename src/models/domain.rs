use serde::{Deserialize, Serialize};

/// Number of features the trained model consumes.
pub const FEATURE_COUNT: usize = 12;

/// Column order of the training frame at fit time.
///
/// This ordering is a frozen contract with the model artifact: the vector is
/// untyped past the inference boundary, so any reorder silently corrupts
/// predictions. The artifact declares its own copy of this list and the two
/// are compared at startup (see `Predictor::new`).
pub const FEATURE_ORDER: [&str; FEATURE_COUNT] = [
    "BuildingType",
    "PrimaryPropertyType",
    "NumberofBuildings",
    "NumberofFloors",
    "PropertyGFATotal",
    "PropertyGFABuilding(s)",
    "LargestPropertyUseType",
    "BuildingAge",
    "UsesSteam",
    "UsesNaturalGas",
    "HasParking",
    "NumPropertyUseTypes",
];

/// Encoded model input with named fields.
///
/// Field names make the positional contract auditable; positions only exist
/// in `to_row`, the single place a bare array is produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub building_type: i64,
    pub primary_property_type: i64,
    pub number_of_buildings: f64,
    pub number_of_floors: f64,
    pub property_gfa_total: f64,
    pub property_gfa_buildings: f64,
    pub largest_property_use_type: i64,
    pub building_age: i32,
    pub uses_steam: u8,
    pub uses_natural_gas: u8,
    pub has_parking: u8,
    pub num_property_use_types: u32,
}

impl FeatureVector {
    /// Serialize to the positional form the model was fit on.
    ///
    /// Must stay in lockstep with `FEATURE_ORDER`.
    pub fn to_row(&self) -> [f64; FEATURE_COUNT] {
        [
            self.building_type as f64,
            self.primary_property_type as f64,
            self.number_of_buildings,
            self.number_of_floors,
            self.property_gfa_total,
            self.property_gfa_buildings,
            self.largest_property_use_type as f64,
            self.building_age as f64,
            self.uses_steam as f64,
            self.uses_natural_gas as f64,
            self.has_parking as f64,
            self.num_property_use_types as f64,
        ]
    }
}

/// Metadata shipped inside the model artifact.
///
/// `reference_year` is the baseline used to derive `BuildingAge` during
/// training. It travels with the artifact rather than the service config so
/// that swapping models can never desynchronize the derivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub name: String,
    pub version: String,
    #[serde(rename = "referenceYear")]
    pub reference_year: i32,
    #[serde(rename = "featureNames")]
    pub feature_names: Vec<String>,
}
