use serde::{Deserialize, Serialize};
use validator::Validate;

/// Raw prediction input as submitted by the form collaborator.
///
/// Keys mirror the column names of the training dataset, parentheses
/// included: the upstream form posts `PropertyGFABuilding(s)` verbatim.
/// Snake_case aliases are accepted for hand-written clients.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PredictRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "building_type", rename = "BuildingType")]
    pub building_type: String,
    #[validate(length(min = 1))]
    #[serde(alias = "primary_property_type", rename = "PrimaryPropertyType")]
    pub primary_property_type: String,
    #[validate(length(min = 1))]
    #[serde(alias = "largest_property_use_type", rename = "LargestPropertyUseType")]
    pub largest_property_use_type: String,
    #[serde(alias = "number_of_buildings", rename = "NumberofBuildings")]
    pub number_of_buildings: f64,
    #[serde(alias = "number_of_floors", rename = "NumberofFloors")]
    pub number_of_floors: f64,
    #[serde(alias = "property_gfa_total", rename = "PropertyGFATotal")]
    pub property_gfa_total: f64,
    #[serde(alias = "property_gfa_buildings", rename = "PropertyGFABuilding(s)")]
    pub property_gfa_buildings: f64,
    #[serde(alias = "num_property_use_types", rename = "NumPropertyUseTypes")]
    pub num_property_use_types: u32,
    #[serde(alias = "year_built", rename = "YearBuilt")]
    pub year_built: i32,
    #[serde(alias = "uses_steam", rename = "UsesSteam")]
    pub uses_steam: bool,
    #[serde(alias = "uses_natural_gas", rename = "UsesNaturalGas")]
    pub uses_natural_gas: bool,
    #[serde(alias = "has_parking", rename = "HasParking")]
    pub has_parking: bool,
}

/// Accepts both the bare request object and the legacy envelope
/// `{"input_": {...}}` still sent by older form deployments.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PredictPayload {
    Wrapped {
        #[serde(rename = "input_")]
        input: PredictRequest,
    },
    Bare(PredictRequest),
}

impl PredictPayload {
    pub fn into_inner(self) -> PredictRequest {
        match self {
            PredictPayload::Wrapped { input } => input,
            PredictPayload::Bare(request) => request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "BuildingType": "Hotel",
        "PrimaryPropertyType": "Hotel",
        "LargestPropertyUseType": "Hotel",
        "NumberofBuildings": 1,
        "NumberofFloors": 2,
        "PropertyGFATotal": 1000.0,
        "PropertyGFABuilding(s)": 900.0,
        "NumPropertyUseTypes": 1,
        "YearBuilt": 2000,
        "UsesSteam": false,
        "UsesNaturalGas": true,
        "HasParking": false
    }"#;

    #[test]
    fn test_parse_bare_payload() {
        let payload: PredictPayload = serde_json::from_str(BODY).unwrap();
        let request = payload.into_inner();
        assert_eq!(request.building_type, "Hotel");
        assert_eq!(request.property_gfa_buildings, 900.0);
        assert_eq!(request.year_built, 2000);
        assert!(request.uses_natural_gas);
    }

    #[test]
    fn test_parse_wrapped_payload() {
        let wrapped = format!(r#"{{"input_": {}}}"#, BODY);
        let payload: PredictPayload = serde_json::from_str(&wrapped).unwrap();
        let request = payload.into_inner();
        assert_eq!(request.largest_property_use_type, "Hotel");
        assert_eq!(request.num_property_use_types, 1);
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let body = r#"{"BuildingType": "Hotel"}"#;
        assert!(serde_json::from_str::<PredictPayload>(body).is_err());
    }
}
