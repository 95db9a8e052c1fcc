use crate::core::registry::{CategoryMapping, MappingRegistry};
use crate::models::{FeatureVector, PredictRequest};
use thiserror::Error;

/// Oldest construction year the service accepts
pub const MIN_YEAR_BUILT: i32 = 1800;

/// Per-request validation failures.
///
/// These carry the offending field plus the violated constraint so the
/// caller can correct the input, and nothing more: mapping contents are
/// never echoed back beyond the rejected value itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("unknown {field} value: '{value}'")]
    UnknownCategory { field: &'static str, value: String },

    #[error("{field} violates constraint: {constraint}")]
    InvalidField {
        field: &'static str,
        constraint: &'static str,
    },
}

impl EncodeError {
    /// Name of the request field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            EncodeError::UnknownCategory { field, .. } => field,
            EncodeError::InvalidField { field, .. } => field,
        }
    }
}

/// Turns a validated request into the model's feature vector.
///
/// `reference_year` is the training-time baseline for the derived
/// `BuildingAge` feature and comes from the model artifact's metadata.
/// `max_year` is the calendar year captured at startup and bounds
/// `YearBuilt` from above.
#[derive(Debug, Clone, Copy)]
pub struct Encoder {
    reference_year: i32,
    max_year: i32,
}

impl Encoder {
    pub fn new(reference_year: i32, max_year: i32) -> Self {
        Self {
            reference_year,
            max_year,
        }
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// Validate a request and assemble the ordered feature vector.
    ///
    /// Validation runs in a fixed order and fails fast on the first
    /// violation: categorical resolution, then numeric domains, then the
    /// construction-year range. Pure and deterministic; identical input and
    /// registry state always produce an identical vector.
    pub fn encode(
        &self,
        request: &PredictRequest,
        registry: &MappingRegistry,
    ) -> Result<FeatureVector, EncodeError> {
        // Stage 1: categorical resolution, fail fast on the first miss
        let building_type = resolve(
            &registry.building_type,
            "BuildingType",
            &request.building_type,
        )?;
        let primary_property_type = resolve(
            &registry.primary_property_type,
            "PrimaryPropertyType",
            &request.primary_property_type,
        )?;
        let largest_property_use_type = resolve(
            &registry.largest_property_use_type,
            "LargestPropertyUseType",
            &request.largest_property_use_type,
        )?;

        // Stage 2: numeric domain checks
        check_count("NumberofBuildings", request.number_of_buildings)?;
        check_count("NumberofFloors", request.number_of_floors)?;
        check_area("PropertyGFATotal", request.property_gfa_total)?;
        check_area("PropertyGFABuilding(s)", request.property_gfa_buildings)?;
        if request.num_property_use_types < 1 {
            return Err(EncodeError::InvalidField {
                field: "NumPropertyUseTypes",
                constraint: ">= 1",
            });
        }

        // Stage 3: construction year range
        if request.year_built < MIN_YEAR_BUILT || request.year_built > self.max_year {
            return Err(EncodeError::InvalidField {
                field: "YearBuilt",
                constraint: "range",
            });
        }

        // Stage 4: derived feature. May go negative when the artifact's
        // reference year trails the calendar year; accepted, the route
        // flags it as implausible.
        let building_age = self.reference_year - request.year_built;

        Ok(FeatureVector {
            building_type,
            primary_property_type,
            number_of_buildings: request.number_of_buildings,
            number_of_floors: request.number_of_floors,
            property_gfa_total: request.property_gfa_total,
            property_gfa_buildings: request.property_gfa_buildings,
            largest_property_use_type,
            building_age,
            uses_steam: request.uses_steam as u8,
            uses_natural_gas: request.uses_natural_gas as u8,
            has_parking: request.has_parking as u8,
            num_property_use_types: request.num_property_use_types,
        })
    }
}

#[inline]
fn resolve(
    mapping: &CategoryMapping,
    field: &'static str,
    value: &str,
) -> Result<i64, EncodeError> {
    mapping.resolve(value).ok_or_else(|| EncodeError::UnknownCategory {
        field,
        value: value.to_string(),
    })
}

#[inline]
fn check_count(field: &'static str, value: f64) -> Result<(), EncodeError> {
    if !value.is_finite() || value < 1.0 {
        return Err(EncodeError::InvalidField {
            field,
            constraint: ">= 1",
        });
    }
    Ok(())
}

#[inline]
fn check_area(field: &'static str, value: f64) -> Result<(), EncodeError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EncodeError::InvalidField {
            field,
            constraint: "> 0",
        });
    }
    Ok(())
}
