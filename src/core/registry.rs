use crate::config::MappingSettings;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a label-encoding table at startup
#[derive(Debug, Error)]
pub enum MappingLoadError {
    #[error("mapping table '{name}' could not be read from {path}: {source}")]
    Io {
        name: String,
        path: String,
        source: std::io::Error,
    },

    #[error("mapping table '{name}' is malformed: {source}")]
    Malformed {
        name: String,
        source: serde_json::Error,
    },

    #[error("mapping table '{name}' contains no entries")]
    Empty { name: String },

    #[error("mapping table '{name}' assigns a negative code to '{label}'")]
    NegativeCode { name: String, label: String },

    #[error("mapping table '{name}' assigns code {code} to both '{first}' and '{second}'")]
    DuplicateCode {
        name: String,
        code: i64,
        first: String,
        second: String,
    },
}

/// Immutable label-to-code table for one categorical feature.
///
/// Codes are data produced by the training pipeline, not compiled constants:
/// the valid category set belongs to the dataset the model was fit on, and a
/// hand-coded enum would drift from it. The table is loaded once at startup
/// and never mutated.
#[derive(Debug, Clone)]
pub struct CategoryMapping {
    name: String,
    codes: HashMap<String, i64>,
    labels: Vec<String>,
}

impl CategoryMapping {
    /// Load a table from a flat JSON document of `{label: code}` pairs
    pub fn load<P: AsRef<Path>>(name: &str, path: P) -> Result<Self, MappingLoadError> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|source| {
            MappingLoadError::Io {
                name: name.to_string(),
                path: path.as_ref().display().to_string(),
                source,
            }
        })?;

        let codes: HashMap<String, i64> =
            serde_json::from_str(&raw).map_err(|source| MappingLoadError::Malformed {
                name: name.to_string(),
                source,
            })?;

        Self::from_entries(name, codes)
    }

    /// Build a table from in-memory entries, enforcing the same invariants
    /// the file loader does (non-empty, non-negative codes, codes unique).
    pub fn from_entries(
        name: &str,
        codes: HashMap<String, i64>,
    ) -> Result<Self, MappingLoadError> {
        if codes.is_empty() {
            return Err(MappingLoadError::Empty {
                name: name.to_string(),
            });
        }

        let mut seen: HashMap<i64, &String> = HashMap::with_capacity(codes.len());
        for (label, code) in &codes {
            if *code < 0 {
                return Err(MappingLoadError::NegativeCode {
                    name: name.to_string(),
                    label: label.clone(),
                });
            }
            if let Some(first) = seen.insert(*code, label) {
                return Err(MappingLoadError::DuplicateCode {
                    name: name.to_string(),
                    code: *code,
                    first: first.clone(),
                    second: label.clone(),
                });
            }
        }

        // Sorted label list gives the presentation layer a stable display order.
        let mut labels: Vec<String> = codes.keys().cloned().collect();
        labels.sort();

        Ok(Self {
            name: name.to_string(),
            codes,
            labels,
        })
    }

    /// Look up the numeric code for a label, `None` when not in the domain
    #[inline]
    pub fn resolve(&self, label: &str) -> Option<i64> {
        self.codes.get(label).copied()
    }

    /// Domain labels in stable (sorted) order, for dropdowns and docs
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// The three categorical tables the encoder resolves against
#[derive(Debug, Clone)]
pub struct MappingRegistry {
    pub building_type: CategoryMapping,
    pub primary_property_type: CategoryMapping,
    pub largest_property_use_type: CategoryMapping,
}

impl MappingRegistry {
    /// Load all three tables from the configured paths.
    ///
    /// Any failure here is startup-fatal: the service cannot encode a single
    /// request without its full set of tables.
    pub fn load(settings: &MappingSettings) -> Result<Self, MappingLoadError> {
        Ok(Self {
            building_type: CategoryMapping::load("BuildingType", &settings.building_type)?,
            primary_property_type: CategoryMapping::load(
                "PrimaryPropertyType",
                &settings.primary_property_type,
            )?,
            largest_property_use_type: CategoryMapping::load(
                "LargestPropertyUseType",
                &settings.largest_property_use_type,
            )?,
        })
    }
}
