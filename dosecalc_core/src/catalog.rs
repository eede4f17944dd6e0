//! Default medication catalog and lookups.
//!
//! This module provides the built-in medication table, the case-insensitive
//! name filter used for search suggestions, and exact-name resolution.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog with the built-in medication formulations
pub fn build_default_catalog() -> Catalog {
    let records = vec![
        MedicationRecord::new("Cefixime", 8.0, 20.0, "Every 12 hours"),
        MedicationRecord::new("Azithromycin", 10.0, 40.0, "Once daily"),
        MedicationRecord::new("Prednisolone", 1.0, 3.0, "Once daily"),
        MedicationRecord::new("Ibuprofen", 10.0, 20.0, "Every 6 hours"),
        MedicationRecord::new("Paracetamol (100 mg/ml)", 15.0, 100.0, "Every 4-6 hours"),
        // 120 mg per 5 ml
        MedicationRecord::new("Paracetamol (120 mg/ 5 ml)", 15.0, 6.0, "Every 4-6 hours"),
        // 250 mg per 5 ml
        MedicationRecord::new("Amoxicillin (250 mg/ 5 ml)", 20.0, 50.0, "Every 8 hours"),
        MedicationRecord::new("Chlorpheniramine", 0.25, 1.0, "Every 4-6 hours"),
    ];

    tracing::debug!("Built default catalog with {} medications", records.len());

    Catalog { records }
}

impl Catalog {
    /// Create a catalog from records, keeping their order
    pub fn from_records(records: Vec<MedicationRecord>) -> Self {
        Self { records }
    }

    /// Copy of this catalog with extra records appended after the existing ones
    pub fn extended_with(&self, extra: impl IntoIterator<Item = MedicationRecord>) -> Self {
        let mut records = self.records.clone();
        records.extend(extra);
        Self { records }
    }

    /// All records in definition order
    pub fn records(&self) -> &[MedicationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose name contains `query`, ignoring case, in definition order
    ///
    /// Surrounding whitespace in the query is ignored, so an empty or blank
    /// query returns the full catalog.
    pub fn filter(&self, query: &str) -> Vec<&MedicationRecord> {
        let needle = query.trim().to_lowercase();
        self.records
            .iter()
            .filter(|record| record.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// First record whose name equals `name` exactly (case-sensitive)
    pub fn find_by_name(&self, name: &str) -> Option<&MedicationRecord> {
        self.records.iter().find(|record| record.name == name)
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for (index, record) in self.records.iter().enumerate() {
            if record.name.trim().is_empty() {
                errors.push(format!("Medication #{} has empty name", index + 1));
            } else if !seen.insert(record.name.as_str()) {
                errors.push(format!("Duplicate medication name '{}'", record.name));
            }

            if !(record.dose_per_kg.is_finite() && record.dose_per_kg > 0.0) {
                errors.push(format!(
                    "Medication '{}': dose per kg {} must be greater than zero",
                    record.name, record.dose_per_kg
                ));
            }
            if !(record.concentration.is_finite() && record.concentration > 0.0) {
                errors.push(format!(
                    "Medication '{}': concentration {} must be greater than zero",
                    record.name, record.concentration
                ));
            }
            if record.interval.trim().is_empty() {
                errors.push(format!("Medication '{}' has empty interval", record.name));
            }
        }

        errors
    }
}
