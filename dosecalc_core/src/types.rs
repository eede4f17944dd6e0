//! Core domain types for the dose calculator.
//!
//! This module defines:
//! - Medication records and the catalog that holds them
//! - Dose queries (the three numbers a calculation needs)
//! - Dose results and the non-fatal warnings attached to them

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Medication Types
// ============================================================================

/// A single medication formulation (e.g., "Ibuprofen" at 20 mg/ml)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MedicationRecord {
    pub name: String,
    /// Milligrams of active ingredient per kilogram of body weight
    pub dose_per_kg: f64,
    /// Milligrams of active ingredient per millilitre of formulation
    pub concentration: f64,
    /// Free-text dosing frequency, shown verbatim
    pub interval: String,
}

impl MedicationRecord {
    pub fn new(
        name: impl Into<String>,
        dose_per_kg: f64,
        concentration: f64,
        interval: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            dose_per_kg,
            concentration,
            interval: interval.into(),
        }
    }
}

// ============================================================================
// Dose Types
// ============================================================================

/// Identifies one of the three numeric inputs of a calculation
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DoseField {
    Weight,
    DosePerKg,
    Concentration,
}

impl DoseField {
    /// All fields, in the order they are validated
    pub const ALL: [DoseField; 3] = [
        DoseField::Weight,
        DoseField::DosePerKg,
        DoseField::Concentration,
    ];

    /// Unit the field is expressed in
    pub fn unit(&self) -> &'static str {
        match self {
            DoseField::Weight => "kg",
            DoseField::DosePerKg => "mg/kg",
            DoseField::Concentration => "mg/ml",
        }
    }
}

impl fmt::Display for DoseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DoseField::Weight => "weight",
            DoseField::DosePerKg => "dose",
            DoseField::Concentration => "concentration",
        };
        f.write_str(label)
    }
}

/// Validated numeric inputs for a single calculation
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct DoseQuery {
    /// Patient weight in kg
    pub weight: f64,
    /// Prescribed dose in mg/kg
    pub dose_per_kg: f64,
    /// Formulation strength in mg/ml
    pub concentration: f64,
}

impl DoseQuery {
    pub fn new(weight: f64, dose_per_kg: f64, concentration: f64) -> Self {
        Self {
            weight,
            dose_per_kg,
            concentration,
        }
    }

    /// Value held for the given field
    pub fn get(&self, field: DoseField) -> f64 {
        match field {
            DoseField::Weight => self.weight,
            DoseField::DosePerKg => self.dose_per_kg,
            DoseField::Concentration => self.concentration,
        }
    }
}

/// Raw text inputs as typed by the user, before validation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DoseInput {
    pub weight: String,
    pub dose_per_kg: String,
    pub concentration: String,
}

impl DoseInput {
    pub fn new(
        weight: impl Into<String>,
        dose_per_kg: impl Into<String>,
        concentration: impl Into<String>,
    ) -> Self {
        Self {
            weight: weight.into(),
            dose_per_kg: dose_per_kg.into(),
            concentration: concentration.into(),
        }
    }

    /// Pre-fill the dose and concentration fields from a catalog record
    pub fn prefill(&mut self, record: &MedicationRecord) {
        self.dose_per_kg = record.dose_per_kg.to_string();
        self.concentration = record.concentration.to_string();
    }

    /// Text held for the given field
    pub fn get(&self, field: DoseField) -> &str {
        match field {
            DoseField::Weight => &self.weight,
            DoseField::DosePerKg => &self.dose_per_kg,
            DoseField::Concentration => &self.concentration,
        }
    }

    /// Replace the text held for the given field
    pub fn set(&mut self, field: DoseField, value: impl Into<String>) {
        let slot = match field {
            DoseField::Weight => &mut self.weight,
            DoseField::DosePerKg => &mut self.dose_per_kg,
            DoseField::Concentration => &mut self.concentration,
        };
        *slot = value.into();
    }

    /// Reset every field to empty
    pub fn clear(&mut self) {
        self.weight.clear();
        self.dose_per_kg.clear();
        self.concentration.clear();
    }
}

/// Non-fatal observation about a calculation's inputs
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DoseWarning {
    /// Weight or dose was zero or negative; the arithmetic still ran
    NonPositiveValue { field: DoseField, value: f64 },
}

impl fmt::Display for DoseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoseWarning::NonPositiveValue { field, value } => {
                write!(f, "{} is not positive ({} {})", field, value, field.unit())
            }
        }
    }
}

/// Outcome of a dose calculation
///
/// Values are stored unrounded; rounding only happens in [`DoseResult::render`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DoseResult {
    /// Total dose in mg
    pub total_dose: f64,
    /// Volume to administer in ml
    pub volume: f64,
    /// Dosing interval, empty when no catalog entry matched
    pub interval: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<DoseWarning>,
}

impl DoseResult {
    /// Render as `Dose: 160.00 mg = 8.00 ml, Every 12 hours`
    pub fn render(&self, decimals: usize) -> String {
        let mut line = format!(
            "Dose: {:.prec$} mg = {:.prec$} ml",
            self.total_dose,
            self.volume,
            prec = decimals
        );
        if !self.interval.is_empty() {
            line.push_str(", ");
            line.push_str(&self.interval);
        }
        line
    }
}

impl fmt::Display for DoseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(2))
    }
}

// ============================================================================
// Catalog Type
// ============================================================================

/// The read-only, ordered set of known medications
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub(crate) records: Vec<MedicationRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_two_decimals() {
        let result = DoseResult {
            total_dose: 160.0,
            volume: 8.0,
            interval: "Every 12 hours".into(),
            warnings: vec![],
        };
        assert_eq!(result.to_string(), "Dose: 160.00 mg = 8.00 ml, Every 12 hours");
    }

    #[test]
    fn test_render_without_interval() {
        let result = DoseResult {
            total_dose: 150.0,
            volume: 1.5,
            interval: String::new(),
            warnings: vec![],
        };
        assert_eq!(result.render(2), "Dose: 150.00 mg = 1.50 ml");
        assert_eq!(result.render(1), "Dose: 150.0 mg = 1.5 ml");
    }

    #[test]
    fn test_prefill_uses_record_values() {
        let record = MedicationRecord::new("Chlorpheniramine", 0.25, 1.0, "Every 4-6 hours");
        let mut input = DoseInput::new("12", "", "");
        input.prefill(&record);

        assert_eq!(input.weight, "12");
        assert_eq!(input.dose_per_kg, "0.25");
        assert_eq!(input.concentration, "1");
    }

    #[test]
    fn test_field_labels() {
        assert_eq!(DoseField::Weight.to_string(), "weight");
        assert_eq!(DoseField::DosePerKg.to_string(), "dose");
        assert_eq!(DoseField::Concentration.unit(), "mg/ml");
    }

    #[test]
    fn test_warning_serializes_tagged() {
        let warning = DoseWarning::NonPositiveValue {
            field: DoseField::Weight,
            value: -2.0,
        };
        let json = serde_json::to_string(&warning).unwrap();
        assert!(json.contains("\"type\":\"non_positive_value\""));
        assert!(json.contains("\"field\":\"weight\""));
    }
}
