//! Error types for the dosecalc_core library.

use crate::types::DoseField;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for dosecalc_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// One or more required numeric fields were left empty
    #[error("Missing input: {} must be filled", join_fields(.0))]
    MissingInput(Vec<DoseField>),

    /// A field could not be used as a number, or concentration was not positive
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: DoseField, reason: String },

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build an `InvalidInput` error for a field
    pub fn invalid(field: DoseField, reason: impl Into<String>) -> Self {
        Error::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

fn join_fields(fields: &[DoseField]) -> String {
    fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_names_fields() {
        let err = Error::MissingInput(vec![DoseField::Weight, DoseField::Concentration]);
        assert_eq!(
            err.to_string(),
            "Missing input: weight, concentration must be filled"
        );
    }

    #[test]
    fn test_invalid_input_message() {
        let err = Error::invalid(
            DoseField::Concentration,
            "concentration must be greater than zero",
        );
        assert_eq!(
            err.to_string(),
            "Invalid input for concentration: concentration must be greater than zero"
        );
    }
}
