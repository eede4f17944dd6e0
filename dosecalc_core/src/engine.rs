//! Dose engine: validation and arithmetic for a single calculation.
//!
//! The calculation is:
//! - total dose (mg) = weight (kg) x dose per kg (mg/kg)
//! - volume (ml) = total dose (mg) / concentration (mg/ml)
//!
//! Results are never rounded here; see [`DoseResult::render`].

use crate::{Catalog, DoseField, DoseInput, DoseQuery, DoseResult, DoseWarning, Error, Result};

/// Parse raw text inputs into a validated [`DoseQuery`]
///
/// Empty fields are reported together as `MissingInput`; otherwise the first
/// unparseable field (weight, dose, concentration order) is reported as
/// `InvalidInput`.
pub fn parse_input(input: &DoseInput) -> Result<DoseQuery> {
    let missing: Vec<DoseField> = DoseField::ALL
        .into_iter()
        .filter(|field| input.get(*field).trim().is_empty())
        .collect();
    if !missing.is_empty() {
        return Err(Error::MissingInput(missing));
    }

    Ok(DoseQuery {
        weight: parse_field(input, DoseField::Weight)?,
        dose_per_kg: parse_field(input, DoseField::DosePerKg)?,
        concentration: parse_field(input, DoseField::Concentration)?,
    })
}

fn parse_field(input: &DoseInput, field: DoseField) -> Result<f64> {
    let text = input.get(field).trim();
    let value: f64 = text
        .parse()
        .map_err(|_| Error::invalid(field, format!("'{}' is not a number", text)))?;
    if !value.is_finite() {
        return Err(Error::invalid(field, format!("'{}' is not a finite number", text)));
    }
    Ok(value)
}

/// Compute total dose and volume for a validated query
///
/// The interval is left empty; use [`compute_for_medication`] to resolve it
/// from the catalog.
pub fn compute_dose(query: &DoseQuery) -> Result<DoseResult> {
    for field in DoseField::ALL {
        if !query.get(field).is_finite() {
            return Err(Error::invalid(field, "value must be a finite number"));
        }
    }
    if query.concentration <= 0.0 {
        return Err(Error::invalid(
            DoseField::Concentration,
            "concentration must be greater than zero",
        ));
    }

    let total_dose = query.weight * query.dose_per_kg;
    if !total_dose.is_finite() {
        // Blame whichever factor is larger in magnitude
        let field = if query.weight.abs() >= query.dose_per_kg.abs() {
            DoseField::Weight
        } else {
            DoseField::DosePerKg
        };
        return Err(Error::invalid(field, "result is not a finite number"));
    }

    let volume = total_dose / query.concentration;
    if !volume.is_finite() {
        return Err(Error::invalid(
            DoseField::Concentration,
            "result is not a finite number",
        ));
    }

    let warnings = check_warnings(query);
    for warning in &warnings {
        tracing::warn!("Accepting non-positive input: {}", warning);
    }

    tracing::debug!(
        "Computed dose: {} kg x {} mg/kg = {} mg, / {} mg/ml = {} ml",
        query.weight,
        query.dose_per_kg,
        total_dose,
        query.concentration,
        volume
    );

    Ok(DoseResult {
        total_dose,
        volume,
        interval: String::new(),
        warnings,
    })
}

/// Parse raw text inputs and compute the dose in one step
pub fn compute_dose_from_text(input: &DoseInput) -> Result<DoseResult> {
    let query = parse_input(input)?;
    compute_dose(&query)
}

/// Compute a dose and attach the interval of the medication named `name`
///
/// `name` is matched exactly; when no record matches the interval stays empty.
pub fn compute_for_medication(
    catalog: &Catalog,
    name: &str,
    query: &DoseQuery,
) -> Result<DoseResult> {
    let mut result = compute_dose(query)?;
    match catalog.find_by_name(name) {
        Some(record) => result.interval = record.interval.clone(),
        None => tracing::debug!("No catalog entry named {:?}, interval left empty", name),
    }
    Ok(result)
}

fn check_warnings(query: &DoseQuery) -> Vec<DoseWarning> {
    [DoseField::Weight, DoseField::DosePerKg]
        .into_iter()
        .filter(|field| query.get(*field) <= 0.0)
        .map(|field| DoseWarning::NonPositiveValue {
            field,
            value: query.get(field),
        })
        .collect()
}
