//! Parsers for each funnel field.
//!
//! Validators are pure: they never touch conversation state, so a failed
//! parse leaves the conversation exactly where it was.

use chrono::NaiveDate;
use supply_core::{PackageType, Warehouse};
use thiserror::Error;

/// Date format users type: `2025-01-05`.
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Recoverable input errors. The user is re-prompted.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("input is empty")]
    Empty,

    #[error("{0:?} is not one of the offered warehouses")]
    UnknownWarehouse(String),

    #[error("{0:?} is not a known package type")]
    UnknownPackageType(String),

    #[error("{0:?} is not a number")]
    InvalidCoefficient(String),

    #[error("{0:?} is not a YYYY-MM-DD date")]
    InvalidDate(String),

    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

/// Free-text city query.
pub fn parse_city(input: &str) -> Result<&str, ValidationError> {
    let city = input.trim();
    if city.is_empty() {
        return Err(ValidationError::Empty);
    }
    Ok(city)
}

/// The candidate whose label equals the input exactly.
pub fn select_warehouse<'a>(
    input: &str,
    candidates: &'a [Warehouse],
) -> Result<&'a Warehouse, ValidationError> {
    let input = input.trim();
    candidates
        .iter()
        .find(|w| w.label() == input)
        .ok_or_else(|| ValidationError::UnknownWarehouse(input.to_string()))
}

pub fn parse_package_type(input: &str) -> Result<PackageType, ValidationError> {
    let input = input.trim();
    PackageType::from_label(input).ok_or_else(|| ValidationError::UnknownPackageType(input.to_string()))
}

/// A finite decimal number; negative, zero and positive values are allowed.
pub fn parse_coefficient(input: &str) -> Result<f64, ValidationError> {
    let input = input.trim();
    match input.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ValidationError::InvalidCoefficient(input.to_string())),
    }
}

pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, INPUT_DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(input.to_string()))
}

/// An end date on or after `start`.
pub fn parse_end_date(input: &str, start: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let end = parse_date(input)?;
    if end < start {
        return Err(ValidationError::EndBeforeStart { start, end });
    }
    Ok(end)
}
