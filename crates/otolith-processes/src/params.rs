//! Shared validation helpers.

use indexmap::IndexMap;
use otolith_core::{ConfigError, ConfigErrors, Location, ObjectKind, Year};

pub(crate) fn location(label: &str, parameter: &str) -> Location {
    Location::new(ObjectKind::Process, label, parameter)
}

/// Require `actual == expected`, reporting against `parameter`.
pub(crate) fn check_len(
    errors: &mut ConfigErrors,
    label: &str,
    parameter: &str,
    expected: usize,
    actual: usize,
) {
    if expected != actual {
        errors.push(ConfigError::LengthMismatch {
            location: location(label, parameter),
            expected,
            actual,
        });
    }
}

/// Require at least one entry.
pub(crate) fn check_not_empty<T>(errors: &mut ConfigErrors, label: &str, parameter: &str, values: &[T]) {
    if values.is_empty() {
        errors.push(ConfigError::invalid(
            location(label, parameter),
            "at least one value is required",
        ));
    }
}

/// Require every value to be finite and `>= 0`.
pub(crate) fn check_non_negative(errors: &mut ConfigErrors, label: &str, parameter: &str, values: &[f64]) {
    if let Some(&bad) = values.iter().find(|v| !v.is_finite() || **v < 0.0) {
        errors.push(ConfigError::invalid(
            location(label, parameter),
            format!("values must be finite and non-negative, got {bad}"),
        ));
    }
}

/// Pair `years` with `values`, rejecting repeated years.
///
/// The caller is responsible for checking the two lengths match; extra
/// entries on either side are ignored.
pub(crate) fn year_table(
    errors: &mut ConfigErrors,
    label: &str,
    years: &[u32],
    values: &[f64],
) -> IndexMap<Year, f64> {
    let mut table = IndexMap::with_capacity(years.len());
    for (&year, &value) in years.iter().zip(values) {
        if table.insert(Year(year), value).is_some() {
            errors.push(ConfigError::DuplicateYear {
                location: location(label, "years"),
                year,
            });
        }
    }
    table
}
