//! Error types for the Otolith population engine.
//!
//! Organised by phase: [`ConfigError`] covers everything detected while
//! validating or building a model (always fatal, always before the first
//! year executes), and [`ProcessError`] covers faults raised while a
//! process mutates the partition.

use std::fmt;

use thiserror::Error;

/// The kind of configured object an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Model-level settings (years, ages, length bins).
    Model,
    /// A category definition.
    Category,
    /// A selectivity.
    Selectivity,
    /// A penalty definition.
    Penalty,
    /// A yearly process.
    Process,
    /// An initialisation phase.
    InitialisationPhase,
    /// A time step of the annual cycle.
    TimeStep,
    /// A time-varying parameter definition.
    TimeVarying,
    /// An observer subscribed to the schedule.
    Observer,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Model => "model",
            Self::Category => "category",
            Self::Selectivity => "selectivity",
            Self::Penalty => "penalty",
            Self::Process => "process",
            Self::InitialisationPhase => "initialisation_phase",
            Self::TimeStep => "time_step",
            Self::TimeVarying => "time_varying",
            Self::Observer => "observer",
        };
        f.write_str(s)
    }
}

/// Where in the configuration a problem was found.
///
/// Renders as `kind[label].parameter`, e.g. `process[fishing].catches`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    /// Kind of the offending object.
    pub kind: ObjectKind,
    /// Label of the offending object.
    pub label: String,
    /// Name of the offending parameter.
    pub parameter: String,
}

impl Location {
    /// Create a location for `parameter` on the object `kind[label]`.
    pub fn new(kind: ObjectKind, label: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            parameter: parameter.into(),
        }
    }

    /// The same object, a different parameter.
    pub fn with_parameter(&self, parameter: impl Into<String>) -> Self {
        Self {
            kind: self.kind,
            label: self.label.clone(),
            parameter: parameter.into(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}].{}", self.kind, self.label, self.parameter)
    }
}

/// A problem with one row of a tabular parameter.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum TableProblem {
    /// The row does not have one cell per column.
    #[error("has {actual} values but {expected} values are expected")]
    WrongColumnCount {
        /// Required column count.
        expected: usize,
        /// Column count found in the row.
        actual: usize,
    },
    /// The row names a category the object does not declare.
    #[error("category '{0}' is not one of the declared categories")]
    UnknownCategory(String),
    /// The row names a category already defined by an earlier row.
    #[error("category '{0}' is defined more than once")]
    DuplicateCategory(String),
    /// A value cell could not be parsed as a number.
    #[error("value '{0}' is not a valid number")]
    NotNumeric(String),
    /// A value cell parsed but is negative or non-finite.
    #[error("value {0} must be finite and non-negative")]
    InvalidValue(f64),
}

/// A fatal configuration problem detected during validation or build.
///
/// Every variant carries the [`Location`] of the offending parameter.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Generic inconsistency with a human-readable reason.
    #[error("{location}: {reason}")]
    Invalid {
        /// Offending parameter.
        location: Location,
        /// What is wrong.
        reason: String,
    },
    /// A parallel array has the wrong number of entries.
    #[error("{location}: expected {expected} values but got {actual}")]
    LengthMismatch {
        /// Offending parameter.
        location: Location,
        /// Required length.
        expected: usize,
        /// Length found.
        actual: usize,
    },
    /// A year appears twice in a year-keyed parameter.
    #[error("{location}: year {year} has already been specified")]
    DuplicateYear {
        /// Offending parameter.
        location: Location,
        /// The repeated year.
        year: u32,
    },
    /// A numeric value lies outside its permitted closed interval.
    #[error("{location}: value {value} must be between {min} and {max} (inclusive)")]
    OutOfRange {
        /// Offending parameter.
        location: Location,
        /// The rejected value.
        value: f64,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// A label could not be resolved to an object of the expected kind.
    #[error("{location}: {kind} '{label}' does not exist")]
    UnresolvedReference {
        /// Offending parameter.
        location: Location,
        /// Kind of object that was looked up.
        kind: ObjectKind,
        /// The unresolved label.
        label: String,
    },
    /// A category label is not defined in the model.
    #[error("{location}: category '{label}' is not defined in the model")]
    UnknownCategory {
        /// Offending parameter.
        location: Location,
        /// The unknown label.
        label: String,
    },
    /// A label that must be unique appears more than once.
    #[error("{location}: '{label}' is defined more than once")]
    Duplicate {
        /// Offending parameter.
        location: Location,
        /// The repeated label.
        label: String,
    },
    /// A row of a tabular parameter is malformed.
    #[error("{location}: row {row} {problem}")]
    Table {
        /// Offending parameter.
        location: Location,
        /// 1-based row number.
        row: usize,
        /// What is wrong with the row.
        problem: TableProblem,
    },
}

impl ConfigError {
    /// Shorthand for [`ConfigError::Invalid`].
    pub fn invalid(location: Location, reason: impl Into<String>) -> Self {
        Self::Invalid {
            location,
            reason: reason.into(),
        }
    }

    /// The configuration location this error refers to.
    pub fn location(&self) -> &Location {
        match self {
            Self::Invalid { location, .. }
            | Self::LengthMismatch { location, .. }
            | Self::DuplicateYear { location, .. }
            | Self::OutOfRange { location, .. }
            | Self::UnresolvedReference { location, .. }
            | Self::UnknownCategory { location, .. }
            | Self::Duplicate { location, .. }
            | Self::Table { location, .. } => location,
        }
    }
}

/// Every configuration problem found in one validation pass.
///
/// Validation and build collect errors across all objects so that a
/// user sees every problem at once instead of fixing them one run at a
/// time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigErrors {
    errors: Vec<ConfigError>,
}

impl ConfigErrors {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one error.
    pub fn push(&mut self, error: ConfigError) {
        self.errors.push(error);
    }

    /// Record every error from another collection.
    pub fn append(&mut self, other: ConfigErrors) {
        self.errors.extend(other.errors);
    }

    /// Record the error of a failed result, returning the success value.
    pub fn check<T>(&mut self, result: Result<T, ConfigError>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.push(e);
                None
            }
        }
    }

    /// Like [`check`](Self::check) for results carrying a collection.
    pub fn check_all<T>(&mut self, result: Result<T, ConfigErrors>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.append(e);
                None
            }
        }
    }

    /// Whether no error has been recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of recorded errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate over the recorded errors in discovery order.
    pub fn iter(&self) -> std::slice::Iter<'_, ConfigError> {
        self.errors.iter()
    }

    /// `Ok(())` if empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ConfigErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ConfigError> for ConfigErrors {
    fn from(e: ConfigError) -> Self {
        Self { errors: vec![e] }
    }
}

impl IntoIterator for ConfigErrors {
    type Item = ConfigError;
    type IntoIter = std::vec::IntoIter<ConfigError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ConfigErrors {
    type Item = &'a ConfigError;
    type IntoIter = std::slice::Iter<'a, ConfigError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} configuration error(s)", self.errors.len())?;
        for e in &self.errors {
            write!(f, "\n  - {e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigErrors {}

/// Errors raised by a process while executing.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ProcessError {
    /// The process could not complete.
    #[error("execution failed: {reason}")]
    ExecutionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// A category referenced by the process is not in the partition.
    #[error("category {0} is not present in the partition")]
    MissingCategory(crate::CategoryId),
    /// A selectivity resolved at build time is no longer registered.
    #[error("selectivity {0} is not registered")]
    MissingSelectivity(crate::SelectivityId),
}
