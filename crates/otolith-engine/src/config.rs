//! Model configuration and its structural validation.
//!
//! [`ModelConfig`] is the constructor input for a [`Model`](crate::Model).
//! [`validate()`](ModelConfig::validate) checks the scalar settings, the
//! category definitions and the time-step list; the objects inside
//! (selectivities, processes, observers) validate themselves during
//! model construction.

use std::fmt;

use indexmap::IndexSet;
use otolith_core::{CategoryDef, ConfigError, ConfigErrors, Location, ObjectKind, Penalty, Year};
use otolith_process::{ModelSpan, Process};
use otolith_selectivity::{CacheDomain, Selectivity};

use crate::observer::Observer;
use crate::time_varying::TimeVaryingDef;

/// One step of the annual cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeStepDef {
    /// Unique label.
    pub label: String,
    /// Labels of the processes executed in this step, in order.
    pub processes: Vec<String>,
}

impl TimeStepDef {
    /// A time step executing `processes` in order.
    pub fn new(label: impl Into<String>, processes: &[&str]) -> Self {
        Self {
            label: label.into(),
            processes: processes.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Complete configuration for constructing a [`Model`](crate::Model).
pub struct ModelConfig {
    /// First modelled year.
    pub start_year: u32,
    /// Last modelled year, inclusive.
    pub final_year: u32,
    /// Youngest modelled age.
    pub min_age: u32,
    /// Oldest modelled age.
    pub max_age: u32,
    /// Whether the oldest age is a plus group. Default: `true`.
    pub age_plus: bool,
    /// Length value of each length bin, for length-based selectivities.
    pub length_bins: Vec<f64>,
    /// Partition categories, in declaration order.
    pub categories: Vec<CategoryDef>,
    /// Every selectivity processes may refer to.
    pub selectivities: Vec<Box<dyn Selectivity>>,
    /// Penalty definitions.
    pub penalties: Vec<Penalty>,
    /// Phases executed once, in order, before the first year.
    pub initialisation_phases: Vec<Box<dyn Process>>,
    /// Processes available to time steps.
    pub processes: Vec<Box<dyn Process>>,
    /// The annual cycle, in order.
    pub time_steps: Vec<TimeStepDef>,
    /// Year-specific overrides of selectivity parameters.
    pub time_varying: Vec<TimeVaryingDef>,
    /// Observers notified after their subscribed time steps.
    pub observers: Vec<Box<dyn Observer>>,
    /// Abort a run when a process leaves a negative or non-finite
    /// abundance. Default: `true`.
    pub check_abundance: bool,
}

impl ModelConfig {
    /// An empty configuration over the given years and ages.
    pub fn new(start_year: u32, final_year: u32, min_age: u32, max_age: u32) -> Self {
        Self {
            start_year,
            final_year,
            min_age,
            max_age,
            age_plus: true,
            length_bins: Vec::new(),
            categories: Vec::new(),
            selectivities: Vec::new(),
            penalties: Vec::new(),
            initialisation_phases: Vec::new(),
            processes: Vec::new(),
            time_steps: Vec::new(),
            time_varying: Vec::new(),
            observers: Vec::new(),
            check_abundance: true,
        }
    }

    /// Year and age range as seen by processes.
    pub fn span(&self) -> ModelSpan {
        ModelSpan {
            start_year: Year(self.start_year),
            final_year: Year(self.final_year),
            min_age: self.min_age,
            max_age: self.max_age,
            age_plus: self.age_plus,
        }
    }

    /// Ages and length bins every selectivity cache covers.
    pub fn cache_domain(&self) -> CacheDomain {
        CacheDomain::ages(self.min_age, self.max_age).with_length_bins(self.length_bins.clone())
    }

    /// Check structural invariants, reporting every problem found.
    pub fn validate(&self) -> Result<(), ConfigErrors> {
        let mut errors = ConfigErrors::new();
        let model = |parameter: &str| Location::new(ObjectKind::Model, "model", parameter);

        if self.final_year < self.start_year {
            errors.push(ConfigError::invalid(
                model("final_year"),
                format!(
                    "final_year ({}) cannot be before start_year ({})",
                    self.final_year, self.start_year
                ),
            ));
        }
        if self.max_age < self.min_age {
            errors.push(ConfigError::invalid(
                model("max_age"),
                format!(
                    "max_age ({}) cannot be less than min_age ({})",
                    self.max_age, self.min_age
                ),
            ));
        }
        if let Some(bad) = self.length_bins.iter().find(|l| !l.is_finite()) {
            errors.push(ConfigError::invalid(
                model("length_bins"),
                format!("length bins must be finite, got {bad}"),
            ));
        }
        if self.categories.is_empty() {
            errors.push(ConfigError::invalid(
                model("categories"),
                "at least one category is required",
            ));
        }
        for def in &self.categories {
            if def.min_age < self.min_age || def.max_age > self.max_age {
                errors.push(ConfigError::invalid(
                    Location::new(ObjectKind::Category, &def.name, "ages"),
                    format!(
                        "ages {}..={} lie outside the model ages {}..={}",
                        def.min_age, def.max_age, self.min_age, self.max_age
                    ),
                ));
            }
        }

        if self.time_steps.is_empty() {
            errors.push(ConfigError::invalid(
                model("time_steps"),
                "at least one time step is required",
            ));
        }
        let mut seen = IndexSet::with_capacity(self.time_steps.len());
        for step in &self.time_steps {
            if step.label.is_empty() {
                errors.push(ConfigError::invalid(
                    model("time_steps"),
                    "time step labels cannot be empty",
                ));
            } else if !seen.insert(step.label.as_str()) {
                errors.push(ConfigError::Duplicate {
                    location: Location::new(ObjectKind::TimeStep, &step.label, "label"),
                    label: step.label.clone(),
                });
            }
        }

        errors.into_result()
    }
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("start_year", &self.start_year)
            .field("final_year", &self.final_year)
            .field("min_age", &self.min_age)
            .field("max_age", &self.max_age)
            .field("age_plus", &self.age_plus)
            .field("length_bins", &self.length_bins.len())
            .field("categories", &self.categories)
            .field("selectivities", &self.selectivities.len())
            .field("penalties", &self.penalties.len())
            .field("initialisation_phases", &self.initialisation_phases.len())
            .field("processes", &self.processes.len())
            .field("time_steps", &self.time_steps)
            .field("time_varying", &self.time_varying.len())
            .field("observers", &self.observers.len())
            .field("check_abundance", &self.check_abundance)
            .finish()
    }
}
