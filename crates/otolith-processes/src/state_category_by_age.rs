//! Initialisation phase: set abundance from a category-by-age table.
//!
//! Each table row is `category value_min_age ... value_max_age`, so a row
//! has `max_age - min_age + 2` cells. Execution overwrites only the ages
//! the table and the category have in common.

use indexmap::{IndexMap, IndexSet};
use otolith_core::{CategoryId, ConfigError, ConfigErrors, ProcessError, TableProblem};
use otolith_process::{BuildContext, ExecuteContext, Process, ProcessKind};

use crate::params::{self, location};

/// Parameters of a [`StateCategoryByAge`] phase.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StateCategoryByAgeConfig {
    /// Unique label.
    pub label: String,
    /// Categories the table may set.
    pub categories: Vec<String>,
    /// Age of the first value column.
    pub min_age: u32,
    /// Age of the last value column.
    pub max_age: u32,
    /// Raw table rows: category label followed by one cell per age.
    pub table: Vec<Vec<String>>,
}

/// Overwrites partition values from a table.
#[derive(Debug)]
pub struct StateCategoryByAge {
    config: StateCategoryByAgeConfig,
    values: IndexMap<String, Vec<f64>>,
    targets: Vec<(CategoryId, usize)>,
}

impl StateCategoryByAge {
    /// Wrap a configuration. The table is parsed by `validate`.
    pub fn new(config: StateCategoryByAgeConfig) -> Self {
        Self {
            config,
            values: IndexMap::new(),
            targets: Vec::new(),
        }
    }

    /// Parsed values for `category`, available after validation.
    pub fn values_for(&self, category: &str) -> Option<&[f64]> {
        self.values.get(category).map(Vec::as_slice)
    }

    fn column_count(&self) -> usize {
        (self.config.max_age - self.config.min_age) as usize + 2
    }

    /// `seen` gains the row's category before its cells are checked, so a
    /// repeat is reported even when the first row for it was malformed.
    fn parse_row(&self, row: &[String], seen: &mut IndexSet<String>) -> Result<Vec<f64>, TableProblem> {
        let known = row.first().filter(|name| self.config.categories.contains(*name));
        if let Some(name) = known {
            if !seen.insert(name.clone()) {
                return Err(TableProblem::DuplicateCategory(name.clone()));
            }
        }
        if row.len() != self.column_count() {
            return Err(TableProblem::WrongColumnCount {
                expected: self.column_count(),
                actual: row.len(),
            });
        }
        if known.is_none() {
            return Err(TableProblem::UnknownCategory(row[0].clone()));
        }
        row[1..]
            .iter()
            .map(|cell| match cell.trim().parse::<f64>() {
                Err(_) => Err(TableProblem::NotNumeric(cell.clone())),
                Ok(v) if !v.is_finite() || v < 0.0 => Err(TableProblem::InvalidValue(v)),
                Ok(v) => Ok(v),
            })
            .collect()
    }
}

impl Process for StateCategoryByAge {
    fn label(&self) -> &str {
        &self.config.label
    }

    fn kind(&self) -> ProcessKind {
        ProcessKind::Initialisation
    }

    fn validate(&mut self) -> Result<(), ConfigErrors> {
        let label = self.config.label.clone();
        let mut errors = ConfigErrors::new();
        params::check_not_empty(&mut errors, &label, "categories", &self.config.categories);
        if self.config.max_age < self.config.min_age {
            errors.push(ConfigError::invalid(
                location(&label, "min_age"),
                format!(
                    "min_age ({}) cannot be greater than max_age ({})",
                    self.config.min_age, self.config.max_age
                ),
            ));
            return Err(errors);
        }

        self.values.clear();
        let mut seen = IndexSet::with_capacity(self.config.table.len());
        for (i, row) in self.config.table.iter().enumerate() {
            match self.parse_row(row, &mut seen) {
                Ok(values) => {
                    self.values.insert(row[0].clone(), values);
                }
                Err(problem) => errors.push(ConfigError::Table {
                    location: location(&label, "table"),
                    row: i + 1,
                    problem,
                }),
            }
        }
        errors.into_result()
    }

    fn build(&mut self, ctx: &BuildContext<'_>) -> Result<(), ConfigErrors> {
        let c = &self.config;
        let view = ctx.categories(&location(&c.label, "categories"), &c.categories)?;
        self.targets.clear();
        for (id, name) in view.iter().zip(&c.categories) {
            match self.values.get_index_of(name) {
                Some(row) => self.targets.push((id, row)),
                None => tracing::warn!(
                    phase = %c.label,
                    category = %name,
                    "no table row; category keeps its current values"
                ),
            }
        }
        Ok(())
    }

    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), ProcessError> {
        let (min_age, max_age) = (self.config.min_age, self.config.max_age);
        for &(id, row) in &self.targets {
            let Some((_, values)) = self.values.get_index(row) else {
                continue;
            };
            let category = ctx
                .partition_mut()
                .category_mut(id)
                .ok_or(ProcessError::MissingCategory(id))?;
            let lo = min_age.max(category.min_age());
            let hi = max_age.min(category.max_age());
            for age in lo..=hi {
                category.set(age, values[(age - min_age) as usize]);
            }
        }
        Ok(())
    }
}
