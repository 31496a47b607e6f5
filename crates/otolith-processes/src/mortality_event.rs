//! Fixed-catch removal with an exploitation cap.
//!
//! For a year with a configured catch `C`:
//!
//! ```text
//! V_c,a = N_c,a * S_c(a)                 vulnerable abundance
//! V     = sum over c, a of V_c,a
//! u     = C / zero_fun(V)                exploitation rate
//! u     = min(u, u_max)                  (penalty event when capped)
//! N_c,a = N_c,a - V_c,a * u
//! ```
//!
//! Removals use the `V_c,a` captured before any subtraction, so the order
//! of categories does not matter.

use indexmap::IndexMap;
use otolith_core::{
    math::{zero_fun, ZERO_FUN_DELTA},
    ConfigError, ConfigErrors, PenaltyId, ProcessError, Year,
};
use otolith_process::{AgeWorkspace, BuildContext, ExecuteContext, Process, ProcessKind};

use crate::binding::{resolve_bindings, CategoryBinding};
use crate::params::{self, location};

/// Default maximum exploitation rate.
pub const DEFAULT_U_MAX: f64 = 0.99;

/// Parameters of a [`MortalityEvent`].
#[derive(Clone, Debug, PartialEq)]
pub struct MortalityEventConfig {
    /// Unique label.
    pub label: String,
    /// Categories fished, in order.
    pub categories: Vec<String>,
    /// One selectivity per category, positionally paired.
    pub selectivities: Vec<String>,
    /// Years with a catch.
    pub years: Vec<u32>,
    /// Catch for each entry of `years`.
    pub catches: Vec<f64>,
    /// Maximum exploitation rate, in `[0, 1]`.
    pub u_max: f64,
    /// Penalty to trigger when the catch cannot be taken.
    pub penalty: Option<String>,
}

impl Default for MortalityEventConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            categories: Vec::new(),
            selectivities: Vec::new(),
            years: Vec::new(),
            catches: Vec::new(),
            u_max: DEFAULT_U_MAX,
            penalty: None,
        }
    }
}

/// Outcome of the most recent non-trivial execution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Exploitation {
    /// Year executed.
    pub year: Year,
    /// Catch requested.
    pub catch: f64,
    /// Total vulnerable abundance.
    pub vulnerable: f64,
    /// Exploitation rate applied, after clamping.
    pub rate: f64,
    /// Whether the rate was capped at `u_max`.
    pub capped: bool,
}

/// Removes a fixed catch each configured year.
#[derive(Debug)]
pub struct MortalityEvent {
    config: MortalityEventConfig,
    catches: IndexMap<Year, f64>,
    bindings: Vec<CategoryBinding>,
    penalty: Option<PenaltyId>,
    vulnerable: AgeWorkspace,
    last: Option<Exploitation>,
}

impl MortalityEvent {
    /// Wrap a configuration. Nothing is checked until `validate`.
    pub fn new(config: MortalityEventConfig) -> Self {
        Self {
            config,
            catches: IndexMap::new(),
            bindings: Vec::new(),
            penalty: None,
            vulnerable: AgeWorkspace::new(),
            last: None,
        }
    }

    /// The configuration.
    pub fn config(&self) -> &MortalityEventConfig {
        &self.config
    }

    /// Catch configured for `year`, if any.
    pub fn catch_for(&self, year: Year) -> Option<f64> {
        self.catches.get(&year).copied()
    }

    /// Resolved category/selectivity pairs.
    pub fn bindings(&self) -> &[CategoryBinding] {
        &self.bindings
    }

    /// Exploitation computed by the most recent year with a catch.
    pub fn last_exploitation(&self) -> Option<Exploitation> {
        self.last
    }
}

impl Process for MortalityEvent {
    fn label(&self) -> &str {
        &self.config.label
    }

    fn kind(&self) -> ProcessKind {
        ProcessKind::Mortality
    }

    fn validate(&mut self) -> Result<(), ConfigErrors> {
        let c = &self.config;
        let label = c.label.as_str();
        let mut errors = ConfigErrors::new();

        params::check_not_empty(&mut errors, label, "categories", &c.categories);
        params::check_len(&mut errors, label, "catches", c.years.len(), c.catches.len());
        params::check_len(
            &mut errors,
            label,
            "selectivities",
            c.categories.len(),
            c.selectivities.len(),
        );
        params::check_non_negative(&mut errors, label, "catches", &c.catches);
        if !(0.0..=1.0).contains(&c.u_max) {
            errors.push(ConfigError::OutOfRange {
                location: location(label, "u_max"),
                value: c.u_max,
                min: 0.0,
                max: 1.0,
            });
        }
        self.catches = params::year_table(&mut errors, label, &c.years, &c.catches);
        errors.into_result()
    }

    fn build(&mut self, ctx: &BuildContext<'_>) -> Result<(), ConfigErrors> {
        let c = &self.config;
        let mut errors = ConfigErrors::new();
        let bindings = errors.check_all(resolve_bindings(
            ctx,
            &c.label,
            &c.categories,
            &c.selectivities,
        ));
        self.penalty = match &c.penalty {
            Some(p) => errors.check(ctx.penalty(&location(&c.label, "penalty"), p)),
            None => None,
        };
        errors.into_result()?;

        self.bindings = bindings.unwrap_or_default();
        let partition = ctx.partition();
        self.vulnerable.shape(
            self.bindings
                .iter()
                .map(|b| partition.category(b.category).map_or(0, |cat| cat.len())),
        );

        let span = ctx.span();
        for year in self.catches.keys().filter(|y| !span.contains_year(**y)) {
            tracing::warn!(
                process = %c.label,
                year = year.0,
                "catch configured outside the modelled years is never applied"
            );
        }
        Ok(())
    }

    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), ProcessError> {
        let year = ctx.year();
        let Some(catch) = self.catch_for(year) else {
            return Ok(());
        };

        self.vulnerable.reset();
        let mut vulnerable = 0.0;
        for (i, b) in self.bindings.iter().enumerate() {
            let category = ctx
                .partition()
                .category(b.category)
                .ok_or(ProcessError::MissingCategory(b.category))?;
            let selectivity = ctx.selectivity(b.selectivity)?;
            let row = self.vulnerable.row_mut(i).ok_or_else(|| unshaped(i))?;
            for ((age, n), v) in category.iter().zip(row.iter_mut()) {
                *v = n * selectivity.age_result(age);
                vulnerable += *v;
            }
        }

        let mut rate = catch / zero_fun(vulnerable, ZERO_FUN_DELTA);
        let capped = rate > self.config.u_max;
        if capped {
            rate = self.config.u_max;
            ctx.penalties().trigger(
                self.penalty,
                &self.config.label,
                year,
                catch,
                vulnerable * self.config.u_max,
            );
        } else if rate < 0.0 {
            rate = 0.0;
        }

        tracing::debug!(
            process = %self.config.label,
            year = year.0,
            catch,
            vulnerable,
            rate,
            capped,
            "exploitation"
        );

        for (i, b) in self.bindings.iter().enumerate() {
            let row = self.vulnerable.row(i).ok_or_else(|| unshaped(i))?;
            let category = ctx
                .partition_mut()
                .category_mut(b.category)
                .ok_or(ProcessError::MissingCategory(b.category))?;
            for (n, v) in category.data_mut().iter_mut().zip(row) {
                *n -= v * rate;
            }
        }

        self.last = Some(Exploitation {
            year,
            catch,
            vulnerable,
            rate,
            capped,
        });
        Ok(())
    }
}

fn unshaped(row: usize) -> ProcessError {
    ProcessError::ExecutionFailed {
        reason: format!("working map has no row {row}; was the process built?"),
    }
}
