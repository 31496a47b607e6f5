//! Natural mortality at a constant instantaneous rate.

use otolith_core::{ConfigError, ConfigErrors, ProcessError};
use otolith_process::{BuildContext, ExecuteContext, Process, ProcessKind};

use crate::binding::{resolve_bindings, CategoryBinding};
use crate::params::{self, location};

/// Parameters of a [`MortalityConstantRate`].
#[derive(Clone, Debug, PartialEq)]
pub struct MortalityConstantRateConfig {
    /// Unique label.
    pub label: String,
    /// Categories affected.
    pub categories: Vec<String>,
    /// One selectivity per category.
    pub selectivities: Vec<String>,
    /// Instantaneous rate per category, or a single rate for all of them.
    pub m: Vec<f64>,
    /// Fraction of the annual rate applied each execution, in `(0, 1]`.
    pub ratio: f64,
}

impl Default for MortalityConstantRateConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            categories: Vec::new(),
            selectivities: Vec::new(),
            m: Vec::new(),
            ratio: 1.0,
        }
    }
}

/// `N *= exp(-M * ratio * S(age))` for every bound category.
#[derive(Debug)]
pub struct MortalityConstantRate {
    config: MortalityConstantRateConfig,
    bindings: Vec<CategoryBinding>,
}

impl MortalityConstantRate {
    /// Wrap a configuration.
    pub fn new(config: MortalityConstantRateConfig) -> Self {
        Self {
            config,
            bindings: Vec::new(),
        }
    }

    fn rate(&self, i: usize) -> f64 {
        match self.config.m.as_slice() {
            [single] => *single,
            m => m.get(i).copied().unwrap_or(0.0),
        }
    }
}

impl Process for MortalityConstantRate {
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
        params::check_len(
            &mut errors,
            label,
            "selectivities",
            c.categories.len(),
            c.selectivities.len(),
        );
        if c.m.len() != 1 {
            params::check_len(&mut errors, label, "m", c.categories.len(), c.m.len());
        }
        params::check_non_negative(&mut errors, label, "m", &c.m);
        if !(c.ratio > 0.0 && c.ratio <= 1.0) {
            errors.push(ConfigError::OutOfRange {
                location: location(label, "ratio"),
                value: c.ratio,
                min: 0.0,
                max: 1.0,
            });
        }
        errors.into_result()
    }

    fn build(&mut self, ctx: &BuildContext<'_>) -> Result<(), ConfigErrors> {
        let c = &self.config;
        self.bindings = resolve_bindings(ctx, &c.label, &c.categories, &c.selectivities)?;
        Ok(())
    }

    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), ProcessError> {
        let (partition, selectivities) = ctx.partition_and_selectivities();
        for (i, b) in self.bindings.iter().enumerate() {
            let selectivity = selectivities
                .get(b.selectivity)
                .ok_or(ProcessError::MissingSelectivity(b.selectivity))?;
            let category = partition
                .category_mut(b.category)
                .ok_or(ProcessError::MissingCategory(b.category))?;
            let scale = self.rate(i) * self.config.ratio;
            let min_age = category.min_age();
            for (offset, n) in category.data_mut().iter_mut().enumerate() {
                let age = min_age + offset as u32;
                *n *= (-scale * selectivity.age_result(age)).exp();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use otolith_core::CategoryDef;
    use otolith_selectivity::{Constant, KnifeEdge};

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn applies_exponential_survival() {
        let mut h = Harness::new(
            &[CategoryDef::new("a", 1, 3), CategoryDef::new("b", 1, 3)],
            vec![
                Box::new(Constant::new("one", 1.0)),
                Box::new(KnifeEdge::new("old", 3.0)),
            ],
            vec![],
        );
        h.set("a", &[100.0, 100.0, 100.0]);
        h.set("b", &[100.0, 100.0, 100.0]);
        let mut p = MortalityConstantRate::new(MortalityConstantRateConfig {
            label: "m".into(),
            categories: strings(&["a", "b"]),
            selectivities: strings(&["one", "old"]),
            m: vec![0.2],
            ratio: 0.5,
        });
        h.prepare(&mut p);
        h.run(&mut p, 2000).unwrap();

        let survive = (-0.1f64).exp() * 100.0;
        for v in h.values("a") {
            assert!((v - survive).abs() < 1e-12);
        }
        let b = h.values("b");
        assert_eq!(b[0], 100.0);
        assert!((b[2] - survive).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_rates() {
        let mut p = MortalityConstantRate::new(MortalityConstantRateConfig {
            label: "m".into(),
            categories: strings(&["a", "b", "c"]),
            selectivities: strings(&["s", "s", "s"]),
            m: vec![0.1, -0.2],
            ratio: 0.0,
        });
        // Length of m, negative m, ratio outside (0, 1].
        assert_eq!(p.validate().unwrap_err().len(), 3);
    }
}
