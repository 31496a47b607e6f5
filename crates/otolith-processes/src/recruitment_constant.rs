//! Constant recruitment.

use otolith_core::{CategoryId, ConfigError, ConfigErrors, ProcessError};
use otolith_process::{BuildContext, ExecuteContext, Process, ProcessKind};

use crate::params::{self, location};

const PROPORTION_TOLERANCE: f64 = 1e-6;

/// Parameters of a [`RecruitmentConstant`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecruitmentConstantConfig {
    /// Unique label.
    pub label: String,
    /// Categories receiving recruits.
    pub categories: Vec<String>,
    /// Share of `r0` for each category; must sum to one.
    pub proportions: Vec<f64>,
    /// Recruits added per execution.
    pub r0: f64,
    /// Age at which recruits enter.
    pub age: u32,
}

/// Adds `r0 * proportion` to each category at the recruitment age.
#[derive(Debug)]
pub struct RecruitmentConstant {
    config: RecruitmentConstantConfig,
    targets: Vec<(CategoryId, f64)>,
}

impl RecruitmentConstant {
    /// Wrap a configuration.
    pub fn new(config: RecruitmentConstantConfig) -> Self {
        Self {
            config,
            targets: Vec::new(),
        }
    }

    /// Current `r0`.
    pub fn r0(&self) -> f64 {
        self.config.r0
    }

    /// Replace `r0`, e.g. when an estimator proposes a new value.
    pub fn set_r0(&mut self, r0: f64) {
        self.config.r0 = r0;
    }
}

impl Process for RecruitmentConstant {
    fn label(&self) -> &str {
        &self.config.label
    }

    fn kind(&self) -> ProcessKind {
        ProcessKind::Recruitment
    }

    fn validate(&mut self) -> Result<(), ConfigErrors> {
        let c = &self.config;
        let label = c.label.as_str();
        let mut errors = ConfigErrors::new();
        params::check_not_empty(&mut errors, label, "categories", &c.categories);
        params::check_len(
            &mut errors,
            label,
            "proportions",
            c.categories.len(),
            c.proportions.len(),
        );
        params::check_non_negative(&mut errors, label, "proportions", &c.proportions);
        params::check_non_negative(&mut errors, label, "r0", &[c.r0]);
        let sum: f64 = c.proportions.iter().sum();
        if !c.proportions.is_empty() && (sum - 1.0).abs() > PROPORTION_TOLERANCE {
            errors.push(ConfigError::invalid(
                location(label, "proportions"),
                format!("proportions must sum to 1, got {sum}"),
            ));
        }
        errors.into_result()
    }

    fn build(&mut self, ctx: &BuildContext<'_>) -> Result<(), ConfigErrors> {
        let c = &self.config;
        let view = ctx.categories(&location(&c.label, "categories"), &c.categories)?;
        let mut errors = ConfigErrors::new();
        for id in view.iter() {
            let Some(category) = ctx.partition().category(id) else {
                continue;
            };
            if category.index_of(c.age).is_none() {
                errors.push(ConfigError::OutOfRange {
                    location: location(&c.label, "age"),
                    value: f64::from(c.age),
                    min: f64::from(category.min_age()),
                    max: f64::from(category.max_age()),
                });
            }
        }
        errors.into_result()?;
        self.targets = view.iter().zip(c.proportions.iter().copied()).collect();
        Ok(())
    }

    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), ProcessError> {
        let age = self.config.age;
        for &(id, proportion) in &self.targets {
            let category = ctx
                .partition_mut()
                .category_mut(id)
                .ok_or(ProcessError::MissingCategory(id))?;
            if let Some(i) = category.index_of(age) {
                category.data_mut()[i] += self.config.r0 * proportion;
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

    fn config() -> RecruitmentConstantConfig {
        RecruitmentConstantConfig {
            label: "recruitment".into(),
            categories: vec!["male".into(), "female".into()],
            proportions: vec![0.5, 0.5],
            r0: 1000.0,
            age: 1,
        }
    }

    fn harness() -> Harness {
        Harness::new(
            &[CategoryDef::new("male", 1, 3), CategoryDef::new("female", 1, 3)],
            vec![],
            vec![],
        )
    }

    #[test]
    fn splits_r0_by_proportion() {
        let mut h = harness();
        h.set("male", &[10.0, 0.0, 0.0]);
        let mut p = RecruitmentConstant::new(config());
        h.prepare(&mut p);
        h.run(&mut p, 2000).unwrap();
        assert_eq!(h.values("male"), vec![510.0, 0.0, 0.0]);
        assert_eq!(h.values("female"), vec![500.0, 0.0, 0.0]);
    }

    #[test]
    fn proportions_must_sum_to_one() {
        let mut cfg = config();
        cfg.proportions = vec![0.5, 0.4];
        assert_eq!(RecruitmentConstant::new(cfg).validate().unwrap_err().len(), 1);
    }

    #[test]
    fn age_outside_category_rejected_at_build() {
        let h = harness();
        let mut cfg = config();
        cfg.age = 7;
        let mut p = RecruitmentConstant::new(cfg);
        p.validate().unwrap();
        assert_eq!(p.build(&h.build_ctx()).unwrap_err().len(), 2);
    }
}
