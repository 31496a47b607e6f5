//! Selectivity given explicitly, one value per age.

use otolith_core::{ConfigError, ConfigErrors, Location, ObjectKind};

use crate::cache::{CacheDomain, ResultCache};
use crate::selectivity::{unknown_parameter, Selectivity};

/// Explicit values for consecutive ages starting at `min_age`.
///
/// Length bins read the same vector by bin index. Individual values are
/// exposed as parameters `v1`, `v2`, ... (1-based position in the vector).
#[derive(Clone, Debug, PartialEq)]
pub struct AllValues {
    label: String,
    min_age: u32,
    values: Vec<f64>,
    cache: ResultCache,
}

impl AllValues {
    /// Values for ages `min_age..min_age + values.len()`.
    pub fn new(label: impl Into<String>, min_age: u32, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            min_age,
            values,
            cache: ResultCache::default(),
        }
    }

    fn value_at(&self, index: usize) -> f64 {
        self.values.get(index).copied().unwrap_or(0.0)
    }

    fn index_of_parameter(&self, name: &str) -> Option<usize> {
        let position: usize = name.strip_prefix('v')?.parse().ok()?;
        (1..=self.values.len())
            .contains(&position)
            .then(|| position - 1)
    }
}

impl Selectivity for AllValues {
    fn label(&self) -> &str {
        &self.label
    }

    fn validate(&self) -> Result<(), ConfigErrors> {
        let mut errors = ConfigErrors::new();
        if self.values.is_empty() {
            errors.push(ConfigError::invalid(
                Location::new(ObjectKind::Selectivity, &self.label, "v"),
                "at least one value is required",
            ));
        }
        for (i, &v) in self.values.iter().enumerate() {
            if !v.is_finite() || v < 0.0 {
                errors.push(ConfigError::invalid(
                    Location::new(ObjectKind::Selectivity, &self.label, format!("v{}", i + 1)),
                    format!("values must be finite and non-negative, got {v}"),
                ));
            }
        }
        errors.into_result()
    }

    fn age_result(&self, age: u32) -> f64 {
        self.cache.age(age)
    }

    fn length_result(&self, length_bin: usize) -> f64 {
        self.cache.length(length_bin)
    }

    fn rebuild_cache(&mut self, domain: &CacheDomain) {
        let cache = ResultCache::build_with(
            domain,
            |age| {
                age.checked_sub(self.min_age)
                    .map_or(0.0, |i| self.value_at(i as usize))
            },
            |bin, _| self.value_at(bin),
        );
        self.cache = cache;
    }

    fn parameter(&self, name: &str) -> Option<f64> {
        self.index_of_parameter(name).map(|i| self.values[i])
    }

    fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), ConfigError> {
        let i = self
            .index_of_parameter(name)
            .ok_or_else(|| unknown_parameter(&self.label, name))?;
        self.values[i] = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;

    #[test]
    fn values_offset_by_min_age() {
        let mut sel = AllValues::new("av", 2, vec![0.1, 0.5, 1.0]);
        sel.rebuild_cache(&CacheDomain::ages(1, 6).with_length_bins(vec![1.0, 2.0]));
        assert_eq!(sel.age_result(1), 0.0);
        assert_eq!(sel.age_result(2), 0.1);
        assert_eq!(sel.age_result(4), 1.0);
        assert_eq!(sel.age_result(5), 0.0);
        assert_eq!(sel.length_result(1), 0.5);
    }

    #[test]
    fn parameters_are_one_based() {
        let sel = AllValues::new("av", 1, vec![0.2, 0.4]);
        assert_eq!(sel.parameter("v1"), Some(0.2));
        assert_eq!(sel.parameter("v2"), Some(0.4));
        assert_eq!(sel.parameter("v0"), None);
        assert_eq!(sel.parameter("v3"), None);
    }

    #[test]
    fn negative_and_empty_rejected() {
        let errors = AllValues::new("av", 1, vec![0.5, -1.0]).validate().unwrap_err();
        assert_eq!(errors.iter().next().unwrap().location().to_string(), "selectivity[av].v2");
        assert!(AllValues::new("av", 1, vec![]).validate().is_err());
    }

    #[test]
    fn compliance() {
        let domain = CacheDomain::ages(1, 4);
        let mut sel = AllValues::new("av", 1, vec![0.25, 0.5, 0.75, 1.0]);
        compliance::run_full_compliance(&mut sel, &domain);
        compliance::assert_cache_holds_until_rebuild(&mut sel, &domain, "v2", 0.9);
    }
}
