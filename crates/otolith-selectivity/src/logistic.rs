//! Logistic selectivity.
//!
//! `alpha / (1 + 19^((a50 - x) / ato95))`: half of `alpha` at `a50` and
//! 95% of it at `a50 + ato95`. The exponent is clamped to `[-5, 5]`,
//! beyond which the curve is treated as exactly `alpha` or zero.

use otolith_core::{ConfigError, ConfigErrors, Location, ObjectKind};

use crate::cache::{CacheDomain, ResultCache};
use crate::selectivity::{require_positive, unknown_parameter, Selectivity};

const SATURATION: f64 = 5.0;

/// Increasing logistic curve.
#[derive(Clone, Debug, PartialEq)]
pub struct Logistic {
    label: String,
    a50: f64,
    ato95: f64,
    alpha: f64,
    cache: ResultCache,
}

impl Logistic {
    /// Logistic with unit height.
    pub fn new(label: impl Into<String>, a50: f64, ato95: f64) -> Self {
        Self {
            label: label.into(),
            a50,
            ato95,
            alpha: 1.0,
            cache: ResultCache::default(),
        }
    }

    /// Override the height of the curve.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    fn evaluate(&self, x: f64) -> f64 {
        let threshold = (self.a50 - x) / self.ato95;
        if threshold > SATURATION {
            0.0
        } else if threshold < -SATURATION {
            self.alpha
        } else {
            self.alpha / (1.0 + 19.0_f64.powf(threshold))
        }
    }
}

impl Selectivity for Logistic {
    fn label(&self) -> &str {
        &self.label
    }

    fn validate(&self) -> Result<(), ConfigErrors> {
        let mut errors = ConfigErrors::new();
        if !self.a50.is_finite() {
            errors.push(ConfigError::invalid(
                Location::new(ObjectKind::Selectivity, &self.label, "a50"),
                format!("a50 must be finite, got {}", self.a50),
            ));
        }
        require_positive(&mut errors, &self.label, "ato95", self.ato95);
        require_positive(&mut errors, &self.label, "alpha", self.alpha);
        errors.into_result()
    }

    fn age_result(&self, age: u32) -> f64 {
        self.cache.age(age)
    }

    fn length_result(&self, length_bin: usize) -> f64 {
        self.cache.length(length_bin)
    }

    fn rebuild_cache(&mut self, domain: &CacheDomain) {
        self.cache = ResultCache::build(domain, |x| self.evaluate(x));
    }

    fn parameter(&self, name: &str) -> Option<f64> {
        match name {
            "a50" => Some(self.a50),
            "ato95" => Some(self.ato95),
            "alpha" => Some(self.alpha),
            _ => None,
        }
    }

    fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), ConfigError> {
        match name {
            "a50" => self.a50 = value,
            "ato95" => self.ato95 = value,
            "alpha" => self.alpha = value,
            _ => return Err(unknown_parameter(&self.label, name)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;
    use proptest::prelude::*;

    fn built(a50: f64, ato95: f64) -> Logistic {
        let mut sel = Logistic::new("logistic", a50, ato95);
        sel.rebuild_cache(&CacheDomain::ages(1, 20));
        sel
    }

    #[test]
    fn half_at_a50_and_95_percent_at_a95() {
        let sel = built(5.0, 2.0);
        assert!((sel.age_result(5) - 0.5).abs() < 1e-12);
        assert!((sel.age_result(7) - 0.95).abs() < 1e-12);
    }

    #[test]
    fn saturates_outside_threshold() {
        let sel = built(10.0, 1.0);
        assert_eq!(sel.age_result(4), 0.0);
        assert_eq!(sel.age_result(16), 1.0);
    }

    #[test]
    fn zero_ato95_is_rejected() {
        let errors = Logistic::new("l", 5.0, 0.0).validate().unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn compliance() {
        let domain = CacheDomain::ages(1, 15).with_length_bins(vec![10.0, 20.0, 30.0]);
        let mut sel = Logistic::new("logistic", 6.0, 3.0);
        compliance::run_full_compliance(&mut sel, &domain);
        compliance::assert_cache_holds_until_rebuild(&mut sel, &domain, "a50", 9.0);
    }

    proptest! {
        #[test]
        fn monotone_and_bounded(a50 in 1.0f64..15.0, ato95 in 0.1f64..10.0) {
            let sel = built(a50, ato95);
            let mut prev = 0.0;
            for age in 1..=20 {
                let v = sel.age_result(age);
                prop_assert!((0.0..=1.0).contains(&v));
                prop_assert!(v >= prev);
                prev = v;
            }
        }
    }
}
