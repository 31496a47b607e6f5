//! Knife-edge selectivity.

use otolith_core::{ConfigError, ConfigErrors};

use crate::cache::{CacheDomain, ResultCache};
use crate::selectivity::{require_positive, unknown_parameter, Selectivity};

/// `alpha` for `x >= e`, zero below.
#[derive(Clone, Debug, PartialEq)]
pub struct KnifeEdge {
    label: String,
    e: f64,
    alpha: f64,
    cache: ResultCache,
}

impl KnifeEdge {
    /// Knife edge at `e` with unit height.
    pub fn new(label: impl Into<String>, e: f64) -> Self {
        Self {
            label: label.into(),
            e,
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
        if x >= self.e {
            self.alpha
        } else {
            0.0
        }
    }
}

impl Selectivity for KnifeEdge {
    fn label(&self) -> &str {
        &self.label
    }

    fn validate(&self) -> Result<(), ConfigErrors> {
        let mut errors = ConfigErrors::new();
        if !self.e.is_finite() {
            errors.push(ConfigError::invalid(
                otolith_core::Location::new(otolith_core::ObjectKind::Selectivity, &self.label, "e"),
                format!("e must be finite, got {}", self.e),
            ));
        }
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
            "e" => Some(self.e),
            "alpha" => Some(self.alpha),
            _ => None,
        }
    }

    fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), ConfigError> {
        match name {
            "e" => self.e = value,
            "alpha" => self.alpha = value,
            _ => return Err(unknown_parameter(&self.label, name)),
        }
        Ok(())
    }
}
