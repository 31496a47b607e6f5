//! Double-normal (dome-shaped) selectivity.

use otolith_core::{ConfigError, ConfigErrors, Location, ObjectKind};

use crate::cache::{CacheDomain, ResultCache};
use crate::selectivity::{require_positive, unknown_parameter, Selectivity};

/// `alpha * 2^(-((x - mu) / sigma)^2)`, with `sigma_l` left of the mode
/// and `sigma_r` right of it.
#[derive(Clone, Debug, PartialEq)]
pub struct DoubleNormal {
    label: String,
    mu: f64,
    sigma_l: f64,
    sigma_r: f64,
    alpha: f64,
    cache: ResultCache,
}

impl DoubleNormal {
    /// Dome with its peak of 1 at `mu`.
    pub fn new(label: impl Into<String>, mu: f64, sigma_l: f64, sigma_r: f64) -> Self {
        Self {
            label: label.into(),
            mu,
            sigma_l,
            sigma_r,
            alpha: 1.0,
            cache: ResultCache::default(),
        }
    }

    /// Override the height of the dome.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    fn evaluate(&self, x: f64) -> f64 {
        let sigma = if x < self.mu { self.sigma_l } else { self.sigma_r };
        let z = (x - self.mu) / sigma;
        self.alpha * 2.0_f64.powf(-(z * z))
    }
}

impl Selectivity for DoubleNormal {
    fn label(&self) -> &str {
        &self.label
    }

    fn validate(&self) -> Result<(), ConfigErrors> {
        let mut errors = ConfigErrors::new();
        if !self.mu.is_finite() {
            errors.push(ConfigError::invalid(
                Location::new(ObjectKind::Selectivity, &self.label, "mu"),
                format!("mu must be finite, got {}", self.mu),
            ));
        }
        require_positive(&mut errors, &self.label, "sigma_l", self.sigma_l);
        require_positive(&mut errors, &self.label, "sigma_r", self.sigma_r);
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
            "mu" => Some(self.mu),
            "sigma_l" => Some(self.sigma_l),
            "sigma_r" => Some(self.sigma_r),
            "alpha" => Some(self.alpha),
            _ => None,
        }
    }

    fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), ConfigError> {
        match name {
            "mu" => self.mu = value,
            "sigma_l" => self.sigma_l = value,
            "sigma_r" => self.sigma_r = value,
            "alpha" => self.alpha = value,
            _ => return Err(unknown_parameter(&self.label, name)),
        }
        Ok(())
    }
}
