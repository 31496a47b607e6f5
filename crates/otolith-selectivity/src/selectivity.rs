//! The core `Selectivity` trait and `dyn Selectivity` downcast support.

use otolith_core::{ConfigError, ConfigErrors};
use std::any::Any;

use crate::cache::CacheDomain;

/// A function from age or length bin to a vulnerability multiplier.
///
/// # Cache contract
///
/// [`age_result`](Self::age_result) and [`length_result`](Self::length_result)
/// read from values computed by the most recent
/// [`rebuild_cache`](Self::rebuild_cache). Changing a parameter through
/// [`set_parameter`](Self::set_parameter) does **not** refresh them; the
/// owner must rebuild before the next batch of lookups. The engine does
/// this once at build time and again whenever a time-varying parameter
/// changes a selectivity at the start of a year.
///
/// # Object safety
///
/// This trait is object-safe; registries store `Box<dyn Selectivity>`.
/// Use `downcast_ref` to reach a concrete type.
pub trait Selectivity: Any + Send + 'static {
    /// Unique label processes refer to.
    fn label(&self) -> &str;

    /// Check bound parameter values, naming every offending parameter.
    fn validate(&self) -> Result<(), ConfigErrors>;

    /// Cached multiplier for `age`.
    ///
    /// Ages outside the cached domain return `0.0`, except for curves
    /// that do not depend on age at all.
    fn age_result(&self, age: u32) -> f64;

    /// Cached multiplier for the model length bin at `length_bin`.
    fn length_result(&self, length_bin: usize) -> f64;

    /// Recompute cached results over `domain` from the current parameters.
    fn rebuild_cache(&mut self, domain: &CacheDomain);

    /// Current value of a named parameter, `None` if it does not exist.
    fn parameter(&self, name: &str) -> Option<f64>;

    /// Overwrite a named parameter. Cached results are left untouched.
    fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), ConfigError>;
}

impl dyn Selectivity {
    /// Attempt to downcast to a concrete selectivity type.
    pub fn downcast_ref<T: Selectivity>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    /// Attempt to mutably downcast to a concrete selectivity type.
    pub fn downcast_mut<T: Selectivity>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }
}

/// Error for a parameter name a selectivity does not expose.
pub(crate) fn unknown_parameter(label: &str, name: &str) -> ConfigError {
    ConfigError::invalid(
        otolith_core::Location::new(otolith_core::ObjectKind::Selectivity, label, name),
        format!("selectivity has no parameter named '{name}'"),
    )
}

/// Record an error unless `value` is finite and strictly positive.
pub(crate) fn require_positive(errors: &mut ConfigErrors, label: &str, name: &str, value: f64) {
    if !value.is_finite() || value <= 0.0 {
        errors.push(ConfigError::invalid(
            otolith_core::Location::new(otolith_core::ObjectKind::Selectivity, label, name),
            format!("{name} must be finite and greater than zero, got {value}"),
        ));
    }
}
