//! Constant selectivity: the same multiplier for every age and length.
//!
//! # Construction
//!
//! ```
//! use otolith_selectivity::{Constant, Selectivity};
//!
//! let sel = Constant::new("one", 1.0);
//! assert_eq!(sel.age_result(7), 1.0);
//! ```

use otolith_core::{ConfigError, ConfigErrors};

use crate::cache::CacheDomain;
use crate::selectivity::{unknown_parameter, Selectivity};

/// Returns `c` regardless of age or length.
///
/// The served value is the `c` captured by the last
/// [`rebuild_cache`](Selectivity::rebuild_cache) (or construction), so the
/// cache contract holds for this curve too.
#[derive(Clone, Debug, PartialEq)]
pub struct Constant {
    label: String,
    c: f64,
    cached: f64,
}

impl Constant {
    /// A constant selectivity with coefficient `c`.
    pub fn new(label: impl Into<String>, c: f64) -> Self {
        Self {
            label: label.into(),
            c,
            cached: c,
        }
    }
}

impl Selectivity for Constant {
    fn label(&self) -> &str {
        &self.label
    }

    fn validate(&self) -> Result<(), ConfigErrors> {
        Ok(())
    }

    fn age_result(&self, _age: u32) -> f64 {
        self.cached
    }

    fn length_result(&self, _length_bin: usize) -> f64 {
        self.cached
    }

    fn rebuild_cache(&mut self, _domain: &CacheDomain) {
        self.cached = self.c;
    }

    fn parameter(&self, name: &str) -> Option<f64> {
        match name {
            "c" => Some(self.c),
            _ => None,
        }
    }

    fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), ConfigError> {
        match name {
            "c" => {
                self.c = value;
                Ok(())
            }
            _ => Err(unknown_parameter(&self.label, name)),
        }
    }
}
