//! Reference processes for the Otolith population engine.
//!
//! # Annual cycle (typical ordering)
//!
//! 1. [`RecruitmentConstant`]: adds `r0 * proportion` at the recruitment age.
//! 2. [`MortalityConstantRate`]: `N *= exp(-M * ratio * S(age))`.
//! 3. [`MortalityEvent`]: removes a fixed catch, capped at `u_max`.
//! 4. [`Ageing`]: shifts every cohort one age older.
//!
//! [`StateCategoryByAge`] is an initialisation phase that overwrites the
//! partition from a table before the first year.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod ageing;
pub mod binding;
pub mod mortality_constant_rate;
pub mod mortality_event;
mod params;
pub mod recruitment_constant;
pub mod state_category_by_age;

#[cfg(test)]
mod testing;

pub use ageing::Ageing;
pub use binding::{resolve_bindings, CategoryBinding};
pub use mortality_constant_rate::{MortalityConstantRate, MortalityConstantRateConfig};
pub use mortality_event::{Exploitation, MortalityEvent, MortalityEventConfig, DEFAULT_U_MAX};
pub use recruitment_constant::{RecruitmentConstant, RecruitmentConstantConfig};
pub use state_category_by_age::{StateCategoryByAge, StateCategoryByAgeConfig};
