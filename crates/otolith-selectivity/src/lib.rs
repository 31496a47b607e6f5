//! Selectivity curves for the Otolith population engine.
//!
//! A selectivity maps an age (or a length bin) to a dimensionless
//! multiplier describing how vulnerable that class is to a process.
//! Every implementation serves lookups from a [`ResultCache`] that is
//! rebuilt explicitly, so lookups inside a year are O(1) reads.
//!
//! | Type | Curve |
//! |------|-------|
//! | [`Constant`] | `c` for every age and length |
//! | [`KnifeEdge`] | `alpha` from age `e` upwards, zero below |
//! | [`Logistic`] | increasing logistic with 50% at `a50` |
//! | [`DoubleNormal`] | dome with separate left/right spread |
//! | [`AllValues`] | one value per age |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod all_values;
pub mod cache;
pub mod constant;
pub mod double_normal;
pub mod knife_edge;
pub mod logistic;
pub mod registry;
pub mod selectivity;

#[cfg(test)]
pub(crate) mod compliance;

pub use all_values::AllValues;
pub use cache::{CacheDomain, ResultCache};
pub use constant::Constant;
pub use double_normal::DoubleNormal;
pub use knife_edge::KnifeEdge;
pub use logistic::Logistic;
pub use registry::SelectivityRegistry;
pub use selectivity::Selectivity;
