//! Process trait, lifecycle and contexts for the Otolith population engine.
//!
//! A [`Process`] is validated once, built once against the model's
//! registries through a [`BuildContext`], then executed once per scheduled
//! (year, time step) with an [`ExecuteContext`] that lends it the
//! partition. [`ProcessSlot`] enforces that order.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod lifecycle;
pub mod pipeline;
pub mod process;
pub mod working;

pub use context::{BuildContext, ExecuteContext, ModelSpan};
pub use lifecycle::{LifecycleError, LifecycleState, Operation, ProcessSlot, SlotError};
pub use pipeline::{build_all, check_labels, validate_all};
pub use process::{Process, ProcessKind};
pub use working::AgeWorkspace;
