//! Core types for the Otolith population engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions shared by every other Otolith crate:
//! typed identifiers, category definitions, the [`Partition`] that holds
//! the simulated abundance, the penalty manager, and the error taxonomy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod category;
pub mod error;
pub mod id;
pub mod math;
pub mod partition;
pub mod penalty;

pub use category::{Category, CategoryDef};
pub use error::{ConfigError, ConfigErrors, Location, ObjectKind, ProcessError, TableProblem};
pub use id::{CategoryId, ObserverId, PenaltyId, SelectivityId, TimeStepId, Year};
pub use partition::{Partition, PartitionView};
pub use penalty::{Penalty, PenaltyEvent, PenaltyManager};
