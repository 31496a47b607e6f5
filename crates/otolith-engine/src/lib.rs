//! Model runner for the Otolith population engine.
//!
//! [`Model`] owns the partition and every registry, builds all objects
//! from a [`ModelConfig`] and runs the annual cycle:
//!
//! 1. initialisation phases, in order, once per run;
//! 2. for each year: time-varying parameter updates, then each time step's
//!    processes in order, then that step's subscribed observers.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod metrics;
pub mod model;
pub mod observer;
pub mod schedule;
pub mod time_varying;

pub use config::{ModelConfig, TimeStepDef};
pub use metrics::{RunSummary, YearMetrics};
pub use model::{Model, RunError};
pub use observer::{Observer, ProportionsAtAge};
pub use schedule::{Schedule, TimeStep};
pub use time_varying::{TimeVaryingDef, TimeVaryingManager};
