//! Otolith: an age-structured fish population dynamics engine.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Otolith sub-crates. For most users, adding `otolith` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use otolith::prelude::*;
//!
//! let mut config = ModelConfig::new(2000, 2000, 1, 3);
//! config.categories = vec![CategoryDef::new("stock", 1, 3)];
//! config.selectivities = vec![Box::new(Constant::new("one", 1.0))];
//! config.initialisation_phases = vec![Box::new(StateCategoryByAge::new(
//!     StateCategoryByAgeConfig {
//!         label: "init".into(),
//!         categories: vec!["stock".into()],
//!         min_age: 1,
//!         max_age: 3,
//!         table: vec![vec!["stock".into(), "100".into(), "100".into(), "100".into()]],
//!     },
//! ))];
//! config.processes = vec![Box::new(MortalityEvent::new(MortalityEventConfig {
//!     label: "fishing".into(),
//!     categories: vec!["stock".into()],
//!     selectivities: vec!["one".into()],
//!     years: vec![2000],
//!     catches: vec![50.0],
//!     ..Default::default()
//! }))];
//! config.time_steps = vec![TimeStepDef::new("annual", &["fishing"])];
//!
//! let mut model = Model::new(config).unwrap();
//! let summary = model.run().unwrap();
//! assert!(summary.penalty_events.is_empty());
//! assert!((model.partition().total() - 250.0).abs() < 1e-9);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `otolith-core` | IDs, partition, penalties, errors |
//! | [`selectivity`] | `otolith-selectivity` | Selectivity trait, curves and registry |
//! | [`process`] | `otolith-process` | Process trait, lifecycle and contexts |
//! | [`processes`] | `otolith-processes` | Recruitment, mortality, ageing, initialisation |
//! | [`engine`] | `otolith-engine` | Model construction, scheduler, observers, runs |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, IDs and errors (`otolith-core`).
///
/// Contains the [`types::Partition`], [`types::PenaltyManager`] and the
/// configuration error taxonomy.
pub use otolith_core as types;

/// Selectivity curves (`otolith-selectivity`).
pub use otolith_selectivity as selectivity;

/// Process trait and lifecycle (`otolith-process`).
///
/// The [`process::Process`] trait is the main extension point for
/// user-defined population dynamics.
pub use otolith_process as process;

/// Reference processes (`otolith-processes`).
pub use otolith_processes as processes;

/// Model runner (`otolith-engine`).
pub use otolith_engine as engine;

/// Common imports for typical Otolith usage.
///
/// ```rust
/// use otolith::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use otolith_core::{
        Category, CategoryDef, CategoryId, Partition, Penalty, PenaltyEvent, PenaltyManager, Year,
    };

    // Errors
    pub use otolith_core::{ConfigError, ConfigErrors, ProcessError};

    // Selectivity
    pub use otolith_selectivity::{
        AllValues, Constant, DoubleNormal, KnifeEdge, Logistic, Selectivity,
    };

    // Process
    pub use otolith_process::{BuildContext, ExecuteContext, Process, ProcessKind};

    // Processes
    pub use otolith_processes::{
        Ageing, MortalityConstantRate, MortalityConstantRateConfig, MortalityEvent,
        MortalityEventConfig, RecruitmentConstant, RecruitmentConstantConfig, StateCategoryByAge,
        StateCategoryByAgeConfig,
    };

    // Engine
    pub use otolith_engine::{
        Model, ModelConfig, Observer, ProportionsAtAge, RunError, RunSummary, TimeStepDef,
        TimeVaryingDef, YearMetrics,
    };
}
