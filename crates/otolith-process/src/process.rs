//! The [`Process`] trait and [`ProcessKind`] tag.
//!
//! Processes are the only code that mutates the partition during a run.
//! They hold configuration and references resolved at build time; the
//! partition itself is lent to them for the duration of one execution.

use std::any::Any;
use std::fmt;

use otolith_core::{ConfigErrors, ProcessError};

use crate::context::{BuildContext, ExecuteContext};

/// Broad family of a process, used for scheduling checks and reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProcessKind {
    /// Adds individuals.
    Recruitment,
    /// Removes individuals.
    Mortality,
    /// Moves individuals between ages.
    Ageing,
    /// Overwrites state before the first year; only valid as an
    /// initialisation phase.
    Initialisation,
    /// Anything else.
    Other,
}

impl fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Recruitment => "recruitment",
            Self::Mortality => "mortality",
            Self::Ageing => "ageing",
            Self::Initialisation => "initialisation",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

/// A configured operation over the partition.
///
/// # Contract
///
/// - `validate()` checks only the process's own configuration and runs
///   before anything else.
/// - `build()` resolves every label the process refers to. It runs once,
///   after every process has validated.
/// - `execute()` may run any number of times after `build()`. It must not
///   carry state between calls other than what it writes to the partition;
///   per-call working storage is reset at the start of each call.
///
/// The engine enforces this order through [`ProcessSlot`](crate::ProcessSlot).
///
/// # Object safety
///
/// This trait is object-safe; the engine stores processes as
/// `Vec<Box<dyn Process>>`.
///
/// # Examples
///
/// ```
/// use otolith_core::{ConfigErrors, ProcessError};
/// use otolith_process::{BuildContext, ExecuteContext, Process};
///
/// struct DoNothing;
///
/// impl Process for DoNothing {
///     fn label(&self) -> &str { "do_nothing" }
///     fn validate(&mut self) -> Result<(), ConfigErrors> { Ok(()) }
///     fn build(&mut self, _ctx: &BuildContext<'_>) -> Result<(), ConfigErrors> { Ok(()) }
///     fn execute(&mut self, _ctx: &mut ExecuteContext<'_>) -> Result<(), ProcessError> { Ok(()) }
/// }
///
/// assert_eq!(DoNothing.label(), "do_nothing");
/// ```
pub trait Process: Any + Send + 'static {
    /// Unique label used by time steps and error messages.
    fn label(&self) -> &str;

    /// Family of this process. Default: [`ProcessKind::Other`].
    fn kind(&self) -> ProcessKind {
        ProcessKind::Other
    }

    /// Check configuration, reporting every problem found.
    fn validate(&mut self) -> Result<(), ConfigErrors>;

    /// Resolve category, selectivity and penalty references.
    fn build(&mut self, ctx: &BuildContext<'_>) -> Result<(), ConfigErrors>;

    /// Apply the process for `ctx.year()` and `ctx.time_step()`.
    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), ProcessError>;
}

impl dyn Process {
    /// Attempt to downcast to a concrete process type.
    pub fn downcast_ref<T: Process>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    /// Attempt to mutably downcast to a concrete process type.
    pub fn downcast_mut<T: Process>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }
}
