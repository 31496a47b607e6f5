//! Reusable process test fixtures.
//!
//! - [`AddConstant`]: adds a value to every age of one category.
//! - [`SetValue`]: overwrites one cell, e.g. with a negative or NaN value.
//! - [`FailingProcess`]: fails deterministically after N calls.
//! - [`RecordingProcess`]: logs each execution to an [`EventLog`].

use otolith_core::{CategoryId, ConfigError, ConfigErrors, Location, ObjectKind, ProcessError};
use otolith_process::{BuildContext, ExecuteContext, Process};

use crate::EventLog;

fn resolve(ctx: &BuildContext<'_>, label: &str, category: &str) -> Result<CategoryId, ConfigErrors> {
    ctx.partition().id(category).ok_or_else(|| {
        ConfigError::UnknownCategory {
            location: Location::new(ObjectKind::Process, label, "category"),
            label: category.to_string(),
        }
        .into()
    })
}

/// Adds `value` to every age of `category` each time it runs.
pub struct AddConstant {
    pub label: String,
    pub category: String,
    pub value: f64,
    id: Option<CategoryId>,
}

impl AddConstant {
    pub fn new(label: impl Into<String>, category: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            category: category.into(),
            value,
            id: None,
        }
    }
}

impl Process for AddConstant {
    fn label(&self) -> &str {
        &self.label
    }

    fn validate(&mut self) -> Result<(), ConfigErrors> {
        Ok(())
    }

    fn build(&mut self, ctx: &BuildContext<'_>) -> Result<(), ConfigErrors> {
        self.id = Some(resolve(ctx, &self.label, &self.category)?);
        Ok(())
    }

    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), ProcessError> {
        let id = self.id.ok_or_else(|| ProcessError::ExecutionFailed {
            reason: "not built".into(),
        })?;
        let category = ctx
            .partition_mut()
            .category_mut(id)
            .ok_or(ProcessError::MissingCategory(id))?;
        category.data_mut().iter_mut().for_each(|v| *v += self.value);
        Ok(())
    }
}

/// Overwrites `category` at `age` with `value` each time it runs.
pub struct SetValue {
    pub label: String,
    pub category: String,
    pub age: u32,
    pub value: f64,
    id: Option<CategoryId>,
}

impl SetValue {
    pub fn new(label: impl Into<String>, category: impl Into<String>, age: u32, value: f64) -> Self {
        Self {
            label: label.into(),
            category: category.into(),
            age,
            value,
            id: None,
        }
    }
}

impl Process for SetValue {
    fn label(&self) -> &str {
        &self.label
    }

    fn validate(&mut self) -> Result<(), ConfigErrors> {
        Ok(())
    }

    fn build(&mut self, ctx: &BuildContext<'_>) -> Result<(), ConfigErrors> {
        self.id = Some(resolve(ctx, &self.label, &self.category)?);
        Ok(())
    }

    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), ProcessError> {
        let id = self.id.ok_or_else(|| ProcessError::ExecutionFailed {
            reason: "not built".into(),
        })?;
        let category = ctx
            .partition_mut()
            .category_mut(id)
            .ok_or(ProcessError::MissingCategory(id))?;
        if !category.set(self.age, self.value) {
            return Err(ProcessError::ExecutionFailed {
                reason: format!("age {} is outside category '{}'", self.age, self.category),
            });
        }
        Ok(())
    }
}

/// Succeeds `succeed_count` times, then fails on every later call.
pub struct FailingProcess {
    pub label: String,
    pub succeed_count: usize,
    calls: usize,
}

impl FailingProcess {
    pub fn new(label: impl Into<String>, succeed_count: usize) -> Self {
        Self {
            label: label.into(),
            succeed_count,
            calls: 0,
        }
    }

    /// Number of `execute` calls so far.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl Process for FailingProcess {
    fn label(&self) -> &str {
        &self.label
    }

    fn validate(&mut self) -> Result<(), ConfigErrors> {
        Ok(())
    }

    fn build(&mut self, _ctx: &BuildContext<'_>) -> Result<(), ConfigErrors> {
        Ok(())
    }

    fn execute(&mut self, _ctx: &mut ExecuteContext<'_>) -> Result<(), ProcessError> {
        self.calls += 1;
        if self.calls > self.succeed_count {
            return Err(ProcessError::ExecutionFailed {
                reason: format!("failed on call {}", self.calls),
            });
        }
        Ok(())
    }
}

/// Logs `label@year/time_step` on every execution.
pub struct RecordingProcess {
    pub label: String,
    pub log: EventLog,
}

impl RecordingProcess {
    pub fn new(label: impl Into<String>, log: EventLog) -> Self {
        Self {
            label: label.into(),
            log,
        }
    }
}

impl Process for RecordingProcess {
    fn label(&self) -> &str {
        &self.label
    }

    fn validate(&mut self) -> Result<(), ConfigErrors> {
        Ok(())
    }

    fn build(&mut self, _ctx: &BuildContext<'_>) -> Result<(), ConfigErrors> {
        Ok(())
    }

    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), ProcessError> {
        self.log
            .push(format!("{}@{}/{}", self.label, ctx.year(), ctx.time_step()));
        Ok(())
    }
}
