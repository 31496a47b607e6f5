//! Ageing: every cohort moves one age class older.

use otolith_core::{ConfigErrors, PartitionView, ProcessError};
use otolith_process::{BuildContext, ExecuteContext, Process, ProcessKind};

use crate::params::{self, location};

/// Shifts abundance one age older in each listed category.
///
/// The youngest age is left empty. With a plus group the oldest age keeps
/// its abundance and gains the next-oldest; without one, the oldest
/// cohort is dropped.
#[derive(Debug)]
pub struct Ageing {
    label: String,
    categories: Vec<String>,
    view: PartitionView,
    plus_group: bool,
}

impl Ageing {
    /// Age the listed categories.
    pub fn new(label: impl Into<String>, categories: Vec<String>) -> Self {
        Self {
            label: label.into(),
            categories,
            view: PartitionView::default(),
            plus_group: false,
        }
    }
}

impl Process for Ageing {
    fn label(&self) -> &str {
        &self.label
    }

    fn kind(&self) -> ProcessKind {
        ProcessKind::Ageing
    }

    fn validate(&mut self) -> Result<(), ConfigErrors> {
        let mut errors = ConfigErrors::new();
        params::check_not_empty(&mut errors, &self.label, "categories", &self.categories);
        errors.into_result()
    }

    fn build(&mut self, ctx: &BuildContext<'_>) -> Result<(), ConfigErrors> {
        self.view = ctx.categories(&location(&self.label, "categories"), &self.categories)?;
        self.plus_group = ctx.span().age_plus;
        Ok(())
    }

    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), ProcessError> {
        for id in self.view.iter() {
            let category = ctx
                .partition_mut()
                .category_mut(id)
                .ok_or(ProcessError::MissingCategory(id))?;
            let data = category.data_mut();
            let Some(&oldest) = data.last() else {
                continue;
            };
            data.rotate_right(1);
            data[0] = 0.0;
            if self.plus_group {
                if let Some(last) = data.last_mut() {
                    *last += oldest;
                }
            }
        }
        Ok(())
    }
}
