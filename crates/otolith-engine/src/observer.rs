//! Observers: read-only views of the partition taken after a time step.
//!
//! The engine subscribes each observer to the `(time step, year)` blocks
//! it asks for and calls [`notify`](Observer::notify) strictly after every
//! process of that step has run.

use std::any::Any;

use indexmap::IndexMap;
use otolith_core::{ConfigError, ConfigErrors, Location, ObjectKind, Partition, PartitionView, Year};

/// A consumer of partition state at scheduled points of the annual cycle.
pub trait Observer: Any + Send + 'static {
    /// Unique label.
    fn label(&self) -> &str;

    /// Label of the time step after which to observe.
    fn time_step(&self) -> &str;

    /// Years in which to observe.
    fn years(&self) -> &[u32];

    /// Check configuration.
    fn validate(&self) -> Result<(), ConfigErrors> {
        Ok(())
    }

    /// Resolve references against the partition.
    fn build(&mut self, _partition: &Partition) -> Result<(), ConfigErrors> {
        Ok(())
    }

    /// Record the partition as it stands after `time_step` in `year`.
    fn notify(&mut self, year: Year, time_step: &str, partition: &Partition);

    /// Drop everything recorded, ahead of a new run.
    fn reset(&mut self) {}
}

impl dyn Observer {
    /// Attempt to downcast to a concrete observer type.
    pub fn downcast_ref<T: Observer>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    /// Attempt to mutably downcast to a concrete observer type.
    pub fn downcast_mut<T: Observer>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }
}

/// Proportions at age, summed over a set of categories.
///
/// Each notification stores one vector over `min_age..=max_age` that sums
/// to one, or is all zeros when the categories hold no fish.
#[derive(Clone, Debug, PartialEq)]
pub struct ProportionsAtAge {
    label: String,
    time_step: String,
    years: Vec<u32>,
    categories: Vec<String>,
    min_age: u32,
    max_age: u32,
    view: PartitionView,
    records: IndexMap<Year, Vec<f64>>,
}

impl ProportionsAtAge {
    /// Observe `categories` over `min_age..=max_age`.
    pub fn new(
        label: impl Into<String>,
        time_step: impl Into<String>,
        years: Vec<u32>,
        categories: &[&str],
        min_age: u32,
        max_age: u32,
    ) -> Self {
        Self {
            label: label.into(),
            time_step: time_step.into(),
            years,
            categories: categories.iter().map(|c| c.to_string()).collect(),
            min_age,
            max_age,
            view: PartitionView::default(),
            records: IndexMap::new(),
        }
    }

    /// Proportions recorded in `year`.
    pub fn proportions(&self, year: Year) -> Option<&[f64]> {
        self.records.get(&year).map(Vec::as_slice)
    }

    /// Every record, in notification order.
    pub fn records(&self) -> impl Iterator<Item = (Year, &[f64])> {
        self.records.iter().map(|(y, v)| (*y, v.as_slice()))
    }

    fn location(&self, parameter: &str) -> Location {
        Location::new(ObjectKind::Observer, &self.label, parameter)
    }
}

impl Observer for ProportionsAtAge {
    fn label(&self) -> &str {
        &self.label
    }

    fn time_step(&self) -> &str {
        &self.time_step
    }

    fn years(&self) -> &[u32] {
        &self.years
    }

    fn validate(&self) -> Result<(), ConfigErrors> {
        let mut errors = ConfigErrors::new();
        if self.categories.is_empty() {
            errors.push(ConfigError::invalid(
                self.location("categories"),
                "at least one category is required",
            ));
        }
        if self.years.is_empty() {
            errors.push(ConfigError::invalid(
                self.location("years"),
                "at least one year is required",
            ));
        }
        if self.max_age < self.min_age {
            errors.push(ConfigError::invalid(
                self.location("max_age"),
                format!(
                    "max_age ({}) cannot be less than min_age ({})",
                    self.max_age, self.min_age
                ),
            ));
        }
        errors.into_result()
    }

    fn build(&mut self, partition: &Partition) -> Result<(), ConfigErrors> {
        self.view = partition.view(&self.location("categories"), &self.categories)?;
        Ok(())
    }

    fn notify(&mut self, year: Year, _time_step: &str, partition: &Partition) {
        let mut values: Vec<f64> = (self.min_age..=self.max_age)
            .map(|age| {
                self.view
                    .iter()
                    .filter_map(|id| partition.category(id))
                    .filter_map(|c| c.get(age))
                    .sum::<f64>()
            })
            .collect();
        let total: f64 = values.iter().sum();
        if total > 0.0 {
            values.iter_mut().for_each(|v| *v /= total);
        } else {
            values.iter_mut().for_each(|v| *v = 0.0);
        }
        self.records.insert(year, values);
    }

    fn reset(&mut self) {
        self.records.clear();
    }
}
