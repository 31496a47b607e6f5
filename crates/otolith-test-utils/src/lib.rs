//! Test utilities and mock types for Otolith development.
//!
//! Provides mock [`Process`](otolith_process::Process) and
//! [`Observer`](otolith_engine::Observer) implementations plus a
//! [`single_category`] config scaffold for engine-level tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::{Arc, Mutex};

use otolith_core::{CategoryDef, Partition, Year};
use otolith_engine::{ModelConfig, Observer, TimeStepDef};
use otolith_selectivity::Constant;

pub use fixtures::{AddConstant, FailingProcess, RecordingProcess, SetValue};

/// Shared, ordered log of execution and notification events.
///
/// Clones share the same log, so one can be handed to several mocks and
/// read back after a run.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: String) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }

    /// Snapshot of every entry so far.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

/// Observer that logs each notification and remembers the partition total.
pub struct RecordingObserver {
    pub label: String,
    pub time_step: String,
    pub years: Vec<u32>,
    pub log: EventLog,
    pub totals: Vec<(Year, f64)>,
}

impl RecordingObserver {
    pub fn new(label: impl Into<String>, time_step: impl Into<String>, years: Vec<u32>, log: EventLog) -> Self {
        Self {
            label: label.into(),
            time_step: time_step.into(),
            years,
            log,
            totals: Vec::new(),
        }
    }
}

impl Observer for RecordingObserver {
    fn label(&self) -> &str {
        &self.label
    }

    fn time_step(&self) -> &str {
        &self.time_step
    }

    fn years(&self) -> &[u32] {
        &self.years
    }

    fn notify(&mut self, year: Year, time_step: &str, partition: &Partition) {
        self.log.push(format!("observe:{}@{}/{}", self.label, year, time_step));
        self.totals.push((year, partition.total()));
    }

    fn reset(&mut self) {
        self.totals.clear();
    }
}

/// A config with one category `"stock"` over `min_age..=max_age`, one
/// constant selectivity `"one"` and a single empty time step `"annual"`.
pub fn single_category(start_year: u32, final_year: u32, min_age: u32, max_age: u32) -> ModelConfig {
    let mut config = ModelConfig::new(start_year, final_year, min_age, max_age);
    config.categories = vec![CategoryDef::new("stock", min_age, max_age)];
    config.selectivities = vec![Box::new(Constant::new("one", 1.0))];
    config.time_steps = vec![TimeStepDef::new("annual", &[])];
    config
}
