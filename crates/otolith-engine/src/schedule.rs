//! The annual cycle: ordered time steps, their processes and the
//! observers subscribed to each (time step, year) block.

use indexmap::IndexMap;
use otolith_core::{ConfigError, ConfigErrors, Location, ObjectKind, ObserverId, TimeStepId, Year};
use otolith_process::{ProcessKind, ProcessSlot};
use smallvec::SmallVec;
use tracing::warn;

use crate::config::TimeStepDef;

/// One resolved step of the annual cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeStep {
    label: String,
    processes: Vec<usize>,
    subscribers: IndexMap<Year, SmallVec<[ObserverId; 2]>>,
}

impl TimeStep {
    /// Step label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Indices into the model's process slots, in execution order.
    pub fn processes(&self) -> &[usize] {
        &self.processes
    }
}

/// Ordered time steps with resolved process indices.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schedule {
    steps: Vec<TimeStep>,
}

impl Schedule {
    /// Resolve each step's process labels against `slots`.
    ///
    /// Unknown labels and initialisation-only processes are errors; a
    /// process no step refers to is logged and never executed.
    pub fn new(defs: &[TimeStepDef], slots: &[ProcessSlot]) -> Result<Self, ConfigErrors> {
        let index: IndexMap<&str, usize> = slots
            .iter()
            .enumerate()
            .map(|(i, s)| (s.label(), i))
            .collect();
        let mut used = vec![false; slots.len()];
        let mut errors = ConfigErrors::new();
        let mut steps = Vec::with_capacity(defs.len());

        for def in defs {
            let location = Location::new(ObjectKind::TimeStep, &def.label, "processes");
            let mut processes = Vec::with_capacity(def.processes.len());
            for label in &def.processes {
                let Some(&i) = index.get(label.as_str()) else {
                    errors.push(ConfigError::UnresolvedReference {
                        location: location.clone(),
                        kind: ObjectKind::Process,
                        label: label.clone(),
                    });
                    continue;
                };
                if slots[i].process().kind() == ProcessKind::Initialisation {
                    errors.push(ConfigError::invalid(
                        location.clone(),
                        format!("'{label}' is an initialisation process and cannot run in a time step"),
                    ));
                    continue;
                }
                used[i] = true;
                processes.push(i);
            }
            steps.push(TimeStep {
                label: def.label.clone(),
                processes,
                subscribers: IndexMap::new(),
            });
        }
        errors.into_result()?;

        for (slot, _) in slots.iter().zip(&used).filter(|(_, used)| !**used) {
            warn!(process = slot.label(), "process is not assigned to any time step");
        }
        Ok(Self { steps })
    }

    /// Number of steps in the annual cycle.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the cycle is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps in execution order.
    pub fn steps(&self) -> &[TimeStep] {
        &self.steps
    }

    /// Resolve a step label.
    pub fn lookup(&self, label: &str) -> Option<TimeStepId> {
        self.steps.iter().position(|s| s.label == label).map(TimeStepId)
    }

    /// Ask for `observer` to be notified after `step` in each of `years`.
    ///
    /// Subscribing the same observer twice to one block is a no-op.
    pub fn subscribe_to_block(
        &mut self,
        observer_label: &str,
        step: &str,
        years: &[u32],
        observer: ObserverId,
    ) -> Result<(), ConfigError> {
        let id = self
            .lookup(step)
            .ok_or_else(|| ConfigError::UnresolvedReference {
                location: Location::new(ObjectKind::Observer, observer_label, "time_step"),
                kind: ObjectKind::TimeStep,
                label: step.to_string(),
            })?;
        let subscribers = &mut self.steps[id.0].subscribers;
        for &year in years {
            let list = subscribers.entry(Year(year)).or_default();
            if !list.contains(&observer) {
                list.push(observer);
            }
        }
        Ok(())
    }

    /// Observers to notify after `step` in `year`, in subscription order.
    pub fn subscribers(&self, step: TimeStepId, year: Year) -> &[ObserverId] {
        self.steps
            .get(step.0)
            .and_then(|s| s.subscribers.get(&year))
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }
}
