//! The model: construction from a [`ModelConfig`] and the annual run loop.
//!
//! [`Model::new`] validates and builds every object, collecting all
//! configuration errors before failing. [`Model::run`] then executes:
//!
//! 1. Selectivity caches are rebuilt; on a re-run the partition is zeroed,
//!    penalty events cleared, process slots restarted and observers reset.
//! 2. Initialisation phases, in order, in the first model year.
//! 3. For each year: time-varying updates (rebuilding touched caches), then
//!    each time step's processes in order, then that step's observers.
//! 4. Time-varying parameters are restored and every slot is finished.

use std::fmt;
use std::time::Instant;

use indexmap::IndexSet;
use otolith_core::{
    ConfigError, ConfigErrors, Location, ObjectKind, ObserverId, Partition, PenaltyManager,
    ProcessError, TimeStepId, Year,
};
use otolith_process::{
    build_all, check_labels, validate_all, BuildContext, ExecuteContext, LifecycleError,
    ModelSpan, Process, ProcessSlot, SlotError,
};
use otolith_selectivity::{CacheDomain, Selectivity, SelectivityRegistry};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::ModelConfig;
use crate::metrics::{RunSummary, YearMetrics};
use crate::observer::Observer;
use crate::schedule::Schedule;
use crate::time_varying::TimeVaryingManager;

// Compile-time assertion: Model is Send so independent runs can move to
// worker threads. Fails to compile if any field is !Send.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<Model>();
    }
};

// ── RunError ────────────────────────────────────────────────────

/// Failure of [`Model::run`].
#[derive(Debug, Error)]
pub enum RunError {
    /// A process was driven out of lifecycle order.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    /// A process reported an execution failure.
    #[error("process '{label}' failed in {year} during '{time_step}': {source}")]
    Process {
        /// Label of the failing process.
        label: String,
        /// Year being executed.
        year: Year,
        /// Time step or initialisation phase being executed.
        time_step: String,
        /// The underlying error.
        #[source]
        source: ProcessError,
    },
    /// A process left a negative or non-finite abundance in the partition.
    #[error(
        "process '{process}' left abundance {value} in category '{category}' \
         at age {age} in {year} during '{time_step}'"
    )]
    InvalidAbundance {
        /// Label of the process that just ran.
        process: String,
        /// Time step or initialisation phase being executed.
        time_step: String,
        /// Category holding the value.
        category: String,
        /// Age holding the value.
        age: u32,
        /// The offending value.
        value: f64,
        /// Year being executed.
        year: Year,
    },
    /// A parameter could not be updated or restored.
    #[error(transparent)]
    Config(#[from] ConfigErrors),
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e.into())
    }
}

// ── Model ───────────────────────────────────────────────────────

/// A fully built population model.
pub struct Model {
    span: ModelSpan,
    domain: CacheDomain,
    partition: Partition,
    selectivities: SelectivityRegistry,
    penalties: PenaltyManager,
    initialisation: Vec<ProcessSlot>,
    processes: Vec<ProcessSlot>,
    schedule: Schedule,
    observers: Vec<Box<dyn Observer>>,
    time_varying: TimeVaryingManager,
    check_abundance: bool,
    runs: u32,
}

impl Model {
    /// Validate and build every object in `config`.
    ///
    /// Errors are collected per stage: structural and per-object
    /// validation first, then reference resolution. Every problem found
    /// in the failing stage is returned.
    pub fn new(config: ModelConfig) -> Result<Self, ConfigErrors> {
        let mut errors = ConfigErrors::new();
        errors.check_all(config.validate());
        let span = config.span();
        let domain = config.cache_domain();
        let ModelConfig {
            categories,
            selectivities,
            penalties,
            initialisation_phases,
            processes,
            time_steps,
            time_varying,
            mut observers,
            check_abundance,
            ..
        } = config;

        let partition = errors.check_all(Partition::new(&categories));
        let selectivities = errors.check_all(SelectivityRegistry::new(selectivities));
        if let Some(registry) = &selectivities {
            errors.check_all(registry.validate_all());
        }
        let penalties = errors.check_all(PenaltyManager::new(penalties));

        let mut initialisation: Vec<ProcessSlot> =
            initialisation_phases.into_iter().map(ProcessSlot::new).collect();
        let mut processes: Vec<ProcessSlot> = processes.into_iter().map(ProcessSlot::new).collect();
        errors.check_all(check_labels(
            initialisation
                .iter()
                .map(|slot| (slot, ObjectKind::InitialisationPhase))
                .chain(processes.iter().map(|slot| (slot, ObjectKind::Process))),
        ));
        errors.check_all(validate_all(&mut initialisation).map_err(into_config_errors));
        errors.check_all(validate_all(&mut processes).map_err(into_config_errors));

        let mut observer_labels = IndexSet::with_capacity(observers.len());
        for observer in &observers {
            if !observer_labels.insert(observer.label().to_string()) {
                errors.push(ConfigError::Duplicate {
                    location: Location::new(ObjectKind::Observer, observer.label(), "label"),
                    label: observer.label().to_string(),
                });
            }
            errors.check_all(observer.validate());
            if let Some(year) = observer.years().iter().find(|&&y| !span.contains_year(Year(y))) {
                errors.push(ConfigError::OutOfRange {
                    location: Location::new(ObjectKind::Observer, observer.label(), "years"),
                    value: f64::from(*year),
                    min: f64::from(span.start_year.0),
                    max: f64::from(span.final_year.0),
                });
            }
        }

        let (Some(partition), Some(mut selectivities), Some(penalties), true) =
            (partition, selectivities, penalties, errors.is_empty())
        else {
            return Err(errors);
        };

        selectivities.rebuild_all(&domain);
        {
            let ctx = BuildContext::new(&partition, &selectivities, &penalties, span);
            errors.check_all(build_all(&mut initialisation, &ctx).map_err(into_config_errors));
            errors.check_all(build_all(&mut processes, &ctx).map_err(into_config_errors));
        }
        let mut schedule = errors.check_all(Schedule::new(&time_steps, &processes));
        let time_varying = errors.check_all(TimeVaryingManager::new(time_varying, &selectivities, span));

        for observer in observers.iter_mut() {
            errors.check_all(observer.build(&partition));
        }
        if let Some(schedule) = &mut schedule {
            for (i, observer) in observers.iter().enumerate() {
                errors.check(schedule.subscribe_to_block(
                    observer.label(),
                    observer.time_step(),
                    observer.years(),
                    ObserverId(i),
                ));
            }
        }

        let (Some(schedule), Some(time_varying), true) = (schedule, time_varying, errors.is_empty())
        else {
            return Err(errors);
        };

        info!(
            categories = partition.len(),
            selectivities = selectivities.len(),
            processes = processes.len(),
            initialisation_phases = initialisation.len(),
            time_steps = schedule.len(),
            observers = observers.len(),
            start_year = %span.start_year,
            final_year = %span.final_year,
            "model built"
        );

        Ok(Self {
            span,
            domain,
            partition,
            selectivities,
            penalties,
            initialisation,
            processes,
            schedule,
            observers,
            time_varying,
            check_abundance,
            runs: 0,
        })
    }

    /// Execute the initialisation phases and every modelled year.
    ///
    /// May be called repeatedly; each call starts from an empty partition
    /// and leaves time-varying parameters as they were before the call,
    /// even when the run fails.
    pub fn run(&mut self) -> Result<RunSummary, RunError> {
        let started = Instant::now();
        if self.runs > 0 {
            self.reset()?;
        }
        self.runs += 1;
        self.selectivities.rebuild_all(&self.domain);
        self.time_varying.capture(&self.selectivities);

        let outcome = self.execute_run();

        let restored = self.time_varying.restore(&mut self.selectivities);
        if let Ok(touched) = &restored {
            for &id in touched {
                self.selectivities.rebuild(id, &self.domain);
            }
        }
        let (years, initialisation_us) = outcome?;
        restored?;

        for slot in self.initialisation.iter_mut().chain(self.processes.iter_mut()) {
            slot.finish()?;
        }

        let summary = RunSummary {
            years,
            penalty_events: self.penalties.events().to_vec(),
            total_penalty: self.penalties.total_score(),
            initialisation_us,
            elapsed_us: started.elapsed().as_micros() as u64,
        };
        info!(
            run = self.runs,
            years = summary.years.len(),
            penalty_events = summary.penalty_events.len(),
            total_penalty = summary.total_penalty,
            elapsed_us = summary.elapsed_us,
            "run complete"
        );
        Ok(summary)
    }

    fn reset(&mut self) -> Result<(), LifecycleError> {
        self.partition.clear();
        self.penalties.clear_events();
        for slot in self.initialisation.iter_mut().chain(self.processes.iter_mut()) {
            slot.restart()?;
        }
        for observer in &mut self.observers {
            observer.reset();
        }
        Ok(())
    }

    fn execute_run(&mut self) -> Result<(Vec<YearMetrics>, u64), RunError> {
        let Self {
            span,
            domain,
            partition,
            selectivities,
            penalties,
            initialisation,
            processes,
            schedule,
            observers,
            time_varying,
            check_abundance,
            ..
        } = self;
        let mut exec = Executor {
            partition,
            selectivities,
            penalties,
            check_abundance: *check_abundance,
        };

        let init_start = Instant::now();
        for slot in initialisation.iter_mut() {
            let phase = slot.label().to_string();
            exec.execute(slot, span.start_year, &phase)?;
            debug!(phase = %phase, total = exec.partition.total(), "initialisation phase complete");
        }
        let initialisation_us = init_start.elapsed().as_micros() as u64;

        let mut years = Vec::new();
        for year in span.years() {
            for id in time_varying.update(year, exec.selectivities)? {
                exec.selectivities.rebuild(id, domain);
            }
            let events_before = exec.penalties.events().len();
            let mut process_us = Vec::new();

            for (step_index, step) in schedule.steps().iter().enumerate() {
                for &i in step.processes() {
                    let slot = &mut processes[i];
                    let start = Instant::now();
                    exec.execute(slot, year, step.label())?;
                    process_us.push((slot.label().to_string(), start.elapsed().as_micros() as u64));
                }
                for &observer in schedule.subscribers(TimeStepId(step_index), year) {
                    if let Some(observer) = observers.get_mut(observer.0) {
                        observer.notify(year, step.label(), exec.partition);
                    }
                }
            }

            let metrics = YearMetrics {
                year,
                process_us,
                total_abundance: exec.partition.total(),
                penalties_triggered: exec.penalties.events().len() - events_before,
            };
            debug!(
                year = %year,
                total = metrics.total_abundance,
                penalties = metrics.penalties_triggered,
                "year complete"
            );
            years.push(metrics);
        }
        Ok((years, initialisation_us))
    }

    // ── Accessors ───────────────────────────────────────────────

    /// Partition state after the last run.
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Penalty definitions and the events of the last run.
    pub fn penalties(&self) -> &PenaltyManager {
        &self.penalties
    }

    /// Years and ages modelled.
    pub fn span(&self) -> ModelSpan {
        self.span
    }

    /// The resolved annual cycle.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Number of runs started so far.
    pub fn runs(&self) -> u32 {
        self.runs
    }

    /// A process or initialisation phase by label, as its concrete type.
    pub fn process<T: Process>(&self, label: &str) -> Option<&T> {
        self.initialisation
            .iter()
            .chain(&self.processes)
            .find(|slot| slot.label() == label)
            .and_then(|slot| slot.process().downcast_ref::<T>())
    }

    /// An observer by label, as its concrete type.
    pub fn observer<T: Observer>(&self, label: &str) -> Option<&T> {
        self.observers
            .iter()
            .find(|o| o.label() == label)
            .and_then(|o| o.downcast_ref::<T>())
    }

    /// A selectivity by label.
    pub fn selectivity(&self, label: &str) -> Option<&dyn Selectivity> {
        self.selectivities.by_label(label)
    }

    /// Mutable selectivity by label.
    ///
    /// Parameter changes take effect at the next [`run`](Self::run) or
    /// [`rebuild_caches`](Self::rebuild_caches).
    pub fn selectivity_mut(&mut self, label: &str) -> Option<&mut dyn Selectivity> {
        self.selectivities.by_label_mut(label)
    }

    /// Recompute every selectivity cache from current parameters.
    pub fn rebuild_caches(&mut self) {
        self.selectivities.rebuild_all(&self.domain);
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("span", &self.span)
            .field("categories", &self.partition.len())
            .field("selectivities", &self.selectivities.len())
            .field("initialisation", &self.initialisation)
            .field("processes", &self.processes)
            .field("schedule", &self.schedule)
            .field("observers", &self.observers.len())
            .field("time_varying", &self.time_varying.len())
            .field("check_abundance", &self.check_abundance)
            .field("runs", &self.runs)
            .finish()
    }
}

// ── Execution ───────────────────────────────────────────────────

/// Mutable model state lent to each process execution.
struct Executor<'m> {
    partition: &'m mut Partition,
    selectivities: &'m mut SelectivityRegistry,
    penalties: &'m mut PenaltyManager,
    check_abundance: bool,
}

impl Executor<'_> {
    fn execute(&mut self, slot: &mut ProcessSlot, year: Year, time_step: &str) -> Result<(), RunError> {
        let mut ctx = ExecuteContext::new(
            &mut *self.partition,
            &*self.selectivities,
            &mut *self.penalties,
            year,
            time_step,
        );
        slot.execute(&mut ctx).map_err(|e| match e {
            SlotError::Lifecycle(e) => RunError::Lifecycle(e),
            SlotError::Config(e) => RunError::Config(e),
            SlotError::Process(source) => RunError::Process {
                label: slot.label().to_string(),
                year,
                time_step: time_step.to_string(),
                source,
            },
        })?;

        if self.check_abundance {
            if let Some((id, age, value)) = self.partition.first_invalid() {
                let category = self
                    .partition
                    .category(id)
                    .map_or_else(|| id.to_string(), |c| c.name().to_string());
                return Err(RunError::InvalidAbundance {
                    process: slot.label().to_string(),
                    time_step: time_step.to_string(),
                    category,
                    age,
                    value,
                    year,
                });
            }
        }
        Ok(())
    }
}

fn into_config_errors(error: SlotError) -> ConfigErrors {
    match error {
        SlotError::Config(errors) => errors,
        other => ConfigError::invalid(
            Location::new(ObjectKind::Model, "model", "processes"),
            other.to_string(),
        )
        .into(),
    }
}
