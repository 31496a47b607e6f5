//! Contexts passed to processes at build and execute time.
//!
//! [`BuildContext`] lends read-only registries so a process can turn the
//! labels in its configuration into ids. [`ExecuteContext`] lends the
//! partition mutably together with the selectivities and penalty manager
//! for a single execution.

use otolith_core::{
    ConfigError, ConfigErrors, Location, ObjectKind, Partition, PartitionView, PenaltyId,
    PenaltyManager, ProcessError, SelectivityId, Year,
};
use otolith_selectivity::{Selectivity, SelectivityRegistry};

/// Year and age range of the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelSpan {
    /// First modelled year.
    pub start_year: Year,
    /// Last modelled year, inclusive.
    pub final_year: Year,
    /// Youngest modelled age.
    pub min_age: u32,
    /// Oldest modelled age.
    pub max_age: u32,
    /// Whether the oldest age accumulates older individuals.
    pub age_plus: bool,
}

impl ModelSpan {
    /// Whether `year` lies inside the modelled years.
    pub fn contains_year(&self, year: Year) -> bool {
        (self.start_year..=self.final_year).contains(&year)
    }

    /// Every modelled year in order.
    pub fn years(&self) -> impl Iterator<Item = Year> {
        (self.start_year.0..=self.final_year.0).map(Year)
    }
}

/// Read-only registries used to resolve references during build.
pub struct BuildContext<'a> {
    partition: &'a Partition,
    selectivities: &'a SelectivityRegistry,
    penalties: &'a PenaltyManager,
    span: ModelSpan,
}

impl<'a> BuildContext<'a> {
    /// Construct a build context. Normally called by the engine.
    pub fn new(
        partition: &'a Partition,
        selectivities: &'a SelectivityRegistry,
        penalties: &'a PenaltyManager,
        span: ModelSpan,
    ) -> Self {
        Self {
            partition,
            selectivities,
            penalties,
            span,
        }
    }

    /// The model partition.
    pub fn partition(&self) -> &Partition {
        self.partition
    }

    /// The selectivity registry.
    pub fn selectivities(&self) -> &SelectivityRegistry {
        self.selectivities
    }

    /// The penalty definitions.
    pub fn penalties(&self) -> &PenaltyManager {
        self.penalties
    }

    /// Year and age range of the model.
    pub fn span(&self) -> ModelSpan {
        self.span
    }

    /// Resolve category labels into a view, in the given order.
    pub fn categories(
        &self,
        location: &Location,
        labels: &[String],
    ) -> Result<PartitionView, ConfigErrors> {
        self.partition.view(location, labels)
    }

    /// Resolve one selectivity label.
    pub fn selectivity(&self, location: &Location, label: &str) -> Result<SelectivityId, ConfigError> {
        self.selectivities
            .lookup(label)
            .ok_or_else(|| ConfigError::UnresolvedReference {
                location: location.clone(),
                kind: ObjectKind::Selectivity,
                label: label.to_string(),
            })
    }

    /// Resolve a list of selectivity labels, reporting every miss.
    pub fn selectivity_list(
        &self,
        location: &Location,
        labels: &[String],
    ) -> Result<Vec<SelectivityId>, ConfigErrors> {
        let mut errors = ConfigErrors::new();
        let ids: Vec<SelectivityId> = labels
            .iter()
            .filter_map(|label| errors.check(self.selectivity(location, label)))
            .collect();
        errors.into_result()?;
        Ok(ids)
    }

    /// Resolve one penalty label.
    pub fn penalty(&self, location: &Location, label: &str) -> Result<PenaltyId, ConfigError> {
        self.penalties
            .lookup(label)
            .ok_or_else(|| ConfigError::UnresolvedReference {
                location: location.clone(),
                kind: ObjectKind::Penalty,
                label: label.to_string(),
            })
    }
}

/// State lent to a process for one execution.
pub struct ExecuteContext<'a> {
    partition: &'a mut Partition,
    selectivities: &'a SelectivityRegistry,
    penalties: &'a mut PenaltyManager,
    year: Year,
    time_step: &'a str,
}

impl<'a> ExecuteContext<'a> {
    /// Construct an execute context. Normally called by the engine.
    pub fn new(
        partition: &'a mut Partition,
        selectivities: &'a SelectivityRegistry,
        penalties: &'a mut PenaltyManager,
        year: Year,
        time_step: &'a str,
    ) -> Self {
        Self {
            partition,
            selectivities,
            penalties,
            year,
            time_step,
        }
    }

    /// Current partition state.
    pub fn partition(&self) -> &Partition {
        self.partition
    }

    /// Mutable partition state.
    pub fn partition_mut(&mut self) -> &mut Partition {
        self.partition
    }

    /// Selectivity resolved at build time.
    pub fn selectivity(&self, id: SelectivityId) -> Result<&dyn Selectivity, ProcessError> {
        self.selectivities
            .get(id)
            .ok_or(ProcessError::MissingSelectivity(id))
    }

    /// Penalty manager for recording soft-constraint violations.
    pub fn penalties(&mut self) -> &mut PenaltyManager {
        self.penalties
    }

    /// Year being executed.
    pub fn year(&self) -> Year {
        self.year
    }

    /// Label of the time step (or initialisation phase) being executed.
    pub fn time_step(&self) -> &str {
        self.time_step
    }

    /// Split borrow: the partition mutably alongside the selectivities.
    pub fn partition_and_selectivities(&mut self) -> (&mut Partition, &SelectivityRegistry) {
        (&mut *self.partition, self.selectivities)
    }
}
