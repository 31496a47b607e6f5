//! Year-specific overrides of selectivity parameters.
//!
//! At the start of each modelled year [`TimeVaryingManager::update`] sets
//! every overridden parameter to its value for that year, or back to the
//! value it had when the run started, and reports which selectivities
//! changed so their caches can be rebuilt before any process runs.

use indexmap::{IndexMap, IndexSet};
use otolith_core::{ConfigError, ConfigErrors, Location, ObjectKind, SelectivityId, Year};
use otolith_process::ModelSpan;
use otolith_selectivity::SelectivityRegistry;
use smallvec::SmallVec;
use tracing::{debug, warn};

/// Overrides of one selectivity parameter, keyed by year.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeVaryingDef {
    /// Unique label.
    pub label: String,
    /// Label of the selectivity to modify.
    pub selectivity: String,
    /// Parameter name, as accepted by `Selectivity::set_parameter`.
    pub parameter: String,
    /// Years with an override.
    pub years: Vec<u32>,
    /// Override for each entry of `years`.
    pub values: Vec<f64>,
}

impl TimeVaryingDef {
    /// Override `selectivity.parameter` in each of `years`.
    pub fn new(
        label: impl Into<String>,
        selectivity: impl Into<String>,
        parameter: impl Into<String>,
        years: Vec<u32>,
        values: Vec<f64>,
    ) -> Self {
        Self {
            label: label.into(),
            selectivity: selectivity.into(),
            parameter: parameter.into(),
            years,
            values,
        }
    }
}

#[derive(Debug)]
struct Entry {
    label: String,
    selectivity: SelectivityId,
    parameter: String,
    values: IndexMap<Year, f64>,
    original: f64,
}

/// Resolved overrides for a model.
#[derive(Debug, Default)]
pub struct TimeVaryingManager {
    entries: Vec<Entry>,
}

/// Ids of selectivities whose parameters changed.
pub type Touched = SmallVec<[SelectivityId; 4]>;

impl TimeVaryingManager {
    /// Validate and resolve every definition, reporting all problems.
    pub fn new(
        defs: Vec<TimeVaryingDef>,
        registry: &SelectivityRegistry,
        span: ModelSpan,
    ) -> Result<Self, ConfigErrors> {
        let mut errors = ConfigErrors::new();
        let mut labels = IndexSet::with_capacity(defs.len());
        let mut targets = IndexSet::with_capacity(defs.len());
        let mut entries = Vec::with_capacity(defs.len());

        for def in defs {
            let at = |parameter: &str| Location::new(ObjectKind::TimeVarying, &def.label, parameter);
            if !labels.insert(def.label.clone()) {
                errors.push(ConfigError::Duplicate {
                    location: at("label"),
                    label: def.label.clone(),
                });
                continue;
            }
            let before = errors.len();

            if def.values.len() != def.years.len() {
                errors.push(ConfigError::LengthMismatch {
                    location: at("values"),
                    expected: def.years.len(),
                    actual: def.values.len(),
                });
            }
            if let Some(bad) = def.values.iter().find(|v| !v.is_finite()) {
                errors.push(ConfigError::invalid(
                    at("values"),
                    format!("values must be finite, got {bad}"),
                ));
            }
            let mut values = IndexMap::with_capacity(def.years.len());
            for (i, &year) in def.years.iter().enumerate() {
                if values.contains_key(&Year(year)) {
                    errors.push(ConfigError::DuplicateYear {
                        location: at("years"),
                        year,
                    });
                    continue;
                }
                values.insert(Year(year), def.values.get(i).copied().unwrap_or_default());
                if !span.contains_year(Year(year)) {
                    warn!(time_varying = %def.label, year, "override year lies outside the model years");
                }
            }

            let selectivity = match registry.lookup(&def.selectivity) {
                Some(id) => Some(id),
                None => {
                    errors.push(ConfigError::UnresolvedReference {
                        location: at("selectivity"),
                        kind: ObjectKind::Selectivity,
                        label: def.selectivity.clone(),
                    });
                    None
                }
            };
            let original = selectivity
                .and_then(|id| registry.get(id))
                .and_then(|sel| sel.parameter(&def.parameter));
            if selectivity.is_some() && original.is_none() {
                errors.push(ConfigError::invalid(
                    at("parameter"),
                    format!(
                        "selectivity '{}' has no parameter named '{}'",
                        def.selectivity, def.parameter
                    ),
                ));
            }
            if let Some(id) = selectivity {
                if !targets.insert((id, def.parameter.clone())) {
                    errors.push(ConfigError::invalid(
                        at("parameter"),
                        format!(
                            "'{}.{}' is already time-varying",
                            def.selectivity, def.parameter
                        ),
                    ));
                }
            }

            if let (Some(selectivity), Some(original), true) =
                (selectivity, original, errors.len() == before)
            {
                entries.push(Entry {
                    label: def.label,
                    selectivity,
                    parameter: def.parameter,
                    values,
                    original,
                });
            }
        }

        errors.into_result()?;
        Ok(Self { entries })
    }

    /// Number of overridden parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is overridden.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record the current parameter values as the ones to fall back to.
    pub fn capture(&mut self, registry: &SelectivityRegistry) {
        for entry in &mut self.entries {
            if let Some(value) = registry
                .get(entry.selectivity)
                .and_then(|sel| sel.parameter(&entry.parameter))
            {
                entry.original = value;
            }
        }
    }

    /// Apply the overrides for `year`.
    ///
    /// Caches are not rebuilt here; the caller rebuilds every returned id.
    pub fn update(&self, year: Year, registry: &mut SelectivityRegistry) -> Result<Touched, ConfigError> {
        self.apply(registry, |entry| {
            entry.values.get(&year).copied().unwrap_or(entry.original)
        })
    }

    /// Put every overridden parameter back to its captured value.
    pub fn restore(&self, registry: &mut SelectivityRegistry) -> Result<Touched, ConfigError> {
        self.apply(registry, |entry| entry.original)
    }

    fn apply(
        &self,
        registry: &mut SelectivityRegistry,
        target: impl Fn(&Entry) -> f64,
    ) -> Result<Touched, ConfigError> {
        let mut touched = Touched::new();
        for entry in &self.entries {
            let sel = registry
                .get_mut(entry.selectivity)
                .ok_or_else(|| ConfigError::UnresolvedReference {
                    location: Location::new(ObjectKind::TimeVarying, &entry.label, "selectivity"),
                    kind: ObjectKind::Selectivity,
                    label: entry.selectivity.to_string(),
                })?;
            let value = target(entry);
            if sel.parameter(&entry.parameter) == Some(value) {
                continue;
            }
            sel.set_parameter(&entry.parameter, value)?;
            debug!(
                time_varying = %entry.label,
                selectivity = sel.label(),
                parameter = %entry.parameter,
                value,
                "parameter updated"
            );
            if !touched.contains(&entry.selectivity) {
                touched.push(entry.selectivity);
            }
        }
        Ok(touched)
    }
}
