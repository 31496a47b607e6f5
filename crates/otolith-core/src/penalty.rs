//! Soft-constraint penalties.
//!
//! A penalty records that a process could not do what its configuration
//! asked (for example a catch larger than the exploitation cap allows)
//! without aborting the run. Events accumulate in the [`PenaltyManager`]
//! during a run and are read back afterwards by diagnostics or by an
//! objective function.

use indexmap::IndexMap;

use crate::error::{ConfigError, ConfigErrors, Location, ObjectKind};
use crate::id::{PenaltyId, Year};
use crate::math::{zero_fun, ZERO_FUN_DELTA};

/// A named penalty definition.
#[derive(Clone, Debug, PartialEq)]
pub struct Penalty {
    /// Unique label processes refer to.
    pub label: String,
    /// Scale applied to the squared shortfall.
    pub multiplier: f64,
    /// Compare `requested` and `capacity` on the log scale.
    pub log_scale: bool,
}

impl Penalty {
    /// A penalty with unit multiplier on the natural scale.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            multiplier: 1.0,
            log_scale: false,
        }
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.multiplier.is_finite() || self.multiplier < 0.0 {
            return Err(ConfigError::invalid(
                Location::new(ObjectKind::Penalty, &self.label, "multiplier"),
                format!(
                    "multiplier must be finite and non-negative, got {}",
                    self.multiplier
                ),
            ));
        }
        Ok(())
    }

    /// Score a shortfall of `capacity` against `requested`.
    pub fn score(&self, requested: f64, capacity: f64) -> f64 {
        let diff = if self.log_scale {
            zero_fun(requested, ZERO_FUN_DELTA).ln() - zero_fun(capacity, ZERO_FUN_DELTA).ln()
        } else {
            requested - capacity
        };
        diff * diff * self.multiplier
    }
}

/// One recorded soft-constraint violation.
#[derive(Clone, Debug, PartialEq)]
pub struct PenaltyEvent {
    /// The penalty definition bound by the source, if any.
    pub penalty: Option<PenaltyId>,
    /// Label of the object that hit the constraint.
    pub source: String,
    /// Model year in which it happened.
    pub year: Year,
    /// What the configuration asked for.
    pub requested: f64,
    /// What could actually be delivered.
    pub capacity: f64,
    /// Score from the bound penalty, or zero when none is bound.
    pub score: f64,
}

/// Penalty definitions plus the events triggered during the current run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PenaltyManager {
    penalties: IndexMap<String, Penalty>,
    events: Vec<PenaltyEvent>,
}

impl PenaltyManager {
    /// Register penalty definitions, reporting every invalid or duplicate one.
    pub fn new(penalties: Vec<Penalty>) -> Result<Self, ConfigErrors> {
        let mut errors = ConfigErrors::new();
        let mut map = IndexMap::with_capacity(penalties.len());
        for p in penalties {
            if errors.check(p.validate()).is_none() {
                continue;
            }
            if map.contains_key(&p.label) {
                errors.push(ConfigError::Duplicate {
                    location: Location::new(ObjectKind::Penalty, &p.label, "label"),
                    label: p.label.clone(),
                });
                continue;
            }
            map.insert(p.label.clone(), p);
        }
        errors.into_result()?;
        Ok(Self {
            penalties: map,
            events: Vec::new(),
        })
    }

    /// Resolve a penalty label.
    pub fn lookup(&self, label: &str) -> Option<PenaltyId> {
        self.penalties.get_index_of(label).map(PenaltyId)
    }

    /// Penalty definition by id.
    pub fn get(&self, id: PenaltyId) -> Option<&Penalty> {
        self.penalties.get_index(id.0).map(|(_, p)| p)
    }

    /// Record a violation.
    ///
    /// The event is always recorded; it is scored only when `penalty`
    /// names a definition.
    pub fn trigger(
        &mut self,
        penalty: Option<PenaltyId>,
        source: &str,
        year: Year,
        requested: f64,
        capacity: f64,
    ) {
        let score = penalty
            .and_then(|id| self.get(id))
            .map_or(0.0, |p| p.score(requested, capacity));
        tracing::warn!(
            source,
            year = year.0,
            requested,
            capacity,
            score,
            "penalty triggered"
        );
        self.events.push(PenaltyEvent {
            penalty,
            source: source.to_string(),
            year,
            requested,
            capacity,
            score,
        });
    }

    /// Events recorded since the last [`clear_events`](Self::clear_events).
    pub fn events(&self) -> &[PenaltyEvent] {
        &self.events
    }

    /// Events raised by one source.
    pub fn events_for<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a PenaltyEvent> {
        self.events.iter().filter(move |e| e.source == source)
    }

    /// Sum of event scores.
    pub fn total_score(&self) -> f64 {
        self.events.iter().map(|e| e.score).sum()
    }

    /// Forget recorded events, keeping definitions.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_natural_and_log_scale() {
        let mut p = Penalty::new("catch");
        p.multiplier = 2.0;
        assert_eq!(p.score(10.0, 7.0), 18.0);

        p.log_scale = true;
        let expected = (10.0f64.ln() - 5.0f64.ln()).powi(2) * 2.0;
        assert!((p.score(10.0, 5.0) - expected).abs() < 1e-12);
        assert!(p.score(10.0, 0.0).is_finite());
    }

    #[test]
    fn rejects_negative_multiplier_and_duplicates() {
        let mut bad = Penalty::new("bad");
        bad.multiplier = -1.0;
        let errors =
            PenaltyManager::new(vec![bad, Penalty::new("a"), Penalty::new("a")]).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn trigger_records_with_and_without_definition() {
        let mut m = PenaltyManager::new(vec![Penalty::new("catch")]).unwrap();
        let id = m.lookup("catch");
        assert_eq!(id, Some(PenaltyId(0)));
        assert_eq!(m.lookup("missing"), None);

        m.trigger(id, "fishing", Year(2000), 50.0, 40.0);
        m.trigger(None, "bycatch", Year(2000), 5.0, 1.0);

        assert_eq!(m.events().len(), 2);
        assert_eq!(m.events()[0].score, 100.0);
        assert_eq!(m.events()[1].score, 0.0);
        assert_eq!(m.events_for("fishing").count(), 1);
        assert_eq!(m.total_score(), 100.0);

        m.clear_events();
        assert!(m.events().is_empty());
        assert!(m.lookup("catch").is_some());
    }
}
