//! Label-indexed storage for every selectivity in a model.

use indexmap::IndexMap;
use otolith_core::{ConfigError, ConfigErrors, Location, ObjectKind, SelectivityId};

use crate::cache::CacheDomain;
use crate::selectivity::Selectivity;

/// Owns all selectivities; ids are registration order.
#[derive(Default)]
pub struct SelectivityRegistry {
    entries: IndexMap<String, Box<dyn Selectivity>>,
}

impl SelectivityRegistry {
    /// Register selectivities, rejecting duplicate labels.
    ///
    /// Parameter validation is separate; see [`validate_all`](Self::validate_all).
    pub fn new(selectivities: Vec<Box<dyn Selectivity>>) -> Result<Self, ConfigErrors> {
        let mut errors = ConfigErrors::new();
        let mut entries = IndexMap::with_capacity(selectivities.len());
        for sel in selectivities {
            let label = sel.label().to_string();
            if entries.contains_key(&label) {
                errors.push(ConfigError::Duplicate {
                    location: Location::new(ObjectKind::Selectivity, &label, "label"),
                    label,
                });
                continue;
            }
            entries.insert(label, sel);
        }
        errors.into_result()?;
        Ok(Self { entries })
    }

    /// Validate every selectivity, collecting all errors.
    pub fn validate_all(&self) -> Result<(), ConfigErrors> {
        let mut errors = ConfigErrors::new();
        for sel in self.entries.values() {
            errors.check_all(sel.validate());
        }
        errors.into_result()
    }

    /// Resolve a label.
    pub fn lookup(&self, label: &str) -> Option<SelectivityId> {
        self.entries.get_index_of(label).map(SelectivityId)
    }

    /// Selectivity by id.
    pub fn get(&self, id: SelectivityId) -> Option<&dyn Selectivity> {
        self.entries.get_index(id.0).map(|(_, s)| s.as_ref())
    }

    /// Mutable selectivity by id.
    pub fn get_mut(&mut self, id: SelectivityId) -> Option<&mut dyn Selectivity> {
        self.entries.get_index_mut(id.0).map(|(_, s)| s.as_mut())
    }

    /// Selectivity by label.
    pub fn by_label(&self, label: &str) -> Option<&dyn Selectivity> {
        self.entries.get(label).map(|s| s.as_ref())
    }

    /// Mutable selectivity by label.
    pub fn by_label_mut(&mut self, label: &str) -> Option<&mut dyn Selectivity> {
        self.entries.get_mut(label).map(|s| s.as_mut())
    }

    /// Rebuild the cache of every selectivity.
    pub fn rebuild_all(&mut self, domain: &CacheDomain) {
        for sel in self.entries.values_mut() {
            sel.rebuild_cache(domain);
        }
    }

    /// Rebuild one cache. Returns `false` for an unknown id.
    pub fn rebuild(&mut self, id: SelectivityId, domain: &CacheDomain) -> bool {
        match self.get_mut(id) {
            Some(sel) => {
                sel.rebuild_cache(domain);
                true
            }
            None => false,
        }
    }

    /// Number of registered selectivities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(id, selectivity)` in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (SelectivityId, &dyn Selectivity)> {
        self.entries
            .values()
            .enumerate()
            .map(|(i, s)| (SelectivityId(i), s.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Constant, KnifeEdge, Logistic};

    fn registry() -> SelectivityRegistry {
        SelectivityRegistry::new(vec![
            Box::new(Constant::new("one", 1.0)),
            Box::new(KnifeEdge::new("mature", 3.0)),
        ])
        .unwrap()
    }

    #[test]
    fn ids_follow_registration_order() {
        let reg = registry();
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.lookup("one"), Some(SelectivityId(0)));
        assert_eq!(reg.lookup("mature"), Some(SelectivityId(1)));
        assert_eq!(reg.lookup("missing"), None);
        assert_eq!(reg.get(SelectivityId(1)).unwrap().label(), "mature");
    }

    #[test]
    fn duplicate_label_rejected() {
        let errors = SelectivityRegistry::new(vec![
            Box::new(Constant::new("one", 1.0)),
            Box::new(Constant::new("one", 0.5)),
        ])
        .err()
        .unwrap();
        assert!(matches!(errors.iter().next(), Some(ConfigError::Duplicate { .. })));
    }

    #[test]
    fn validate_all_collects_every_error() {
        let reg = SelectivityRegistry::new(vec![
            Box::new(Logistic::new("bad_a", 5.0, 0.0)),
            Box::new(KnifeEdge::new("bad_b", 1.0).with_alpha(-1.0)),
        ])
        .unwrap();
        assert_eq!(reg.validate_all().unwrap_err().len(), 2);
    }

    #[test]
    fn rebuild_one_leaves_others_stale() {
        let mut reg = registry();
        let domain = CacheDomain::ages(1, 5);
        reg.rebuild_all(&domain);
        reg.by_label_mut("one").unwrap().set_parameter("c", 0.5).unwrap();
        reg.by_label_mut("mature").unwrap().set_parameter("e", 5.0).unwrap();

        let one = reg.lookup("one").unwrap();
        assert!(reg.rebuild(one, &domain));
        assert!(!reg.rebuild(SelectivityId(9), &domain));

        assert_eq!(reg.by_label("one").unwrap().age_result(4), 0.5);
        assert_eq!(reg.by_label("mature").unwrap().age_result(4), 1.0);
    }

    #[test]
    fn downcast_through_registry() {
        let reg = registry();
        let sel = reg.by_label("mature").unwrap();
        assert!(sel.downcast_ref::<KnifeEdge>().is_some());
        assert!(sel.downcast_ref::<Constant>().is_none());
    }
}
