//! The partition: every category's abundance-at-age for one model run.
//!
//! A [`Partition`] is built once from the model's category definitions and
//! lives for the whole run. Processes never hold references into it across
//! calls; at build time they resolve a [`PartitionView`], an ordered list of
//! [`CategoryId`]s restricted to the categories they declared, and index
//! the partition through it during execution.
//!
//! Mutation is in place. There is no locking: exactly one process writes
//! at a time and all access happens on the thread that owns the model.

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::category::{Category, CategoryDef};
use crate::error::{ConfigError, ConfigErrors, Location, ObjectKind};
use crate::id::CategoryId;

/// Abundance state of every category, in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct Partition {
    categories: IndexMap<String, Category>,
}

impl Partition {
    /// Allocate one zero-filled category per definition.
    ///
    /// Every definition is checked; all problems (invalid age ranges,
    /// repeated labels) are reported together.
    pub fn new(defs: &[CategoryDef]) -> Result<Self, ConfigErrors> {
        let mut errors = ConfigErrors::new();
        let mut categories = IndexMap::with_capacity(defs.len());
        for def in defs {
            if errors.check(def.validate()).is_none() {
                continue;
            }
            if categories.contains_key(&def.name) {
                errors.push(ConfigError::Duplicate {
                    location: Location::new(ObjectKind::Category, &def.name, "label"),
                    label: def.name.clone(),
                });
                continue;
            }
            categories.insert(def.name.clone(), Category::new(def));
        }
        errors.into_result()?;
        Ok(Self { categories })
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the partition holds no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Resolve a category label to its id.
    pub fn id(&self, name: &str) -> Option<CategoryId> {
        self.categories.get_index_of(name).map(CategoryId)
    }

    /// Category by id.
    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.get_index(id.0).map(|(_, c)| c)
    }

    /// Mutable category by id.
    pub fn category_mut(&mut self, id: CategoryId) -> Option<&mut Category> {
        self.categories.get_index_mut(id.0).map(|(_, c)| c)
    }

    /// Category by label.
    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }

    /// Mutable category by label.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Category> {
        self.categories.get_mut(name)
    }

    /// Categories in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }

    /// Mutable categories in declaration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Category> {
        self.categories.values_mut()
    }

    /// Restrict the partition to `labels`, in the order given.
    ///
    /// `location` identifies the parameter that listed the labels and is
    /// attached to every error. Unknown and repeated labels are both
    /// reported.
    pub fn view(&self, location: &Location, labels: &[String]) -> Result<PartitionView, ConfigErrors> {
        let mut errors = ConfigErrors::new();
        let mut ids: SmallVec<[CategoryId; 4]> = SmallVec::with_capacity(labels.len());
        for label in labels {
            match self.id(label) {
                Some(id) if ids.contains(&id) => errors.push(ConfigError::Duplicate {
                    location: location.clone(),
                    label: label.clone(),
                }),
                Some(id) => ids.push(id),
                None => errors.push(ConfigError::UnknownCategory {
                    location: location.clone(),
                    label: label.clone(),
                }),
            }
        }
        errors.into_result()?;
        Ok(PartitionView { ids })
    }

    /// Sum of abundance over every category and age.
    pub fn total(&self) -> f64 {
        self.categories.values().map(Category::total).sum()
    }

    /// Youngest and oldest age tracked by any category.
    pub fn age_span(&self) -> Option<(u32, u32)> {
        let min = self.categories.values().map(Category::min_age).min()?;
        let max = self.categories.values().map(Category::max_age).max()?;
        Some((min, max))
    }

    /// Zero every abundance value. Used before a fresh run.
    pub fn clear(&mut self) {
        for c in self.categories.values_mut() {
            c.data_mut().fill(0.0);
        }
    }

    /// First `(category, age, value)` holding a negative or non-finite value.
    pub fn first_invalid(&self) -> Option<(CategoryId, u32, f64)> {
        self.categories
            .values()
            .enumerate()
            .find_map(|(i, c)| c.first_invalid().map(|(age, v)| (CategoryId(i), age, v)))
    }
}

/// An ordered subset of a partition's categories.
///
/// Built by [`Partition::view`]. Iteration follows the order in which
/// the owning object listed its categories, which is also the order of
/// any positionally paired parameters (selectivities, rates).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PartitionView {
    ids: SmallVec<[CategoryId; 4]>,
}

impl PartitionView {
    /// Category ids in declaration order.
    pub fn ids(&self) -> &[CategoryId] {
        &self.ids
    }

    /// Iterate over category ids in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = CategoryId> + '_ {
        self.ids.iter().copied()
    }

    /// Number of categories in the view.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the view is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether `id` is part of the view.
    pub fn contains(&self, id: CategoryId) -> bool {
        self.ids.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn defs() -> Vec<CategoryDef> {
        vec![
            CategoryDef::new("male", 1, 3),
            CategoryDef::new("female", 1, 3),
            CategoryDef::new("juvenile", 0, 1),
        ]
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn loc() -> Location {
        Location::new(ObjectKind::Process, "test", "categories")
    }

    #[test]
    fn iteration_follows_declaration_order() {
        let p = Partition::new(&defs()).unwrap();
        let names: Vec<&str> = p.iter().map(Category::name).collect();
        assert_eq!(names, vec!["male", "female", "juvenile"]);
        assert_eq!(p.id("female"), Some(CategoryId(1)));
        assert_eq!(p.age_span(), Some((0, 3)));
    }

    #[test]
    fn duplicate_and_invalid_definitions_all_reported() {
        let mut d = defs();
        d.push(CategoryDef::new("male", 1, 3));
        d.push(CategoryDef::new("broken", 4, 2));
        let errors = Partition::new(&d).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn view_keeps_requested_order() {
        let p = Partition::new(&defs()).unwrap();
        let view = p.view(&loc(), &labels(&["juvenile", "male"])).unwrap();
        assert_eq!(view.ids(), &[CategoryId(2), CategoryId(0)]);
        assert!(view.contains(CategoryId(0)));
        assert!(!view.contains(CategoryId(1)));
    }

    #[test]
    fn view_rejects_unknown_and_repeated_labels() {
        let p = Partition::new(&defs()).unwrap();
        let errors = p
            .view(&loc(), &labels(&["male", "ghost", "male"]))
            .unwrap_err();
        assert_eq!(errors.len(), 2);
        let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        assert!(msgs[0].contains("ghost"), "{msgs:?}");
        assert!(msgs[1].contains("more than once"), "{msgs:?}");
    }

    #[test]
    fn in_place_mutation_through_ids() {
        let mut p = Partition::new(&defs()).unwrap();
        let id = p.id("female").unwrap();
        p.category_mut(id).unwrap().data_mut().fill(10.0);
        assert_eq!(p.get("female").unwrap().total(), 30.0);
        assert_eq!(p.total(), 30.0);

        p.clear();
        assert_eq!(p.total(), 0.0);
    }

    #[test]
    fn first_invalid_reports_location() {
        let mut p = Partition::new(&defs()).unwrap();
        p.get_mut("juvenile").unwrap().set(1, -2.0);
        assert_eq!(p.first_invalid(), Some((CategoryId(2), 1, -2.0)));
    }

    proptest! {
        #[test]
        fn total_is_sum_of_category_totals(values in proptest::collection::vec(0.0f64..1e6, 8)) {
            let mut p = Partition::new(&defs()).unwrap();
            let mut it = values.iter().copied();
            for c in p.iter_mut() {
                for v in c.data_mut() {
                    *v = it.next().unwrap_or(0.0);
                }
            }
            let expected: f64 = values.iter().sum();
            prop_assert!((p.total() - expected).abs() <= 1e-6 * expected.max(1.0));
        }
    }
}
