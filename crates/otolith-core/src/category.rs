//! Category definitions and age-indexed abundance storage.

use std::ops::RangeInclusive;

use crate::error::{ConfigError, Location, ObjectKind};

/// Definition of a category registered in a model.
///
/// Categories are the strata of the population (species, sex, stock).
/// They are declared once at model construction; [`CategoryId`](crate::CategoryId)
/// is the index into the declaration list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryDef {
    /// Unique label, e.g. `"male.immature"`.
    pub name: String,
    /// Youngest age class tracked.
    pub min_age: u32,
    /// Oldest age class tracked (the plus group when the model has one).
    pub max_age: u32,
}

impl CategoryDef {
    /// Define a category covering `min_age..=max_age`.
    pub fn new(name: impl Into<String>, min_age: u32, max_age: u32) -> Self {
        Self {
            name: name.into(),
            min_age,
            max_age,
        }
    }

    /// Number of age classes, or zero for an inverted range.
    pub fn age_count(&self) -> usize {
        if self.max_age < self.min_age {
            0
        } else {
            (self.max_age - self.min_age) as usize + 1
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::invalid(
                Location::new(ObjectKind::Category, "", "name"),
                "category label must not be empty",
            ));
        }
        if self.max_age < self.min_age {
            return Err(ConfigError::invalid(
                Location::new(ObjectKind::Category, &self.name, "max_age"),
                format!(
                    "max_age ({}) cannot be less than min_age ({})",
                    self.max_age, self.min_age
                ),
            ));
        }
        Ok(())
    }
}

/// One stratum of the partition: a dense abundance array indexed by age.
///
/// `data()[i]` holds the abundance of age `min_age + i`. The length is
/// fixed at construction to `max_age - min_age + 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct Category {
    name: String,
    min_age: u32,
    max_age: u32,
    data: Vec<f64>,
}

impl Category {
    /// Allocate a zero-filled category from its definition.
    pub fn new(def: &CategoryDef) -> Self {
        Self {
            name: def.name.clone(),
            min_age: def.min_age,
            max_age: def.max_age,
            data: vec![0.0; def.age_count()],
        }
    }

    /// The category label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Youngest tracked age.
    pub fn min_age(&self) -> u32 {
        self.min_age
    }

    /// Oldest tracked age.
    pub fn max_age(&self) -> u32 {
        self.max_age
    }

    /// The tracked ages, youngest first.
    pub fn ages(&self) -> RangeInclusive<u32> {
        self.min_age..=self.max_age
    }

    /// Number of age classes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the category tracks no ages.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Offset of `age` in [`data()`](Self::data), if tracked.
    pub fn index_of(&self, age: u32) -> Option<usize> {
        if age < self.min_age || age > self.max_age {
            None
        } else {
            Some((age - self.min_age) as usize)
        }
    }

    /// Abundance at `age`, if tracked.
    pub fn get(&self, age: u32) -> Option<f64> {
        self.index_of(age).map(|i| self.data[i])
    }

    /// Overwrite the abundance at `age`. Returns `false` if untracked.
    pub fn set(&mut self, age: u32, value: f64) -> bool {
        match self.index_of(age) {
            Some(i) => {
                self.data[i] = value;
                true
            }
            None => false,
        }
    }

    /// Abundance by age, youngest first.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Mutable abundance by age, youngest first.
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// `(age, abundance)` pairs, youngest first.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.ages().zip(self.data.iter().copied())
    }

    /// Sum of abundance across all ages.
    pub fn total(&self) -> f64 {
        self.data.iter().sum()
    }

    /// First age holding a negative or non-finite value.
    pub fn first_invalid(&self) -> Option<(u32, f64)> {
        self.iter().find(|&(_, v)| !v.is_finite() || v < 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_category_is_zeroed_with_inclusive_length() {
        let c = Category::new(&CategoryDef::new("stock", 1, 3));
        assert_eq!(c.len(), 3);
        assert_eq!(c.data(), &[0.0, 0.0, 0.0]);
        assert_eq!(c.ages().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn age_indexing_is_offset_by_min_age() {
        let mut c = Category::new(&CategoryDef::new("stock", 2, 5));
        assert!(c.set(4, 7.5));
        assert_eq!(c.data()[2], 7.5);
        assert_eq!(c.get(4), Some(7.5));
        assert_eq!(c.get(1), None);
        assert_eq!(c.get(6), None);
        assert!(!c.set(6, 1.0));
    }

    #[test]
    fn total_and_invalid_scan() {
        let mut c = Category::new(&CategoryDef::new("stock", 1, 3));
        c.data_mut().copy_from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(c.total(), 6.0);
        assert_eq!(c.first_invalid(), None);

        c.data_mut()[1] = -0.5;
        assert_eq!(c.first_invalid(), Some((2, -0.5)));

        c.data_mut()[1] = f64::NAN;
        let (age, v) = c.first_invalid().unwrap();
        assert_eq!(age, 2);
        assert!(v.is_nan());
    }

    #[test]
    fn def_validation() {
        assert!(CategoryDef::new("ok", 1, 1).validate().is_ok());
        let err = CategoryDef::new("bad", 5, 2).validate().unwrap_err();
        assert_eq!(err.location().to_string(), "category[bad].max_age");
        assert!(CategoryDef::new("", 1, 2).validate().is_err());
        assert_eq!(CategoryDef::new("bad", 5, 2).age_count(), 0);
    }
}
