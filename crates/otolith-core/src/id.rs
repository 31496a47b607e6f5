//! Strongly-typed identifiers.
//!
//! Registry identifiers are positions in their owning registry, assigned
//! in declaration order when the model is built. They are only meaningful
//! for the registry that issued them.

use std::fmt;

/// A simulated model year.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Year(pub u32);

impl Year {
    /// The year after this one, `None` past `u32::MAX`.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Year {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a category within a [`Partition`](crate::Partition).
///
/// `CategoryId(n)` is the n-th category in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryId(pub usize);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a selectivity within a selectivity registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelectivityId(pub usize);

impl fmt::Display for SelectivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a penalty definition within a [`PenaltyManager`](crate::PenaltyManager).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PenaltyId(pub usize);

impl fmt::Display for PenaltyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a time step within the annual cycle.
///
/// `TimeStepId(0)` is the first time step of every year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeStepId(pub usize);

impl fmt::Display for TimeStepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a registered observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub usize);

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_ordering_and_next() {
        let y = Year(1990);
        assert_eq!(y.next(), Some(Year(1991)));
        assert_eq!(Year(u32::MAX).next(), None);
        assert!(Year(1990) < Year(1991));
        assert_eq!(Year::from(2001).to_string(), "2001");
    }

    #[test]
    fn ids_display_their_index() {
        assert_eq!(CategoryId(3).to_string(), "3");
        assert_eq!(SelectivityId(0).to_string(), "0");
        assert_eq!(TimeStepId(2).to_string(), "2");
    }
}
