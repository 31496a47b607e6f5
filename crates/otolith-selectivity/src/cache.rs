//! Precomputed selectivity results.
//!
//! [`ResultCache`] holds one value per age of a [`CacheDomain`] and one per
//! length bin. It is a plain table: it never looks at the parameters that
//! produced it, so a stale cache stays stale until it is rebuilt.

/// The ages and length bins a cache covers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CacheDomain {
    /// Youngest age.
    pub min_age: u32,
    /// Oldest age.
    pub max_age: u32,
    /// Length value of each model length bin (e.g. bin midpoints).
    pub length_bins: Vec<f64>,
}

impl CacheDomain {
    /// A domain over `min_age..=max_age` with no length bins.
    pub fn ages(min_age: u32, max_age: u32) -> Self {
        Self {
            min_age,
            max_age,
            length_bins: Vec::new(),
        }
    }

    /// Attach length bins.
    pub fn with_length_bins(mut self, length_bins: Vec<f64>) -> Self {
        self.length_bins = length_bins;
        self
    }

    /// Number of ages covered.
    pub fn age_count(&self) -> usize {
        if self.max_age < self.min_age {
            0
        } else {
            (self.max_age - self.min_age) as usize + 1
        }
    }
}

/// Cached age and length-bin results of one selectivity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultCache {
    min_age: u32,
    ages: Vec<f64>,
    lengths: Vec<f64>,
}

impl ResultCache {
    /// Evaluate one curve over every age and every length bin.
    pub fn build(domain: &CacheDomain, curve: impl Fn(f64) -> f64) -> Self {
        Self::build_with(domain, |age| curve(f64::from(age)), |_, length| curve(length))
    }

    /// Evaluate separate age and length-bin functions.
    ///
    /// `length_fn` receives the bin index and the bin's length value.
    pub fn build_with(
        domain: &CacheDomain,
        age_fn: impl Fn(u32) -> f64,
        length_fn: impl Fn(usize, f64) -> f64,
    ) -> Self {
        let ages = (0..domain.age_count())
            .map(|i| age_fn(domain.min_age + i as u32))
            .collect();
        let lengths = domain
            .length_bins
            .iter()
            .enumerate()
            .map(|(i, &l)| length_fn(i, l))
            .collect();
        Self {
            min_age: domain.min_age,
            ages,
            lengths,
        }
    }

    /// Cached value at `age`, `0.0` outside the domain.
    #[inline]
    pub fn age(&self, age: u32) -> f64 {
        age.checked_sub(self.min_age)
            .and_then(|i| self.ages.get(i as usize))
            .copied()
            .unwrap_or(0.0)
    }

    /// Cached value at `length_bin`, `0.0` outside the domain.
    #[inline]
    pub fn length(&self, length_bin: usize) -> f64 {
        self.lengths.get(length_bin).copied().unwrap_or(0.0)
    }

    /// Whether the cache has been built over a non-empty domain.
    pub fn is_built(&self) -> bool {
        !self.ages.is_empty() || !self.lengths.is_empty()
    }
}
