//! Per-process working storage.
//!
//! Processes that need intermediate per-age values (for example the
//! vulnerable abundance of each category and age) keep an [`AgeWorkspace`]
//! shaped once at build time and zeroed at the start of every execution,
//! so nothing leaks between years and nothing is allocated per call.

/// One row of per-age values for each category a process covers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AgeWorkspace {
    rows: Vec<Vec<f64>>,
}

impl AgeWorkspace {
    /// An empty workspace. Call [`shape`](Self::shape) before use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate one zeroed row per entry of `lengths`, replacing any
    /// previous shape.
    pub fn shape(&mut self, lengths: impl IntoIterator<Item = usize>) {
        self.rows = lengths.into_iter().map(|n| vec![0.0; n]).collect();
    }

    /// Zero every value, keeping the shape.
    pub fn reset(&mut self) {
        for row in &mut self.rows {
            row.fill(0.0);
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// Row `i`, if it exists.
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        self.rows.get(i).map(Vec::as_slice)
    }

    /// Row `i` mutably, if it exists.
    pub fn row_mut(&mut self, i: usize) -> Option<&mut [f64]> {
        self.rows.get_mut(i).map(Vec::as_mut_slice)
    }

    /// Sum over every row.
    pub fn total(&self) -> f64 {
        self.rows.iter().flatten().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_and_reset() {
        let mut w = AgeWorkspace::new();
        assert_eq!(w.rows(), 0);
        w.shape([3, 2]);
        assert_eq!(w.rows(), 2);
        assert_eq!(w.row(0).unwrap().len(), 3);
        assert_eq!(w.row(1).unwrap().len(), 2);
        assert!(w.row(2).is_none());

        w.row_mut(0).unwrap()[1] = 4.0;
        w.row_mut(1).unwrap()[0] = 1.5;
        assert_eq!(w.total(), 5.5);

        w.reset();
        assert_eq!(w.total(), 0.0);
        assert_eq!(w.row(0).unwrap(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn reshape_replaces_rows() {
        let mut w = AgeWorkspace::new();
        w.shape([4]);
        w.row_mut(0).unwrap().fill(1.0);
        w.shape([1, 1, 1]);
        assert_eq!(w.rows(), 3);
        assert_eq!(w.total(), 0.0);
    }
}
