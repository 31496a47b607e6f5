//! Per-year and per-run metrics returned by [`Model::run`](crate::Model::run).

use otolith_core::{PenaltyEvent, Year};

/// What happened during one modelled year.
///
/// Durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct YearMetrics {
    /// The year.
    pub year: Year,
    /// Per-execution process times: `(label, microseconds)`, in execution
    /// order. A process scheduled in several steps appears once per step.
    pub process_us: Vec<(String, u64)>,
    /// Partition total after the last time step.
    pub total_abundance: f64,
    /// Penalty events raised during the year.
    pub penalties_triggered: usize,
}

/// Outcome of one complete run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    /// One entry per modelled year, in order.
    pub years: Vec<YearMetrics>,
    /// Every penalty event raised during the run.
    pub penalty_events: Vec<PenaltyEvent>,
    /// Sum of the event scores.
    pub total_penalty: f64,
    /// Time spent in initialisation phases, in microseconds.
    pub initialisation_us: u64,
    /// Wall-clock time for the whole run, in microseconds.
    pub elapsed_us: u64,
}

impl RunSummary {
    /// Metrics for `year`, if it was modelled.
    pub fn year(&self, year: Year) -> Option<&YearMetrics> {
        self.years.iter().find(|m| m.year == year)
    }

    /// Total microseconds spent in `process` across the run.
    pub fn process_total_us(&self, process: &str) -> u64 {
        self.years
            .iter()
            .flat_map(|m| m.process_us.iter())
            .filter(|(label, _)| label == process)
            .map(|(_, us)| us)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_summary_is_empty() {
        let s = RunSummary::default();
        assert!(s.years.is_empty());
        assert!(s.penalty_events.is_empty());
        assert_eq!(s.total_penalty, 0.0);
        assert_eq!(s.elapsed_us, 0);
    }

    #[test]
    fn process_totals_sum_across_years() {
        let s = RunSummary {
            years: vec![
                YearMetrics {
                    year: Year(2000),
                    process_us: vec![("fishing".into(), 5), ("ageing".into(), 1)],
                    ..Default::default()
                },
                YearMetrics {
                    year: Year(2001),
                    process_us: vec![("fishing".into(), 7)],
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(s.process_total_us("fishing"), 12);
        assert_eq!(s.process_total_us("ageing"), 1);
        assert_eq!(s.year(Year(2001)).map(|m| m.process_us.len()), Some(1));
        assert!(s.year(Year(1999)).is_none());
    }
}
