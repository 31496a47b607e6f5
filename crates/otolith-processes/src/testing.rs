//! Minimal model state for exercising one process at a time.

use otolith_core::{CategoryDef, Partition, Penalty, PenaltyManager, ProcessError, Year};
use otolith_process::{BuildContext, ExecuteContext, ModelSpan, Process};
use otolith_selectivity::{CacheDomain, Selectivity, SelectivityRegistry};

pub(crate) struct Harness {
    pub partition: Partition,
    pub selectivities: SelectivityRegistry,
    pub penalties: PenaltyManager,
    pub span: ModelSpan,
}

impl Harness {
    pub fn new(
        defs: &[CategoryDef],
        selectivities: Vec<Box<dyn Selectivity>>,
        penalties: Vec<Penalty>,
    ) -> Self {
        let partition = Partition::new(defs).unwrap();
        let (min_age, max_age) = partition.age_span().unwrap_or((1, 1));
        let mut selectivities = SelectivityRegistry::new(selectivities).unwrap();
        selectivities.rebuild_all(&CacheDomain::ages(min_age, max_age));
        Self {
            partition,
            selectivities,
            penalties: PenaltyManager::new(penalties).unwrap(),
            span: ModelSpan {
                start_year: Year(1990),
                final_year: Year(2010),
                min_age,
                max_age,
                age_plus: true,
            },
        }
    }

    pub fn set(&mut self, category: &str, values: &[f64]) {
        self.partition
            .get_mut(category)
            .unwrap()
            .data_mut()
            .copy_from_slice(values);
    }

    pub fn values(&self, category: &str) -> Vec<f64> {
        self.partition.get(category).unwrap().data().to_vec()
    }

    pub fn build_ctx(&self) -> BuildContext<'_> {
        BuildContext::new(&self.partition, &self.selectivities, &self.penalties, self.span)
    }

    /// Validate and build, panicking on any configuration error.
    pub fn prepare(&self, process: &mut dyn Process) {
        process.validate().unwrap();
        process.build(&self.build_ctx()).unwrap();
    }

    pub fn run(&mut self, process: &mut dyn Process, year: u32) -> Result<(), ProcessError> {
        let mut ctx = ExecuteContext::new(
            &mut self.partition,
            &self.selectivities,
            &mut self.penalties,
            Year(year),
            "test_step",
        );
        process.execute(&mut ctx)
    }
}
