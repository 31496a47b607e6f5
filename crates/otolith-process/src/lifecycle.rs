//! Lifecycle enforcement for processes.
//!
//! ```text
//! Created ──validate──▶ Validated ──build──▶ Built ──execute──▶ Executing ──finish──▶ Done
//!                                              ▲                    │  ▲                │
//!                                              │                    └──┘ execute        │
//!                                              └────────────── restart ─────────────────┘
//! ```
//!
//! A failed `validate` or `build` leaves the slot where it was.

use std::fmt;

use otolith_core::{ConfigErrors, ProcessError};
use thiserror::Error;

use crate::context::{BuildContext, ExecuteContext};
use crate::process::Process;

/// Where a process is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Constructed, not yet validated.
    Created,
    /// Configuration checked.
    Validated,
    /// References resolved; ready to execute.
    Built,
    /// Executed at least once in the current run.
    Executing,
    /// Run finished.
    Done,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::Validated => "validated",
            Self::Built => "built",
            Self::Executing => "executing",
            Self::Done => "done",
        };
        f.write_str(s)
    }
}

/// Lifecycle operation requested of a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// `validate()`.
    Validate,
    /// `build()`.
    Build,
    /// `execute()`.
    Execute,
    /// `finish()`.
    Finish,
    /// `restart()`.
    Restart,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Validate => "validate",
            Self::Build => "build",
            Self::Execute => "execute",
            Self::Finish => "finish",
            Self::Restart => "restart",
        };
        f.write_str(s)
    }
}

/// An operation was requested in a state that does not allow it.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("cannot {attempted} process '{label}' while it is {state}")]
pub struct LifecycleError {
    /// Label of the process.
    pub label: String,
    /// State the slot was in.
    pub state: LifecycleState,
    /// What was attempted.
    pub attempted: Operation,
}

/// Failure of a slot operation.
#[derive(Debug, Error)]
pub enum SlotError {
    /// Out-of-order call.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    /// Validation or build rejected the configuration.
    #[error(transparent)]
    Config(#[from] ConfigErrors),
    /// Execution failed.
    #[error(transparent)]
    Process(#[from] ProcessError),
}

/// A process together with its lifecycle state.
pub struct ProcessSlot {
    process: Box<dyn Process>,
    state: LifecycleState,
}

impl ProcessSlot {
    /// Wrap a freshly constructed process.
    pub fn new(process: Box<dyn Process>) -> Self {
        Self {
            process,
            state: LifecycleState::Created,
        }
    }

    /// Label of the wrapped process.
    pub fn label(&self) -> &str {
        self.process.label()
    }

    /// Current state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// The wrapped process.
    pub fn process(&self) -> &dyn Process {
        self.process.as_ref()
    }

    /// The wrapped process, mutably. Lifecycle is not tracked for calls
    /// made through this reference.
    pub fn process_mut(&mut self) -> &mut dyn Process {
        self.process.as_mut()
    }

    fn expect_state(&self, allowed: &[LifecycleState], attempted: Operation) -> Result<(), LifecycleError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(LifecycleError {
                label: self.label().to_string(),
                state: self.state,
                attempted,
            })
        }
    }

    /// `Created → Validated`.
    pub fn validate(&mut self) -> Result<(), SlotError> {
        self.expect_state(&[LifecycleState::Created], Operation::Validate)?;
        self.process.validate()?;
        self.state = LifecycleState::Validated;
        Ok(())
    }

    /// `Validated → Built`.
    pub fn build(&mut self, ctx: &BuildContext<'_>) -> Result<(), SlotError> {
        self.expect_state(&[LifecycleState::Validated], Operation::Build)?;
        self.process.build(ctx)?;
        self.state = LifecycleState::Built;
        Ok(())
    }

    /// `Built | Executing → Executing`.
    pub fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), SlotError> {
        self.expect_state(
            &[LifecycleState::Built, LifecycleState::Executing],
            Operation::Execute,
        )?;
        self.state = LifecycleState::Executing;
        self.process.execute(ctx)?;
        Ok(())
    }

    /// `Built | Executing → Done`.
    pub fn finish(&mut self) -> Result<(), LifecycleError> {
        self.expect_state(
            &[LifecycleState::Built, LifecycleState::Executing],
            Operation::Finish,
        )?;
        self.state = LifecycleState::Done;
        Ok(())
    }

    /// `Built | Executing | Done → Built`, ready for another run.
    pub fn restart(&mut self) -> Result<(), LifecycleError> {
        self.expect_state(
            &[
                LifecycleState::Built,
                LifecycleState::Executing,
                LifecycleState::Done,
            ],
            Operation::Restart,
        )?;
        self.state = LifecycleState::Built;
        Ok(())
    }
}

impl fmt::Debug for ProcessSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessSlot")
            .field("label", &self.label())
            .field("kind", &self.process.kind())
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ModelSpan;
    use otolith_core::{
        CategoryDef, ConfigError, Location, ObjectKind, Partition, PenaltyManager, Year,
    };
    use otolith_selectivity::SelectivityRegistry;
    use proptest::prelude::*;

    struct Counter {
        valid: bool,
        runs: usize,
    }

    impl Process for Counter {
        fn label(&self) -> &str {
            "counter"
        }
        fn validate(&mut self) -> Result<(), ConfigErrors> {
            if self.valid {
                Ok(())
            } else {
                Err(ConfigError::invalid(
                    Location::new(ObjectKind::Process, "counter", "valid"),
                    "not valid",
                )
                .into())
            }
        }
        fn build(&mut self, _ctx: &BuildContext<'_>) -> Result<(), ConfigErrors> {
            Ok(())
        }
        fn execute(&mut self, _ctx: &mut ExecuteContext<'_>) -> Result<(), ProcessError> {
            self.runs += 1;
            Ok(())
        }
    }

    struct World {
        partition: Partition,
        selectivities: SelectivityRegistry,
        penalties: PenaltyManager,
    }

    impl World {
        fn new() -> Self {
            Self {
                partition: Partition::new(&[CategoryDef::new("all", 1, 2)]).unwrap(),
                selectivities: SelectivityRegistry::default(),
                penalties: PenaltyManager::default(),
            }
        }

        fn build_ctx(&self) -> BuildContext<'_> {
            BuildContext::new(
                &self.partition,
                &self.selectivities,
                &self.penalties,
                ModelSpan {
                    start_year: Year(2000),
                    final_year: Year(2001),
                    min_age: 1,
                    max_age: 2,
                    age_plus: false,
                },
            )
        }

        fn execute(&mut self, slot: &mut ProcessSlot) -> Result<(), SlotError> {
            let mut ctx = ExecuteContext::new(
                &mut self.partition,
                &self.selectivities,
                &mut self.penalties,
                Year(2000),
                "step",
            );
            slot.execute(&mut ctx)
        }
    }

    fn slot(valid: bool) -> ProcessSlot {
        ProcessSlot::new(Box::new(Counter { valid, runs: 0 }))
    }

    #[test]
    fn full_lifecycle() {
        let mut world = World::new();
        let mut s = slot(true);
        assert_eq!(s.state(), LifecycleState::Created);
        s.validate().unwrap();
        s.build(&world.build_ctx()).unwrap();
        assert_eq!(s.state(), LifecycleState::Built);
        world.execute(&mut s).unwrap();
        world.execute(&mut s).unwrap();
        assert_eq!(s.state(), LifecycleState::Executing);
        s.finish().unwrap();
        assert_eq!(s.state(), LifecycleState::Done);
        assert_eq!(s.process().downcast_ref::<Counter>().unwrap().runs, 2);
    }

    #[test]
    fn execute_before_build_is_lifecycle_error() {
        let mut world = World::new();
        let mut s = slot(true);
        s.validate().unwrap();
        match world.execute(&mut s) {
            Err(SlotError::Lifecycle(e)) => {
                assert_eq!(e.state, LifecycleState::Validated);
                assert_eq!(e.attempted, Operation::Execute);
                assert_eq!(
                    e.to_string(),
                    "cannot execute process 'counter' while it is validated"
                );
            }
            other => panic!("expected lifecycle error, got {other:?}"),
        }
    }

    #[test]
    fn build_before_validate_is_lifecycle_error() {
        let world = World::new();
        let mut s = slot(true);
        assert!(matches!(
            s.build(&world.build_ctx()),
            Err(SlotError::Lifecycle(_))
        ));
    }

    #[test]
    fn failed_validation_stays_created() {
        let mut s = slot(false);
        assert!(matches!(s.validate(), Err(SlotError::Config(_))));
        assert_eq!(s.state(), LifecycleState::Created);
    }

    #[test]
    fn execute_after_done_rejected_until_restart() {
        let mut world = World::new();
        let mut s = slot(true);
        s.validate().unwrap();
        s.build(&world.build_ctx()).unwrap();
        s.finish().unwrap();
        assert!(matches!(world.execute(&mut s), Err(SlotError::Lifecycle(_))));
        s.restart().unwrap();
        world.execute(&mut s).unwrap();
        assert!(s.validate().is_err());
    }

    // ── Property tests ─────────────────────────────────────────

    fn operation() -> impl Strategy<Value = Operation> {
        prop_oneof![
            Just(Operation::Validate),
            Just(Operation::Build),
            Just(Operation::Execute),
            Just(Operation::Finish),
            Just(Operation::Restart),
        ]
    }

    fn next_state(state: LifecycleState, op: Operation) -> Option<LifecycleState> {
        use LifecycleState::*;
        match (op, state) {
            (Operation::Validate, Created) => Some(Validated),
            (Operation::Build, Validated) => Some(Built),
            (Operation::Execute, Built | Executing) => Some(Executing),
            (Operation::Finish, Built | Executing) => Some(Done),
            (Operation::Restart, Built | Executing | Done) => Some(Built),
            _ => None,
        }
    }

    proptest! {
        #[test]
        fn only_listed_transitions_are_allowed(
            ops in prop::collection::vec(operation(), 0..40),
        ) {
            let mut world = World::new();
            let mut s = slot(true);
            let mut executed = 0usize;
            for op in ops {
                let before = s.state();
                let result = match op {
                    Operation::Validate => s.validate(),
                    Operation::Build => {
                        let ctx = world.build_ctx();
                        s.build(&ctx)
                    }
                    Operation::Execute => world.execute(&mut s),
                    Operation::Finish => s.finish().map_err(SlotError::from),
                    Operation::Restart => s.restart().map_err(SlotError::from),
                };
                match next_state(before, op) {
                    Some(expected) => {
                        prop_assert!(result.is_ok(), "{op} from {before}: {result:?}");
                        prop_assert_eq!(s.state(), expected);
                        if op == Operation::Execute {
                            executed += 1;
                        }
                    }
                    None => {
                        match result {
                            Err(SlotError::Lifecycle(e)) => {
                                prop_assert_eq!(e.state, before);
                                prop_assert_eq!(e.attempted, op);
                            }
                            other => prop_assert!(false, "{op} from {before}: {other:?}"),
                        }
                        prop_assert_eq!(s.state(), before);
                    }
                }
            }
            let runs = s.process().downcast_ref::<Counter>().map(|c| c.runs);
            prop_assert_eq!(runs, Some(executed));
        }
    }
}
