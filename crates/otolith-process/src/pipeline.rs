//! Batch validation and build of process slots.
//!
//! Model construction wants every configuration problem at once, so these
//! helpers keep going after a failing process and return the combined
//! [`ConfigErrors`]. An out-of-order call is still reported immediately.

use indexmap::IndexSet;
use otolith_core::{ConfigError, ConfigErrors, Location, ObjectKind};

use crate::context::BuildContext;
use crate::lifecycle::{ProcessSlot, SlotError};

/// Reject duplicate labels among `slots`, one error per repeat.
///
/// Labels share one namespace across every group passed in; each repeat
/// is reported under the kind it was declared with.
pub fn check_labels<'a>(
    slots: impl IntoIterator<Item = (&'a ProcessSlot, ObjectKind)>,
) -> Result<(), ConfigErrors> {
    let mut seen = IndexSet::new();
    let mut errors = ConfigErrors::new();
    for (slot, kind) in slots {
        if !seen.insert(slot.label()) {
            errors.push(ConfigError::Duplicate {
                location: Location::new(kind, slot.label(), "label"),
                label: slot.label().to_string(),
            });
        }
    }
    errors.into_result()
}

/// Validate every slot, collecting configuration errors.
pub fn validate_all(slots: &mut [ProcessSlot]) -> Result<(), SlotError> {
    let mut errors = ConfigErrors::new();
    for slot in slots.iter_mut() {
        match slot.validate() {
            Ok(()) => {}
            Err(SlotError::Config(e)) => errors.append(e),
            Err(other) => return Err(other),
        }
    }
    errors.into_result().map_err(SlotError::from)
}

/// Build every slot against `ctx`, collecting configuration errors.
pub fn build_all(slots: &mut [ProcessSlot], ctx: &BuildContext<'_>) -> Result<(), SlotError> {
    let mut errors = ConfigErrors::new();
    for slot in slots.iter_mut() {
        match slot.build(ctx) {
            Ok(()) => {
                tracing::debug!(process = slot.label(), kind = %slot.process().kind(), "built");
            }
            Err(SlotError::Config(e)) => errors.append(e),
            Err(other) => return Err(other),
        }
    }
    errors.into_result().map_err(SlotError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ExecuteContext, ModelSpan};
    use crate::lifecycle::LifecycleState;
    use crate::process::Process;
    use otolith_core::{
        CategoryDef, ObjectKind, Partition, PenaltyManager, ProcessError, Year,
    };
    use otolith_selectivity::SelectivityRegistry;

    /// Fails validation when `bad_validate` is set and fails build by
    /// referring to a missing selectivity when `bad_build` is set.
    struct Stub {
        label: String,
        bad_validate: bool,
        bad_build: bool,
    }

    impl Stub {
        fn boxed(label: &str, bad_validate: bool, bad_build: bool) -> ProcessSlot {
            ProcessSlot::new(Box::new(Self {
                label: label.to_string(),
                bad_validate,
                bad_build,
            }))
        }

        fn location(&self, parameter: &str) -> Location {
            Location::new(ObjectKind::Process, &self.label, parameter)
        }
    }

    impl Process for Stub {
        fn label(&self) -> &str {
            &self.label
        }
        fn validate(&mut self) -> Result<(), ConfigErrors> {
            if self.bad_validate {
                return Err(ConfigError::invalid(self.location("x"), "bad").into());
            }
            Ok(())
        }
        fn build(&mut self, ctx: &BuildContext<'_>) -> Result<(), ConfigErrors> {
            if self.bad_build {
                ctx.selectivity(&self.location("selectivity"), "missing")?;
            }
            Ok(())
        }
        fn execute(&mut self, _ctx: &mut ExecuteContext<'_>) -> Result<(), ProcessError> {
            Ok(())
        }
    }

    #[test]
    fn duplicate_labels_each_reported() {
        let slots = vec![
            Stub::boxed("a", false, false),
            Stub::boxed("b", false, false),
            Stub::boxed("a", false, false),
            Stub::boxed("a", false, false),
        ];
        let errors = check_labels(slots.iter().map(|s| (s, ObjectKind::Process))).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn labels_shared_across_groups() {
        let phases = vec![Stub::boxed("init", false, false)];
        let processes = vec![
            Stub::boxed("fishing", false, false),
            Stub::boxed("init", false, false),
        ];
        let groups = phases
            .iter()
            .map(|s| (s, ObjectKind::InitialisationPhase))
            .chain(processes.iter().map(|s| (s, ObjectKind::Process)));
        let errors = check_labels(groups).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.iter().next().unwrap().location().to_string(),
            "process[init].label"
        );
    }

    #[test]
    fn validate_all_collects_every_failure() {
        let mut slots = vec![
            Stub::boxed("a", true, false),
            Stub::boxed("b", false, false),
            Stub::boxed("c", true, false),
        ];
        match validate_all(&mut slots) {
            Err(SlotError::Config(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected config errors, got {other:?}"),
        }
        assert_eq!(slots[1].state(), LifecycleState::Validated);
        assert_eq!(slots[0].state(), LifecycleState::Created);
    }

    #[test]
    fn build_all_reports_unresolved_references() {
        let partition = Partition::new(&[CategoryDef::new("all", 1, 2)]).unwrap();
        let selectivities = SelectivityRegistry::default();
        let penalties = PenaltyManager::default();
        let ctx = BuildContext::new(
            &partition,
            &selectivities,
            &penalties,
            ModelSpan {
                start_year: Year(1),
                final_year: Year(2),
                min_age: 1,
                max_age: 2,
                age_plus: false,
            },
        );

        let mut slots = vec![Stub::boxed("a", false, true), Stub::boxed("b", false, false)];
        validate_all(&mut slots).unwrap();
        match build_all(&mut slots, &ctx) {
            Err(SlotError::Config(errors)) => {
                let e = errors.iter().next().unwrap();
                assert_eq!(e.location().to_string(), "process[a].selectivity");
                assert!(e.to_string().contains("missing"));
            }
            other => panic!("expected config errors, got {other:?}"),
        }
        assert_eq!(slots[1].state(), LifecycleState::Built);
    }
}
