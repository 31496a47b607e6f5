//! Integration test: model construction reports every configuration
//! problem of a stage at once.

use otolith_core::{ConfigError, ObjectKind};
use otolith_engine::{Model, ProportionsAtAge, TimeStepDef};
use otolith_processes::{MortalityEvent, MortalityEventConfig};
use otolith_process::Process;
use otolith_selectivity::{Logistic, Selectivity};
use otolith_test_utils::{single_category, AddConstant, EventLog, RecordingObserver};

fn locations(errors: &otolith_core::ConfigErrors) -> Vec<String> {
    errors.iter().map(|e| e.location().to_string()).collect()
}

#[test]
fn validation_problems_collected_across_objects() {
    let mut config = single_category(2000, 2005, 1, 5);
    let selectivities: Vec<Box<dyn Selectivity>> = vec![Box::new(Logistic::new("bad", 3.0, 0.0))];
    config.selectivities = selectivities;
    config.processes = vec![Box::new(MortalityEvent::new(MortalityEventConfig {
        label: "fishing".into(),
        categories: vec!["stock".into()],
        selectivities: vec!["bad".into()],
        years: vec![2000, 2001],
        catches: vec![10.0],
        ..Default::default()
    }))];
    config.observers = vec![Box::new(ProportionsAtAge::new(
        "paa",
        "annual",
        vec![2010],
        &["stock"],
        1,
        5,
    ))];

    let errors = Model::new(config).unwrap_err();
    let found = locations(&errors);
    assert_eq!(errors.len(), 3, "{errors}");
    assert!(found.contains(&"selectivity[bad].ato95".to_string()));
    assert!(found.contains(&"process[fishing].catches".to_string()));
    assert!(found.contains(&"observer[paa].years".to_string()));
}

#[test]
fn unresolved_references_collected_across_objects() {
    let mut config = single_category(2000, 2005, 1, 5);
    config.processes = vec![
        Box::new(MortalityEvent::new(MortalityEventConfig {
            label: "fishing".into(),
            categories: vec!["stock".into()],
            selectivities: vec!["missing".into()],
            years: vec![2000],
            catches: vec![10.0],
            ..Default::default()
        })),
        Box::new(AddConstant::new("stocking", "juvenile", 1.0)),
    ];
    config.time_steps = vec![TimeStepDef::new("annual", &["fishing", "stocking"])];
    config.observers = vec![Box::new(RecordingObserver::new(
        "obs",
        "spring",
        vec![2000],
        EventLog::new(),
    ))];

    let errors = Model::new(config).unwrap_err();
    assert_eq!(errors.len(), 3, "{errors}");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnresolvedReference { kind: ObjectKind::Selectivity, label, .. } if label == "missing"
    )));
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownCategory { label, .. } if label == "juvenile"
    )));
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnresolvedReference { kind: ObjectKind::TimeStep, label, .. } if label == "spring"
    )));
}

#[test]
fn unknown_time_step_process_rejected() {
    let mut config = single_category(2000, 2001, 1, 3);
    config.time_steps = vec![TimeStepDef::new("annual", &["nope"])];
    let errors = Model::new(config).unwrap_err();
    assert!(matches!(
        errors.iter().next(),
        Some(ConfigError::UnresolvedReference { kind: ObjectKind::Process, label, .. }) if label == "nope"
    ));
}

#[test]
fn duplicate_labels_rejected() {
    let mut config = single_category(2000, 2001, 1, 3);
    let processes: Vec<Box<dyn Process>> = vec![
        Box::new(AddConstant::new("stocking", "stock", 1.0)),
        Box::new(AddConstant::new("stocking", "stock", 2.0)),
    ];
    config.processes = processes;
    config.observers = vec![
        Box::new(RecordingObserver::new("obs", "annual", vec![2000], EventLog::new())),
        Box::new(RecordingObserver::new("obs", "annual", vec![2001], EventLog::new())),
    ];
    let errors = Model::new(config).unwrap_err();
    assert_eq!(
        locations(&errors),
        vec!["process[stocking].label", "observer[obs].label"]
    );
}

#[test]
fn structural_errors_reported_with_object_errors() {
    let mut config = single_category(2005, 2000, 1, 3);
    config.time_steps.push(TimeStepDef::new("annual", &[]));
    let selectivities: Vec<Box<dyn Selectivity>> = vec![Box::new(Logistic::new("bad", 3.0, -1.0))];
    config.selectivities = selectivities;
    let errors = Model::new(config).unwrap_err();
    assert_eq!(
        locations(&errors),
        vec![
            "model[model].final_year",
            "time_step[annual].label",
            "selectivity[bad].ato95",
        ]
    );
}

#[test]
fn unused_process_is_allowed() {
    let mut config = single_category(2000, 2001, 1, 3);
    config.processes = vec![Box::new(AddConstant::new("stocking", "stock", 1.0))];
    let mut model = Model::new(config).unwrap();
    model.run().unwrap();
    assert_eq!(model.partition().total(), 0.0);
}

#[test]
fn phase_and_process_cannot_share_a_label() {
    let mut config = single_category(2000, 2001, 1, 3);
    config.initialisation_phases = vec![Box::new(AddConstant::new("seed", "stock", 1.0))];
    config.processes = vec![Box::new(AddConstant::new("seed", "stock", 2.0))];
    config.time_steps = vec![TimeStepDef::new("annual", &["seed"])];

    let errors = Model::new(config).unwrap_err();
    assert_eq!(errors.len(), 1, "{errors}");
    match errors.iter().next().unwrap() {
        ConfigError::Duplicate { location, label } => {
            assert_eq!(label, "seed");
            assert_eq!(location.kind, ObjectKind::Process);
        }
        other => panic!("expected duplicate label, got {other:?}"),
    }
}
