//! Otolith quickstart: a two-sex fishery from an initial state table.
//!
//! Demonstrates:
//!   1. Declaring categories, selectivities and a penalty
//!   2. Seeding the partition with an initialisation table
//!   3. An annual cycle of recruitment, natural mortality, fishing and ageing
//!   4. Observing proportions at age and reading the run summary
//!   5. Re-running after changing a selectivity parameter
//!
//! Run with:
//!   RUST_LOG=otolith_engine=debug,otolith_processes=debug cargo run --example quickstart

use otolith_core::{CategoryDef, Penalty, Year};
use otolith_engine::{Model, ModelConfig, ProportionsAtAge, TimeStepDef, TimeVaryingDef};
use otolith_processes::{
    Ageing, MortalityConstantRate, MortalityConstantRateConfig, MortalityEvent,
    MortalityEventConfig, RecruitmentConstant, RecruitmentConstantConfig, StateCategoryByAge,
    StateCategoryByAgeConfig,
};
use otolith_selectivity::{Constant, DoubleNormal, Logistic, Selectivity};
use tracing_subscriber::EnvFilter;

// ─── Model dimensions ───────────────────────────────────────────

const START_YEAR: u32 = 1990;
const FINAL_YEAR: u32 = 2010;
const MIN_AGE: u32 = 1;
const MAX_AGE: u32 = 12;
const SEXES: [&str; 2] = ["male", "female"];

fn initial_table() -> Vec<Vec<String>> {
    SEXES
        .iter()
        .map(|sex| {
            let mut row = vec![sex.to_string()];
            row.extend((MIN_AGE..=MAX_AGE).map(|age| format!("{:.1}", 500.0 * (-0.2 * f64::from(age)).exp())));
            row
        })
        .collect()
}

fn config() -> ModelConfig {
    let sexes: Vec<String> = SEXES.iter().map(|s| s.to_string()).collect();
    let mut config = ModelConfig::new(START_YEAR, FINAL_YEAR, MIN_AGE, MAX_AGE);
    config.categories = SEXES.iter().map(|s| CategoryDef::new(*s, MIN_AGE, MAX_AGE)).collect();

    let selectivities: Vec<Box<dyn Selectivity>> = vec![
        Box::new(Constant::new("one", 1.0)),
        Box::new(Logistic::new("trawl_male", 4.0, 2.0)),
        Box::new(DoubleNormal::new("trawl_female", 6.0, 2.0, 4.0)),
    ];
    config.selectivities = selectivities;
    config.penalties = vec![Penalty::new("catch_must_be_taken")];

    config.initialisation_phases = vec![Box::new(StateCategoryByAge::new(StateCategoryByAgeConfig {
        label: "initial_state".into(),
        categories: sexes.clone(),
        min_age: MIN_AGE,
        max_age: MAX_AGE,
        table: initial_table(),
    }))];

    config.processes = vec![
        Box::new(RecruitmentConstant::new(RecruitmentConstantConfig {
            label: "recruitment".into(),
            categories: sexes.clone(),
            proportions: vec![0.5, 0.5],
            r0: 400.0,
            age: MIN_AGE,
        })),
        Box::new(MortalityConstantRate::new(MortalityConstantRateConfig {
            label: "natural_mortality".into(),
            categories: sexes.clone(),
            selectivities: vec!["one".into(), "one".into()],
            m: vec![0.2],
            ..Default::default()
        })),
        Box::new(MortalityEvent::new(MortalityEventConfig {
            label: "fishing".into(),
            categories: sexes.clone(),
            selectivities: vec!["trawl_male".into(), "trawl_female".into()],
            years: (START_YEAR..=FINAL_YEAR).collect(),
            catches: (START_YEAR..=FINAL_YEAR)
                .map(|y| 150.0 + 10.0 * f64::from(y - START_YEAR))
                .collect(),
            penalty: Some("catch_must_be_taken".into()),
            ..Default::default()
        })),
        Box::new(Ageing::new("ageing", sexes)),
    ];
    config.time_steps = vec![
        TimeStepDef::new("spawning", &["recruitment", "natural_mortality"]),
        TimeStepDef::new("fishing_season", &["fishing", "ageing"]),
    ];

    // A gear change in the last five years.
    config.time_varying = vec![TimeVaryingDef::new(
        "mesh_change",
        "trawl_male",
        "a50",
        (2006..=FINAL_YEAR).collect(),
        vec![5.0; 5],
    )];
    config.observers = vec![Box::new(ProportionsAtAge::new(
        "survey_paa",
        "spawning",
        vec![1995, 2000, 2005, 2010],
        &SEXES,
        MIN_AGE,
        MAX_AGE,
    ))];
    config
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut model = Model::new(config())?;
    let summary = model.run()?;

    println!("year  total     penalties");
    for year in &summary.years {
        println!(
            "{:<5} {:>9.1} {:>3}",
            year.year, year.total_abundance, year.penalties_triggered
        );
    }
    println!(
        "penalty events: {}, total penalty: {:.3}, run time: {} us",
        summary.penalty_events.len(),
        summary.total_penalty,
        summary.elapsed_us
    );

    if let Some(paa) = model.observer::<ProportionsAtAge>("survey_paa") {
        for (year, proportions) in paa.records() {
            let shown: Vec<String> = proportions.iter().map(|p| format!("{p:.3}")).collect();
            println!("{year}: {}", shown.join(" "));
        }
    }

    // Re-run with a heavier female selectivity, as an estimator would.
    if let Some(sel) = model.selectivity_mut("trawl_female") {
        sel.set_parameter("mu", 4.0)?;
    }
    let rerun = model.run()?;
    let last = Year(FINAL_YEAR);
    println!(
        "final total: {:.1} -> {:.1}",
        summary.year(last).map_or(0.0, |y| y.total_abundance),
        rerun.year(last).map_or(0.0, |y| y.total_abundance),
    );
    Ok(())
}
