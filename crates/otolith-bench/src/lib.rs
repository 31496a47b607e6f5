//! Benchmark profiles for the Otolith population engine.
//!
//! Provides pre-built [`ModelConfig`] profiles for benchmarking:
//!
//! - [`reference_profile`]: 2 sexes, ages 1–30, 50 years
//! - [`stress_profile`]: 8 stock areas × 2 sexes, ages 1–60, 200 years

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use otolith_core::{CategoryDef, Penalty};
use otolith_engine::{ModelConfig, ProportionsAtAge, TimeStepDef, TimeVaryingDef};
use otolith_processes::{
    Ageing, MortalityConstantRate, MortalityConstantRateConfig, MortalityEvent,
    MortalityEventConfig, RecruitmentConstant, RecruitmentConstantConfig, StateCategoryByAge,
    StateCategoryByAgeConfig,
};
use otolith_selectivity::{Constant, DoubleNormal, Logistic, Selectivity};

/// First modelled year of every profile.
pub const START_YEAR: u32 = 1950;

/// Build the reference profile: 2 categories, ages 1–30, 50 years.
///
/// Cycle: Recruitment → NaturalMortality (M=0.2) | Fishing → Ageing, with
/// one time-varying selectivity and a proportions-at-age observer.
pub fn reference_profile() -> ModelConfig {
    profile(1, 30, 50)
}

/// Build a stress profile: 16 categories, ages 1–60, 200 years.
///
/// Same cycle as [`reference_profile`] with 8x the categories.
pub fn stress_profile() -> ModelConfig {
    profile(8, 60, 200)
}

fn profile(areas: usize, max_age: u32, years: u32) -> ModelConfig {
    let final_year = START_YEAR + years - 1;
    let mut config = ModelConfig::new(START_YEAR, final_year, 1, max_age);

    let categories: Vec<String> = (0..areas)
        .flat_map(|a| [format!("male.area{a}"), format!("female.area{a}")])
        .collect();
    config.categories = categories
        .iter()
        .map(|c| CategoryDef::new(c.as_str(), 1, max_age))
        .collect();

    let selectivities: Vec<Box<dyn Selectivity>> = vec![
        Box::new(Constant::new("one", 1.0)),
        Box::new(Logistic::new("fishery_male", 5.0, 3.0)),
        Box::new(DoubleNormal::new("fishery_female", 8.0, 3.0, 10.0)),
    ];
    config.selectivities = selectivities;
    config.penalties = vec![Penalty::new("catch_must_be_taken")];

    let fishery_sel: Vec<String> = (0..areas)
        .flat_map(|_| ["fishery_male".to_string(), "fishery_female".to_string()])
        .collect();
    let n = categories.len();

    config.initialisation_phases = vec![Box::new(StateCategoryByAge::new(StateCategoryByAgeConfig {
        label: "initial_state".into(),
        categories: categories.clone(),
        min_age: 1,
        max_age,
        table: categories
            .iter()
            .map(|c| {
                let mut row = vec![c.clone()];
                row.extend((1..=max_age).map(|age| format!("{:.4}", 1000.0 * (-0.2 * f64::from(age)).exp())));
                row
            })
            .collect(),
    }))];

    config.processes = vec![
        Box::new(RecruitmentConstant::new(RecruitmentConstantConfig {
            label: "recruitment".into(),
            categories: categories.clone(),
            proportions: vec![1.0 / n as f64; n],
            r0: 1000.0 * n as f64,
            age: 1,
        })),
        Box::new(MortalityConstantRate::new(MortalityConstantRateConfig {
            label: "natural_mortality".into(),
            categories: categories.clone(),
            selectivities: vec!["one".into(); n],
            m: vec![0.2],
            ..Default::default()
        })),
        Box::new(MortalityEvent::new(MortalityEventConfig {
            label: "fishing".into(),
            categories: categories.clone(),
            selectivities: fishery_sel,
            years: (START_YEAR..=final_year).collect(),
            catches: vec![200.0 * n as f64; years as usize],
            penalty: Some("catch_must_be_taken".into()),
            ..Default::default()
        })),
        Box::new(Ageing::new("ageing", categories.clone())),
    ];
    config.time_steps = vec![
        TimeStepDef::new("spawning", &["recruitment", "natural_mortality"]),
        TimeStepDef::new("fishing_season", &["fishing", "ageing"]),
    ];

    let late: Vec<u32> = (final_year - years / 5..=final_year).collect();
    config.time_varying = vec![TimeVaryingDef::new(
        "mesh_change",
        "fishery_male",
        "a50",
        late.clone(),
        vec![6.0; late.len()],
    )];
    let observed: Vec<&str> = categories.iter().map(String::as_str).collect();
    config.observers = vec![Box::new(ProportionsAtAge::new(
        "paa",
        "spawning",
        (START_YEAR..=final_year).step_by(5).collect(),
        &observed,
        1,
        max_age,
    ))];
    config
}
