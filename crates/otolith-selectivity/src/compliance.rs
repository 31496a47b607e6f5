//! Selectivity trait compliance test helpers.
//!
//! These functions verify that a Selectivity implementation satisfies the
//! invariants required by the trait contract. Reused across all curve
//! test modules.

use crate::cache::CacheDomain;
use crate::selectivity::Selectivity;

/// Assert every cached age and length result is finite and non-negative.
pub fn assert_results_well_formed(sel: &dyn Selectivity, domain: &CacheDomain) {
    for age in domain.min_age..=domain.max_age {
        let v = sel.age_result(age);
        assert!(
            v.is_finite() && v >= 0.0,
            "{}: age_result({age}) = {v}",
            sel.label()
        );
    }
    for bin in 0..domain.length_bins.len() {
        let v = sel.length_result(bin);
        assert!(
            v.is_finite() && v >= 0.0,
            "{}: length_result({bin}) = {v}",
            sel.label()
        );
    }
}

/// Assert repeated lookups return identical values.
pub fn assert_lookups_repeatable(sel: &dyn Selectivity, domain: &CacheDomain) {
    for age in domain.min_age..=domain.max_age {
        assert_eq!(
            sel.age_result(age).to_bits(),
            sel.age_result(age).to_bits(),
            "{}: age_result({age}) not repeatable",
            sel.label()
        );
    }
}

/// Assert that changing `parameter` leaves cached results untouched until
/// `rebuild_cache`, after which at least one age result changes.
pub fn assert_cache_holds_until_rebuild(
    sel: &mut dyn Selectivity,
    domain: &CacheDomain,
    parameter: &str,
    new_value: f64,
) {
    sel.rebuild_cache(domain);
    let before: Vec<f64> = (domain.min_age..=domain.max_age)
        .map(|a| sel.age_result(a))
        .collect();

    sel.set_parameter(parameter, new_value)
        .unwrap_or_else(|e| panic!("{}: set_parameter failed: {e}", sel.label()));
    assert_eq!(sel.parameter(parameter), Some(new_value));

    let stale: Vec<f64> = (domain.min_age..=domain.max_age)
        .map(|a| sel.age_result(a))
        .collect();
    assert_eq!(before, stale, "{}: cache changed without rebuild", sel.label());

    sel.rebuild_cache(domain);
    let fresh: Vec<f64> = (domain.min_age..=domain.max_age)
        .map(|a| sel.age_result(a))
        .collect();
    assert_ne!(before, fresh, "{}: rebuild did not pick up {parameter}", sel.label());
}

/// Assert an unknown parameter name is rejected.
pub fn assert_unknown_parameter_rejected(sel: &mut dyn Selectivity) {
    assert!(sel.parameter("no_such_parameter").is_none());
    assert!(sel.set_parameter("no_such_parameter", 1.0).is_err());
}

/// Run every check that does not need a parameter to perturb.
pub fn run_full_compliance(sel: &mut dyn Selectivity, domain: &CacheDomain) {
    sel.validate()
        .unwrap_or_else(|e| panic!("{}: expected valid selectivity: {e}", sel.label()));
    sel.rebuild_cache(domain);
    assert_results_well_formed(sel, domain);
    assert_lookups_repeatable(sel, domain);
    assert_unknown_parameter_rejected(sel);
}
