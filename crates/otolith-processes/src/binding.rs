//! Category/selectivity pairing.
//!
//! Processes list categories and selectivities as two parallel label
//! arrays. At build time the pair is resolved into one
//! [`CategoryBinding`] per category, so execution never indexes two
//! arrays in lockstep.

use otolith_core::{CategoryId, ConfigErrors, SelectivityId};
use otolith_process::BuildContext;

use crate::params::location;

/// A category and the selectivity applied to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoryBinding {
    /// Category in the partition.
    pub category: CategoryId,
    /// Selectivity in the registry.
    pub selectivity: SelectivityId,
}

/// Resolve paired category and selectivity labels.
///
/// Both lists are resolved before failing, so every unknown label is
/// reported. The lists are expected to have equal length (checked at
/// validation); extra entries on either side are ignored.
pub fn resolve_bindings(
    ctx: &BuildContext<'_>,
    label: &str,
    categories: &[String],
    selectivities: &[String],
) -> Result<Vec<CategoryBinding>, ConfigErrors> {
    let mut errors = ConfigErrors::new();
    let view = errors.check_all(ctx.categories(&location(label, "categories"), categories));
    let ids = errors.check_all(
        ctx.selectivity_list(&location(label, "selectivities"), selectivities),
    );
    match (view, ids) {
        (Some(view), Some(ids)) if errors.is_empty() => Ok(view
            .iter()
            .zip(ids)
            .map(|(category, selectivity)| CategoryBinding {
                category,
                selectivity,
            })
            .collect()),
        _ => Err(errors),
    }
}
