use crate::evaluation::catalog::{FactorCatalog, FactorTable};
use crate::evaluation::domain::RecyclingSelection;
use crate::evaluation::error::EvaluationError;
use crate::evaluation::result::ImpactDetail;

use super::{checked, line_item};

/// End of life: `manufacturedMass * recyclingFactor(type)`.
///
/// `manufactured_mass` comes from the manufacturing stages of the same evaluation, which makes
/// this the one calculator depending on another stage's output.
pub fn recycling(
    selection: &RecyclingSelection,
    manufactured_mass: f64,
    catalog: &FactorCatalog,
) -> Result<Vec<ImpactDetail>, EvaluationError> {
    let mass = checked(manufactured_mass, || "recycling.productMass".to_string())?;
    let Some(recycling_type) = selection.recycling_type else {
        return Ok(Vec::new());
    };

    let reference = recycling_type.reference_id();
    let detail = catalog
        .lookup(FactorTable::Recycling, Some(&reference))?
        .map(|factor| line_item(reference, mass, factor, || "recycling.impact".to_string()))
        .transpose()?;
    Ok(detail.into_iter().collect())
}
