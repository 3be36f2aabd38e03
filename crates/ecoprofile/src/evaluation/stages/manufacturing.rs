use crate::evaluation::catalog::{FactorCatalog, FactorTable};
use crate::evaluation::domain::MassBreakdown;
use crate::evaluation::error::EvaluationError;
use crate::evaluation::result::ImpactDetail;

use super::{checked, line_item};

/// Mechanical parts: `mass * factor(material)` per entry.
pub fn mechanics(
    breakdown: &MassBreakdown,
    catalog: &FactorCatalog,
) -> Result<Vec<ImpactDetail>, EvaluationError> {
    mass_details(breakdown, catalog, FactorTable::Material, "mechanicalParts")
}

/// Electronics: `mass * factor(component)` per entry.
pub fn electronics(
    breakdown: &MassBreakdown,
    catalog: &FactorCatalog,
) -> Result<Vec<ImpactDetail>, EvaluationError> {
    mass_details(
        breakdown,
        catalog,
        FactorTable::ElectronicComponent,
        "electronics",
    )
}

/// Total hardware mass that actually entered the manufacturing stages.
pub fn manufactured_mass<'a>(details: impl IntoIterator<Item = &'a ImpactDetail>) -> f64 {
    details.into_iter().map(|detail| detail.quantity.value).sum()
}

fn mass_details(
    breakdown: &MassBreakdown,
    catalog: &FactorCatalog,
    table: FactorTable,
    section: &str,
) -> Result<Vec<ImpactDetail>, EvaluationError> {
    let mut details = Vec::new();

    for (index, entry) in breakdown.entries.iter().enumerate() {
        let mass = checked(entry.mass, || format!("{section}[{index}].mass"))?;
        if mass == 0.0 {
            continue;
        }

        let Some(reference) = &entry.reference_id else {
            continue;
        };

        if let Some(factor) = catalog.lookup(table, Some(reference))? {
            details.push(line_item(reference.clone(), mass, factor, || {
                format!("{section}[{index}].impact")
            })?);
        }
    }

    Ok(details)
}
