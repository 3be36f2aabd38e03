use crate::evaluation::catalog::{FactorCatalog, FactorTable};
use crate::evaluation::domain::TestEnergyBreakdown;
use crate::evaluation::error::EvaluationError;
use crate::evaluation::result::ImpactDetail;

use super::{checked, line_item};

/// Tests and qualification: `energy_kWh * gridFactor(location)` per test location.
pub fn tests_and_qualification(
    breakdown: &TestEnergyBreakdown,
    catalog: &FactorCatalog,
) -> Result<Vec<ImpactDetail>, EvaluationError> {
    let mut details = Vec::with_capacity(breakdown.entries.len());

    for (index, entry) in breakdown.entries.iter().enumerate() {
        let energy = checked(entry.energy, || format!("testLocations[{index}].energy"))?;
        let Some(location) = &entry.location_id else {
            continue;
        };

        if let Some(factor) = catalog.lookup(FactorTable::TestLocation, Some(location))? {
            details.push(line_item(location.clone(), energy, factor, || {
                format!("testLocations[{index}].impact")
            })?);
        }
    }

    Ok(details)
}
