use crate::evaluation::catalog::{FactorCatalog, FactorTable};
use crate::evaluation::domain::PowerConsumption;
use crate::evaluation::error::EvaluationError;
use crate::evaluation::result::ImpactDetail;

use super::{checked, line_item};

const WATT_HOURS_PER_KWH: f64 = 1000.0;

/// In-use power: weighted mean power over the lifetime, times the power-source factor.
///
/// Shares are taken as entered. An incomplete breakdown still produces a number; the engine
/// reports the discrepancy separately.
pub fn power(
    consumption: &PowerConsumption,
    catalog: &FactorCatalog,
) -> Result<Vec<ImpactDetail>, EvaluationError> {
    let lifetime = checked(consumption.lifetime_hours, || {
        "inUsePower.lifetimeHours".to_string()
    })?;
    for (index, level) in consumption.power_levels.iter().enumerate() {
        checked(level.power, || format!("inUsePower.powerLevels[{index}].power"))?;
        checked(level.share, || format!("inUsePower.powerLevels[{index}].share"))?;
    }

    let Some(source) = &consumption.power_source_id else {
        return Ok(Vec::new());
    };
    let Some(factor) = catalog.lookup(FactorTable::PowerSource, Some(source))? else {
        return Ok(Vec::new());
    };

    let mean_power = checked(consumption.mean_power(), || {
        "inUsePower.meanPower".to_string()
    })?;
    let energy_kwh = checked(mean_power * lifetime / WATT_HOURS_PER_KWH, || {
        "inUsePower.energy".to_string()
    })?;
    Ok(vec![line_item(source.clone(), energy_kwh, factor, || {
        "inUsePower.impact".to_string()
    })?])
}
