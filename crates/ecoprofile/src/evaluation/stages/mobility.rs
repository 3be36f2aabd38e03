use crate::evaluation::catalog::{FactorCatalog, FactorTable};
use crate::evaluation::domain::{EmbeddedUsage, MobilityUsage, PayloadLeg};
use crate::evaluation::error::EvaluationError;
use crate::evaluation::result::ImpactDetail;

use super::{checked, line_item};

/// In-use mobility. Embedded usage yields at most one line; transported usage one per leg.
/// A usage or leg without both sector and platform model contributes nothing.
pub fn mobility(
    usage: &MobilityUsage,
    catalog: &FactorCatalog,
) -> Result<Vec<ImpactDetail>, EvaluationError> {
    match usage {
        MobilityUsage::Embedded(embedded) => embedded_detail(embedded, catalog),
        MobilityUsage::Transported(transported) => {
            let mut details = Vec::with_capacity(transported.payloads.len());
            for (index, leg) in transported.payloads.iter().enumerate() {
                details.extend(payload_detail(index, leg, catalog)?);
            }
            Ok(details)
        }
    }
}

fn embedded_detail(
    embedded: &EmbeddedUsage,
    catalog: &FactorCatalog,
) -> Result<Vec<ImpactDetail>, EvaluationError> {
    let usage = checked(embedded.usage, || "inUseMobility.usage".to_string())?;
    let (Some(_), Some(model)) = (&embedded.sector_id, &embedded.platform_model_id) else {
        return Ok(Vec::new());
    };

    let detail = catalog
        .lookup(FactorTable::EmbeddedPlatformModel, Some(model))?
        .map(|factor| {
            line_item(model.clone(), usage, factor, || {
                "inUseMobility.impact".to_string()
            })
        })
        .transpose()?;
    Ok(detail.into_iter().collect())
}

fn payload_detail(
    index: usize,
    leg: &PayloadLeg,
    catalog: &FactorCatalog,
) -> Result<Option<ImpactDetail>, EvaluationError> {
    let payload = checked(leg.payload, || {
        format!("inUseMobility.payloads[{index}].payload")
    })?;
    let (Some(_), Some(model)) = (&leg.sector_id, &leg.platform_model_id) else {
        return Ok(None);
    };

    catalog
        .lookup(FactorTable::TransportedPlatformModel, Some(model))?
        .map(|factor| {
            line_item(model.clone(), payload, factor, || {
                format!("inUseMobility.payloads[{index}].impact")
            })
        })
        .transpose()
}
