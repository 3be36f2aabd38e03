//! Stage calculators: pure functions turning one product section and the resolved catalog into
//! line items. They know nothing about `enabled` flags; the engine decides which ones run.

mod manufacturing;
mod mobility;
mod power;
mod recycling;
mod testing;

pub use manufacturing::{electronics, manufactured_mass, mechanics};
pub use mobility::mobility;
pub use power::power;
pub use recycling::recycling;
pub use testing::tests_and_qualification;

use super::catalog::Factor;
use super::domain::ReferenceId;
use super::error::EvaluationError;
use super::result::ImpactDetail;

/// Reject negative and non-finite numbers, naming the offending field.
pub(crate) fn checked(value: f64, field: impl FnOnce() -> String) -> Result<f64, EvaluationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(EvaluationError::InvalidInput {
            field: field(),
            value,
        })
    }
}

/// `quantity * factor` as a line item; an overflowing product is rejected under `field`.
pub(crate) fn line_item(
    label_id: ReferenceId,
    quantity: f64,
    factor: Factor,
    field: impl FnOnce() -> String,
) -> Result<ImpactDetail, EvaluationError> {
    let detail = ImpactDetail::from_factor(label_id, quantity, factor);
    checked(detail.impact.value, field)?;
    Ok(detail)
}
