use std::collections::BTreeMap;

use super::domain::Stage;
use super::result::StageImpact;

/// Stage impacts with their overall total and percentage spread.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub impacts: Vec<StageImpact>,
    pub total: f64,
    pub impacts_spread: BTreeMap<Stage, f64>,
}

/// Sum stage totals and spread them as percentages of the overall total.
///
/// The spread is empty when nothing contributed. Values keep full precision; rounding is left
/// to whoever renders them.
pub fn aggregate(impacts: Vec<StageImpact>) -> Aggregate {
    let total: f64 = impacts.iter().map(|impact| impact.total).sum();

    let impacts_spread = if total > 0.0 {
        impacts
            .iter()
            .map(|impact| (impact.stage, 100.0 * impact.total / total))
            .collect()
    } else {
        BTreeMap::new()
    };

    Aggregate {
        impacts,
        total,
        impacts_spread,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::catalog::{Factor, Unit};
    use crate::evaluation::domain::ReferenceId;
    use crate::evaluation::result::ImpactDetail;

    fn stage(stage: Stage, impacts: &[f64]) -> StageImpact {
        let details = impacts
            .iter()
            .enumerate()
            .map(|(index, value)| {
                ImpactDetail::from_factor(
                    ReferenceId::new(format!("ref-{index}")),
                    *value,
                    Factor::new(1.0, Unit::Kilogram),
                )
            })
            .collect();
        StageImpact::new(stage, details)
    }

    #[test]
    fn spread_sums_to_one_hundred() {
        let aggregate = aggregate(vec![
            stage(Stage::ManufacturingMechanics, &[9.0]),
            stage(Stage::ManufacturingElectronics, &[250.0]),
            stage(Stage::InUseMobility, &[320.0]),
            stage(Stage::Recycling, &[4.0]),
        ]);

        assert!((aggregate.total - 583.0).abs() < 1e-9);
        let sum: f64 = aggregate.impacts_spread.values().sum();
        assert!((sum - 100.0).abs() < 1e-9);
        let mobility = aggregate.impacts_spread[&Stage::InUseMobility];
        assert!((mobility - 100.0 * 320.0 / 583.0).abs() < 1e-9);
    }

    #[test]
    fn zero_total_has_empty_spread() {
        let aggregate = aggregate(vec![
            stage(Stage::TestsAndQualification, &[]),
            stage(Stage::Recycling, &[0.0]),
        ]);

        assert_eq!(aggregate.total, 0.0);
        assert!(aggregate.impacts_spread.is_empty());
        assert_eq!(aggregate.impacts.len(), 2);
    }
}
