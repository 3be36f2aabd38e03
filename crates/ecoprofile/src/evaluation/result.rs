use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::catalog::{Factor, Unit};
use super::category::Category;
use super::domain::{ReferenceId, Stage};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }
}

/// One line item: `impact.value = quantity.value * factor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactDetail {
    pub label_id: ReferenceId,
    pub quantity: Quantity,
    pub factor: f64,
    pub impact: Quantity,
}

impl ImpactDetail {
    pub(crate) fn from_factor(label_id: ReferenceId, quantity: f64, factor: Factor) -> Self {
        Self {
            label_id,
            quantity: Quantity::new(quantity, factor.unit),
            factor: factor.value,
            impact: Quantity::new(quantity * factor.value, Unit::KgCo2e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageImpact {
    pub stage: Stage,
    pub name: String,
    pub details: Vec<ImpactDetail>,
    pub total: f64,
}

impl StageImpact {
    pub fn new(stage: Stage, details: Vec<ImpactDetail>) -> Self {
        let total = details.iter().map(|detail| detail.impact.value).sum();
        Self {
            stage,
            name: stage.name().to_string(),
            details,
            total,
        }
    }
}

/// Non-fatal findings surfaced next to the numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EvaluationWarning {
    /// Power level shares do not add up to 100 %; the mean power used them as entered.
    #[serde(rename_all = "camelCase")]
    PowerSharesIncomplete { total_share: f64 },
}

impl EvaluationWarning {
    pub fn summary(&self) -> String {
        match self {
            EvaluationWarning::PowerSharesIncomplete { total_share } => format!(
                "power level shares add up to {total_share:.1}% instead of 100%"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub version_id: String,
    pub impacts: Vec<StageImpact>,
    pub total: f64,
    pub impacts_spread: BTreeMap<Stage, f64>,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<EvaluationWarning>,
}

impl EvaluationResult {
    pub fn stage(&self, stage: Stage) -> Option<&StageImpact> {
        self.impacts.iter().find(|impact| impact.stage == stage)
    }

    pub fn stage_total(&self, stage: Stage) -> f64 {
        self.stage(stage).map_or(0.0, |impact| impact.total)
    }

    /// Combined mechanics and electronics impact (the hardware production footprint).
    pub fn manufacturing_total(&self) -> f64 {
        self.impacts
            .iter()
            .filter(|impact| impact.stage.is_manufacturing())
            .map(|impact| impact.total)
            .sum()
    }

    pub fn is_power_profile_complete(&self) -> bool {
        !self
            .warnings
            .iter()
            .any(|warning| matches!(warning, EvaluationWarning::PowerSharesIncomplete { .. }))
    }
}
