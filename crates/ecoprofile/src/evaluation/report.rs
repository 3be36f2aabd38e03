use serde::Serialize;

use super::category::CategoryProfile;
use super::domain::{MobilityType, Stage};
use super::reference::ReferenceData;
use super::result::{EvaluationResult, Quantity};

/// One rendered line of the results table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub stage: Stage,
    pub stage_name: &'static str,
    pub label: String,
    pub quantity: Quantity,
    pub factor: f64,
    pub impact: f64,
}

/// Evaluation result enriched with display labels and the category description.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationReport {
    pub result: EvaluationResult,
    pub rows: Vec<ReportRow>,
    pub category: CategoryProfile,
}

impl EvaluationReport {
    pub fn new(
        result: EvaluationResult,
        reference: &ReferenceData,
        mobility: Option<MobilityType>,
    ) -> Self {
        let rows = result
            .impacts
            .iter()
            .flat_map(|impact| {
                impact.details.iter().map(move |detail| ReportRow {
                    stage: impact.stage,
                    stage_name: impact.stage.name(),
                    label: reference.label(impact.stage, &detail.label_id, mobility),
                    quantity: detail.quantity,
                    factor: detail.factor,
                    impact: detail.impact.value,
                })
            })
            .collect();
        let category = result.category.profile();

        Self {
            result,
            rows,
            category,
        }
    }

    pub fn warnings(&self) -> Vec<String> {
        self.result
            .warnings
            .iter()
            .map(|warning| warning.summary())
            .collect()
    }
}
