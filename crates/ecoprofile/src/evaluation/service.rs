use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::ProductSnapshot;
use super::engine::EvaluationEngine;
use super::error::EvaluationError;
use super::formula::VersionInfo;
use super::reference::ReferenceData;
use super::report::EvaluationReport;

/// Evaluation request as received from the product editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    #[serde(default)]
    pub version_id: Option<String>,
    pub product: ProductSnapshot,
}

/// Service composing the engine, the reference data and the default formula version.
pub struct EvaluationService {
    engine: Arc<EvaluationEngine>,
    reference: Arc<ReferenceData>,
    default_version: String,
}

impl EvaluationService {
    pub fn new(
        engine: Arc<EvaluationEngine>,
        reference: Arc<ReferenceData>,
        default_version: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            reference,
            default_version: default_version.into(),
        }
    }

    pub fn default_version(&self) -> &str {
        &self.default_version
    }

    pub fn evaluate(
        &self,
        request: &EvaluationRequest,
    ) -> Result<EvaluationReport, EvaluationError> {
        let version = request
            .version_id
            .as_deref()
            .unwrap_or(&self.default_version);
        let product = &request.product;

        let result = self.engine.evaluate(product, version)?;
        info!(
            version,
            total = result.total,
            category = result.category.short_name(),
            "evaluation computed"
        );

        Ok(EvaluationReport::new(
            result,
            &self.reference,
            product.mobility_type(),
        ))
    }

    pub fn versions(&self) -> Vec<VersionInfo> {
        self.engine.versions()
    }

    pub fn reference_data(&self) -> &ReferenceData {
        &self.reference
    }

    /// Warm the catalog cache for the default version and report stale reference ids.
    pub fn preload(&self) -> Result<usize, EvaluationError> {
        let catalog = self
            .engine
            .catalogs()
            .get_or_load(&self.default_version)?;
        let missing = self.reference.missing_factors(&catalog);
        for (table, reference) in &missing {
            tracing::warn!(
                version = catalog.version(),
                %table,
                %reference,
                "reference id has no emission factor"
            );
        }
        Ok(missing.len())
    }
}
