use std::sync::Arc;

use tracing::{debug, warn};

use super::aggregate::aggregate;
use super::catalog::{CatalogRegistry, FactorCatalog};
use super::category::Category;
use super::domain::{ProductSnapshot, Stage};
use super::error::EvaluationError;
use super::formula::{formula_for, formulas, VersionInfo};
use super::result::{EvaluationResult, EvaluationWarning, StageImpact};
use super::stages;

/// Orchestrates one evaluation: version resolution, enabled stage calculators, aggregation
/// and categorization. Holds no per-evaluation state, so a shared instance can serve
/// concurrent callers.
pub struct EvaluationEngine {
    catalogs: Arc<CatalogRegistry>,
}

impl EvaluationEngine {
    pub fn new(catalogs: Arc<CatalogRegistry>) -> Self {
        Self { catalogs }
    }

    pub fn builtin() -> Self {
        Self::new(Arc::new(CatalogRegistry::builtin()))
    }

    pub fn catalogs(&self) -> &CatalogRegistry {
        &self.catalogs
    }

    /// Versions that have both a formula set and a loadable catalog.
    pub fn versions(&self) -> Vec<VersionInfo> {
        let available = self.catalogs.list_versions();
        formulas()
            .filter(|formula| available.iter().any(|version| version == formula.version()))
            .map(VersionInfo::of)
            .collect()
    }

    pub fn evaluate(
        &self,
        product: &ProductSnapshot,
        version: &str,
    ) -> Result<EvaluationResult, EvaluationError> {
        let formula =
            formula_for(version).ok_or_else(|| EvaluationError::UnknownVersion(version.into()))?;
        let catalog = self.catalogs.get_or_load(version)?;

        let (impacts, warnings) = run_stages(product, &catalog)?;
        let aggregate = aggregate(impacts);
        // line items are non-negative, so any overflowing stage shows up here
        stages::checked(aggregate.total, || "total".to_string())?;
        let category = if aggregate.total > 0.0 {
            formula.categorizer().categorize(&aggregate.impacts_spread)
        } else {
            Category::NotApplicable
        };

        debug!(
            version,
            stages = aggregate.impacts.len(),
            total = aggregate.total,
            ?category,
            "product evaluated"
        );

        Ok(EvaluationResult {
            version_id: version.to_string(),
            impacts: aggregate.impacts,
            total: aggregate.total,
            impacts_spread: aggregate.impacts_spread,
            category,
            warnings,
        })
    }
}

fn run_stages(
    product: &ProductSnapshot,
    catalog: &FactorCatalog,
) -> Result<(Vec<StageImpact>, Vec<EvaluationWarning>), EvaluationError> {
    let mut impacts = Vec::with_capacity(Stage::ALL.len());
    let mut warnings = Vec::new();

    for stage in Stage::ALL {
        if !product.is_stage_enabled(stage) {
            continue;
        }

        let details = match stage {
            Stage::ManufacturingMechanics => {
                stages::mechanics(&product.mechanical_parts, catalog)?
            }
            Stage::ManufacturingElectronics => {
                stages::electronics(&product.electronics, catalog)?
            }
            Stage::TestsAndQualification => {
                stages::tests_and_qualification(&product.test_locations, catalog)?
            }
            Stage::InUsePower => {
                let consumption = &product.in_use_power;
                if !consumption.shares_complete() {
                    let total_share = consumption.total_share();
                    warn!(total_share, "power level shares do not add up to 100%");
                    warnings.push(EvaluationWarning::PowerSharesIncomplete { total_share });
                }
                stages::power(consumption, catalog)?
            }
            Stage::InUseMobility => stages::mobility(&product.in_use_mobility.usage, catalog)?,
            Stage::Recycling => {
                // manufacturing stages run first, so their line items are already in `impacts`
                let mass = stages::manufactured_mass(
                    impacts
                        .iter()
                        .filter(|impact: &&StageImpact| impact.stage.is_manufacturing())
                        .flat_map(|impact| impact.details.iter()),
                );
                stages::recycling(&product.recycling, mass, catalog)?
            }
        };

        impacts.push(StageImpact::new(stage, details));
    }

    Ok((impacts, warnings))
}
