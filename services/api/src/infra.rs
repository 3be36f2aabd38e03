use ecoprofile::config::EvaluationSettings;
use ecoprofile::error::AppError;
use ecoprofile::evaluation::{
    CatalogRegistry, CsvCatalogSource, EvaluationEngine, EvaluationService,
    InMemoryReferenceDataProvider, ProductSnapshot, ReferenceDataProvider,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Apply a `--catalog-dir` override on top of the loaded settings.
pub(crate) fn with_catalog_dir(
    mut settings: EvaluationSettings,
    catalog_dir: Option<PathBuf>,
) -> EvaluationSettings {
    if let Some(dir) = catalog_dir {
        settings.catalog_dir = Some(dir);
    }
    settings
}

pub(crate) fn catalog_registry(settings: &EvaluationSettings) -> CatalogRegistry {
    match &settings.catalog_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "using factor catalogs from directory");
            CatalogRegistry::new(CsvCatalogSource::new(dir))
        }
        None => CatalogRegistry::builtin(),
    }
}

/// Wire registry, engine and reference data into a service and warm the default catalog.
pub(crate) async fn build_service(
    settings: &EvaluationSettings,
) -> Result<Arc<EvaluationService>, AppError> {
    let engine = Arc::new(EvaluationEngine::new(Arc::new(catalog_registry(settings))));
    let reference = Arc::new(InMemoryReferenceDataProvider.load().await?);
    let service = EvaluationService::new(engine, reference, settings.default_version.clone());

    let missing = service.preload()?;
    if missing > 0 {
        warn!(
            version = service.default_version(),
            missing, "reference data offers ids without emission factors"
        );
    }

    Ok(Arc::new(service))
}

pub(crate) fn read_product(path: &Path) -> Result<ProductSnapshot, AppError> {
    let file = std::fs::File::open(path)?;
    let product = serde_json::from_reader(std::io::BufReader::new(file))
        .map_err(std::io::Error::from)?;
    Ok(product)
}
