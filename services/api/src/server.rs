use crate::cli::ServeArgs;
use crate::infra::{build_service, with_catalog_dir, AppState};
use crate::routes::with_evaluation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use ecoprofile::config::AppConfig;
use ecoprofile::error::AppError;
use ecoprofile::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    let settings = with_catalog_dir(config.evaluation.clone(), args.catalog.catalog_dir.take());

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let evaluation_service = build_service(&settings).await?;

    let app = with_evaluation_routes(evaluation_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        default_version = %settings.default_version,
        "evaluation service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
