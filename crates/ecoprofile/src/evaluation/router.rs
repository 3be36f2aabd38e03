use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::error::EvaluationError;
use super::service::{EvaluationRequest, EvaluationService};

/// Router builder exposing the evaluation endpoints.
pub fn evaluation_router(service: Arc<EvaluationService>) -> Router {
    Router::new()
        .route("/api/v1/evaluations", post(evaluate_handler))
        .route("/api/v1/evaluations/versions", get(versions_handler))
        .route("/api/v1/reference-data", get(reference_data_handler))
        .with_state(service)
}

pub(crate) async fn evaluate_handler(
    State(service): State<Arc<EvaluationService>>,
    axum::Json(request): axum::Json<EvaluationRequest>,
) -> Response {
    match service.evaluate(&request) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn versions_handler(
    State(service): State<Arc<EvaluationService>>,
) -> Response {
    let payload = json!({
        "defaultVersion": service.default_version(),
        "versions": service.versions(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn reference_data_handler(
    State(service): State<Arc<EvaluationService>>,
) -> Response {
    (StatusCode::OK, axum::Json(service.reference_data())).into_response()
}

pub(crate) fn status_for(error: &EvaluationError) -> StatusCode {
    match error {
        EvaluationError::UnknownVersion(_) => StatusCode::NOT_FOUND,
        EvaluationError::UnknownFactor { .. } | EvaluationError::InvalidInput { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        EvaluationError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: EvaluationError) -> Response {
    let status = status_for(&error);
    let payload = match &error {
        EvaluationError::InvalidInput { field, .. } => json!({
            "error": error.to_string(),
            "field": field,
        }),
        EvaluationError::UnknownFactor {
            table, reference, ..
        } => json!({
            "error": error.to_string(),
            "table": table,
            "referenceId": reference,
        }),
        _ => json!({ "error": error.to_string() }),
    };
    (status, axum::Json(payload)).into_response()
}
