use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::evaluation::catalog::{CatalogRegistry, FactorCatalog};
use crate::evaluation::domain::{ProductSnapshot, RecyclingType};
use crate::evaluation::engine::EvaluationEngine;
use crate::evaluation::reference::ReferenceData;
use crate::evaluation::service::EvaluationService;

pub(super) const V1: &str = "1.0.0";
pub(super) const EPSILON: f64 = 1e-9;

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn catalog() -> Arc<FactorCatalog> {
    CatalogRegistry::builtin()
        .get_or_load(V1)
        .expect("builtin catalog loads")
}

pub(super) fn engine() -> EvaluationEngine {
    EvaluationEngine::builtin()
}

pub(super) fn service() -> Arc<EvaluationService> {
    Arc::new(EvaluationService::new(
        Arc::new(engine()),
        Arc::new(ReferenceData::builtin()),
        V1,
    ))
}

/// 3 kg of steel and 1 kg of PCB: 9 + 250 kgCO2e of hardware.
pub(super) fn hardware_only() -> ProductSnapshot {
    ProductSnapshot::builder()
        .mechanical_part("steel", 3.0)
        .electronic_component("PCB", 1.0)
        .build()
}

/// Exercises every stage at once.
pub(super) fn full_product() -> ProductSnapshot {
    ProductSnapshot::builder()
        .mechanical_part("steel", 3.0)
        .mechanical_part("aluminium", 0.5)
        .electronic_component("PCB", 1.0)
        .test_location("france", 120.0)
        .power_source("world_mix", 175_200.0)
        .power_level(20.0, 100.0)
        .embedded_mobility("GROUND CIVILIAN", "5", 20_000.0)
        .recycling(RecyclingType::Type2)
        .build()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
