//! Lifecycle CO2-equivalent evaluation.
//!
//! A [`ProductSnapshot`] and a formula version go in; an [`EvaluationResult`] comes out with
//! per-stage line items, totals, the percentage spread and a category tag. The computation is
//! pure: the only shared state is the read-only catalog cache.

mod aggregate;
pub mod catalog;
mod category;
pub mod domain;
mod engine;
mod error;
mod formula;
pub mod reference;
mod report;
mod result;
pub mod router;
mod service;
pub mod stages;

#[cfg(test)]
mod tests;

pub use aggregate::{aggregate, Aggregate};
pub use catalog::{
    BuiltinCatalogSource, CatalogError, CatalogRegistry, CatalogSource, CsvCatalogSource, Factor,
    FactorCatalog, FactorTable, Unit,
};
pub use category::{
    Axis, AxisMap, AxisShares, Categorizer, Category, CategoryProfile, CategoryThresholds,
};
pub use domain::{
    EmbeddedUsage, InUseMobility, MassBreakdown, MassBreakdownEntry, MobilityType,
    MobilityUsage, PayloadLeg, PowerConsumption, PowerLevel, ProductSnapshot,
    ProductSnapshotBuilder, RecyclingSelection, RecyclingType, ReferenceId, Stage,
    TestEnergyBreakdown, TestLocationEnergy, TransportedUsage,
};
pub use engine::EvaluationEngine;
pub use error::EvaluationError;
pub use formula::{formula_for, formulas, FormulaSet, FormulaV1, VersionInfo};
pub use reference::{
    InMemoryReferenceDataProvider, ReferenceData, ReferenceDataError, ReferenceDataProvider,
};
pub use report::{EvaluationReport, ReportRow};
pub use result::{EvaluationResult, EvaluationWarning, ImpactDetail, Quantity, StageImpact};
pub use router::evaluation_router;
pub use service::{EvaluationRequest, EvaluationService};

/// Formula version used when a request does not name one.
pub const DEFAULT_VERSION: &str = "1.0.0";
