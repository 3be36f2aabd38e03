use super::catalog::{CatalogError, FactorTable};
use super::domain::ReferenceId;

/// Fatal evaluation failures. None of them is recovered internally: a missing factor is never
/// replaced by zero.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("unknown formula version '{0}'")]
    UnknownVersion(String),
    #[error("no {table} factor for '{reference}' in catalog {version}")]
    UnknownFactor {
        version: String,
        table: FactorTable,
        reference: ReferenceId,
    },
    #[error("invalid input at {field}: {value} is not a finite, non-negative number")]
    InvalidInput { field: String, value: f64 },
    #[error("factor catalog unavailable: {0}")]
    Catalog(CatalogError),
}

impl From<CatalogError> for EvaluationError {
    fn from(value: CatalogError) -> Self {
        match value {
            CatalogError::UnknownVersion(version) => Self::UnknownVersion(version),
            other => Self::Catalog(other),
        }
    }
}
