//! Versioned emission-factor tables.
//!
//! A [`FactorCatalog`] is immutable once built. [`CatalogRegistry`] loads each version at most
//! once from a [`CatalogSource`] and hands out shared read-only copies afterwards.

mod builtin;
mod parser;
mod registry;
mod source;

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::domain::{ReferenceId, Stage};
use super::error::EvaluationError;

pub use registry::CatalogRegistry;
pub use source::{BuiltinCatalogSource, CatalogSource, CsvCatalogSource};

/// Table a factor belongs to. Each table has its own reference id space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorTable {
    Material,
    ElectronicComponent,
    TestLocation,
    PowerSource,
    EmbeddedPlatformModel,
    TransportedPlatformModel,
    Recycling,
}

impl FactorTable {
    pub const ALL: [FactorTable; 7] = [
        FactorTable::Material,
        FactorTable::ElectronicComponent,
        FactorTable::TestLocation,
        FactorTable::PowerSource,
        FactorTable::EmbeddedPlatformModel,
        FactorTable::TransportedPlatformModel,
        FactorTable::Recycling,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FactorTable::Material => "material",
            FactorTable::ElectronicComponent => "electronic_component",
            FactorTable::TestLocation => "test_location",
            FactorTable::PowerSource => "power_source",
            FactorTable::EmbeddedPlatformModel => "embedded_platform_model",
            FactorTable::TransportedPlatformModel => "transported_platform_model",
            FactorTable::Recycling => "recycling",
        }
    }

    pub fn stage(self) -> Stage {
        match self {
            FactorTable::Material => Stage::ManufacturingMechanics,
            FactorTable::ElectronicComponent => Stage::ManufacturingElectronics,
            FactorTable::TestLocation => Stage::TestsAndQualification,
            FactorTable::PowerSource => Stage::InUsePower,
            FactorTable::EmbeddedPlatformModel | FactorTable::TransportedPlatformModel => {
                Stage::InUseMobility
            }
            FactorTable::Recycling => Stage::Recycling,
        }
    }
}

impl fmt::Display for FactorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FactorTable {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        FactorTable::ALL
            .into_iter()
            .find(|table| table.as_str() == normalized)
            .ok_or_else(|| format!("unknown factor table '{value}'"))
    }
}

/// Unit of a quantity. Factors are expressed in kgCO2e per quantity unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "kWh")]
    KilowattHour,
    #[serde(rename = "km")]
    Kilometer,
    #[serde(rename = "h")]
    Hour,
    #[serde(rename = "use")]
    AdjustedUse,
    #[serde(rename = "unit")]
    TransportUnit,
    #[serde(rename = "kgCO2e")]
    KgCo2e,
}

impl Unit {
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Kilogram => "kg",
            Unit::KilowattHour => "kWh",
            Unit::Kilometer => "km",
            Unit::Hour => "h",
            Unit::AdjustedUse => "use",
            Unit::TransportUnit => "unit",
            Unit::KgCo2e => "kgCO2e",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let unit = match value.trim() {
            "kg" => Unit::Kilogram,
            "kWh" | "kwh" => Unit::KilowattHour,
            "km" => Unit::Kilometer,
            "h" => Unit::Hour,
            "use" => Unit::AdjustedUse,
            "unit" => Unit::TransportUnit,
            "kgCO2e" => Unit::KgCo2e,
            other => return Err(format!("unknown unit '{other}'")),
        };
        Ok(unit)
    }
}

/// Emission intensity: `value` kgCO2e per one `unit` of quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub value: f64,
    pub unit: Unit,
}

impl Factor {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }
}

/// Factor tables for one formula version.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorCatalog {
    version: String,
    factors: HashMap<(FactorTable, ReferenceId), Factor>,
}

impl FactorCatalog {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            factors: HashMap::new(),
        }
    }

    /// Parse a catalog from CSV rows `table,reference_id,factor,unit`.
    pub fn from_reader<R: Read>(
        version: impl Into<String>,
        reader: R,
    ) -> Result<Self, CatalogError> {
        parser::parse_catalog(version.into(), reader)
    }

    pub fn from_path<P: AsRef<Path>>(
        version: impl Into<String>,
        path: P,
    ) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(version, file)
    }

    pub fn insert(
        &mut self,
        table: FactorTable,
        reference: impl Into<ReferenceId>,
        factor: Factor,
    ) -> Result<(), CatalogError> {
        let reference = reference.into();
        if !factor.value.is_finite() || factor.value < 0.0 {
            return Err(CatalogError::InvalidFactor {
                table,
                reference,
                value: factor.value,
            });
        }

        let key = (table, reference);
        if self.factors.contains_key(&key) {
            return Err(CatalogError::DuplicateFactor {
                table: key.0,
                reference: key.1,
            });
        }
        self.factors.insert(key, factor);
        Ok(())
    }

    pub fn with_factor(
        mut self,
        table: FactorTable,
        reference: impl Into<ReferenceId>,
        factor: Factor,
    ) -> Result<Self, CatalogError> {
        self.insert(table, reference, factor)?;
        Ok(self)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn get(&self, table: FactorTable, reference: &ReferenceId) -> Option<&Factor> {
        self.factors.get(&(table, reference.clone()))
    }

    /// Resolve a factor for a possibly-unset reference.
    ///
    /// `Ok(None)` means the reference is unset and contributes nothing. A set reference that is
    /// missing from the table is an [`EvaluationError::UnknownFactor`].
    pub fn lookup(
        &self,
        table: FactorTable,
        reference: Option<&ReferenceId>,
    ) -> Result<Option<Factor>, EvaluationError> {
        let Some(reference) = reference else {
            return Ok(None);
        };

        self.get(table, reference)
            .copied()
            .map(Some)
            .ok_or_else(|| EvaluationError::UnknownFactor {
                version: self.version.clone(),
                table,
                reference: reference.clone(),
            })
    }

    /// Reference ids present in one table, sorted.
    pub fn references(&self, table: FactorTable) -> Vec<&ReferenceId> {
        let mut references: Vec<_> = self
            .factors
            .keys()
            .filter(|(candidate, _)| *candidate == table)
            .map(|(_, reference)| reference)
            .collect();
        references.sort();
        references
    }
}

/// Failures while loading or building a factor catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("no factor catalog is available for version '{0}'")]
    UnknownVersion(String),
    #[error("failed to read factor catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid factor catalog CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("factor catalog row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },
    #[error("factor for {table} '{reference}' must be finite and non-negative, got {value}")]
    InvalidFactor {
        table: FactorTable,
        reference: ReferenceId,
        value: f64,
    },
    #[error("duplicate factor for {table} '{reference}'")]
    DuplicateFactor {
        table: FactorTable,
        reference: ReferenceId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> FactorCatalog {
        FactorCatalog::new("test")
            .with_factor(
                FactorTable::Material,
                "steel",
                Factor::new(3.0, Unit::Kilogram),
            )
            .expect("factor inserts")
    }

    #[test]
    fn lookup_of_unset_reference_is_no_contribution() {
        let found = catalog()
            .lookup(FactorTable::Material, None)
            .expect("unset lookup never fails");
        assert!(found.is_none());
    }

    #[test]
    fn lookup_of_unknown_reference_fails() {
        let missing = ReferenceId::new("unobtainium");
        match catalog().lookup(FactorTable::Material, Some(&missing)) {
            Err(EvaluationError::UnknownFactor {
                version,
                table,
                reference,
            }) => {
                assert_eq!(version, "test");
                assert_eq!(table, FactorTable::Material);
                assert_eq!(reference, missing);
            }
            other => panic!("expected unknown factor, got {other:?}"),
        }
    }

    #[test]
    fn tables_do_not_share_reference_ids() {
        let steel = ReferenceId::new("steel");
        assert!(catalog()
            .lookup(FactorTable::ElectronicComponent, Some(&steel))
            .is_err());
    }

    #[test]
    fn rejects_negative_and_duplicate_factors() {
        let mut catalog = catalog();
        assert!(matches!(
            catalog.insert(
                FactorTable::Material,
                "steel",
                Factor::new(4.0, Unit::Kilogram)
            ),
            Err(CatalogError::DuplicateFactor { .. })
        ));
        assert!(matches!(
            catalog.insert(
                FactorTable::Material,
                "lead",
                Factor::new(-1.0, Unit::Kilogram)
            ),
            Err(CatalogError::InvalidFactor { .. })
        ));
    }

    #[test]
    fn table_names_parse_leniently() {
        assert_eq!(
            "Electronic-Component".parse::<FactorTable>(),
            Ok(FactorTable::ElectronicComponent)
        );
        assert!("fuel".parse::<FactorTable>().is_err());
    }
}
