//! Reference data published by the configuration provider: the valid key space for every
//! `referenceId` a product may carry, plus display labels.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::catalog::{FactorCatalog, FactorTable};
use super::domain::{MobilityType, RecyclingType, ReferenceId, Stage};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceItem {
    pub id: ReferenceId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecyclingOption {
    pub value: RecyclingType,
    pub label: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultUsage {
    pub description: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformModel {
    pub id: ReferenceId,
    pub sector_id: String,
    pub name: String,
    pub description: String,
    pub default_value: DefaultUsage,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceData {
    pub materials: Vec<ReferenceItem>,
    pub electronic_components: Vec<ReferenceItem>,
    pub test_locations: Vec<ReferenceItem>,
    pub power_sources: Vec<ReferenceItem>,
    pub recycling_types: Vec<RecyclingOption>,
    pub embedded_platform_models: Vec<PlatformModel>,
    pub transported_platform_models: Vec<PlatformModel>,
}

impl ReferenceData {
    /// Human label for a line item, falling back to the raw id when nothing matches.
    pub fn label(
        &self,
        stage: Stage,
        label_id: &ReferenceId,
        mobility: Option<MobilityType>,
    ) -> String {
        let found = match stage {
            Stage::ManufacturingMechanics => item_name(&self.materials, label_id),
            Stage::ManufacturingElectronics => item_name(&self.electronic_components, label_id),
            Stage::TestsAndQualification => item_name(&self.test_locations, label_id),
            Stage::InUsePower => item_name(&self.power_sources, label_id)
                .map(|name| format!("Power source: {name}")),
            Stage::InUseMobility => {
                let models = match mobility {
                    Some(MobilityType::Transported) => &self.transported_platform_models,
                    _ => &self.embedded_platform_models,
                };
                models
                    .iter()
                    .find(|model| &model.id == label_id)
                    .map(|model| format!("{} - {}", model.sector_id, model.name))
            }
            Stage::Recycling => self
                .recycling_types
                .iter()
                .find(|option| option.value.as_str() == label_id.as_str())
                .map(|option| option.label.clone()),
        };

        found.unwrap_or_else(|| label_id.to_string())
    }

    /// Sorted, de-duplicated sectors offered for a mobility type.
    pub fn sectors(&self, mobility: MobilityType) -> Vec<&str> {
        let models = match mobility {
            MobilityType::Embedded => &self.embedded_platform_models,
            MobilityType::Transported => &self.transported_platform_models,
        };
        models
            .iter()
            .map(|model| model.sector_id.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Reference ids the catalog has no factor for. Selecting any of them would fail
    /// evaluation with an unknown-factor error.
    pub fn missing_factors(&self, catalog: &FactorCatalog) -> Vec<(FactorTable, ReferenceId)> {
        let items = |table: FactorTable, items: &[ReferenceItem]| {
            items
                .iter()
                .map(|item| (table, item.id.clone()))
                .collect::<Vec<_>>()
        };
        let models = |table: FactorTable, models: &[PlatformModel]| {
            models
                .iter()
                .map(|model| (table, model.id.clone()))
                .collect::<Vec<_>>()
        };

        let mut keys = items(FactorTable::Material, &self.materials);
        keys.extend(items(
            FactorTable::ElectronicComponent,
            &self.electronic_components,
        ));
        keys.extend(items(FactorTable::TestLocation, &self.test_locations));
        keys.extend(items(FactorTable::PowerSource, &self.power_sources));
        keys.extend(
            self.recycling_types
                .iter()
                .map(|option| (FactorTable::Recycling, option.value.reference_id())),
        );
        keys.extend(models(
            FactorTable::EmbeddedPlatformModel,
            &self.embedded_platform_models,
        ));
        keys.extend(models(
            FactorTable::TransportedPlatformModel,
            &self.transported_platform_models,
        ));

        keys.into_iter()
            .filter(|(table, reference)| catalog.get(*table, reference).is_none())
            .collect()
    }

    /// Configuration shipped with the service.
    pub fn builtin() -> Self {
        Self {
            materials: vec![
                item("steel", "Steel", "Low-alloy and carbon steel parts"),
                item("stainless_steel", "Stainless steel", ""),
                item("aluminium", "Aluminium", "Primary aluminium alloys"),
                item("copper", "Copper", ""),
                item("titanium", "Titanium", ""),
                item("polymer", "Polymers", "Average engineering plastics"),
                item("composite", "Composites", "Carbon and glass fibre composites"),
            ],
            electronic_components: vec![
                item("PCB", "Printed circuit boards", "Populated boards"),
                item("cable", "Cables & harnesses", ""),
                item("power_supply", "Power supplies", ""),
                item("display", "Displays", ""),
                item("battery", "Batteries", "Lithium-ion packs"),
            ],
            test_locations: vec![
                item("world", "World average", "Average world electricity mix"),
                item("france", "France", ""),
                item("germany", "Germany", ""),
                item("united_kingdom", "United Kingdom", ""),
                item("united_states", "United States", ""),
                item("china", "China", ""),
                item("india", "India", ""),
            ],
            power_sources: vec![
                item("world_mix", "World electricity mix", "0.437 kgCO2e/kWh"),
                item("europe_mix", "European electricity mix", ""),
                item("diesel_generator", "Diesel generator", "On-board generation"),
            ],
            recycling_types: vec![
                RecyclingOption {
                    value: RecyclingType::Type1,
                    label: "Average electronic equipment".to_string(),
                    description: "Recycling treatment type 1".to_string(),
                },
                RecyclingOption {
                    value: RecyclingType::Type2,
                    label: "Average electronic equipment containing a cooling system"
                        .to_string(),
                    description: "Recycling treatment type 2".to_string(),
                },
            ],
            embedded_platform_models: EMBEDDED_MODELS
                .iter()
                .map(|(id, sector, name, description, value)| {
                    platform(id, sector, name, description, "Adjusted use", *value)
                })
                .collect(),
            transported_platform_models: TRANSPORTED_MODELS
                .iter()
                .map(|(id, sector, name, description, usage)| {
                    platform(id, sector, name, description, usage, 100.0)
                })
                .collect(),
        }
    }
}

const ROLLING: &str = "100km rolling";
const HAULING: &str = "100km hauling";

// id, sector, name, description, default adjusted use
const EMBEDDED_MODELS: &[(&str, &str, &str, &str, f64)] = &[
    ("1", "RAIL", "Tramway", "Urban light rail vehicle", 2_000_000.0),
    ("2", "RAIL", "Urban", "Urban metro/subway train", 4_000_000.0),
    ("3", "RAIL", "Regional / intercity", "Regional or intercity train", 7_500_000.0),
    ("4", "RAIL", "Hi-speed", "High-speed train", 12_500_000.0),
    (
        "5",
        "GROUND CIVILIAN",
        "Urban bus - fuel/diesel/CNG",
        "Urban bus with internal combustion engine",
        1_000_000.0,
    ),
    (
        "6",
        "GROUND CIVILIAN",
        "Urban bus - electric",
        "Urban bus with electric motor",
        1_000_000.0,
    ),
];

// id, sector, name, description, default payload description
const TRANSPORTED_MODELS: &[(&str, &str, &str, &str, &str)] = &[
    ("tpm-1", "RAIL", "Tramway", "Transport by tramway", ROLLING),
    ("tpm-2", "RAIL", "Urban", "Transport by urban rail", ROLLING),
    ("tpm-10", "RAIL", "Regional / intercity", "Transport by regional/intercity rail", ROLLING),
    ("tpm-11", "RAIL", "Hi-speed", "Transport by high-speed rail", ROLLING),
    (
        "tpm-16",
        "GROUND CIVILIAN",
        "Urban bus - fuel/diesel/CNG",
        "Transport by urban bus (fuel)",
        HAULING,
    ),
    (
        "tpm-17",
        "GROUND CIVILIAN",
        "Urban bus - electric",
        "Transport by urban bus (electric)",
        HAULING,
    ),
];

fn item_name(items: &[ReferenceItem], id: &ReferenceId) -> Option<String> {
    items
        .iter()
        .find(|item| &item.id == id)
        .map(|item| item.name.clone())
}

fn item(id: &str, name: &str, description: &str) -> ReferenceItem {
    ReferenceItem {
        id: ReferenceId::new(id),
        name: name.to_string(),
        description: description.to_string(),
    }
}

fn platform(
    id: &str,
    sector: &str,
    name: &str,
    description: &str,
    usage: &str,
    value: f64,
) -> PlatformModel {
    PlatformModel {
        id: ReferenceId::new(id),
        sector_id: sector.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        default_value: DefaultUsage {
            description: usage.to_string(),
            value,
        },
    }
}

/// Read-only source of reference data; loading may suspend.
#[async_trait]
pub trait ReferenceDataProvider: Send + Sync {
    async fn load(&self) -> Result<ReferenceData, ReferenceDataError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ReferenceDataError {
    #[error("reference data unavailable: {0}")]
    Unavailable(String),
}

/// Serves [`ReferenceData::builtin`].
#[derive(Debug, Default, Clone, Copy)]
pub struct InMemoryReferenceDataProvider;

#[async_trait]
impl ReferenceDataProvider for InMemoryReferenceDataProvider {
    async fn load(&self) -> Result<ReferenceData, ReferenceDataError> {
        Ok(ReferenceData::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::catalog::CatalogRegistry;

    #[tokio::test]
    async fn builtin_reference_data_is_fully_covered_by_v1() {
        let reference = InMemoryReferenceDataProvider
            .load()
            .await
            .expect("reference data loads");
        let catalog = CatalogRegistry::builtin()
            .get_or_load("1.0.0")
            .expect("catalog loads");

        assert!(reference.missing_factors(&catalog).is_empty());
    }

    #[test]
    fn labels_follow_stage_and_mobility_type() {
        let reference = ReferenceData::builtin();

        assert_eq!(
            reference.label(
                Stage::InUsePower,
                &ReferenceId::new("world_mix"),
                None
            ),
            "Power source: World electricity mix"
        );
        assert_eq!(
            reference.label(
                Stage::InUseMobility,
                &ReferenceId::new("tpm-16"),
                Some(MobilityType::Transported)
            ),
            "GROUND CIVILIAN - Urban bus - fuel/diesel/CNG"
        );
        assert_eq!(
            reference.label(Stage::Recycling, &ReferenceId::new("TYPE_2"), None),
            "Average electronic equipment containing a cooling system"
        );
        assert_eq!(
            reference.label(
                Stage::ManufacturingMechanics,
                &ReferenceId::new("mystery"),
                None
            ),
            "mystery"
        );
    }

    #[test]
    fn sectors_are_sorted_and_unique() {
        assert_eq!(
            ReferenceData::builtin().sectors(MobilityType::Embedded),
            vec!["GROUND CIVILIAN", "RAIL"]
        );
    }
}
