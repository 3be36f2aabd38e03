use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a material, component, location, power source, platform model or recycling
/// route as published by the reference-data provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceId(pub String);

impl ReferenceId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReferenceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ReferenceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Closed set of life-cycle stages, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ManufacturingMechanics,
    ManufacturingElectronics,
    TestsAndQualification,
    InUsePower,
    InUseMobility,
    Recycling,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::ManufacturingMechanics,
        Stage::ManufacturingElectronics,
        Stage::TestsAndQualification,
        Stage::InUsePower,
        Stage::InUseMobility,
        Stage::Recycling,
    ];

    /// Display name used by the results table and chart legend.
    pub fn name(self) -> &'static str {
        match self {
            Stage::ManufacturingMechanics => "Hardware mechanics",
            Stage::ManufacturingElectronics => "Hardware electronics",
            Stage::TestsAndQualification => "Tests & Qualification",
            Stage::InUsePower => "In-use power consumption",
            Stage::InUseMobility => "In-use mobility",
            Stage::Recycling => "Recycling",
        }
    }

    pub fn is_manufacturing(self) -> bool {
        matches!(
            self,
            Stage::ManufacturingMechanics | Stage::ManufacturingElectronics
        )
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable description of a product, supplied fresh for every evaluation.
///
/// Each section carries its own `enabled` flag; a disabled section never contributes to the
/// result even when it still holds data from an earlier edit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductSnapshot {
    pub mechanical_parts: MassBreakdown,
    pub electronics: MassBreakdown,
    pub test_locations: TestEnergyBreakdown,
    pub in_use_power: PowerConsumption,
    pub in_use_mobility: InUseMobility,
    pub recycling: RecyclingSelection,
}

impl ProductSnapshot {
    pub fn builder() -> ProductSnapshotBuilder {
        ProductSnapshotBuilder::default()
    }

    pub fn is_stage_enabled(&self, stage: Stage) -> bool {
        match stage {
            Stage::ManufacturingMechanics => self.mechanical_parts.enabled,
            Stage::ManufacturingElectronics => self.electronics.enabled,
            Stage::TestsAndQualification => self.test_locations.enabled,
            Stage::InUsePower => self.in_use_power.enabled,
            Stage::InUseMobility => self.in_use_mobility.enabled,
            Stage::Recycling => self.recycling.enabled,
        }
    }

    /// Mobility discriminator of the enabled mobility section, if any.
    pub fn mobility_type(&self) -> Option<MobilityType> {
        self.in_use_mobility
            .enabled
            .then(|| self.in_use_mobility.usage.mobility_type())
    }
}

/// Mass breakdown of mechanical parts (by material) or electronics (by component).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MassBreakdown {
    pub enabled: bool,
    pub entries: Vec<MassBreakdownEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MassBreakdownEntry {
    pub id: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub reference_id: Option<ReferenceId>,
    /// Mass in kilograms.
    #[serde(default)]
    pub mass: f64,
}

/// Energy spent per test location during tests and qualification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestEnergyBreakdown {
    pub enabled: bool,
    pub entries: Vec<TestLocationEnergy>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestLocationEnergy {
    pub id: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub location_id: Option<ReferenceId>,
    /// Total energy in kWh.
    #[serde(default)]
    pub energy: f64,
}

/// In-use electrical power profile of the product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PowerConsumption {
    pub enabled: bool,
    /// In-use lifetime in hours (20 years is 175 200 h).
    pub lifetime_hours: f64,
    #[serde(deserialize_with = "blank_as_none")]
    pub power_source_id: Option<ReferenceId>,
    pub power_levels: Vec<PowerLevel>,
}

impl PowerConsumption {
    /// Weighted mean power in watts. Shares are used as entered, without normalisation.
    pub fn mean_power(&self) -> f64 {
        self.power_levels
            .iter()
            .map(|level| level.power * level.share / 100.0)
            .sum()
    }

    pub fn total_share(&self) -> f64 {
        self.power_levels.iter().map(|level| level.share).sum()
    }

    pub fn shares_complete(&self) -> bool {
        (self.total_share() - 100.0).abs() <= SHARE_TOLERANCE
    }
}

const SHARE_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerLevel {
    pub id: String,
    /// Power draw in watts.
    #[serde(default)]
    pub power: f64,
    /// Percentage of operating time spent at this level.
    #[serde(default)]
    pub share: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InUseMobility {
    pub enabled: bool,
    pub usage: MobilityUsage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MobilityType {
    Embedded,
    Transported,
}

/// Either the product travels embedded in a platform, or it is carried as payload legs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MobilityUsage {
    Embedded(EmbeddedUsage),
    Transported(TransportedUsage),
}

impl MobilityUsage {
    pub fn mobility_type(&self) -> MobilityType {
        match self {
            MobilityUsage::Embedded(_) => MobilityType::Embedded,
            MobilityUsage::Transported(_) => MobilityType::Transported,
        }
    }
}

impl Default for MobilityUsage {
    fn default() -> Self {
        MobilityUsage::Embedded(EmbeddedUsage::default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmbeddedUsage {
    #[serde(deserialize_with = "blank_as_none")]
    pub sector_id: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub platform_model_id: Option<ReferenceId>,
    /// Adjusted use of the carrying platform over the product lifetime.
    pub usage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransportedUsage {
    pub payloads: Vec<PayloadLeg>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadLeg {
    pub id: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub sector_id: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub platform_model_id: Option<ReferenceId>,
    /// Quantity of transportation units for this leg.
    #[serde(default)]
    pub payload: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecyclingType {
    #[serde(rename = "TYPE_1")]
    Type1,
    #[serde(rename = "TYPE_2")]
    Type2,
}

impl RecyclingType {
    pub fn as_str(self) -> &'static str {
        match self {
            RecyclingType::Type1 => "TYPE_1",
            RecyclingType::Type2 => "TYPE_2",
        }
    }

    pub fn reference_id(self) -> ReferenceId {
        ReferenceId::new(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecyclingSelection {
    pub enabled: bool,
    #[serde(rename = "type", deserialize_with = "blank_recycling_type")]
    pub recycling_type: Option<RecyclingType>,
}

/// Builds a caller-owned snapshot section by section; every section touched is enabled.
#[derive(Debug, Clone, Default)]
pub struct ProductSnapshotBuilder {
    product: ProductSnapshot,
}

impl ProductSnapshotBuilder {
    pub fn mechanical_part(mut self, material: impl Into<ReferenceId>, mass: f64) -> Self {
        let section = &mut self.product.mechanical_parts;
        section.enabled = true;
        section.entries.push(MassBreakdownEntry {
            id: format!("mechanical-{}", section.entries.len() + 1),
            reference_id: Some(material.into()),
            mass,
        });
        self
    }

    pub fn electronic_component(mut self, component: impl Into<ReferenceId>, mass: f64) -> Self {
        let section = &mut self.product.electronics;
        section.enabled = true;
        section.entries.push(MassBreakdownEntry {
            id: format!("electronic-{}", section.entries.len() + 1),
            reference_id: Some(component.into()),
            mass,
        });
        self
    }

    pub fn test_location(mut self, location: impl Into<ReferenceId>, energy_kwh: f64) -> Self {
        let section = &mut self.product.test_locations;
        section.enabled = true;
        section.entries.push(TestLocationEnergy {
            id: format!("test-location-{}", section.entries.len() + 1),
            location_id: Some(location.into()),
            energy: energy_kwh,
        });
        self
    }

    pub fn power_source(mut self, source: impl Into<ReferenceId>, lifetime_hours: f64) -> Self {
        let section = &mut self.product.in_use_power;
        section.enabled = true;
        section.power_source_id = Some(source.into());
        section.lifetime_hours = lifetime_hours;
        self
    }

    pub fn power_level(mut self, power: f64, share: f64) -> Self {
        let section = &mut self.product.in_use_power;
        section.enabled = true;
        section.power_levels.push(PowerLevel {
            id: format!("power-level-{}", section.power_levels.len() + 1),
            power,
            share,
        });
        self
    }

    pub fn embedded_mobility(
        mut self,
        sector: impl Into<String>,
        platform_model: impl Into<ReferenceId>,
        usage: f64,
    ) -> Self {
        self.product.in_use_mobility = InUseMobility {
            enabled: true,
            usage: MobilityUsage::Embedded(EmbeddedUsage {
                sector_id: Some(sector.into()),
                platform_model_id: Some(platform_model.into()),
                usage,
            }),
        };
        self
    }

    pub fn transported_payload(
        mut self,
        sector: impl Into<String>,
        platform_model: impl Into<ReferenceId>,
        payload: f64,
    ) -> Self {
        let mobility = &mut self.product.in_use_mobility;
        mobility.enabled = true;
        if !matches!(mobility.usage, MobilityUsage::Transported(_)) {
            mobility.usage = MobilityUsage::Transported(TransportedUsage::default());
        }
        if let MobilityUsage::Transported(transported) = &mut mobility.usage {
            transported.payloads.push(PayloadLeg {
                id: format!("payload-{}", transported.payloads.len() + 1),
                sector_id: Some(sector.into()),
                platform_model_id: Some(platform_model.into()),
                payload,
            });
        }
        self
    }

    pub fn recycling(mut self, recycling_type: RecyclingType) -> Self {
        self.product.recycling = RecyclingSelection {
            enabled: true,
            recycling_type: Some(recycling_type),
        };
        self
    }

    /// Switch a section off while keeping whatever data it already holds.
    pub fn disable(mut self, stage: Stage) -> Self {
        let product = &mut self.product;
        match stage {
            Stage::ManufacturingMechanics => product.mechanical_parts.enabled = false,
            Stage::ManufacturingElectronics => product.electronics.enabled = false,
            Stage::TestsAndQualification => product.test_locations.enabled = false,
            Stage::InUsePower => product.in_use_power.enabled = false,
            Stage::InUseMobility => product.in_use_mobility.enabled = false,
            Stage::Recycling => product.recycling.enabled = false,
        }
        self
    }

    pub fn build(self) -> ProductSnapshot {
        self.product
    }
}

/// Treats `null`, a missing field and blank strings alike as the unset sentinel.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(T::from))
}

fn blank_recycling_type<'de, D>(deserializer: D) -> Result<Option<RecyclingType>, D::Error>
where
    D: Deserializer<'de>,
{
    const VARIANTS: &[&str] = &["TYPE_1", "TYPE_2"];

    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some("TYPE_1") => Ok(Some(RecyclingType::Type1)),
        Some("TYPE_2") => Ok(Some(RecyclingType::Type2)),
        Some(other) => Err(<D::Error as serde::de::Error>::unknown_variant(
            other, VARIANTS,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_references_deserialize_as_unset() {
        let entry: MassBreakdownEntry = serde_json::from_value(json!({
            "id": "m-1",
            "referenceId": "  ",
            "mass": 2.0
        }))
        .expect("entry parses");
        assert!(entry.reference_id.is_none());

        let entry: MassBreakdownEntry =
            serde_json::from_value(json!({ "id": "m-2", "mass": 1.0 })).expect("entry parses");
        assert!(entry.reference_id.is_none());
    }

    #[test]
    fn blank_recycling_type_is_unset() {
        let selection: RecyclingSelection =
            serde_json::from_value(json!({ "enabled": true, "type": "" })).expect("parses");
        assert!(selection.enabled);
        assert!(selection.recycling_type.is_none());

        let selection: RecyclingSelection =
            serde_json::from_value(json!({ "enabled": true, "type": null })).expect("parses");
        assert!(selection.recycling_type.is_none());

        let selection: RecyclingSelection =
            serde_json::from_value(json!({ "type": "TYPE_2" })).expect("parses");
        assert_eq!(selection.recycling_type, Some(RecyclingType::Type2));

        let err = serde_json::from_value::<RecyclingSelection>(json!({ "type": "TYPE_9" }))
            .expect_err("unknown type fails");
        assert!(err.to_string().contains("TYPE_9"));
    }

    #[test]
    fn mobility_usage_is_tagged_by_type() {
        let mobility: InUseMobility = serde_json::from_value(json!({
            "enabled": true,
            "usage": {
                "type": "TRANSPORTED",
                "payloads": [
                    { "id": "leg-1", "sectorId": "RAIL", "platformModelId": "tpm-1", "payload": 4 }
                ]
            }
        }))
        .expect("mobility parses");

        assert_eq!(mobility.usage.mobility_type(), MobilityType::Transported);
    }

    #[test]
    fn mean_power_uses_shares_as_entered() {
        let power = ProductSnapshot::builder()
            .power_source("world_mix", 100.0)
            .power_level(10.0, 50.0)
            .power_level(30.0, 30.0)
            .build()
            .in_use_power;

        assert!((power.mean_power() - 14.0).abs() < 1e-9);
        assert!(!power.shares_complete());
    }

    #[test]
    fn disabling_a_section_keeps_its_data() {
        let product = ProductSnapshot::builder()
            .recycling(RecyclingType::Type2)
            .disable(Stage::Recycling)
            .build();

        assert!(!product.is_stage_enabled(Stage::Recycling));
        assert_eq!(
            product.recycling.recycling_type,
            Some(RecyclingType::Type2)
        );
    }
}
