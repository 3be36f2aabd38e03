use super::{CatalogError, Factor, FactorCatalog, FactorTable, Unit};

pub(crate) const V1: &str = "1.0.0";

// kgCO2e per unit. Material and electronics values follow Ashby (2013) and ADEME product
// footprints; electricity is the world average mix; recycling follows Ecosystem figures rounded
// up for treatment outside France.
const V1_FACTORS: &[(FactorTable, &str, f64, Unit)] = &[
    (FactorTable::Material, "steel", 3.0, Unit::Kilogram),
    (FactorTable::Material, "stainless_steel", 6.2, Unit::Kilogram),
    (FactorTable::Material, "aluminium", 12.0, Unit::Kilogram),
    (FactorTable::Material, "copper", 4.0, Unit::Kilogram),
    (FactorTable::Material, "titanium", 38.0, Unit::Kilogram),
    (FactorTable::Material, "polymer", 3.5, Unit::Kilogram),
    (FactorTable::Material, "composite", 25.0, Unit::Kilogram),
    (FactorTable::ElectronicComponent, "PCB", 250.0, Unit::Kilogram),
    (FactorTable::ElectronicComponent, "cable", 8.0, Unit::Kilogram),
    (FactorTable::ElectronicComponent, "power_supply", 35.0, Unit::Kilogram),
    (FactorTable::ElectronicComponent, "display", 150.0, Unit::Kilogram),
    (FactorTable::ElectronicComponent, "battery", 12.0, Unit::Kilogram),
    (FactorTable::TestLocation, "world", 0.437, Unit::KilowattHour),
    (FactorTable::TestLocation, "france", 0.056, Unit::KilowattHour),
    (FactorTable::TestLocation, "germany", 0.385, Unit::KilowattHour),
    (FactorTable::TestLocation, "united_kingdom", 0.233, Unit::KilowattHour),
    (FactorTable::TestLocation, "united_states", 0.386, Unit::KilowattHour),
    (FactorTable::TestLocation, "china", 0.581, Unit::KilowattHour),
    (FactorTable::TestLocation, "india", 0.713, Unit::KilowattHour),
    (FactorTable::PowerSource, "world_mix", 0.437, Unit::KilowattHour),
    (FactorTable::PowerSource, "europe_mix", 0.276, Unit::KilowattHour),
    (FactorTable::PowerSource, "diesel_generator", 0.85, Unit::KilowattHour),
    (FactorTable::EmbeddedPlatformModel, "1", 0.004, Unit::AdjustedUse),
    (FactorTable::EmbeddedPlatformModel, "2", 0.005, Unit::AdjustedUse),
    (FactorTable::EmbeddedPlatformModel, "3", 0.006, Unit::AdjustedUse),
    (FactorTable::EmbeddedPlatformModel, "4", 0.008, Unit::AdjustedUse),
    (FactorTable::EmbeddedPlatformModel, "5", 0.016, Unit::AdjustedUse),
    (FactorTable::EmbeddedPlatformModel, "6", 0.006, Unit::AdjustedUse),
    (FactorTable::TransportedPlatformModel, "tpm-1", 0.3, Unit::TransportUnit),
    (FactorTable::TransportedPlatformModel, "tpm-2", 0.35, Unit::TransportUnit),
    (FactorTable::TransportedPlatformModel, "tpm-10", 0.45, Unit::TransportUnit),
    (FactorTable::TransportedPlatformModel, "tpm-11", 0.6, Unit::TransportUnit),
    (FactorTable::TransportedPlatformModel, "tpm-16", 1.6, Unit::TransportUnit),
    (FactorTable::TransportedPlatformModel, "tpm-17", 0.6, Unit::TransportUnit),
    (FactorTable::Recycling, "TYPE_1", 1.0, Unit::Kilogram),
    (FactorTable::Recycling, "TYPE_2", 1.2, Unit::Kilogram),
];

pub(crate) fn versions() -> Vec<String> {
    vec![V1.to_string()]
}

pub(crate) fn catalog(version: &str) -> Result<FactorCatalog, CatalogError> {
    let rows = match version {
        V1 => V1_FACTORS,
        other => return Err(CatalogError::UnknownVersion(other.to_string())),
    };

    let mut catalog = FactorCatalog::new(version);
    for (table, reference, value, unit) in rows {
        catalog.insert(*table, *reference, Factor::new(*value, *unit))?;
    }
    Ok(catalog)
}
