use std::io::Read;

use serde::Deserialize;

use super::{CatalogError, Factor, FactorCatalog, FactorTable, Unit};

#[derive(Debug, Deserialize)]
struct FactorRow {
    table: String,
    reference_id: String,
    factor: f64,
    unit: String,
}

pub(crate) fn parse_catalog<R: Read>(
    version: String,
    reader: R,
) -> Result<FactorCatalog, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);
    let mut catalog = FactorCatalog::new(version);

    for (index, record) in csv_reader.deserialize::<FactorRow>().enumerate() {
        let row = record?;
        // header is row 1
        let row_number = index + 2;

        let table = row
            .table
            .parse::<FactorTable>()
            .map_err(|reason| CatalogError::InvalidRow {
                row: row_number,
                reason,
            })?;
        let unit = row
            .unit
            .parse::<Unit>()
            .map_err(|reason| CatalogError::InvalidRow {
                row: row_number,
                reason,
            })?;
        if row.reference_id.is_empty() {
            return Err(CatalogError::InvalidRow {
                row: row_number,
                reason: "reference_id must not be empty".to_string(),
            });
        }

        catalog.insert(table, row.reference_id, Factor::new(row.factor, unit))?;
    }

    Ok(catalog)
}
