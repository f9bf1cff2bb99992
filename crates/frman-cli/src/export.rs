//! CSV export of transformed records.

use std::path::Path;

use anyhow::{Context, Result};
use frman_model::{DestinationFields, DestinationRecord};
use frman_store::cell_text;

/// Destination field names in export column order.
fn export_columns(names: &DestinationFields) -> Vec<&str> {
    let mut columns = vec![
        names.name.as_str(),
        names.email.as_str(),
        names.phone.as_str(),
        names.postal_ref.as_str(),
        names.services.as_str(),
        names.details.as_str(),
    ];
    columns.extend(names.language.as_deref());
    columns.extend(names.source_key.as_deref());
    columns
}

/// Write `records` to `path` as they would be sent to the destination.
/// Returns the number of rows written.
pub fn export_records(
    path: &Path,
    records: &[DestinationRecord],
    names: &DestinationFields,
) -> Result<usize> {
    let columns = export_columns(names);
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("create export file {}", path.display()))?;
    writer.write_record(&columns)?;
    for record in records {
        let fields = record.to_fields(names);
        let row: Vec<String> = columns
            .iter()
            .map(|column| fields.get(*column).map(cell_text).unwrap_or_default())
            .collect();
        writer.write_record(&row)?;
    }
    writer
        .flush()
        .with_context(|| format!("write export file {}", path.display()))?;
    Ok(records.len())
}
