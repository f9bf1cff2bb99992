//! Google Sheets values API client bound to one worksheet.
//!
//! The first row of the worksheet is the header. Rows are addressed by
//! their A1 range, which is what `write_row` returns.

use frman_ingest::{frame_from_records, records_from_frame};
use frman_model::{Fields, RecordId};
use polars::prelude::DataFrame;
use reqwest::Url;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::http::{build_client, check_status, join_url, send_json};
use crate::store::{RecordStore, TableSelector};
use crate::value::cell_text;

const SERVICE: &str = "Google Sheets";
const VALUE_INPUT: (&str, &str) = ("valueInputOption", "USER_ENTERED");

#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub endpoint: String,
    pub sheet_id: String,
    /// OAuth access token sent as a bearer token.
    pub token: String,
    pub timeout_secs: u64,
}

pub struct SheetsStore {
    client: Client,
    config: SheetsConfig,
    sheet: String,
    header: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ValueRange {
    #[serde(default)]
    pub(crate) values: Vec<Vec<Value>>,
}

#[derive(Debug, Serialize)]
struct ValuesBody<'a> {
    values: [&'a [String]; 1],
}

#[derive(Debug, Serialize)]
struct GridBody<'a> {
    values: &'a [Vec<String>],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendResponse {
    updates: AppendUpdates,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendUpdates {
    updated_range: String,
}

impl SheetsStore {
    pub fn new(config: SheetsConfig, sheet: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout_secs)?,
            config,
            sheet: sheet.into(),
            header: None,
        })
    }

    fn values_url(&self, range: &str, action: Option<&str>) -> Result<Url> {
        let segment = match action {
            Some(action) => format!("{range}:{action}"),
            None => range.to_string(),
        };
        join_url(
            &self.config.endpoint,
            &[&self.config.sheet_id, "values", &segment],
        )
    }

    fn get_values(&self, range: &str) -> Result<Vec<Vec<Value>>> {
        let request = self
            .client
            .get(self.values_url(range, None)?)
            .bearer_auth(&self.config.token);
        let body: ValueRange = send_json(SERVICE, request)?;
        Ok(body.values)
    }

    fn header(&mut self) -> Result<Vec<String>> {
        if let Some(header) = &self.header {
            return Ok(header.clone());
        }
        let rows = self.get_values(&format!("{}!1:1", quote_sheet(&self.sheet)))?;
        let header: Vec<String> = rows
            .first()
            .map(|row| row.iter().map(cell_text).collect())
            .unwrap_or_default();
        if header.is_empty() {
            return Err(StoreError::Rejected {
                message: format!("worksheet '{}' has no header row", self.sheet),
            });
        }
        self.header = Some(header.clone());
        Ok(header)
    }

    fn put_row(&self, range: &str, row: &[String]) -> Result<()> {
        let request = self
            .client
            .put(self.values_url(range, None)?)
            .query(&[VALUE_INPUT])
            .bearer_auth(&self.config.token)
            .json(&ValuesBody { values: [row] });
        check_status(SERVICE, request)?;
        Ok(())
    }

    fn clear(&self, range: &str) -> Result<()> {
        let request = self
            .client
            .post(self.values_url(range, Some("clear"))?)
            .bearer_auth(&self.config.token)
            .json(&serde_json::json!({}));
        check_status(SERVICE, request)?;
        Ok(())
    }

    /// Replace the whole worksheet with `df`, header first. Returns the
    /// number of data rows written.
    pub fn replace_with_frame(&mut self, df: &DataFrame) -> Result<usize> {
        let sheet = quote_sheet(&self.sheet);
        self.clear(&sheet)?;
        self.header = None;
        let grid = frame_to_grid(df);
        let request = self
            .client
            .put(self.values_url(&format!("{sheet}!A1"), None)?)
            .query(&[VALUE_INPUT])
            .bearer_auth(&self.config.token)
            .json(&GridBody { values: &grid });
        check_status(SERVICE, request)?;
        debug!(sheet = %self.sheet, rows = df.height(), "worksheet replaced");
        Ok(df.height())
    }
}

impl RecordStore for SheetsStore {
    fn describe(&self) -> String {
        format!("sheets:{}", self.sheet)
    }

    fn read_table(&self, selector: &TableSelector) -> Result<DataFrame> {
        let sheet = selector.table_or(&self.sheet);
        let values = self.get_values(&quote_sheet(sheet))?;
        debug!(sheet, rows = values.len(), "fetched worksheet");
        values_to_frame(&values)
    }

    fn write_row(&mut self, fields: &Fields) -> Result<RecordId> {
        let header = self.header()?;
        let row = align_row(&header, fields);
        let request = self
            .client
            .post(self.values_url(&quote_sheet(&self.sheet), Some("append"))?)
            .query(&[VALUE_INPUT, ("insertDataOption", "INSERT_ROWS")])
            .bearer_auth(&self.config.token)
            .json(&ValuesBody { values: [&row] });
        let response: AppendResponse = send_json(SERVICE, request)?;
        Ok(response.updates.updated_range)
    }

    fn update_row(&mut self, id: &RecordId, fields: &Fields) -> Result<()> {
        let header = self.header()?;
        let existing: Vec<String> = self
            .get_values(id)?
            .first()
            .map(|row| row.iter().map(cell_text).collect())
            .unwrap_or_default();
        let row = merge_row(&header, &existing, fields);
        self.put_row(id, &row)
    }

    fn delete_row(&mut self, id: &RecordId) -> Result<()> {
        self.clear(id)
    }
}

/// A1 notation for a whole worksheet.
pub fn quote_sheet(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

/// Frame from a values grid whose first row is the header. Blank header
/// cells get positional names and repeated ones a positional suffix, so no
/// column is lost.
pub fn values_to_frame(values: &[Vec<Value>]) -> Result<DataFrame> {
    let Some((first, rest)) = values.split_first() else {
        return Ok(frame_from_records(&[], &[])?);
    };
    let header = header_names(first.iter().map(cell_text));
    let rows: Vec<Vec<String>> = rest
        .iter()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    Ok(frame_from_records(&header, &rows)?)
}

fn header_names(cells: impl Iterator<Item = String>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for (idx, cell) in cells.enumerate() {
        let name = cell.trim();
        let mut unique = if name.is_empty() {
            format!("column_{}", idx + 1)
        } else {
            name.to_string()
        };
        if names.contains(&unique) {
            unique = format!("{name}_{}", idx + 1);
        }
        while names.contains(&unique) {
            unique.push('_');
        }
        names.push(unique);
    }
    names
}

/// Header row followed by the frame's rows, all as text.
pub fn frame_to_grid(df: &DataFrame) -> Vec<Vec<String>> {
    let (header, rows) = records_from_frame(df);
    std::iter::once(header).chain(rows).collect()
}

/// Lay `fields` out in header order. Fields the header does not name are
/// dropped with a warning.
pub fn align_row(header: &[String], fields: &Fields) -> Vec<String> {
    merge_row(header, &[], fields)
}

/// Overlay `fields` on an existing row, in header order.
pub fn merge_row(header: &[String], existing: &[String], fields: &Fields) -> Vec<String> {
    for name in fields.keys() {
        if !header.contains(name) {
            warn!(field = %name, "worksheet has no column for field; value dropped");
        }
    }
    header
        .iter()
        .enumerate()
        .map(|(idx, name)| match fields.get(name) {
            Some(value) => cell_text(value),
            None => existing.get(idx).cloned().unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use frman_ingest::{column_names, column_strings};
    use serde_json::json;

    fn header() -> Vec<String> {
        ["Name", "Phone", "City"].iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn grid_becomes_frame() {
        let range: ValueRange = serde_json::from_value(json!({
            "range": "'Requests'!A1:C3",
            "majorDimension": "ROWS",
            "values": [["Name", "", "Zip"], ["Ana", "x", 12345], ["Bo"]]
        }))
        .unwrap();
        let df = values_to_frame(&range.values).unwrap();
        assert_eq!(column_names(&df), vec!["Name", "column_2", "Zip"]);
        assert_eq!(column_strings(&df, "Zip").unwrap(), vec!["12345", ""]);
    }

    #[test]
    fn repeated_header_text_gets_a_suffix() {
        let values = vec![
            vec![json!("Timestamp"), json!("Comments"), json!("Comments")],
            vec![json!("2024-05-01"), json!("first"), json!("second")],
        ];
        let df = values_to_frame(&values).unwrap();
        assert_eq!(column_names(&df), vec!["Timestamp", "Comments", "Comments_3"]);
        assert_eq!(column_strings(&df, "Comments_3").unwrap(), vec!["second"]);
    }

    #[test]
    fn frame_becomes_grid_with_header() {
        let values = vec![
            vec![json!("Name"), json!("Zip")],
            vec![json!("Ana"), json!(12345)],
        ];
        let df = values_to_frame(&values).unwrap();
        assert_eq!(
            frame_to_grid(&df),
            vec![vec!["Name", "Zip"], vec!["Ana", "12345"]]
        );
    }

    #[test]
    fn empty_sheet_has_no_values_key() {
        let range: ValueRange = serde_json::from_value(json!({"range": "A1:Z1000"})).unwrap();
        let df = values_to_frame(&range.values).unwrap();
        assert_eq!(df.height(), 0);
    }

    #[test]
    fn fields_align_to_header() {
        let mut fields = Fields::new();
        fields.insert("City".to_string(), json!(["recA"]));
        fields.insert("Name".to_string(), json!("Ana"));
        fields.insert("Unknown".to_string(), json!("dropped"));
        assert_eq!(align_row(&header(), &fields), vec!["Ana", "", "recA"]);
    }

    #[test]
    fn merge_keeps_untouched_cells() {
        let mut fields = Fields::new();
        fields.insert("Phone".to_string(), json!("(555) 123-4567"));
        let existing = vec!["Ana".to_string(), "old".to_string()];
        assert_eq!(
            merge_row(&header(), &existing, &fields),
            vec!["Ana", "(555) 123-4567", ""]
        );
    }

    #[test]
    fn sheet_names_are_quoted() {
        assert_eq!(quote_sheet("Form Responses 1"), "'Form Responses 1'");
        assert_eq!(quote_sheet("Ana's"), "'Ana''s'");
    }
}
