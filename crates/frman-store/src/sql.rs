//! SQLite snapshot store.
//!
//! Every column is stored as `TEXT`. Tables are created on first write and
//! widened when a write names a column the table does not have yet.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use frman_ingest::{frame_from_records, records_from_frame};
use frman_model::{Fields, RecordId};
use polars::prelude::DataFrame;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OptionalExtension, params_from_iter};
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::store::{RecordStore, TableSelector};
use crate::value::cell_text;

/// Column exposing SQLite's row identifier in frames read from a table.
pub const ROWID_COLUMN: &str = "rowid";

/// What [`SqlStore::ingest_frame`] does when the table already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IfExists {
    /// Drop and recreate the table.
    Replace,
    #[default]
    Append,
}

pub struct SqlStore {
    conn: Connection,
    table: String,
}

impl SqlStore {
    pub fn open(path: &Path, table: impl Into<String>) -> Result<Self> {
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened SQLite database");
        Ok(Self {
            conn,
            table: table.into(),
        })
    }

    pub fn in_memory(table: impl Into<String>) -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
            table: table.into(),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Run a query and return its rows as text columns.
    pub fn query_frame(&self, sql: &str) -> Result<DataFrame> {
        let mut stmt = self.conn.prepare(sql)?;
        let header: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let width = header.len();
        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|idx| row.get_ref(idx).map(value_text))
                    .collect::<rusqlite::Result<Vec<String>>>()
            })?
            .collect::<rusqlite::Result<Vec<Vec<String>>>>()?;
        Ok(frame_from_records(&header, &rows)?)
    }

    /// Write a whole frame into `table`. With a `key`, rows whose key value
    /// already exists are deleted first so re-ingesting a snapshot does not
    /// duplicate them. Returns the number of rows written.
    pub fn ingest_frame(
        &self,
        df: &DataFrame,
        table: &str,
        if_exists: IfExists,
        key: Option<&str>,
    ) -> Result<usize> {
        if df.height() == 0 {
            return Ok(0);
        }
        let (header, rows) = records_from_frame(df);
        let tx = self.conn.unchecked_transaction()?;
        if if_exists == IfExists::Replace {
            tx.execute(&format!("DROP TABLE IF EXISTS {}", quote_ident(table)), [])?;
        }
        ensure_columns(&tx, table, &header)?;

        if let Some(key) = key
            && let Some(key_idx) = header.iter().position(|name| name == key)
        {
            let delete = format!(
                "DELETE FROM {} WHERE {} = ?1",
                quote_ident(table),
                quote_ident(key)
            );
            for row in &rows {
                tx.execute(&delete, [&row[key_idx]])?;
            }
        }

        let insert = insert_sql(table, &header);
        {
            let mut stmt = tx.prepare(&insert)?;
            for row in &rows {
                stmt.execute(params_from_iter(row.iter()))?;
            }
        }
        tx.commit()?;
        info!(table, rows = rows.len(), "ingested frame into SQLite");
        Ok(rows.len())
    }

    /// Two-column lookup: `key` → `value` for every row of `table`.
    pub fn get_dict(&self, table: &str, key: &str, value: &str) -> Result<BTreeMap<String, String>> {
        let sql = format!(
            "SELECT {}, {} FROM {}",
            quote_ident(key),
            quote_ident(value),
            quote_ident(table)
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let pairs = stmt
            .query_map([], |row| {
                Ok((
                    value_text(row.get_ref(0)?),
                    value_text(row.get_ref(1)?),
                ))
            })?
            .collect::<rusqlite::Result<BTreeMap<String, String>>>()?;
        Ok(pairs)
    }

    /// First value of `expr` in `table`, optionally filtered. A bare column
    /// name is quoted; an expression such as `MAX(createdTime)` is used as
    /// written.
    pub fn get_var(&self, table: &str, expr: &str, filter: Option<&str>) -> Result<Option<String>> {
        let column = if expr.contains('(') {
            expr.to_string()
        } else {
            quote_ident(expr)
        };
        let sql = format!(
            "SELECT DISTINCT {column} FROM {} WHERE {}",
            quote_ident(table),
            filter.unwrap_or("1=1")
        );
        let value = self
            .conn
            .query_row(&sql, [], |row| row.get_ref(0).map(value_text))
            .optional()?;
        Ok(value)
    }

    pub fn vacuum(&self) -> Result<()> {
        self.conn.execute_batch("VACUUM")?;
        Ok(())
    }

    fn parse_rowid(&self, id: &str) -> Result<i64> {
        id.trim().parse().map_err(|_| StoreError::UnknownRecord {
            id: id.to_string(),
            table: self.table.clone(),
        })
    }
}

impl RecordStore for SqlStore {
    fn describe(&self) -> String {
        format!("sqlite:{}", self.table)
    }

    fn read_table(&self, selector: &TableSelector) -> Result<DataFrame> {
        let target = selector.table_or(&self.table);
        let sql = if is_query(target) {
            target.to_string()
        } else {
            let mut sql = format!("SELECT rowid AS {ROWID_COLUMN}, * FROM {}", quote_ident(target));
            if let Some(filter) = &selector.filter {
                sql.push_str(" WHERE ");
                sql.push_str(filter);
            }
            sql
        };
        self.query_frame(&sql)
    }

    fn write_row(&mut self, fields: &Fields) -> Result<RecordId> {
        if fields.is_empty() {
            return Err(StoreError::Rejected {
                message: "no fields to insert".to_string(),
            });
        }
        let header: Vec<String> = fields.keys().cloned().collect();
        ensure_columns(&self.conn, &self.table, &header)?;
        let values: Vec<String> = fields.values().map(cell_text).collect();
        self.conn
            .execute(&insert_sql(&self.table, &header), params_from_iter(values.iter()))?;
        Ok(self.conn.last_insert_rowid().to_string())
    }

    fn update_row(&mut self, id: &RecordId, fields: &Fields) -> Result<()> {
        if fields.is_empty() {
            return Ok(());
        }
        let rowid = self.parse_rowid(id)?;
        let header: Vec<String> = fields.keys().cloned().collect();
        ensure_columns(&self.conn, &self.table, &header)?;
        let assignments: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(idx, name)| format!("{} = ?{}", quote_ident(name), idx + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE rowid = {rowid}",
            quote_ident(&self.table),
            assignments.join(", ")
        );
        let values: Vec<String> = fields.values().map(cell_text).collect();
        let changed = self.conn.execute(&sql, params_from_iter(values.iter()))?;
        if changed == 0 {
            return Err(StoreError::UnknownRecord {
                id: id.clone(),
                table: self.table.clone(),
            });
        }
        Ok(())
    }

    fn delete_row(&mut self, id: &RecordId) -> Result<()> {
        let rowid = self.parse_rowid(id)?;
        let sql = format!("DELETE FROM {} WHERE rowid = ?1", quote_ident(&self.table));
        let changed = self.conn.execute(&sql, [rowid])?;
        if changed == 0 {
            return Err(StoreError::UnknownRecord {
                id: id.clone(),
                table: self.table.clone(),
            });
        }
        Ok(())
    }
}

fn is_query(target: &str) -> bool {
    let head = target.trim_start();
    ["select", "with"].iter().any(|keyword| {
        head.get(..keyword.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(keyword))
    })
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn insert_sql(table: &str, header: &[String]) -> String {
    let columns: Vec<String> = header.iter().map(|name| quote_ident(name)).collect();
    let placeholders: Vec<String> = (1..=header.len()).map(|idx| format!("?{idx}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        columns.join(", "),
        placeholders.join(", ")
    )
}

/// Create `table` if needed and add any of `columns` it lacks.
fn ensure_columns(conn: &Connection, table: &str, columns: &[String]) -> Result<()> {
    let existing = table_columns(conn, table)?;
    if existing.is_empty() {
        let defs: Vec<String> = columns
            .iter()
            .map(|name| format!("{} TEXT", quote_ident(name)))
            .collect();
        conn.execute(
            &format!("CREATE TABLE {} ({})", quote_ident(table), defs.join(", ")),
            [],
        )?;
        debug!(table, columns = columns.len(), "created SQLite table");
        return Ok(());
    }
    for name in columns {
        if !existing.contains(name) {
            conn.execute(
                &format!(
                    "ALTER TABLE {} ADD COLUMN {} TEXT",
                    quote_ident(table),
                    quote_ident(name)
                ),
                [],
            )?;
            debug!(table, column = %name, "added SQLite column");
        }
    }
    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_ident(table)))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<BTreeSet<String>>>()?;
    Ok(names)
}

fn value_text(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(number) => number.to_string(),
        ValueRef::Real(number) => number.to_string(),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => String::from_utf8_lossy(bytes).into_owned(),
    }
}
