//! Airtable REST client bound to one table.

use frman_model::{Fields, RecordId};
use polars::prelude::DataFrame;
use reqwest::Url;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::http::{build_client, check_status, join_url, send_json};
use crate::record::{StoredRecord, records_to_frame};
use crate::store::{RecordStore, TableSelector};

const SERVICE: &str = "Airtable";

/// Connection settings for one base.
#[derive(Debug, Clone)]
pub struct AirtableConfig {
    pub endpoint: String,
    pub base: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

pub struct AirtableStore {
    client: Client,
    config: AirtableConfig,
    table: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListPage {
    #[serde(default)]
    pub(crate) records: Vec<StoredRecord>,
    #[serde(default)]
    pub(crate) offset: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct WriteBody<'a> {
    pub(crate) fields: &'a Fields,
    pub(crate) typecast: bool,
}

impl AirtableStore {
    pub fn new(config: AirtableConfig, table: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout_secs)?,
            config,
            table: table.into(),
        })
    }

    fn table_url(&self, table: &str) -> Result<Url> {
        join_url(&self.config.endpoint, &[&self.config.base, table])
    }

    fn record_url(&self, id: &str) -> Result<Url> {
        join_url(&self.config.endpoint, &[&self.config.base, &self.table, id])
    }

    /// Every record of the selected table, following `offset` pagination.
    pub fn list_records(&self, selector: &TableSelector) -> Result<Vec<StoredRecord>> {
        let url = self.table_url(selector.table_or(&self.table))?;
        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        loop {
            let mut request = self.client.get(url.clone()).bearer_auth(&self.config.api_key);
            if let Some(formula) = &selector.filter {
                request = request.query(&[("filterByFormula", formula.as_str())]);
            }
            if let Some(token) = &offset {
                request = request.query(&[("offset", token.as_str())]);
            }
            let page: ListPage = send_json(SERVICE, request)?;
            debug!(records = page.records.len(), "fetched Airtable page");
            records.extend(page.records);
            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }
        Ok(records)
    }
}

impl RecordStore for AirtableStore {
    fn describe(&self) -> String {
        format!("airtable:{}", self.table)
    }

    fn read_table(&self, selector: &TableSelector) -> Result<DataFrame> {
        records_to_frame(&self.list_records(selector)?)
    }

    fn write_row(&mut self, fields: &Fields) -> Result<RecordId> {
        let request = self
            .client
            .post(self.table_url(&self.table)?)
            .bearer_auth(&self.config.api_key)
            .json(&WriteBody {
                fields,
                typecast: true,
            });
        let created: StoredRecord = send_json(SERVICE, request)?;
        Ok(created.id)
    }

    fn update_row(&mut self, id: &RecordId, fields: &Fields) -> Result<()> {
        let request = self
            .client
            .patch(self.record_url(id)?)
            .bearer_auth(&self.config.api_key)
            .json(&WriteBody {
                fields,
                typecast: true,
            });
        check_status(SERVICE, request)?;
        Ok(())
    }

    fn delete_row(&mut self, id: &RecordId) -> Result<()> {
        let request = self
            .client
            .delete(self.record_url(id)?)
            .bearer_auth(&self.config.api_key);
        check_status(SERVICE, request)?;
        Ok(())
    }
}
