//! Destination records and their store payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::language::Language;

/// Field payload exchanged with record stores.
pub type Fields = serde_json::Map<String, Value>;

/// Identifier assigned by a record store on insert.
pub type RecordId = String;

/// Destination field names, configurable per destination table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DestinationFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub postal_ref: String,
    pub services: String,
    pub details: String,
    pub language: Option<String>,
    /// Field storing the source fingerprint; `None` disables re-import checks.
    pub source_key: Option<String>,
    /// Write the postal reference as a one-element link array.
    pub postal_link: bool,
}

impl Default for DestinationFields {
    fn default() -> Self {
        Self {
            name: "Name".to_string(),
            email: "Email".to_string(),
            phone: "Phone".to_string(),
            postal_ref: "City".to_string(),
            services: "Services".to_string(),
            details: "Details".to_string(),
            language: Some("Language".to_string()),
            source_key: None,
            postal_link: true,
        }
    }
}

/// The transformed, write-ready output record for one intake row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationRecord {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub postal_ref: Option<String>,
    pub services: Vec<String>,
    pub details: String,
    pub language: Language,
    pub source_key: Option<String>,
}

impl DestinationRecord {
    /// Copy of this record with the phone field dropped, used for the
    /// single retry after a rejected write.
    #[must_use]
    pub fn without_phone(&self) -> Self {
        Self {
            phone: None,
            ..self.clone()
        }
    }

    /// Build the store payload. Absent and blank values are left out rather
    /// than written as empty strings.
    pub fn to_fields(&self, names: &DestinationFields) -> Fields {
        let mut fields = Fields::new();
        insert_text(&mut fields, &names.name, &self.name);
        insert_text(&mut fields, &names.email, &self.email);
        if let Some(phone) = &self.phone {
            insert_text(&mut fields, &names.phone, phone);
        }
        if let Some(postal_ref) = &self.postal_ref {
            let value = if names.postal_link {
                Value::Array(vec![Value::String(postal_ref.clone())])
            } else {
                Value::String(postal_ref.clone())
            };
            fields.insert(names.postal_ref.clone(), value);
        }
        if !self.services.is_empty() {
            fields.insert(
                names.services.clone(),
                Value::Array(self.services.iter().cloned().map(Value::String).collect()),
            );
        }
        insert_text(&mut fields, &names.details, &self.details);
        if let Some(language) = &names.language {
            insert_text(&mut fields, language, self.language.as_str());
        }
        if let (Some(field), Some(key)) = (&names.source_key, &self.source_key) {
            insert_text(&mut fields, field, key);
        }
        fields
    }
}

fn insert_text(fields: &mut Fields, name: &str, value: &str) {
    if !value.trim().is_empty() {
        fields.insert(name.to_string(), Value::String(value.to_string()));
    }
}
