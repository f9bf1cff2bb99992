//! Intake row → destination record.

use frman_config::Vocabulary;
use frman_model::{
    DestinationRecord, IntakeRow, Language, PhoneOmission, PhoneOutcome, PostalResolution,
};
use tracing::debug;

use crate::details::{DetailsInput, render_details};
use crate::error::{Result, TransformError};
use crate::needs::normalize_needs;
use crate::phone::PhoneFormatter;
use crate::postal::PostalLookup;
use crate::source_key::source_key;

/// Non-fatal observations about a transformed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowNote {
    /// A phone number was given but could not be used.
    PhoneOmitted(PhoneOmission),
    /// A postal code was given but is not in the lookup table.
    PostalUnresolved(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    pub record: DestinationRecord,
    pub notes: Vec<RowNote>,
}

/// Builds destination records from intake rows using shared, read-only
/// lookups.
#[derive(Debug, Clone, Copy)]
pub struct RecordTransformer<'a> {
    vocabulary: &'a Vocabulary,
    postal: &'a PostalLookup,
    phone: &'a PhoneFormatter,
}

impl<'a> RecordTransformer<'a> {
    pub fn new(
        vocabulary: &'a Vocabulary,
        postal: &'a PostalLookup,
        phone: &'a PhoneFormatter,
    ) -> Self {
        Self {
            vocabulary,
            postal,
            phone,
        }
    }

    /// Transform one row from the `language` partition. The partition, not
    /// the row's own tag column, decides the record's language.
    pub fn transform(&self, row: &IntakeRow, language: Language) -> Result<Transformed> {
        let fields = row.fields(&self.vocabulary.columns);
        let mut notes = Vec::new();

        let matched = normalize_needs(fields.needs, &self.vocabulary.default_needs);
        let mut services: Vec<String> = Vec::with_capacity(matched.needs.len());
        for need in &matched.needs {
            let tag = self
                .vocabulary
                .tag_for(need)
                .ok_or_else(|| TransformError::UnmappedNeed {
                    phrase: need.clone(),
                })?;
            if !services.iter().any(|existing| existing == tag) {
                services.push(tag.to_string());
            }
        }

        let postal = self.postal.resolve(fields.postal_code);
        if postal == PostalResolution::Unresolved && !fields.postal_code.is_empty() {
            notes.push(RowNote::PostalUnresolved(fields.postal_code.to_string()));
        }

        let phone = self.phone.format(fields.phone);
        if let PhoneOutcome::Omitted(reason) = phone
            && reason != PhoneOmission::Blank
        {
            notes.push(RowNote::PhoneOmitted(reason));
        }

        let details = render_details(&DetailsInput {
            contact_preference: fields.contact_preference,
            phone: phone.formatted().unwrap_or(fields.phone),
            email: fields.email,
            location: fields.postal_code,
            mobility: fields.mobility,
            language: language.as_str(),
            needs_remainder: &matched.remainder,
            additional_details: fields.details,
        });

        debug!(
            services = services.len(),
            postal_resolved = postal.is_resolved(),
            notes = notes.len(),
            "transformed intake row"
        );

        Ok(Transformed {
            record: DestinationRecord {
                name: fields.name.to_string(),
                email: fields.email.to_string(),
                phone: phone.formatted().map(str::to_string),
                postal_ref: postal.id().map(str::to_string),
                services,
                details,
                language,
                source_key: Some(source_key(row, &self.vocabulary.columns)),
            },
            notes,
        })
    }
}
