//! The free-text details blob written with each destination record.

/// Section labels in render order.
pub const CONTACT_PREFERENCE: &str = "Contact Preference";
pub const PHONE: &str = "Phone";
pub const EMAIL: &str = "Email";
pub const LOCATION: &str = "Location";
pub const MOBILITY: &str = "Mobility";
pub const LANGUAGE: &str = "Language";
pub const NEEDS: &str = "What do you need?";
pub const ADDITIONAL_DETAILS: &str = "Additional Details";

/// Values for each details section. Blank values are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetailsInput<'a> {
    pub contact_preference: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
    pub location: &'a str,
    pub mobility: &'a str,
    pub language: &'a str,
    /// Needs text left over after vocabulary matching.
    pub needs_remainder: &'a str,
    pub additional_details: &'a str,
}

impl DetailsInput<'_> {
    fn sections(&self) -> [(&'static str, &str); 8] {
        [
            (CONTACT_PREFERENCE, self.contact_preference),
            (PHONE, self.phone),
            (EMAIL, self.email),
            (LOCATION, self.location),
            (MOBILITY, self.mobility),
            (LANGUAGE, self.language),
            (NEEDS, self.needs_remainder),
            (ADDITIONAL_DETAILS, self.additional_details),
        ]
    }
}

/// Render `"<Label>:\n<value>\n\n"` per non-empty section, with the
/// trailing blank lines trimmed.
pub fn render_details(input: &DetailsInput<'_>) -> String {
    let mut blob = String::new();
    for (label, value) in input.sections() {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        blob.push_str(label);
        blob.push_str(":\n");
        blob.push_str(value);
        blob.push_str("\n\n");
    }
    blob.truncate(blob.trim_end().len());
    blob
}
