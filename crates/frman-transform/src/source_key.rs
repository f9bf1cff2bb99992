//! Row fingerprints for idempotent re-imports.

use frman_model::{IntakeColumns, IntakeRow};
use sha2::{Digest, Sha256};

/// Bytes of the SHA-256 digest kept in the key.
const KEY_BYTES: usize = 16;

/// Hex fingerprint of the identifying fields (name, email, phone, postal
/// code, needs). Whitespace around values does not change the key.
pub fn source_key(row: &IntakeRow, columns: &IntakeColumns) -> String {
    let fields = row.fields(columns);
    let parts = [
        fields.name,
        fields.email,
        fields.phone,
        fields.postal_code,
        fields.needs.trim(),
    ];
    let mut hasher = Sha256::new();
    for (idx, part) in parts.iter().enumerate() {
        if idx > 0 {
            hasher.update([0u8]);
        }
        hasher.update(part.as_bytes());
    }
    let digest = hasher.finalize();
    hex::encode(&digest[..KEY_BYTES])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_stable_and_field_sensitive() {
        let columns = IntakeColumns::default();
        let row = IntakeRow::new()
            .with("name", "Ana")
            .with("zip", "12345")
            .with("needs", "Food");
        let padded = IntakeRow::new()
            .with("name", " Ana ")
            .with("zip", "12345")
            .with("needs", "Food ");
        let other = row.clone().with("zip", "67890");

        let key = source_key(&row, &columns);
        assert_eq!(key.len(), 32);
        assert_eq!(key, source_key(&padded, &columns));
        assert_ne!(key, source_key(&other, &columns));
    }

    #[test]
    fn separator_prevents_field_bleed() {
        let columns = IntakeColumns::default();
        let a = IntakeRow::new().with("name", "Ana").with("email", "b");
        let b = IntakeRow::new().with("name", "An").with("email", "ab");
        assert_ne!(source_key(&a, &columns), source_key(&b, &columns));
    }
}
