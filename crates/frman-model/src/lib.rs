pub mod error;
pub mod intake;
pub mod language;
pub mod needs;
pub mod outcome;
pub mod record;

pub use error::{ModelError, Result};
pub use intake::{IntakeColumns, IntakeFields, IntakeRow};
pub use language::Language;
pub use needs::{NeedsMatch, OTHER_NEED};
pub use outcome::{PhoneOmission, PhoneOutcome, PostalResolution};
pub use record::{DestinationFields, DestinationRecord, Fields, RecordId};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_match_other_flag() {
        let matched = NeedsMatch {
            needs: vec!["Food".to_string(), OTHER_NEED.to_string()],
            remainder: "extra blankets".to_string(),
        };
        assert!(matched.has_other());
        assert!(!matched.is_empty());
        assert!(NeedsMatch::default().is_empty());
    }

    #[test]
    fn outcomes_expose_values() {
        assert_eq!(
            PostalResolution::Resolved("rec1".to_string()).id(),
            Some("rec1")
        );
        assert_eq!(PostalResolution::Unresolved.id(), None);
        assert_eq!(
            PhoneOutcome::Formatted("(555) 123-4567".to_string()).formatted(),
            Some("(555) 123-4567")
        );
        assert_eq!(
            PhoneOutcome::Omitted(PhoneOmission::Unparsable).formatted(),
            None
        );
    }
}
