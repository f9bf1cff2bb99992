//! Explicit outcomes for the non-critical lookups.
//!
//! Postal and phone failures never abort a row; callers match on these
//! enums and leave the destination field out.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result of resolving a raw postal code against the lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostalResolution {
    Resolved(String),
    Unresolved,
}

impl PostalResolution {
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Resolved(id) => Some(id),
            Self::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// Why a phone number was left out of the destination record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhoneOmission {
    Blank,
    Unparsable,
    InvalidLength,
}

impl fmt::Display for PhoneOmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Blank => "blank",
            Self::Unparsable => "unparsable",
            Self::InvalidLength => "invalid length",
        };
        f.write_str(label)
    }
}

/// Result of formatting a raw phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhoneOutcome {
    Formatted(String),
    Omitted(PhoneOmission),
}

impl PhoneOutcome {
    pub fn formatted(&self) -> Option<&str> {
        match self {
            Self::Formatted(value) => Some(value),
            Self::Omitted(_) => None,
        }
    }
}
