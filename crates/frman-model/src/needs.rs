use serde::{Deserialize, Serialize};

/// Synthetic tag appended when free text remains after vocabulary matching.
pub const OTHER_NEED: &str = "Other";

/// Result of matching a free-text needs answer against the vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeedsMatch {
    /// Matched vocabulary phrases in vocabulary order, then `Other` if any
    /// text was left over.
    pub needs: Vec<String>,
    /// Text left after stripping matched phrases; empty when only
    /// whitespace remained.
    pub remainder: String,
}

impl NeedsMatch {
    pub fn has_other(&self) -> bool {
        self.needs.iter().any(|need| need == OTHER_NEED)
    }

    pub fn is_empty(&self) -> bool {
        self.needs.is_empty()
    }
}
