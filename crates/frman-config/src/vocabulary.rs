//! Controlled vocabulary (`config/vocabulary.yml`).

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use frman_model::{IntakeColumns, OTHER_NEED};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

const INLINE_SOURCE: &str = "<inline>";

/// Literals identifying the respondent's language choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageSplit {
    /// Column holding the language-preference answer.
    pub question: String,
    pub english: String,
    pub spanish: String,
    /// Spanish column name to English column name.
    #[serde(skip)]
    pub spanish_to_english: BTreeMap<String, String>,
}

impl Default for LanguageSplit {
    fn default() -> Self {
        Self {
            question: "language_pref".to_string(),
            english: "I prefer to respond in English.".to_string(),
            spanish: "Prefiero responder en espanol.".to_string(),
            spanish_to_english: BTreeMap::new(),
        }
    }
}

/// Known need phrases and the tables that map intake answers onto the
/// destination. Loaded once per run and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    /// Phrases searched for in the needs answer, in match order. A phrase
    /// that is a prefix of a later one must come after it.
    pub default_needs: Vec<String>,
    /// Need phrase to destination service tag.
    pub need_tags: BTreeMap<String, String>,
    pub spanish_to_english: BTreeMap<String, String>,
    pub language: LanguageSplit,
    pub columns: IntakeColumns,
}

impl Vocabulary {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::parse(&text, path)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Self::parse(text, Path::new(INLINE_SOURCE))
    }

    fn parse(text: &str, origin: &Path) -> Result<Self> {
        let vocabulary: Self =
            serde_yaml::from_str(text).map_err(|e| ConfigError::yaml(origin, e))?;
        vocabulary.validate()?;
        Ok(vocabulary)
    }

    /// Vocabulary whose tags equal the phrases themselves.
    pub fn identity<I, S>(needs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let default_needs: Vec<String> = needs.into_iter().map(Into::into).collect();
        let need_tags = default_needs
            .iter()
            .chain(std::iter::once(&OTHER_NEED.to_string()))
            .map(|phrase| (phrase.clone(), phrase.clone()))
            .collect();
        Self {
            default_needs,
            need_tags,
            ..Self::default()
        }
    }

    /// Every phrase the normalizer can emit, `Other` included, must have a
    /// tag. Checked before the batch starts.
    pub fn validate(&self) -> Result<()> {
        if self.default_needs.is_empty() {
            return Err(ConfigError::missing("default_needs"));
        }
        let other = OTHER_NEED.to_string();
        for phrase in self.default_needs.iter().chain(std::iter::once(&other)) {
            match self.need_tags.get(phrase) {
                Some(tag) if !tag.trim().is_empty() => {}
                _ => {
                    return Err(ConfigError::UnmappedNeed {
                        phrase: phrase.clone(),
                    });
                }
            }
        }
        if self.language.english == self.language.spanish {
            return Err(ConfigError::InvalidValue {
                key: "language".to_string(),
                message: "english and spanish literals must differ".to_string(),
            });
        }
        Ok(())
    }

    pub fn tag_for(&self, phrase: &str) -> Option<&str> {
        self.need_tags.get(phrase).map(String::as_str)
    }

    /// Splitter settings with the translation table attached.
    pub fn language_split(&self) -> LanguageSplit {
        LanguageSplit {
            spanish_to_english: self.spanish_to_english.clone(),
            ..self.language.clone()
        }
    }
}
