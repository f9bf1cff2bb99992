//! Splitting intake frames by response language.
//!
//! The intake sheet carries every question twice, once per language. The
//! splitter keeps the English copy of each column for English respondents
//! and the Spanish copy, renamed to its English name, for Spanish ones.

use std::collections::BTreeSet;

use frman_config::LanguageSplit;
use frman_ingest::{column_names, column_strings, has_column};
use frman_model::Language;
use polars::prelude::*;
use tracing::{debug, warn};

use crate::error::{Result, missing_column};

/// Column added to both output frames.
pub const LANGUAGE_COLUMN: &str = "language";

#[derive(Debug, Clone)]
pub struct LanguageSplitResult {
    pub english: DataFrame,
    pub spanish: DataFrame,
    /// Rows whose answer matched neither literal. They are dropped.
    pub unrecognized: usize,
}

impl LanguageSplitResult {
    pub fn frame(&self, language: Language) -> &DataFrame {
        match language {
            Language::English => &self.english,
            Language::Spanish => &self.spanish,
        }
    }
}

/// Partition `df` by the language-preference column.
pub fn split_by_language(df: &DataFrame, split: &LanguageSplit) -> Result<LanguageSplitResult> {
    if !has_column(df, &split.question) {
        return Err(missing_column(&split.question));
    }

    let answers = column_strings(df, &split.question)?;
    let english_mask: Vec<bool> = answers.iter().map(|a| *a == split.english).collect();
    let spanish_mask: Vec<bool> = answers.iter().map(|a| *a == split.spanish).collect();
    let unrecognized = answers
        .iter()
        .filter(|a| **a != split.english && **a != split.spanish)
        .count();

    let spanish_columns: BTreeSet<&str> =
        split.spanish_to_english.keys().map(String::as_str).collect();
    let english_columns: BTreeSet<&str> =
        split.spanish_to_english.values().map(String::as_str).collect();
    let names = column_names(df);

    let english_plan: Vec<(String, String)> = names
        .iter()
        .filter(|name| {
            name.as_str() != split.question
                && name.as_str() != LANGUAGE_COLUMN
                && !spanish_columns.contains(name.as_str())
        })
        .map(|name| (name.clone(), name.clone()))
        .collect();
    let spanish_plan: Vec<(String, String)> = names
        .iter()
        .filter(|name| {
            name.as_str() != split.question
                && name.as_str() != LANGUAGE_COLUMN
                && !english_columns.contains(name.as_str())
        })
        .map(|name| {
            let target = split
                .spanish_to_english
                .get(name)
                .cloned()
                .unwrap_or_else(|| name.clone());
            (name.clone(), target)
        })
        .collect();

    let english = project(df, &english_mask, &english_plan, Language::English)?;
    let spanish = project(df, &spanish_mask, &spanish_plan, Language::Spanish)?;

    if unrecognized > 0 {
        warn!(
            rows = unrecognized,
            column = %split.question,
            "dropping rows with unrecognized language preference"
        );
    }
    debug!(
        english = english.height(),
        spanish = spanish.height(),
        "split intake rows by language"
    );

    Ok(LanguageSplitResult {
        english,
        spanish,
        unrecognized,
    })
}

/// Keep the masked rows and the planned columns, renaming as planned, then
/// append the language tag.
fn project(
    df: &DataFrame,
    keep: &[bool],
    plan: &[(String, String)],
    language: Language,
) -> Result<DataFrame> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    let filtered = df.filter(&mask)?;

    let mut columns: Vec<Column> = Vec::with_capacity(plan.len() + 1);
    for (source, target) in plan {
        let values = column_strings(&filtered, source)?;
        columns.push(Series::new(target.as_str().into(), values).into());
    }
    let tags = vec![language.as_str().to_string(); filtered.height()];
    columns.push(Series::new(LANGUAGE_COLUMN.into(), tags).into());
    Ok(DataFrame::new(columns)?)
}
