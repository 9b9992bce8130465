// src/core/types.rs
use crate::error::LexiconError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// One entry per unique wordform observed in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Lowercase alphabetic wordform. Unique within a store.
    pub form: String,
    /// Normal form resolved by the morphological analyzer.
    pub lemma: String,
    /// Occurrences of `form` in the document.
    pub form_freq: u64,
    /// Sum of `form_freq` over every record sharing `lemma`.
    pub lemma_freq: u64,
    /// Free-text user annotation, empty until edited.
    pub morph_info: String,
}

impl Record {
    /// Case-insensitive substring match against the wordform or the lemma.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.form.to_lowercase().contains(needle) || self.lemma.to_lowercase().contains(needle)
    }
}

/// Counts derived from the current record list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub total_tokens: u64,
    pub wordform_count: usize,
    pub lexeme_count: usize,
}

/// Columns the record table can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Lemma ascending, ties broken by wordform ascending.
    #[default]
    Lemma,
    /// Wordform ascending.
    Form,
    /// Wordform frequency descending.
    FormFreq,
    /// Lemma frequency descending.
    LemmaFreq,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [SortKey::Lemma, SortKey::Form, SortKey::FormFreq, SortKey::LemmaFreq];

    pub fn compare(self, a: &Record, b: &Record) -> Ordering {
        match self {
            SortKey::Lemma => a.lemma.cmp(&b.lemma).then_with(|| a.form.cmp(&b.form)),
            SortKey::Form => a.form.cmp(&b.form),
            SortKey::FormFreq => b.form_freq.cmp(&a.form_freq),
            SortKey::LemmaFreq => b.lemma_freq.cmp(&a.lemma_freq),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Lemma => "lemma",
            SortKey::Form => "form",
            SortKey::FormFreq => "form_freq",
            SortKey::LemmaFreq => "lemma_freq",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = LexiconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| LexiconError::UnknownSortKey(s.to_string()))
    }
}
