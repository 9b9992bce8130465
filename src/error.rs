// File: src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Every failure the lexicon pipeline can report.
#[derive(Debug, Error)]
pub enum LexiconError {
    /// The PDF could not be opened or parsed.
    #[error("error reading PDF {path}: {cause}")]
    Extraction { path: PathBuf, cause: String },

    /// A help/terminology resource is missing. Degraded to placeholder text.
    #[error("file {0} not found")]
    ResourceNotFound(String),

    /// Export was requested before any document was loaded.
    #[error("nothing to export, load a PDF first")]
    EmptyStore,

    /// No record carries this wordform.
    #[error("wordform '{0}' not found")]
    NotFound(String),

    /// Malformed line in a dictionary source file.
    #[error("dictionary line {line}: {reason}")]
    Dictionary { line: usize, reason: String },

    #[error("unknown sort key '{0}' (expected lemma, form, form_freq or lemma_freq)")]
    UnknownSortKey(String),

    #[error("invalid csv: {0}")]
    InvalidCsv(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("dictionary cache error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LexiconError>;
