// File: src/config.rs
use crate::core::types::SortKey;
use crate::error::{LexiconError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Session settings. Every field has a default, so a config file only needs
/// the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub help_path: PathBuf,
    pub terminology_path: PathBuf,
    /// TSV source or `.bin` cache; `None` means every word is its own lemma.
    pub dictionary_path: Option<PathBuf>,
    /// Order applied right after each load.
    pub default_sort: SortKey,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            help_path: PathBuf::from("help.txt"),
            terminology_path: PathBuf::from("terminology.txt"),
            dictionary_path: None,
            default_sort: SortKey::Lemma,
        }
    }
}

impl Config {
    pub fn from_json(source: &str) -> Result<Self> {
        serde_json::from_str(source).map_err(|e| LexiconError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .map_err(|e| LexiconError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&source)
    }

    /// Loads `path` when given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}
