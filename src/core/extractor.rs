// File: src/core/extractor.rs
//! Turns a PDF into the ordered sequence of lowercase word tokens.

use crate::error::{LexiconError, Result};
use regex::Regex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info};

fn hyphen_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-\s*\n\s*").expect("static pattern"))
}

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static pattern"))
}

/// Runs of word characters, optionally joined by internal hyphens
/// ("какой-то" is one unit and is later dropped as non-alphabetic).
fn word_unit() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\w+(?:-\w+)*").expect("static pattern"))
}

/// Letters only (Unicode category L). Letter-numbers such as "Ⅻ" are
/// excluded even though `char::is_alphabetic` accepts them.
fn letters_only() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\p{L}+$").expect("static pattern"))
}

/// Joins words split across lines and collapses whitespace.
/// Hyphen repair must run first: it needs the newlines.
pub fn normalize(raw: &str) -> String {
    let joined = hyphen_break().replace_all(raw, "");
    whitespace_run().replace_all(&joined, " ").into_owned()
}

/// Splits normalized text into lowercase tokens made only of letters.
pub fn tokenize(raw: &str) -> Vec<String> {
    let text = normalize(raw);
    word_unit()
        .find_iter(&text)
        .map(|m| m.as_str())
        .filter(|token| letters_only().is_match(token))
        .map(str::to_lowercase)
        .collect()
}

/// Reads every page of the PDF at `path`, joined by newlines in page order.
pub fn extract_text(path: &Path) -> Result<String> {
    let extraction_error = |cause: String| LexiconError::Extraction {
        path: path.to_path_buf(),
        cause,
    };

    let bytes = std::fs::read(path).map_err(|e| extraction_error(e.to_string()))?;

    // The PDF parser panics on some malformed inputs instead of erroring.
    let pages = catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem_by_pages(&bytes)))
        .map_err(|_| extraction_error("malformed PDF structure".to_string()))?
        .map_err(|e| extraction_error(e.to_string()))?;

    for (i, page) in pages.iter().enumerate() {
        if page.trim().is_empty() {
            debug!(page = i + 1, "page yielded no text");
        }
    }

    Ok(pages.join("\n"))
}

/// Extracts and tokenizes a PDF in one step.
pub fn extract_words(path: &Path) -> Result<Vec<String>> {
    let text = extract_text(path)?;
    let words = tokenize(&text);
    info!(path = %path.display(), tokens = words.len(), "extracted words");
    Ok(words)
}
