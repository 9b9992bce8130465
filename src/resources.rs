// File: src/resources.rs
use crate::error::LexiconError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::warn;

fn read_resource(path: &Path) -> Result<String, LexiconError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LexiconError::ResourceNotFound(display_name(path)),
        _ => LexiconError::Io(e),
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Reads a static text resource verbatim, degrading to a placeholder message
/// instead of failing.
pub fn text_or_placeholder(path: &Path) -> String {
    match read_resource(path) {
        Ok(text) => text,
        Err(LexiconError::ResourceNotFound(name)) => {
            warn!(path = %path.display(), "resource missing");
            format!("File {name} not found.")
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "resource unreadable");
            format!("Error reading file: {e}")
        }
    }
}

pub fn help_text(path: &Path) -> String {
    text_or_placeholder(path)
}

pub fn terminology_text(path: &Path) -> String {
    text_or_placeholder(path)
}
