// File: src/export.rs
//! CSV and plain-text serialization of the full record list.

use crate::core::types::Record;
use crate::error::{LexiconError, Result};
use crate::persistence::write_atomically;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

pub const CSV_HEADER: [&str; 5] = [
    "Wordform",
    "Lemma",
    "Wordform frequency",
    "Lemma frequency",
    "Morphological info",
];

/// Lets spreadsheet tools detect UTF-8 and show Cyrillic correctly.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const TXT_TITLE: &str = "=== Lexemes and wordforms ===";
const EMPTY_PLACEHOLDER: &str = "—";

fn ensure_not_empty(records: &[Record]) -> Result<()> {
    if records.is_empty() {
        return Err(LexiconError::EmptyStore);
    }
    Ok(())
}

pub fn write_csv<W: Write>(records: &[Record], mut out: W) -> Result<()> {
    out.write_all(UTF8_BOM)?;
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(CSV_HEADER)?;
    for r in records {
        let form_freq = r.form_freq.to_string();
        let lemma_freq = r.lemma_freq.to_string();
        writer.write_record([
            r.form.as_str(),
            r.lemma.as_str(),
            form_freq.as_str(),
            lemma_freq.as_str(),
            r.morph_info.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_txt<W: Write>(records: &[Record], mut out: W) -> Result<()> {
    writeln!(out, "{TXT_TITLE}\n")?;
    let divider = "-".repeat(60);
    for r in records {
        let morph = if r.morph_info.is_empty() { EMPTY_PLACEHOLDER } else { r.morph_info.as_str() };
        writeln!(out, "Wordform: {}", r.form)?;
        writeln!(out, "Lemma:    {}", r.lemma)?;
        writeln!(out, "Wordform frequency: {}", r.form_freq)?;
        writeln!(out, "Lemma frequency: {}", r.lemma_freq)?;
        writeln!(out, "Morphology: {morph}")?;
        writeln!(out, "{divider}\n")?;
    }
    Ok(())
}

/// Writes `records` as a BOM-prefixed CSV at `path`. Refuses an empty list.
pub fn export_csv(records: &[Record], path: &Path) -> Result<()> {
    ensure_not_empty(records)?;
    write_atomically(path, |w| write_csv(records, w))?;
    info!(path = %path.display(), rows = records.len(), "exported csv");
    Ok(())
}

/// Writes `records` as human-readable blocks at `path`. Refuses an empty list.
pub fn export_txt(records: &[Record], path: &Path) -> Result<()> {
    ensure_not_empty(records)?;
    write_atomically(path, |w| write_txt(records, w))?;
    info!(path = %path.display(), rows = records.len(), "exported txt");
    Ok(())
}

/// Parses a CSV written by [`write_csv`] back into records.
pub fn parse_csv<R: Read>(input: R) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(input);
    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let field = |i: usize| row.get(i).unwrap_or_default().to_string();
        let number = |i: usize| {
            row.get(i)
                .unwrap_or_default()
                .parse::<u64>()
                .map_err(|e| LexiconError::InvalidCsv(format!("bad frequency column {i}: {e}")))
        };
        records.push(Record {
            form: field(0),
            lemma: field(1),
            form_freq: number(2)?,
            lemma_freq: number(3)?,
            morph_info: field(4),
        });
    }
    Ok(records)
}

pub fn read_csv(path: &Path) -> Result<Vec<Record>> {
    let bytes = std::fs::read(path)?;
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes[..]);
    parse_csv(body)
}
