// File: src/core/store.rs
use crate::core::aggregator::Aggregation;
use crate::core::types::{DocumentStats, Record, SortKey};
use crate::error::{LexiconError, Result};

/// In-memory holder of the current record list.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    stats: DocumentStats,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops whatever was loaded before and takes the new aggregation.
    pub fn replace(&mut self, aggregation: Aggregation) {
        self.records.clear();
        self.records.extend(aggregation.records);
        self.stats = aggregation.stats;
    }

    pub fn sort(&mut self, key: SortKey) {
        self.records.sort_by(|a, b| key.compare(a, b));
    }

    /// Snapshot of the records whose wordform or lemma contains `query`,
    /// ignoring case. A blank query returns everything in store order.
    pub fn filter(&self, query: &str) -> Vec<Record> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.records.clone();
        }
        self.records.iter().filter(|r| r.matches(&needle)).cloned().collect()
    }

    pub fn update_annotation(&mut self, form: &str, text: &str) -> Result<()> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.form == form)
            .ok_or_else(|| LexiconError::NotFound(form.to_string()))?;
        record.morph_info = text.to_string();
        Ok(())
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn stats(&self) -> DocumentStats {
        self.stats
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
