// File: src/core/aggregator.rs
use crate::core::morph::{resolve_lemma, MorphAnalyzer};
use crate::core::types::{DocumentStats, Record};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use tracing::info;

/// Records and statistics produced from one token sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub records: Vec<Record>,
    pub stats: DocumentStats,
}

/// Counts wordforms, resolves lemmas and folds frequencies up to lemma level.
pub fn aggregate<S: AsRef<str>>(tokens: &[S], analyzer: &dyn MorphAnalyzer) -> Aggregation {
    // BTreeMap gives the lexicographic iteration order for free.
    let mut form_counts: BTreeMap<&str, u64> = BTreeMap::new();
    for token in tokens {
        *form_counts.entry(token.as_ref()).or_insert(0) += 1;
    }
    let total_tokens: u64 = form_counts.values().sum();

    let mut records: Vec<Record> = form_counts
        .into_iter()
        .map(|(form, form_freq)| Record {
            form: form.to_string(),
            lemma: resolve_lemma(analyzer, form),
            form_freq,
            lemma_freq: 0,
            morph_info: String::new(),
        })
        .collect();

    let mut lemma_counts: FxHashMap<String, u64> = FxHashMap::default();
    for record in &records {
        *lemma_counts.entry(record.lemma.clone()).or_insert(0) += record.form_freq;
    }
    for record in &mut records {
        record.lemma_freq = lemma_counts[&record.lemma];
    }

    let stats = DocumentStats {
        total_tokens,
        wordform_count: records.len(),
        lexeme_count: lemma_counts.len(),
    };
    info!(
        total_tokens = stats.total_tokens,
        wordforms = stats.wordform_count,
        lexemes = stats.lexeme_count,
        "aggregated frequencies"
    );

    Aggregation { records, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::morph::{DictionaryAnalyzer, IdentityAnalyzer};
    use std::collections::HashSet;

    fn cat_dog_dict() -> DictionaryAnalyzer {
        DictionaryAnalyzer::parse_tsv("кот\tкот\nкота\tкот\nсобака\tсобака\n").unwrap()
    }

    #[test]
    fn test_cat_dog_example() {
        let tokens = ["кот", "кота", "кот", "собака"];
        let agg = aggregate(&tokens, &cat_dog_dict());

        let got: Vec<(&str, &str, u64, u64)> = agg
            .records
            .iter()
            .map(|r| (r.form.as_str(), r.lemma.as_str(), r.form_freq, r.lemma_freq))
            .collect();
        assert_eq!(
            got,
            vec![("кот", "кот", 2, 3), ("кота", "кот", 1, 3), ("собака", "собака", 1, 1)]
        );
        assert_eq!(
            agg.stats,
            DocumentStats { total_tokens: 4, wordform_count: 3, lexeme_count: 2 }
        );
        assert!(agg.records.iter().all(|r| r.morph_info.is_empty()));
    }

    #[test]
    fn test_frequency_invariants() {
        let text = "кот кота коту кот собака собаки пёс пса кот собака";
        let tokens: Vec<&str> = text.split(' ').collect();
        let dict = DictionaryAnalyzer::parse_tsv(
            "кота\tкот\nкоту\tкот\nсобаки\tсобака\nпса\tпёс\n",
        )
        .unwrap();
        let agg = aggregate(&tokens, &dict);

        let form_sum: u64 = agg.records.iter().map(|r| r.form_freq).sum();
        assert_eq!(form_sum, agg.stats.total_tokens);
        assert_eq!(agg.stats.total_tokens, tokens.len() as u64);

        let mut seen = HashSet::new();
        let lemma_sum: u64 = agg
            .records
            .iter()
            .filter(|r| seen.insert(r.lemma.clone()))
            .map(|r| r.lemma_freq)
            .sum();
        assert_eq!(lemma_sum, agg.stats.total_tokens);
        assert_eq!(seen.len(), agg.stats.lexeme_count);

        assert!(agg.records.iter().all(|r| r.lemma_freq >= r.form_freq));

        let distinct: HashSet<&str> = tokens.iter().copied().collect();
        assert_eq!(agg.stats.wordform_count, distinct.len());
    }

    #[test]
    fn test_records_are_in_lexicographic_order() {
        let agg = aggregate(&["в", "а", "б", "а"], &IdentityAnalyzer);
        let forms: Vec<&str> = agg.records.iter().map(|r| r.form.as_str()).collect();
        assert_eq!(forms, vec!["а", "б", "в"]);
    }

    #[test]
    fn test_empty_input() {
        let agg = aggregate::<&str>(&[], &IdentityAnalyzer);
        assert!(agg.records.is_empty());
        assert_eq!(agg.stats, DocumentStats::default());
    }
}
