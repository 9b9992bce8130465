// File: src/core/morph.rs
use crate::error::{LexiconError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// One candidate normal form for a wordform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub lemma: String,
    /// Higher is more likely.
    pub score: f32,
}

impl Analysis {
    pub fn new(lemma: impl Into<String>, score: f32) -> Self {
        Self { lemma: lemma.into(), score }
    }

    /// Best first: score descending, then lemma ascending.
    fn rank(a: &Analysis, b: &Analysis) -> Ordering {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.lemma.cmp(&b.lemma))
    }
}

/// Morphological service: wordform to candidate lemmas.
pub trait MorphAnalyzer {
    fn analyze(&self, word: &str) -> Result<Vec<Analysis>>;
}

/// Picks the top-ranked lemma for `word`.
///
/// Highest score wins; equal scores go to the lexicographically smallest
/// lemma. When the analyzer fails or knows nothing, the wordform is its own
/// lemma.
pub fn resolve_lemma(analyzer: &dyn MorphAnalyzer, word: &str) -> String {
    match analyzer.analyze(word) {
        Ok(analyses) => match analyses.into_iter().min_by(Analysis::rank) {
            Some(best) => best.lemma,
            None => {
                debug!(word, "no analysis, using wordform as lemma");
                word.to_string()
            }
        },
        Err(e) => {
            debug!(word, error = %e, "analysis failed, using wordform as lemma");
            word.to_string()
        }
    }
}

/// Every word is its own lemma.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityAnalyzer;

impl MorphAnalyzer for IdentityAnalyzer {
    fn analyze(&self, word: &str) -> Result<Vec<Analysis>> {
        Ok(vec![Analysis::new(word, 1.0)])
    }
}

/// Lemma lookup table built from a `form<TAB>lemma[<TAB>score]` source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DictionaryAnalyzer {
    entries: FxHashMap<String, Vec<Analysis>>,
}

impl DictionaryAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a candidate lemma for `form`. Both are lowercased; a repeated
    /// `(form, lemma)` pair keeps the higher score.
    pub fn insert(&mut self, form: &str, lemma: &str, score: f32) {
        let candidates = self.entries.entry(form.to_lowercase()).or_default();
        let lemma = lemma.to_lowercase();
        match candidates.iter_mut().find(|a| a.lemma == lemma) {
            Some(existing) => existing.score = existing.score.max(score),
            None => candidates.push(Analysis::new(lemma, score)),
        }
    }

    /// Number of distinct wordforms known.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses the tab-separated source format. Blank lines and lines starting
    /// with `#` are skipped; the score column defaults to 1.0.
    pub fn parse_tsv(source: &str) -> Result<Self> {
        let mut dict = Self::new();
        for (idx, raw) in source.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let bad = |reason: &str| LexiconError::Dictionary {
                line: idx + 1,
                reason: reason.to_string(),
            };

            let mut cols = line.split('\t').map(str::trim);
            let form = cols.next().filter(|s| !s.is_empty()).ok_or_else(|| bad("missing wordform"))?;
            let lemma = cols.next().filter(|s| !s.is_empty()).ok_or_else(|| bad("missing lemma"))?;
            let score = match cols.next() {
                Some(s) => s
                    .parse::<f32>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| bad(&format!("invalid score '{s}'")))?,
                None => 1.0,
            };
            if cols.next().is_some() {
                return Err(bad("too many columns"));
            }
            dict.insert(form, lemma, score);
        }
        Ok(dict)
    }

    pub fn from_tsv_file(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        let dict = Self::parse_tsv(&source)?;
        info!(path = %path.display(), wordforms = dict.len(), "loaded dictionary source");
        Ok(dict)
    }
}

impl MorphAnalyzer for DictionaryAnalyzer {
    fn analyze(&self, word: &str) -> Result<Vec<Analysis>> {
        Ok(self.entries.get(word).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingAnalyzer;

    impl MorphAnalyzer for FailingAnalyzer {
        fn analyze(&self, _word: &str) -> Result<Vec<Analysis>> {
            Err(LexiconError::Config("analyzer offline".into()))
        }
    }

    #[test]
    fn test_highest_score_wins() {
        let mut dict = DictionaryAnalyzer::new();
        dict.insert("стали", "стать", 0.4);
        dict.insert("стали", "сталь", 0.6);
        assert_eq!(resolve_lemma(&dict, "стали"), "сталь");
    }

    #[test]
    fn test_equal_scores_pick_smallest_lemma() {
        let mut dict = DictionaryAnalyzer::new();
        dict.insert("стали", "стать", 1.0);
        dict.insert("стали", "сталь", 1.0);
        assert_eq!(resolve_lemma(&dict, "стали"), "сталь");
    }

    #[test]
    fn test_unknown_word_falls_back_to_itself() {
        let dict = DictionaryAnalyzer::new();
        assert_eq!(resolve_lemma(&dict, "абракадабра"), "абракадабра");
        assert_eq!(resolve_lemma(&FailingAnalyzer, "кот"), "кот");
        assert_eq!(resolve_lemma(&IdentityAnalyzer, "кота"), "кота");
    }

    #[test]
    fn test_parse_tsv() {
        let src = "# comment\n\nкота\tкот\nКОТУ\tКот\t0.5\nстали\tсталь\t2\n";
        let dict = DictionaryAnalyzer::parse_tsv(src).unwrap();
        assert_eq!(dict.len(), 3);
        assert_eq!(resolve_lemma(&dict, "коту"), "кот");
        assert_eq!(dict.analyze("стали").unwrap(), vec![Analysis::new("сталь", 2.0)]);
    }

    #[test]
    fn test_repeated_pair_keeps_higher_score() {
        let dict = DictionaryAnalyzer::parse_tsv("a\tb\t0.2\na\tb\t0.9\na\tb\t0.1\n").unwrap();
        assert_eq!(dict.analyze("a").unwrap(), vec![Analysis::new("b", 0.9)]);
    }

    #[test]
    fn test_malformed_lines_report_line_number() {
        let err = DictionaryAnalyzer::parse_tsv("a\tb\nonlyform\n").unwrap_err();
        assert!(matches!(err, LexiconError::Dictionary { line: 2, .. }));

        let err = DictionaryAnalyzer::parse_tsv("a\tb\tnot-a-number\n").unwrap_err();
        assert!(matches!(err, LexiconError::Dictionary { line: 1, .. }));

        let err = DictionaryAnalyzer::parse_tsv("a\tb\t1\textra\n").unwrap_err();
        assert!(matches!(err, LexiconError::Dictionary { line: 1, .. }));
    }
}
