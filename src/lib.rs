//! Lexical co-occurrence analysis of "mind-words" in lemmatized epic poetry.
//!
//! The library consumes a [`Corpus`] of per-sentence lemma annotations and
//! produces plain data: frequency tables, per-target context lists, pair
//! counts and PMI rankings. Loading, caching and report rendering live in
//! their own modules so the statistics never touch the filesystem.
//!
//! # Example
//! ```
//! use mindword_analysis::{
//!     AnalysisOptions, Corpus, Sentence, StopwordSet, TargetLemmaSet, WordRecord,
//!     analyse_embedding, count_lemmas,
//! };
//!
//! let corpus = Corpus::new(vec![
//!     Sentence::new(vec![
//!         WordRecord::new("θυμός"),
//!         WordRecord::new("μένος").with_pos("verb"),
//!     ]),
//!     Sentence::new(vec![
//!         WordRecord::new("μένος").with_pos("verb"),
//!         WordRecord::new("φέρω").with_pos("verb"),
//!     ]),
//! ]);
//! let wc = count_lemmas(&corpus);
//! let targets = TargetLemmaSet::from_lemmas(["θυμός"]);
//! let analysis = analyse_embedding(
//!     &corpus,
//!     &wc,
//!     &targets,
//!     &StopwordSet::default(),
//!     &AnalysisOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(analysis.ranked["θυμός"][0].lemma, "μένος");
//! assert!((analysis.ranked["θυμός"][0].pmi - 1.0).abs() < 1e-12);
//! ```

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

pub mod annotation;
pub mod cache;
pub mod context;
pub mod error;
pub mod morphology;
pub mod pmi;
pub mod report;
pub mod stopwords;

pub use annotation::{extract_sentences, load_corpus};
pub use cache::FrequencyCache;
pub use context::{ContextMap, PairCountTable, PosFilter, count_cooccurrences, extract_contexts};
pub use error::{AnalysisError, Result};
pub use morphology::{MorphoCountTable, tabulate_morphology};
pub use pmi::{PmiTable, RankedAssociation, RankedAssociations, pmi_scores, rank_associations};
pub use report::{ExportFormat, save_file};
pub use stopwords::{StopwordSet, TargetLemmaSet, load_stopwords, load_targets};

/// Occurrence rates are reported per this many words.
pub const RATE_BASE: f64 = 100_000.0;

/// One annotated word occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub lemma: String,
    pub pos: Option<String>,
    /// One tag group per morphological analysis; `None` when the word carried no analysis.
    pub morphology: Option<Vec<Vec<String>>>,
}

impl WordRecord {
    pub fn new(lemma: impl Into<String>) -> Self {
        Self {
            lemma: lemma.into(),
            pos: None,
            morphology: None,
        }
    }

    pub fn with_pos(mut self, pos: impl Into<String>) -> Self {
        self.pos = Some(pos.into());
        self
    }

    /// Adds one analysis given as a whitespace-separated tag string.
    pub fn with_analysis(mut self, morph: &str) -> Self {
        let group = morph.split_whitespace().map(String::from).collect();
        self.morphology.get_or_insert_with(Vec::new).push(group);
        self
    }
}

/// Words of one sentence, in surface order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub words: Vec<WordRecord>,
}

impl Sentence {
    pub fn new(words: Vec<WordRecord>) -> Self {
        Self { words }
    }

    pub fn lemmas(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|w| w.lemma.as_str())
    }
}

/// All sentences of one text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    pub sentences: Vec<Sentence>,
}

impl Corpus {
    pub fn new(sentences: Vec<Sentence>) -> Self {
        Self { sentences }
    }

    pub fn words(&self) -> impl Iterator<Item = &WordRecord> {
        self.sentences.iter().flat_map(|s| s.words.iter())
    }

    pub fn word_count(&self) -> usize {
        self.sentences.iter().map(|s| s.words.len()).sum()
    }
}

/// Lemma -> number of occurrences.
pub type FrequencyTable = HashMap<String, u32>;

///Counts every lemma occurrence of the corpus. Returns HashMap<String,u32>, with String being the lemma and u32 the quantity
/// # Example
/// ```
/// use mindword_analysis::{Corpus, Sentence, WordRecord, count_lemmas};
/// let corpus = Corpus::new(vec![Sentence::new(vec![
///     WordRecord::new("ἄνθρωπος"),
///     WordRecord::new("ἄνθρωπος"),
///     WordRecord::new("θεός"),
/// ])]);
/// let wc = count_lemmas(&corpus);
/// assert_eq!(wc["ἄνθρωπος"], 2);
/// assert_eq!(wc["θεός"], 1);
/// ```
pub fn count_lemmas(corpus: &Corpus) -> FrequencyTable {
    let mut frequency: FrequencyTable = HashMap::new();
    for word in corpus.words() {
        *frequency.entry(word.lemma.to_owned()).or_insert(0) += 1;
    }
    frequency
}

/// Sum of all counts, i.e. the number of lemma occurrences the table was built from.
pub fn total_occurrences(frequency: &FrequencyTable) -> u64 {
    frequency.values().map(|&c| u64::from(c)).sum()
}

/// Raw and normalized occurrence of a single target lemma.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MindWordOccurrence {
    pub lemma: String,
    pub count: u32,
    pub per_100k: f64,
}

/// Occurrences of every target lemma plus their aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccurrenceSummary {
    pub total_words: u64,
    pub per_target: Vec<MindWordOccurrence>,
    pub aggregate_count: u64,
    pub aggregate_per_100k: f64,
}

fn rate(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * RATE_BASE
    }
}

/// Counts and per-100,000-word rates of the target lemmas. Absent targets count 0.
pub fn occurrences(frequency: &FrequencyTable, targets: &TargetLemmaSet) -> OccurrenceSummary {
    let total_words = total_occurrences(frequency);
    let per_target: Vec<MindWordOccurrence> = targets
        .iter()
        .map(|lemma| {
            let count = frequency.get(lemma).copied().unwrap_or(0);
            MindWordOccurrence {
                lemma: lemma.to_string(),
                count,
                per_100k: rate(u64::from(count), total_words),
            }
        })
        .collect();
    let aggregate_count = per_target.iter().map(|o| u64::from(o.count)).sum();
    OccurrenceSummary {
        total_words,
        aggregate_per_100k: rate(aggregate_count, total_words),
        per_target,
        aggregate_count,
    }
}

/// Knobs of the context/PMI stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub pos: PosFilter,
    /// Exponent applied to the joint probability; 1 is plain PMI.
    pub joint_exponent: i32,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            pos: PosFilter::Exact("verb".to_string()),
            joint_exponent: 1,
        }
    }
}

/// Result of [`analyse_embedding`] for one text.
#[derive(Debug, Clone)]
pub struct EmbeddingAnalysis {
    pub ranked: RankedAssociations,
    pub cooccurrences: PairCountTable,
    pub pmi: PmiTable,
}

/// Contexts -> pair counts -> PMI -> ranking for one corpus.
pub fn analyse_embedding(
    corpus: &Corpus,
    frequency: &FrequencyTable,
    targets: &TargetLemmaSet,
    stopwords: &StopwordSet,
    options: &AnalysisOptions,
) -> Result<EmbeddingAnalysis> {
    let contexts = extract_contexts(corpus, targets, stopwords, &options.pos);
    let cooccurrences = count_cooccurrences(&contexts);
    debug!(
        "{} targets with contexts, {} distinct pairs",
        contexts.len(),
        cooccurrences.len()
    );
    let pmi = pmi_scores(frequency, &cooccurrences, options.joint_exponent)?;
    let ranked = rank_associations(&pmi, targets);
    Ok(EmbeddingAnalysis {
        ranked,
        cooccurrences,
        pmi,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_corpus() -> Corpus {
        Corpus::new(vec![
            Sentence::new(vec![
                WordRecord::new("θυμός"),
                WordRecord::new("μένος").with_pos("verb"),
            ]),
            Sentence::new(vec![
                WordRecord::new("μένος").with_pos("verb"),
                WordRecord::new("φέρω").with_pos("verb"),
            ]),
        ])
    }

    #[test]
    fn test_count() {
        let wc = count_lemmas(&scenario_corpus());
        let mut expected = HashMap::new();
        expected.insert("θυμός".to_string(), 1_u32);
        expected.insert("μένος".to_string(), 2_u32);
        expected.insert("φέρω".to_string(), 1_u32);
        assert_eq!(wc, expected);
    }

    #[test]
    fn test_count_sum_equals_word_count() {
        let corpus = Corpus::new(vec![
            Sentence::new(vec![WordRecord::new("a"), WordRecord::new("b")]),
            Sentence::default(),
            Sentence::new(vec![WordRecord::new("a")]),
        ]);
        let wc = count_lemmas(&corpus);
        assert_eq!(total_occurrences(&wc), corpus.word_count() as u64);
    }

    #[test]
    fn test_count_is_idempotent() {
        let corpus = scenario_corpus();
        let first = count_lemmas(&corpus);
        let second = count_lemmas(&corpus);
        assert_eq!(first, second);
        assert_eq!(corpus, scenario_corpus());
    }

    #[test]
    fn test_occurrences_normalized() {
        let mut wc = FrequencyTable::new();
        wc.insert("θυμός".to_string(), 3);
        wc.insert("ἄλλος".to_string(), 197);
        let targets = TargetLemmaSet::from_lemmas(["θυμός", "νόος"]);
        let summary = occurrences(&wc, &targets);
        assert_eq!(summary.total_words, 200);
        assert_eq!(summary.aggregate_count, 3);
        assert!((summary.aggregate_per_100k - 1500.0).abs() < 1e-9);
        let noos = summary
            .per_target
            .iter()
            .find(|o| o.lemma == "νόος")
            .unwrap();
        assert_eq!(noos.count, 0);
        assert_eq!(noos.per_100k, 0.0);
    }

    #[test]
    fn test_scenario_one_end_to_end() {
        let corpus = scenario_corpus();
        let wc = count_lemmas(&corpus);
        let targets = TargetLemmaSet::from_lemmas(["θυμός"]);
        let analysis = analyse_embedding(
            &corpus,
            &wc,
            &targets,
            &StopwordSet::default(),
            &AnalysisOptions::default(),
        )
        .unwrap();
        let pair = ("θυμός".to_string(), "μένος".to_string());
        assert_eq!(analysis.cooccurrences.len(), 1);
        assert_eq!(analysis.cooccurrences[&pair], 1);
        assert!((analysis.pmi[&pair] - 1.0).abs() < 1e-12);
        assert_eq!(analysis.ranked["θυμός"].len(), 1);
    }
}
