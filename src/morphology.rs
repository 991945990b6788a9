//! Counts of morphological variants (case/number, tense/mood, ...) per lemma.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::stopwords::TargetLemmaSet;
use crate::Corpus;

/// Lemma -> normalized tag string -> count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MorphoCountTable {
    counts: HashMap<String, HashMap<String, u32>>,
}

impl MorphoCountTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, lemma: &str, variant: String) {
        *self
            .counts
            .entry(lemma.to_string())
            .or_default()
            .entry(variant)
            .or_insert(0) += 1;
    }

    pub fn variants(&self, lemma: &str) -> Option<&HashMap<String, u32>> {
        self.counts.get(lemma)
    }

    pub fn count(&self, lemma: &str, variant: &str) -> u32 {
        self.variants(lemma)
            .and_then(|v| v.get(variant))
            .copied()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The sub-table of lemmas in `targets`.
    pub fn restricted_to(&self, targets: &TargetLemmaSet) -> MorphoCountTable {
        MorphoCountTable {
            counts: self
                .counts
                .iter()
                .filter(|(lemma, _)| targets.contains(lemma))
                .map(|(lemma, variants)| (lemma.clone(), variants.clone()))
                .collect(),
        }
    }

    ///Sort the variants of one lemma by count into Vec<(String, u32)>, ties by variant.
    pub fn ranked_variants(&self, lemma: &str) -> Vec<(String, u32)> {
        let mut vec_sorted: Vec<(String, u32)> = self
            .variants(lemma)
            .map(|v| v.iter().map(|(k, c)| (k.clone(), *c)).collect())
            .unwrap_or_default();
        vec_sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        vec_sorted
    }
}

/// Key of one analysis: its 2nd and 3rd tag joined by a space ("fem acc sg" -> "acc sg").
///
/// Every analysis must carry at least three tags; a shorter one is a
/// [`AnalysisError::TruncatedTagGroup`].
pub fn normalize_tag_group(lemma: &str, group: &[String]) -> Result<String> {
    match group.get(1..3) {
        Some(tags) => Ok(tags.join(" ")),
        None => Err(AnalysisError::TruncatedTagGroup {
            lemma: lemma.to_string(),
            tags: group.to_vec(),
        }),
    }
}

/// Tabulates every analysed word of the corpus. Words without morphology are skipped.
pub fn tabulate_morphology(corpus: &Corpus) -> Result<MorphoCountTable> {
    let mut table = MorphoCountTable::new();
    for word in corpus.words() {
        let Some(groups) = &word.morphology else {
            continue;
        };
        for group in groups {
            table.increment(&word.lemma, normalize_tag_group(&word.lemma, group)?);
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Sentence, WordRecord};

    #[test]
    fn counts_second_and_third_tag() {
        let corpus = Corpus::new(vec![
            Sentence::new(vec![
                WordRecord::new("θυμός")
                    .with_analysis("masc nom sg")
                    .with_analysis("masc voc sg"),
                WordRecord::new("δέ"),
            ]),
            Sentence::new(vec![
                WordRecord::new("θυμός").with_analysis("masc nom sg"),
                WordRecord::new("ἔχω").with_analysis("pres ind act 1st sg"),
            ]),
        ]);
        let table = tabulate_morphology(&corpus).unwrap();
        assert_eq!(table.count("θυμός", "nom sg"), 2);
        assert_eq!(table.count("θυμός", "voc sg"), 1);
        assert_eq!(table.count("ἔχω", "ind act"), 1);
        assert!(table.variants("δέ").is_none());

        let targets = TargetLemmaSet::mind_words();
        let restricted = table.restricted_to(&targets);
        assert_eq!(restricted.len(), 1);
        assert_eq!(
            restricted.ranked_variants("θυμός"),
            vec![("nom sg".to_string(), 2), ("voc sg".to_string(), 1)]
        );
        // the full table is still there
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn two_component_group_is_a_fault() {
        let corpus = Corpus::new(vec![Sentence::new(vec![
            WordRecord::new("φρήν").with_analysis("fem dat"),
        ])]);
        let err = tabulate_morphology(&corpus).unwrap_err();
        match err {
            AnalysisError::TruncatedTagGroup { lemma, tags } => {
                assert_eq!(lemma, "φρήν");
                assert_eq!(tags, vec!["fem".to_string(), "dat".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ranked_variants_of_unknown_lemma_is_empty() {
        assert!(MorphoCountTable::new().ranked_variants("νόος").is_empty());
    }
}
