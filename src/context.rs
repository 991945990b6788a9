//! Sentence-level contexts of target lemmas and their pair counts.

use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

use crate::stopwords::{StopwordSet, TargetLemmaSet};
use crate::{Corpus, WordRecord};

/// Restricts context words to one part of speech.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PosFilter {
    #[default]
    Any,
    Exact(String),
}

impl PosFilter {
    /// Words without a POS tag never pass an exact filter.
    pub fn accepts(&self, word: &WordRecord) -> bool {
        match self {
            PosFilter::Any => true,
            PosFilter::Exact(tag) => word.pos.as_deref() == Some(tag.as_str()),
        }
    }
}

impl FromStr for PosFilter {
    type Err = std::convert::Infallible;

    /// `any` (or an empty string) disables the filter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("any") {
            Ok(PosFilter::Any)
        } else {
            Ok(PosFilter::Exact(s.to_string()))
        }
    }
}

/// Target lemma -> one context list per sentence the target occurs in.
pub type ContextMap<'a> = HashMap<String, Vec<Vec<&'a WordRecord>>>;

/// (target lemma, context lemma) -> co-occurrence count.
pub type PairCountTable = HashMap<(String, String), u32>;

/// Collects the context words of every target lemma, sentence by sentence.
///
/// A sentence without targets contributes nothing. Otherwise its words that
/// are neither stopwords nor targets and pass `pos` form one list, which is
/// appended to every target present in the sentence, even when it is empty.
pub fn extract_contexts<'a>(
    corpus: &'a Corpus,
    targets: &TargetLemmaSet,
    stopwords: &StopwordSet,
    pos: &PosFilter,
) -> ContextMap<'a> {
    let mut contexts: ContextMap<'a> = HashMap::new();
    for sentence in &corpus.sentences {
        let present: BTreeSet<&str> = sentence.lemmas().filter(|l| targets.contains(l)).collect();
        if present.is_empty() {
            continue;
        }
        let surroundings: Vec<&WordRecord> = sentence
            .words
            .iter()
            .filter(|w| !stopwords.contains(&w.lemma) && !targets.contains(&w.lemma))
            .filter(|w| pos.accepts(w))
            .collect();
        for target in present {
            contexts
                .entry(target.to_string())
                .or_default()
                .push(surroundings.clone());
        }
    }
    contexts
}

/// Counts every (target, context word) occurrence across all context lists.
pub fn count_cooccurrences(contexts: &ContextMap<'_>) -> PairCountTable {
    let mut pairs: PairCountTable = HashMap::new();
    for (target, lists) in contexts {
        for word in lists.iter().flatten() {
            *pairs
                .entry((target.to_owned(), word.lemma.to_owned()))
                .or_insert(0) += 1;
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sentence;

    fn lemmas(list: &[&WordRecord]) -> Vec<String> {
        list.iter().map(|w| w.lemma.clone()).collect()
    }

    fn verb(lemma: &str) -> WordRecord {
        WordRecord::new(lemma).with_pos("verb")
    }

    #[test]
    fn sentences_without_targets_are_skipped() {
        let corpus = Corpus::new(vec![
            Sentence::new(vec![verb("μένος"), verb("φέρω")]),
            Sentence::new(vec![WordRecord::new("θυμός"), verb("μένος")]),
        ]);
        let targets = TargetLemmaSet::from_lemmas(["θυμός"]);
        let contexts = extract_contexts(
            &corpus,
            &targets,
            &StopwordSet::default(),
            &PosFilter::Exact("verb".into()),
        );
        assert_eq!(contexts.len(), 1);
        let lists: Vec<Vec<String>> = contexts["θυμός"].iter().map(|l| lemmas(l)).collect();
        assert_eq!(lists, vec![vec!["μένος".to_string()]]);
    }

    #[test]
    fn shared_sentence_gives_identical_lists_to_each_target() {
        let corpus = Corpus::new(vec![Sentence::new(vec![
            WordRecord::new("θυμός"),
            verb("ὁρμάω"),
            WordRecord::new("φρήν"),
            WordRecord::new("δέ"),
            verb("μερμηρίζω"),
        ])]);
        let targets = TargetLemmaSet::mind_words();
        let stop = StopwordSet::from_lemmas(["δέ"]);
        let contexts = extract_contexts(&corpus, &targets, &stop, &PosFilter::Any);
        assert_eq!(contexts.len(), 2);
        let thumos = lemmas(&contexts["θυμός"][0]);
        let phren = lemmas(&contexts["φρήν"][0]);
        assert_eq!(thumos, phren);
        assert_eq!(thumos, vec!["ὁρμάω".to_string(), "μερμηρίζω".to_string()]);
    }

    #[test]
    fn repeated_target_in_sentence_contributes_once() {
        let corpus = Corpus::new(vec![Sentence::new(vec![
            WordRecord::new("θυμός"),
            verb("ἔχω"),
            WordRecord::new("θυμός"),
        ])]);
        let targets = TargetLemmaSet::from_lemmas(["θυμός"]);
        let contexts =
            extract_contexts(&corpus, &targets, &StopwordSet::default(), &PosFilter::Any);
        assert_eq!(contexts["θυμός"].len(), 1);
    }

    #[test]
    fn pos_filter_excludes_untagged_and_other_tags() {
        let corpus = Corpus::new(vec![Sentence::new(vec![
            WordRecord::new("νόος"),
            WordRecord::new("ἀνήρ").with_pos("noun"),
            WordRecord::new("ἄγνωστος"),
            verb("γιγνώσκω"),
        ])]);
        let targets = TargetLemmaSet::from_lemmas(["νόος"]);
        let filter = PosFilter::Exact("verb".into());
        let contexts = extract_contexts(&corpus, &targets, &StopwordSet::default(), &filter);
        for word in contexts.values().flatten().flatten() {
            assert_eq!(word.pos.as_deref(), Some("verb"));
        }
        let unfiltered =
            extract_contexts(&corpus, &targets, &StopwordSet::default(), &PosFilter::Any);
        assert_eq!(unfiltered["νόος"][0].len(), 3);
    }

    #[test]
    fn fully_excluded_sentence_appends_empty_list() {
        let corpus = Corpus::new(vec![Sentence::new(vec![
            WordRecord::new("ψυχή"),
            WordRecord::new("καί"),
            WordRecord::new("δέ"),
        ])]);
        let targets = TargetLemmaSet::from_lemmas(["ψυχή"]);
        let stop = StopwordSet::from_lemmas(["καί", "δέ"]);
        let contexts = extract_contexts(&corpus, &targets, &stop, &PosFilter::Any);
        assert_eq!(contexts["ψυχή"].len(), 1);
        assert!(contexts["ψυχή"][0].is_empty());
        assert!(count_cooccurrences(&contexts).is_empty());
    }

    #[test]
    fn pair_counts_are_per_occurrence() {
        let corpus = Corpus::new(vec![
            Sentence::new(vec![WordRecord::new("θυμός"), verb("φέρω"), verb("φέρω")]),
            Sentence::new(vec![WordRecord::new("θυμός"), verb("φέρω"), verb("ἔχω")]),
        ]);
        let targets = TargetLemmaSet::from_lemmas(["θυμός"]);
        let contexts =
            extract_contexts(&corpus, &targets, &StopwordSet::default(), &PosFilter::Any);
        let pairs = count_cooccurrences(&contexts);
        assert_eq!(pairs[&("θυμός".to_string(), "φέρω".to_string())], 3);
        assert_eq!(pairs[&("θυμός".to_string(), "ἔχω".to_string())], 1);
        let total_words: usize = contexts.values().flatten().map(Vec::len).sum();
        assert_eq!(pairs.values().sum::<u32>() as usize, total_words);
    }

    #[test]
    fn pos_filter_parses_any() {
        assert_eq!("any".parse::<PosFilter>().unwrap(), PosFilter::Any);
        assert_eq!(
            "verb".parse::<PosFilter>().unwrap(),
            PosFilter::Exact("verb".into())
        );
    }
}
