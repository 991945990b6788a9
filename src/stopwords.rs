//! Lemma sets handed to the context stage: the stopwords to drop and the
//! target lemmas ("mind-words") to analyse.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use log::info;

use crate::error::{AnalysisError, Result};

/// Lemmas of the Homeric vocabulary of mind and feeling.
pub const MIND_WORDS: [&str; 7] = [
    "θυμός", // thumos
    "φρήν",  // phrenes
    "νόος",  // noos
    "ψυχή",  // psyche
    "καρδία", // kradie
    "ἔαρ",   // her
    "ἦτορ",  // etor
];

/// Target lemmas. Iteration order is sorted so reports are stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLemmaSet {
    lemmas: BTreeSet<String>,
}

impl Default for TargetLemmaSet {
    fn default() -> Self {
        Self::mind_words()
    }
}

impl TargetLemmaSet {
    pub fn mind_words() -> Self {
        Self::from_lemmas(MIND_WORDS)
    }

    pub fn from_lemmas<I, S>(lemmas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lemmas: lemmas.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, lemma: &str) -> bool {
        self.lemmas.contains(lemma)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lemmas.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lemmas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lemmas.is_empty()
    }
}

/// Lemmas excluded from every context list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopwordSet {
    lemmas: HashSet<String>,
}

impl StopwordSet {
    pub fn from_lemmas<I, S>(lemmas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lemmas: lemmas.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, lemma: &str) -> bool {
        self.lemmas.contains(lemma)
    }

    pub fn len(&self) -> usize {
        self.lemmas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lemmas.is_empty()
    }
}

/// One lemma per line; surrounding whitespace is trimmed and blank lines ignored.
fn read_lemma_list(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect())
}

pub fn load_stopwords(path: &Path) -> Result<StopwordSet> {
    let set = StopwordSet::from_lemmas(read_lemma_list(path)?);
    info!("Loaded {} stopwords from {}", set.len(), path.display());
    Ok(set)
}

/// Reads a target set in the stopword file format, replacing the default mind-words.
pub fn load_targets(path: &Path) -> Result<TargetLemmaSet> {
    let set = TargetLemmaSet::from_lemmas(read_lemma_list(path)?);
    info!("Loaded {} target lemmas from {}", set.len(), path.display());
    Ok(set)
}
