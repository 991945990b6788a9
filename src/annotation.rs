//! Reads lemma annotations (`text/body/sentence/word/lemma/analysis`) into a [`Corpus`].

use std::fs;
use std::path::Path;

use log::{debug, info};
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use crate::error::{AnalysisError, Result};
use crate::{Corpus, Sentence, WordRecord};

// Depth of each element, counted as its number of ancestors.
const SENTENCE_DEPTH: usize = 3;
const WORD_DEPTH: usize = 4;
const LEMMA_DEPTH: usize = 5;
const ANALYSIS_DEPTH: usize = 6;

pub fn load_corpus(path: &Path) -> Result<Corpus> {
    let xml = fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
    let corpus = extract_sentences(&xml)?;
    info!(
        "{}: {} sentences, {} lemmatized words",
        path.display(),
        corpus.sentences.len(),
        corpus.word_count()
    );
    Ok(corpus)
}

/// Identifier of a text, used for cache and export file names.
pub fn text_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parses an annotation document into sentences of lemma records.
///
/// Lemma elements without an `entry` attribute are skipped. A lemma without
/// `analysis` children gets no morphology; the same holds when one of its
/// analyses lacks a `morph` attribute.
pub fn extract_sentences(xml: &str) -> Result<Corpus> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut ancestors: Vec<Vec<u8>> = Vec::new();
    let mut state = ExtractState::default();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let name = local_name(e.name().as_ref()).to_vec();
                state.open(&e, &name, &ancestors)?;
                ancestors.push(name);
            }
            Event::Empty(e) => {
                let name = local_name(e.name().as_ref()).to_vec();
                state.open(&e, &name, &ancestors)?;
                state.close(&name, &ancestors);
            }
            Event::End(e) => {
                ancestors.pop();
                state.close(local_name(e.name().as_ref()), &ancestors);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    debug!("skipped {} lemma elements without entry", state.skipped);
    Ok(Corpus::new(state.sentences))
}

#[derive(Default)]
struct ExtractState {
    sentences: Vec<Sentence>,
    sentence: Option<Vec<WordRecord>>,
    lemma: Option<PendingLemma>,
    skipped: usize,
}

struct PendingLemma {
    entry: Option<String>,
    pos: Option<String>,
    analyses: Vec<Vec<String>>,
    unanalysable: bool,
}

impl ExtractState {
    fn open(&mut self, e: &BytesStart, name: &[u8], ancestors: &[Vec<u8>]) -> Result<()> {
        match (name, ancestors.len()) {
            (b"sentence", SENTENCE_DEPTH) if is_sentence_parent(ancestors) => {
                self.sentence = Some(Vec::new());
            }
            (b"lemma", LEMMA_DEPTH)
                if self.sentence.is_some()
                    && ancestors[WORD_DEPTH - 1] == b"sentence"
                    && parent_is(ancestors, b"word") =>
            {
                self.lemma = Some(PendingLemma {
                    entry: attribute(e, b"entry")?,
                    pos: attribute(e, b"POS")?,
                    analyses: Vec::new(),
                    unanalysable: false,
                });
            }
            (b"analysis", ANALYSIS_DEPTH) if parent_is(ancestors, b"lemma") => {
                if let Some(lemma) = self.lemma.as_mut() {
                    match attribute(e, b"morph")? {
                        Some(morph) => lemma
                            .analyses
                            .push(morph.split_whitespace().map(String::from).collect()),
                        None => lemma.unanalysable = true,
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8], ancestors: &[Vec<u8>]) {
        match (name, ancestors.len()) {
            (b"lemma", LEMMA_DEPTH) => {
                let Some(lemma) = self.lemma.take() else {
                    return;
                };
                let Some(words) = self.sentence.as_mut() else {
                    return;
                };
                match lemma.entry {
                    Some(entry) => words.push(WordRecord {
                        lemma: entry,
                        pos: lemma.pos,
                        morphology: if lemma.unanalysable || lemma.analyses.is_empty() {
                            None
                        } else {
                            Some(lemma.analyses)
                        },
                    }),
                    None => self.skipped += 1,
                }
            }
            (b"sentence", SENTENCE_DEPTH) => {
                if let Some(words) = self.sentence.take() {
                    self.sentences.push(Sentence::new(words));
                }
            }
            _ => {}
        }
    }
}

fn is_sentence_parent(ancestors: &[Vec<u8>]) -> bool {
    ancestors.len() == SENTENCE_DEPTH && ancestors[1] == b"text" && ancestors[2] == b"body"
}

fn parent_is(ancestors: &[Vec<u8>], name: &[u8]) -> bool {
    ancestors.last().is_some_and(|p| p == name)
}

fn attribute(e: &BytesStart, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| AnalysisError::Attribute(err.to_string()))?;
        if local_name(attr.key.as_ref()) != key {
            continue;
        }
        let raw = std::str::from_utf8(&attr.value)
            .map_err(|err| AnalysisError::Attribute(err.to_string()))?;
        let value = unescape(raw).map_err(|err| AnalysisError::Attribute(err.to_string()))?;
        return Ok(Some(value.into_owned()));
    }
    Ok(None)
}

fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().rposition(|&b| b == b':') {
        Some(i) => &name[i + 1..],
        None => name,
    }
}
