//! JSON cache of per-text frequency tables.
//!
//! Entries are keyed by [`FrequencyCache::key_for`], i.e. file stem plus a
//! hash of the canonical path, so same-named texts in different directories
//! never share an entry. A cache file is not invalidated when its corpus
//! changes.

use std::fs;
use std::hash::Hasher;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use rustc_hash::FxHasher;
use tempfile::NamedTempFile;

use crate::error::{AnalysisError, Result};
use crate::{Corpus, FrequencyTable, count_lemmas};

#[derive(Debug, Clone)]
pub struct FrequencyCache {
    dir: PathBuf,
}

impl FrequencyCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache key of the text stored at `path`: `<stem>_<hash of canonical path>`.
    pub fn key_for(path: &Path) -> Result<String> {
        let canonical = fs::canonicalize(path).map_err(|e| AnalysisError::io(path, e))?;
        let mut hasher = FxHasher::default();
        hasher.write(canonical.to_string_lossy().as_bytes());
        let stem = canonical
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(format!("{stem}_{:016x}", hasher.finish()))
    }

    pub fn path_for(&self, text_id: &str) -> PathBuf {
        self.dir.join(format!("{text_id}_wc.json"))
    }

    /// `Ok(None)` when no table is cached for `text_id`.
    pub fn load(&self, text_id: &str) -> Result<Option<FrequencyTable>> {
        let path = self.path_for(text_id);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AnalysisError::io(path, e)),
        };
        let table: FrequencyTable = serde_json::from_str(&content)?;
        debug!("cache hit for {text_id} at {}", path.display());
        Ok(Some(table))
    }

    pub fn store(&self, text_id: &str, table: &FrequencyTable) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| AnalysisError::io(&self.dir, e))?;
        let path = self.path_for(text_id);
        let json = serde_json::to_string(table)?;
        // readers see the old table or the complete new one, never a partial file
        let mut tmp =
            NamedTempFile::new_in(&self.dir).map_err(|e| AnalysisError::io(&self.dir, e))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| AnalysisError::io(&self.dir, e))?;
        tmp.persist(&path)
            .map_err(|e| AnalysisError::io(&path, e.error))?;
        Ok(path)
    }

    /// The cached table for `text_id`, or a fresh count of `corpus` that is then cached.
    pub fn frequencies_for(&self, text_id: &str, corpus: &Corpus) -> Result<FrequencyTable> {
        if let Some(table) = self.load(text_id)? {
            return Ok(table);
        }
        let table = count_lemmas(corpus);
        let path = self.store(text_id, &table)?;
        info!("Cached {} lemma counts at {}", table.len(), path.display());
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Sentence, WordRecord};

    fn corpus() -> Corpus {
        Corpus::new(vec![Sentence::new(vec![
            WordRecord::new("ψυχή"),
            WordRecord::new("ψυχή"),
            WordRecord::new("Ἀχιλλεύς"),
        ])])
    }

    #[test]
    fn missing_entry_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FrequencyCache::new(dir.path());
        assert!(cache.load("Iliad").unwrap().is_none());
    }

    #[test]
    fn computed_table_is_persisted_and_reused() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FrequencyCache::new(dir.path().join("cache"));
        let first = cache.frequencies_for("Iliad", &corpus()).unwrap();
        assert!(cache.path_for("Iliad").exists());
        assert_eq!(first["ψυχή"], 2);

        // a different corpus under the same id still yields the cached table
        let second = cache.frequencies_for("Iliad", &Corpus::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn same_stem_in_different_directories_gets_distinct_keys() {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["a", "b"] {
            fs::create_dir(dir.path().join(sub)).unwrap();
            fs::write(dir.path().join(sub).join("Iliad.xml"), "<TEI.2/>").unwrap();
        }
        let a = FrequencyCache::key_for(&dir.path().join("a/Iliad.xml")).unwrap();
        let b = FrequencyCache::key_for(&dir.path().join("b/Iliad.xml")).unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("Iliad_"));
        // the key does not depend on how the path is spelled
        let again = FrequencyCache::key_for(&dir.path().join("a/../a/Iliad.xml")).unwrap();
        assert_eq!(a, again);
    }

    #[test]
    fn key_for_missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FrequencyCache::key_for(&dir.path().join("nope.xml")).unwrap_err();
        assert!(matches!(err, AnalysisError::Io { .. }));
    }

    #[test]
    fn corrupt_cache_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FrequencyCache::new(dir.path());
        fs::write(cache.path_for("Odyssey"), "not json").unwrap();
        assert!(matches!(
            cache.load("Odyssey"),
            Err(AnalysisError::Serialization(_))
        ));
    }
}
