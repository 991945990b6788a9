//! Error type shared by loading, analysis and export.

use std::path::PathBuf;

use thiserror::Error;

/// Faults raised by the analysis. Skipped records and missing POS/morphology
/// are not errors and never show up here.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed annotation XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("unreadable attribute: {0}")]
    Attribute(String),

    #[error("JSON (de)serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("lemma {lemma:?} has co-occurrence counts but no corpus frequency")]
    MissingFrequency { lemma: String },

    #[error("lemma {lemma:?} has a morphological analysis with fewer than 3 components: {tags:?}")]
    TruncatedTagGroup { lemma: String, tags: Vec<String> },

    #[error("export failed: {0}")]
    Export(#[from] csv::Error),
}

impl AnalysisError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
