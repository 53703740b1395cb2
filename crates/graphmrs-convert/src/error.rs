use std::path::PathBuf;

use graphmrs_algebra::CompositionError;
use thiserror::Error;

/// Failures that stop a whole load or conversion, as opposed to the per-node
/// and per-edge composition errors the converter records and moves past.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {what}: {source}")]
    Json {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    /// A lexicon entry that can never compose, caught before traversal.
    #[error("invalid lexicon entry '{key}': {reason}")]
    InvalidLexicon { key: String, reason: String },

    #[error("graph has no root node")]
    NoRoot,

    #[error("graph contains cycles")]
    Cyclic,

    #[error(transparent)]
    Composition(#[from] CompositionError),
}

pub type Result<T> = std::result::Result<T, ConvertError>;

pub(crate) fn read_file(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ConvertError::Io {
        path: path.to_path_buf(),
        source,
    })
}
