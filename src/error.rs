//! Library error types.
//!
//! Dataset access failures are precondition violations of the data pipeline,
//! not per-item conditions to recover from: a missing store key means the
//! metadata and the preloaded store disagree, and should abort loudly.
use thiserror::Error;

/// Errors surfaced by [`Dataset::get`](crate::dataset::Dataset::get).
#[derive(Debug, Error)]
pub enum DatasetError {
    /// `index >= len()`.
    #[error("index {index} out of range for dataset of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A metadata entry points at a record the preloaded store does not
    /// hold.  Metadata/store mismatch — a pipeline integrity bug upstream.
    #[error("no preloaded signal for record {key:?}")]
    KeyNotFound { key: String },
}

/// Errors surfaced while loading recording metadata.
#[derive(Debug, Error)]
pub enum MetaError {
    #[error("reading metadata file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a JSON object of records.
    #[error("parsing metadata JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// One entry is missing a required field or has a wrong type.  Raised at
    /// load time so corrupt metadata fails before training begins.
    #[error("invalid metadata record {key:?}: {source}")]
    InvalidRecord {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
