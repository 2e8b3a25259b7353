//! Recording metadata.
//!
//! The metadata file is a JSON object mapping record key → entry:
//!
//! ```json
//! {
//!   "data/04015": {
//!     "path": "data/04015",
//!     "class": 1,
//!     "sig_len": 20000,
//!     "af_ends": [5000]
//!   }
//! }
//! ```
//!
//! `class == 2` is a sentinel meaning "exclude from the dataset"; filtering
//! happens here, at load time, never inside the dataset adapter.
use serde::Deserialize;
use std::path::Path;

use crate::error::MetaError;

/// Sentinel class value marking a recording as excluded from the dataset.
pub const EXCLUDED_CLASS: i64 = 2;

/// One recording's metadata entry.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RecordMeta {
    /// Record key, also the lookup key into the preloaded signal store and
    /// the WFDB record path (without extension) on disk.
    pub path: String,
    /// Class label: 0 = non-AF, 1 = AF, [`EXCLUDED_CLASS`] = excluded.
    pub class: i64,
    /// Full length of the original recording in samples, before any load cap.
    pub sig_len: usize,
    /// AF episode end offsets, sample indices into the original signal.
    /// Empty means no AF event.
    #[serde(default)]
    pub af_ends: Vec<i64>,
}

/// The exclusion predicate: entries with the sentinel class never enter the
/// dataset.
pub fn is_excluded(entry: &RecordMeta) -> bool {
    entry.class == EXCLUDED_CLASS
}

/// Load and validate a metadata JSON file.
///
/// Entries are kept in file order, excluded entries are dropped, and at most
/// `limit` surviving entries are returned (`None` = all).  A malformed entry
/// fails the whole load with [`MetaError::InvalidRecord`] rather than being
/// skipped.
pub fn load_metadata(path: &Path, limit: Option<usize>) -> Result<Vec<RecordMeta>, MetaError> {
    let text = std::fs::read_to_string(path)?;
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&text)?;

    let mut out = Vec::with_capacity(map.len());
    for (key, value) in map {
        let entry: RecordMeta = serde_json::from_value(value)
            .map_err(|source| MetaError::InvalidRecord { key: key.clone(), source })?;
        if !is_excluded(&entry) {
            out.push(entry);
        }
    }

    if let Some(limit) = limit {
        out.truncate(limit);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_json(json: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(json.as_bytes()).unwrap();
        f
    }

    #[test]
    fn loads_and_filters_sentinel_class() {
        let f = write_json(
            r#"{
                "a": {"path": "a", "class": 1, "sig_len": 20000, "af_ends": [5000]},
                "b": {"path": "b", "class": 2, "sig_len": 9000, "af_ends": []},
                "c": {"path": "c", "class": 0, "sig_len": 100, "af_ends": []}
            }"#,
        );
        let meta = load_metadata(f.path(), None).unwrap();
        assert_eq!(meta.len(), 2);
        assert!(meta.iter().all(|m| !is_excluded(m)));
        assert_eq!(meta[0].path, "a");
        assert_eq!(meta[1].path, "c");
    }

    #[test]
    fn limit_applies_after_filtering() {
        let f = write_json(
            r#"{
                "x": {"path": "x", "class": 2, "sig_len": 10, "af_ends": []},
                "y": {"path": "y", "class": 0, "sig_len": 10, "af_ends": []},
                "z": {"path": "z", "class": 1, "sig_len": 10, "af_ends": [3]}
            }"#,
        );
        let meta = load_metadata(f.path(), Some(1)).unwrap();
        assert_eq!(meta.len(), 1);
        assert_eq!(meta[0].path, "y");
    }

    #[test]
    fn missing_field_is_invalid_record() {
        let f = write_json(r#"{"a": {"path": "a", "class": 1}}"#);
        let err = load_metadata(f.path(), None).unwrap_err();
        assert!(matches!(err, MetaError::InvalidRecord { ref key, .. } if key == "a"));
    }

    #[test]
    fn absent_af_ends_defaults_to_empty() {
        let f = write_json(r#"{"a": {"path": "a", "class": 0, "sig_len": 5}}"#);
        let meta = load_metadata(f.path(), None).unwrap();
        assert!(meta[0].af_ends.is_empty());
    }
}
