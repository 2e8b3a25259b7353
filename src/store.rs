//! Preloaded raw-signal store.
//!
//! All signal I/O happens up front: [`preload`] reads every record named by
//! the metadata into memory, and from then on the store is a read-only
//! synchronous lookup.  The dataset adapter never touches the filesystem.
use anyhow::{Context, Result};
use log::debug;
use ndarray::Array2;
use std::collections::HashMap;
use std::path::Path;

use crate::config::WindowConfig;
use crate::meta::RecordMeta;
use crate::wfdb;

/// Mapping record key → raw signal ([T, C], physical units).
///
/// Keys are the metadata `path` values.  Insertion order is irrelevant;
/// lookup is the only operation the pipeline performs after construction.
#[derive(Debug, Default)]
pub struct SignalStore {
    signals: HashMap<String, Array2<f32>>,
}

impl SignalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from pre-read signals.
    pub fn from_signals(signals: HashMap<String, Array2<f32>>) -> Self {
        Self { signals }
    }

    pub fn insert(&mut self, key: impl Into<String>, sig: Array2<f32>) {
        self.signals.insert(key.into(), sig);
    }

    pub fn get(&self, key: &str) -> Option<&Array2<f32>> {
        self.signals.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.signals.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Iterate over `(key, signal)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Array2<f32>)> {
        self.signals.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Read every record in `meta` from WFDB files under `data_dir` into a
/// [`SignalStore`].
///
/// Each record is read capped at `min(cfg.max_load_samples, sig_len)`
/// samples, so oversized recordings never reach the windowing stage at full
/// length.  Fails on the first unreadable record.
pub fn preload(meta: &[RecordMeta], data_dir: &Path, cfg: &WindowConfig) -> Result<SignalStore> {
    let mut store = SignalStore::new();
    for entry in meta {
        let record_path = data_dir.join(&entry.path);
        let sampto = cfg.max_load_samples.min(entry.sig_len);
        let (sig, header) = wfdb::rdsamp(&record_path, Some(sampto))
            .with_context(|| format!("preloading record {:?}", entry.path))?;
        debug!(
            "preloaded {:?}: {} × {} @ {} Hz",
            entry.path,
            sig.nrows(),
            sig.ncols(),
            header.sample_rate
        );
        store.insert(entry.path.clone(), sig);
    }
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_roundtrip() {
        let mut store = SignalStore::new();
        store.insert("a", Array2::from_elem((10, 2), 1.0_f32));

        assert_eq!(store.len(), 1);
        assert!(store.contains("a"));
        assert!(!store.contains("b"));
        assert_eq!(store.get("a").unwrap().dim(), (10, 2));
        assert!(store.get("b").is_none());
    }
}
