//! Indexed dataset over metadata + preloaded signals.
//!
//! [`EcgDataset`] is the glue between the windowing pipeline and an external
//! batching/training harness: a length-known, random-access collection of
//! [`Sample`]s.  It does no filtering of its own (that happens at metadata
//! load time) and no I/O (signals are preloaded); every `get` is an
//! independent read-only derivation, so concurrent callers are safe as long
//! as they only share the store.
use ndarray::{Array1, Array2};

use crate::augment::{LabelTransform, SignalTransform};
use crate::config::WindowConfig;
use crate::error::DatasetError;
use crate::meta::RecordMeta;
use crate::store::SignalStore;

/// One training item: channel-first windowed signal, scalar label as a
/// one-element vector, and the first AF end offset
/// ([`NO_AF_EVENT`](crate::label::NO_AF_EVENT) when absent).
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Shape [n_channels, window_samples].
    pub signal: Array2<f32>,
    /// Shape [1]: the class label as f32.
    pub label: Array1<f32>,
    /// First AF end offset in original-sample units, or −1.
    pub af_end: i64,
}

/// Capability interface for random-access sample collections.
///
/// The training harness only ever needs these two operations; nothing in
/// this crate depends on a framework dataset base class.
pub trait Dataset {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Result<Sample, DatasetError>;
}

/// Dataset adapter over filtered metadata and a preloaded [`SignalStore`].
pub struct EcgDataset {
    meta: Vec<RecordMeta>,
    store: SignalStore,
    cfg: WindowConfig,
    transform: Option<SignalTransform>,
    target_transform: Option<LabelTransform>,
}

impl EcgDataset {
    /// Build a dataset with no transforms (evaluation/inference mode:
    /// deterministic pass-through after windowing).
    pub fn new(meta: Vec<RecordMeta>, store: SignalStore, cfg: WindowConfig) -> Self {
        Self { meta, store, cfg, transform: None, target_transform: None }
    }

    /// Attach an optional signal transform (training-time augmentation, see
    /// [`Augmenter::into_transform`](crate::augment::Augmenter::into_transform)).
    pub fn with_transform(mut self, transform: SignalTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Attach an optional label transform.
    pub fn with_target_transform(mut self, transform: LabelTransform) -> Self {
        self.target_transform = Some(transform);
        self
    }

    /// The backing metadata, in dataset index order.
    pub fn meta(&self) -> &[RecordMeta] {
        &self.meta
    }
}

impl Dataset for EcgDataset {
    fn len(&self) -> usize {
        self.meta.len()
    }

    fn get(&self, index: usize) -> Result<Sample, DatasetError> {
        let entry = self.meta.get(index).ok_or(DatasetError::IndexOutOfRange {
            index,
            len: self.meta.len(),
        })?;

        let raw = self
            .store
            .get(&entry.path)
            .ok_or_else(|| DatasetError::KeyNotFound { key: entry.path.clone() })?;

        let mut sample = crate::window_record(raw.view(), entry, &self.cfg);
        if let Some(t) = &self.transform {
            sample.signal = t(sample.signal);
        }
        if let Some(t) = &self.target_transform {
            sample.label = t(sample.label);
        }
        Ok(sample)
    }
}
