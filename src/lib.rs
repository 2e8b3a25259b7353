//! # afwin — ECG windowing for atrial-fibrillation detection
//!
//! `afwin` turns raw variable-length two-lead ECG recordings into
//! fixed-size labeled training tensors.  It owns the data side of an AF
//! detector — windowing, augmentation, label alignment, dataset access —
//! and leaves the model, training loop, and metrics to an external harness.
//!
//! ## Pipeline overview
//!
//! ```text
//! meta.json                       data/04015.hea + .dat
//!   │                               │
//!   ├─ meta::load_metadata()        ├─ wfdb::rdsamp()      native WFDB reader
//!   │    class == 2 filtered out    │    capped at max_load_samples
//!   │                               │
//!   └───────────┬───────────────────┴─ store::preload()    key → [T, 2] f32
//!               │
//!               ▼
//!   dataset::EcgDataset::get(i)
//!     ├─ window::fit_length()       right-pad / right-truncate to 15000
//!     ├─ window::channel_first()    [15000, 2] → [2, 15000]
//!     ├─ augment::Augmenter         per-channel scale + DC shift (train only)
//!     └─ label                      class → [1] f32, af_ends → offset or −1
//!               │
//!               ▼
//!   Sample { signal [2, 15000], label [1], af_end }
//! ```
//!
//! ## Quick start
//!
//! ```no_run
//! use afwin::{load_metadata, preload, Dataset, EcgDataset, WindowConfig};
//! use std::path::Path;
//!
//! let cfg = WindowConfig::default();
//! let meta = load_metadata(Path::new("data/meta.json"), None).unwrap();
//! let store = preload(&meta, Path::new("data"), &cfg).unwrap();
//!
//! let dataset = EcgDataset::new(meta, store, cfg);
//! for i in 0..dataset.len() {
//!     let sample = dataset.get(i).unwrap();
//!     println!("{i}: shape {:?}, af_end {}", sample.signal.dim(), sample.af_end);
//! }
//! ```
//!
//! ## Training-time augmentation
//!
//! ```no_run
//! # use afwin::{EcgDataset, WindowConfig};
//! use afwin::{AugmentConfig, Augmenter};
//! # let (meta, store) = (vec![], afwin::SignalStore::new());
//!
//! let augmenter = Augmenter::new(AugmentConfig::default()).unwrap();
//! let dataset = EcgDataset::new(meta, store, WindowConfig::default())
//!     .with_transform(augmenter.into_transform(42));
//! ```
//!
//! With no transform attached the pipeline is fully deterministic: the same
//! index always yields a bit-identical sample.

pub mod augment;
pub mod config;
pub mod dataset;
pub mod error;
pub mod io;
pub mod label;
pub mod meta;
pub mod split;
pub mod store;
pub mod wfdb;
pub mod window;

use ndarray::{Array1, ArrayView2};

// ── Crate-root re-exports ─────────────────────────────────────────────────
//
// Everything a downstream user is likely to need is available directly as
// `afwin::Foo` without having to know the internal module layout.

// config
pub use config::{AugmentConfig, GatePolicy, WindowConfig};

// window
pub use window::{channel_first, fit_length, window_signal};

// augment
pub use augment::{
    scale_channels, shift_channels, Augmenter, LabelTransform, SignalTransform,
};

// label
pub use label::{expand_event_labels, first_af_end, BoundaryPolicy, NO_AF_EVENT};

// meta
pub use meta::{is_excluded, load_metadata, RecordMeta, EXCLUDED_CLASS};

// store
pub use store::{preload, SignalStore};

// dataset
pub use dataset::{Dataset, EcgDataset, Sample};

// split
pub use split::{random_split, split_lengths, Subset};

// errors
pub use error::{DatasetError, MetaError};

// io — safetensors helpers
pub use io::{load_store, read_batch, save_store, write_batch, StWriter};

// wfdb
pub use wfdb::rdsamp;

/// Window **one record** into a [`Sample`]: fixed-length extension,
/// channel-first transpose, scalar label packaging, and event-offset
/// alignment.  No augmentation — attach that at the dataset level.
///
/// * `raw` — raw signal, shape `[T, C]`, any `T ≥ 0`.
/// * `entry` — the record's metadata.
/// * `cfg` — window configuration (see [`WindowConfig`]).
///
/// # Examples
///
/// ```
/// use afwin::{window_record, RecordMeta, WindowConfig};
/// use ndarray::Array2;
///
/// let raw = Array2::<f32>::ones((20000, 2));
/// let entry = RecordMeta {
///     path: "A".into(), class: 1, sig_len: 20000, af_ends: vec![5000],
/// };
/// let sample = window_record(raw.view(), &entry, &WindowConfig::default());
/// assert_eq!(sample.signal.dim(), (2, 15000));
/// assert_eq!(sample.af_end, 5000);
/// ```
pub fn window_record(
    raw: ArrayView2<f32>,
    entry: &RecordMeta,
    cfg: &WindowConfig,
) -> Sample {
    Sample {
        signal: window_signal(raw, cfg),
        label: Array1::from_elem(1, entry.class as f32),
        af_end: first_af_end(&entry.af_ends),
    }
}
