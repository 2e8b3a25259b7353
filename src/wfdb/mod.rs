//! WFDB record reader.
//!
//! Implements reading of PhysioNet WFDB records (`.hea` header + `.dat`
//! signal file) for the two sample formats the AF corpora use: 212 (packed
//! 12-bit pairs) and 16 (little-endian 16-bit).
//!
//! # Quick start
//! ```no_run
//! use afwin::wfdb::rdsamp;
//! use std::path::Path;
//!
//! let (sig, header) = rdsamp(Path::new("data/04015"), Some(50000)).unwrap();
//! println!("{} samples × {} signals @ {} Hz",
//!     sig.nrows(), sig.ncols(), header.sample_rate);
//! ```
pub mod header;
pub mod signal;

// Re-export the most commonly used items.
pub use header::{read_header, Header, SignalSpec};
pub use signal::{decode_format_16, decode_format_212, rdsamp};
