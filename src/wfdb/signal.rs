//! WFDB signal decoding.
//!
//! Samples are stored interleaved by frame: with `n_sig` signals the flat
//! sample sequence is `s0[0], s1[0], …, s0[1], s1[1], …`.  Two on-disk
//! encodings are supported:
//!
//! * **format 16** — little-endian two's-complement i16, one per sample.
//! * **format 212** — two 12-bit two's-complement samples packed into
//!   3 bytes:
//!
//! ```text
//! ┌──────────┬───────────────────┬──────────┐
//! │ b0: a₇…a₀ │ b1: B₁₁…B₈ A₁₁…A₈ │ b2: B₇…B₀ │
//! └──────────┴───────────────────┴──────────┘
//! A = b0 | (b1 & 0x0F) << 8      B = b2 | (b1 & 0xF0) << 4
//! ```
//!
//! ADC values convert to physical units as `(adc − baseline) / gain`.
use anyhow::{bail, Context, Result};
use ndarray::Array2;
use std::path::Path;

use super::header::{read_header, Header};

/// Decode format-212 bytes into a flat sequence of at most `max_samples`
/// ADC values.
///
/// A trailing odd sample (3-byte group holding only one used sample) is
/// honored; a trailing incomplete byte group is ignored.
pub fn decode_format_212(bytes: &[u8], max_samples: usize) -> Vec<i32> {
    let mut out = Vec::with_capacity(max_samples.min(bytes.len() / 3 * 2 + 1));
    for chunk in bytes.chunks_exact(3) {
        if out.len() >= max_samples {
            break;
        }
        let a = (chunk[0] as i32) | (((chunk[1] & 0x0F) as i32) << 8);
        out.push(sign_extend_12(a));
        if out.len() >= max_samples {
            break;
        }
        let b = (chunk[2] as i32) | (((chunk[1] & 0xF0) as i32) << 4);
        out.push(sign_extend_12(b));
    }
    out
}

/// Decode format-16 bytes into a flat sequence of at most `max_samples`
/// ADC values.
pub fn decode_format_16(bytes: &[u8], max_samples: usize) -> Vec<i32> {
    bytes
        .chunks_exact(2)
        .take(max_samples)
        .map(|b| i16::from_le_bytes([b[0], b[1]]) as i32)
        .collect()
}

#[inline]
fn sign_extend_12(v: i32) -> i32 {
    if v > 2047 { v - 4096 } else { v }
}

/// Read a WFDB record: `record_path` without extension, e.g. `data/04015`
/// for `data/04015.hea` + `data/04015.dat`.
///
/// Returns the signal as `[n_samples, n_sig]` in physical units together
/// with the parsed header.  `sampto` caps the number of samples (frames)
/// read; `None` reads the whole record.
///
/// All signals must live in a single dat file with one sample per signal
/// per frame and a uniform format — the layout of the AF corpora.
pub fn rdsamp(record_path: &Path, sampto: Option<usize>) -> Result<(Array2<f32>, Header)> {
    let header = read_header(&record_path.with_extension("hea"))?;
    if header.signals.is_empty() {
        bail!("record {:?} declares no signals", header.record_name);
    }

    let format = header.signals[0].format;
    let file_name = &header.signals[0].file_name;
    for s in &header.signals[1..] {
        if s.file_name != *file_name || s.format != format {
            bail!(
                "record {:?}: signals span multiple dat files or formats",
                header.record_name
            );
        }
    }

    let dat_path = match record_path.parent() {
        Some(dir) => dir.join(file_name),
        None => Path::new(file_name).to_path_buf(),
    };
    let bytes = std::fs::read(&dat_path)
        .with_context(|| format!("reading signal file {}", dat_path.display()))?;

    let n_sig = header.n_sig;
    let n_frames_cap = match sampto {
        Some(n) => n,
        None if header.n_samples > 0 => header.n_samples,
        None => usize::MAX,
    };
    let max_flat = n_frames_cap.saturating_mul(n_sig);

    let flat = match format {
        212 => decode_format_212(&bytes, max_flat),
        16 => decode_format_16(&bytes, max_flat),
        other => bail!("unsupported WFDB sample format {other}"),
    };

    let n_frames = flat.len() / n_sig;
    let mut sig = Array2::<f32>::zeros((n_frames, n_sig));
    for (i, spec) in header.signals.iter().enumerate() {
        let inv_gain = 1.0 / spec.gain;
        for t in 0..n_frames {
            let adc = flat[t * n_sig + i];
            sig[[t, i]] = (adc - spec.baseline) as f32 * inv_gain;
        }
    }

    Ok((sig, header))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pack pairs of 12-bit ADC values into format-212 bytes.
    fn pack_212(samples: &[i32]) -> Vec<u8> {
        let mut out = Vec::new();
        for pair in samples.chunks(2) {
            let a = (pair[0] & 0xFFF) as u32;
            let b = (*pair.get(1).unwrap_or(&0) & 0xFFF) as u32;
            out.push((a & 0xFF) as u8);
            out.push((((b >> 8) << 4) | (a >> 8)) as u8);
            out.push((b & 0xFF) as u8);
        }
        out
    }

    #[test]
    fn format_212_roundtrip() {
        let samples = [0, 1, -1, 2047, -2048, 100];
        let bytes = pack_212(&samples);
        assert_eq!(decode_format_212(&bytes, 6), samples);
    }

    #[test]
    fn format_212_cap_honored() {
        let bytes = pack_212(&[1, 2, 3, 4]);
        assert_eq!(decode_format_212(&bytes, 3), vec![1, 2, 3]);
    }

    #[test]
    fn format_16_roundtrip() {
        let samples: [i16; 4] = [0, -1, 512, -30000];
        let bytes: Vec<u8> = samples.iter().flat_map(|v| v.to_le_bytes()).collect();
        assert_eq!(decode_format_16(&bytes, 4), vec![0, -1, 512, -30000]);
    }

    #[test]
    fn sign_extension_at_the_edges() {
        assert_eq!(sign_extend_12(2047), 2047);
        assert_eq!(sign_extend_12(2048), -2048);
        assert_eq!(sign_extend_12(4095), -1);
    }
}
