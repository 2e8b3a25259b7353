//! Safetensors I/O for the windowing pipeline.
//!
//! Two on-disk shapes, both plain safetensors files:
//!
//! * **signal store** — one F32 tensor per record key, each `[T, C]` in
//!   physical units.  An alternative to preloading from WFDB files when the
//!   signals have already been converted once.
//! * **batch** — windowed samples for a downstream trainer: `x_{i}` `[C, L]`
//!   F32, `y_{i}` `[1]` F32, `af_end_{i}` `[1]` I32, plus an `n_samples`
//!   scalar.
use anyhow::{bail, Context, Result};
use ndarray::{Array1, Array2};
use std::collections::HashMap;
use std::path::Path;

use crate::dataset::Sample;
use crate::store::SignalStore;

// ── Low-level safetensors parser (no dependency on the `safetensors` crate's
//    tensor types — we just need raw bytes → ndarray). ─────────────────────────

fn parse_header(bytes: &[u8]) -> Result<(HashMap<String, serde_json::Value>, usize)> {
    if bytes.len() < 8 {
        bail!("safetensors file too small");
    }
    let n = u64::from_le_bytes(bytes[..8].try_into().unwrap()) as usize;
    let header: HashMap<String, serde_json::Value> =
        serde_json::from_slice(&bytes[8..8 + n])
            .context("failed to parse safetensors header")?;
    Ok((header, 8 + n))
}

fn payload<'a>(bytes: &'a [u8], data_start: usize, entry: &serde_json::Value) -> Result<&'a [u8]> {
    let offsets = entry["data_offsets"]
        .as_array()
        .context("missing data_offsets")?;
    let s = offsets[0].as_u64().context("bad offset")? as usize;
    let e = offsets[1].as_u64().context("bad offset")? as usize;
    bytes
        .get(data_start + s..data_start + e)
        .context("data_offsets past end of file")
}

fn read_f32_tensor(
    bytes: &[u8],
    data_start: usize,
    entry: &serde_json::Value,
) -> Result<Vec<f32>> {
    let raw = payload(bytes, data_start, entry)?;
    Ok(raw
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

fn read_i32_tensor(
    bytes: &[u8],
    data_start: usize,
    entry: &serde_json::Value,
) -> Result<Vec<i32>> {
    let raw = payload(bytes, data_start, entry)?;
    Ok(raw
        .chunks_exact(4)
        .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

fn shape_of(entry: &serde_json::Value) -> Result<Vec<usize>> {
    entry["shape"]
        .as_array()
        .context("missing shape")?
        .iter()
        .map(|v| v.as_u64().map(|n| n as usize).context("bad shape entry"))
        .collect()
}

// ── Generic safetensors builder ───────────────────────────────────────────────

/// Simple safetensors file writer for F32 and I32 tensors.
///
/// Usage:
/// ```rust,no_run
/// use afwin::io::StWriter;
/// use std::path::Path;
/// let mut w = StWriter::new();
/// w.add_f32("signal", &[1.0f32, 2.0, 3.0], &[1, 3]);
/// w.write(Path::new("/tmp/out.safetensors")).unwrap();
/// ```
pub struct StWriter {
    entries: Vec<(String, Vec<u8>, &'static str, Vec<usize>)>,
}

impl Default for StWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl StWriter {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn add_f32(&mut self, name: &str, data: &[f32], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries.push((name.to_string(), bytes, "F32", shape.to_vec()));
    }

    pub fn add_f32_arr2(&mut self, name: &str, arr: &Array2<f32>) {
        let data: Vec<f32> = arr.iter().copied().collect();
        self.add_f32(name, &data, &[arr.nrows(), arr.ncols()]);
    }

    pub fn add_i32(&mut self, name: &str, data: &[i32], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries.push((name.to_string(), bytes, "I32", shape.to_vec()));
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        use std::io::Write;
        let mut header_map = serde_json::Map::new();
        let mut offset: usize = 0;
        for (name, data, dtype, shape) in &self.entries {
            header_map.insert(name.clone(), serde_json::json!({
                "dtype": dtype,
                "shape": shape,
                "data_offsets": [offset, offset + data.len()],
            }));
            offset += data.len();
        }
        let hdr_bytes = serde_json::to_vec(&header_map)?;
        let pad = (8 - hdr_bytes.len() % 8) % 8;
        let padded: Vec<u8> = hdr_bytes.into_iter()
            .chain(std::iter::repeat(b' ').take(pad))
            .collect();
        let mut f = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        f.write_all(&(padded.len() as u64).to_le_bytes())?;
        f.write_all(&padded)?;
        for (_, data, _, _) in &self.entries {
            f.write_all(data)?;
        }
        Ok(())
    }
}

// ── Signal store ──────────────────────────────────────────────────────────────

/// Load a [`SignalStore`] from a safetensors file: every F32 tensor becomes
/// one record, keyed by tensor name, shape `[T, C]`.
pub fn load_store(path: &Path) -> Result<SignalStore> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("reading signal store {}", path.display()))?;
    let (header, data_start) = parse_header(&bytes)?;

    let mut store = SignalStore::new();
    for (key, entry) in &header {
        if key == "__metadata__" {
            continue;
        }
        let shape = shape_of(entry)?;
        if shape.len() != 2 {
            bail!("store tensor {key:?} is not 2-D (shape {shape:?})");
        }
        let data = read_f32_tensor(&bytes, data_start, entry)?;
        let sig = Array2::from_shape_vec((shape[0], shape[1]), data)
            .with_context(|| format!("store tensor {key:?}: shape/data mismatch"))?;
        store.insert(key.clone(), sig);
    }
    Ok(store)
}

/// Write a [`SignalStore`] as a safetensors file, one tensor per record.
pub fn save_store(store: &SignalStore, path: &Path) -> Result<()> {
    let mut w = StWriter::new();
    for (key, sig) in store.iter() {
        w.add_f32_arr2(key, sig);
    }
    w.write(path)
}

// ── Batch writer/reader ───────────────────────────────────────────────────────

/// Write windowed samples to `batch.safetensors`.
///
/// Layout per sample `i`: `x_{i}` `[C, L]` F32, `y_{i}` `[1]` F32,
/// `af_end_{i}` `[1]` I32.  One `n_samples` I32 scalar at the end.
pub fn write_batch(samples: &[Sample], path: &Path) -> Result<()> {
    let mut w = StWriter::new();
    for (i, sample) in samples.iter().enumerate() {
        w.add_f32_arr2(&format!("x_{i}"), &sample.signal);
        let label: Vec<f32> = sample.label.iter().copied().collect();
        w.add_f32(&format!("y_{i}"), &label, &[label.len()]);
        w.add_i32(&format!("af_end_{i}"), &[sample.af_end as i32], &[1]);
    }
    w.add_i32("n_samples", &[samples.len() as i32], &[1]);
    w.write(path)
}

/// Read a batch written by [`write_batch`].
pub fn read_batch(path: &Path) -> Result<Vec<Sample>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("reading batch {}", path.display()))?;
    let (header, data_start) = parse_header(&bytes)?;

    let n_entry = header.get("n_samples").context("missing 'n_samples' key")?;
    let n = *read_i32_tensor(&bytes, data_start, n_entry)?
        .first()
        .context("empty 'n_samples'")? as usize;

    let mut samples = Vec::with_capacity(n);
    for i in 0..n {
        let x_entry = header
            .get(&format!("x_{i}"))
            .with_context(|| format!("missing 'x_{i}'"))?;
        let shape = shape_of(x_entry)?;
        let signal = Array2::from_shape_vec(
            (shape[0], shape[1]),
            read_f32_tensor(&bytes, data_start, x_entry)?,
        )?;

        let y_entry = header
            .get(&format!("y_{i}"))
            .with_context(|| format!("missing 'y_{i}'"))?;
        let label = Array1::from_vec(read_f32_tensor(&bytes, data_start, y_entry)?);

        let end_entry = header
            .get(&format!("af_end_{i}"))
            .with_context(|| format!("missing 'af_end_{i}'"))?;
        let af_end = *read_i32_tensor(&bytes, data_start, end_entry)?
            .first()
            .with_context(|| format!("empty 'af_end_{i}'"))? as i64;

        samples.push(Sample { signal, label, af_end });
    }
    Ok(samples)
}
