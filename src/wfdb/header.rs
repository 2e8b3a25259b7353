//! WFDB `.hea` header parsing.
//!
//! A header is line-oriented ASCII:
//!
//! ```text
//! record_name n_sig sample_rate n_samples      ← record line
//! file format gain(baseline)/units adc_res adc_zero init checksum blk desc
//! ...one line per signal...
//! # free-text comment lines
//! ```
//!
//! Trailing fields of a signal line are optional; defaults follow the WFDB
//! spec (gain 200 ADC units per physical unit, baseline = ADC zero).
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Default ADC gain when the header gives none or zero.
pub const DEFAULT_GAIN: f32 = 200.0;

/// Parsed record line plus one [`SignalSpec`] per signal.
#[derive(Debug, Clone)]
pub struct Header {
    pub record_name: String,
    pub n_sig: usize,
    /// Sampling frequency in Hz.
    pub sample_rate: f32,
    /// Number of samples per signal; 0 when the header omits it.
    pub n_samples: usize,
    pub signals: Vec<SignalSpec>,
}

/// Per-signal line of the header.
#[derive(Debug, Clone)]
pub struct SignalSpec {
    /// Name of the `.dat` file holding this signal.
    pub file_name: String,
    /// Sample format (212, 16, ...).
    pub format: u32,
    /// ADC units per physical unit.
    pub gain: f32,
    /// ADC value corresponding to 0 physical units.
    pub baseline: i32,
    /// Physical units label (e.g. `mV`); empty if absent.
    pub units: String,
    /// ADC value at the converter midpoint.
    pub adc_zero: i32,
    /// Free-text signal description (e.g. `ECG1`).
    pub description: String,
}

/// Parse the `.hea` file at `path`.
pub fn read_header(path: &Path) -> Result<Header> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading header {}", path.display()))?;
    parse_header(&text).with_context(|| format!("parsing header {}", path.display()))
}

/// Parse header text (split out for testability).
pub fn parse_header(text: &str) -> Result<Header> {
    let mut lines = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'));

    let record_line = lines.next().context("header is empty")?;
    let mut fields = record_line.split_whitespace();

    // Record name may carry a "/n_segments" suffix in multi-segment records;
    // only the base name matters here.
    let record_name = fields
        .next()
        .context("missing record name")?
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string();
    let n_sig: usize = fields
        .next()
        .context("missing signal count")?
        .parse()
        .context("signal count is not an integer")?;
    // Sample rate may be "fs/counter(base)"; the leading number is the rate.
    let sample_rate: f32 = match fields.next() {
        Some(tok) => leading_number(tok).context("bad sample rate")?,
        None => 250.0, // WFDB default
    };
    let n_samples: usize = match fields.next() {
        Some(tok) => tok.parse().context("bad sample count")?,
        None => 0,
    };

    let mut signals = Vec::with_capacity(n_sig);
    for _ in 0..n_sig {
        let line = lines.next().context("fewer signal lines than n_sig")?;
        signals.push(parse_signal_line(line)?);
    }

    Ok(Header { record_name, n_sig, sample_rate, n_samples, signals })
}

fn parse_signal_line(line: &str) -> Result<SignalSpec> {
    let mut fields = line.split_whitespace();

    let file_name = fields.next().context("missing dat file name")?.to_string();

    // Format may carry "xN" (samples per frame) or ":skew"/"+offset"
    // decorations; only the leading number is needed for plain records.
    let fmt_tok = fields.next().context("missing sample format")?;
    let format: u32 = leading_number::<f32>(fmt_tok).context("bad sample format")? as u32;

    // "gain(baseline)/units", every part optional.
    let (mut gain, mut baseline, mut units) = (DEFAULT_GAIN, None, String::new());
    if let Some(tok) = fields.next() {
        let (gain_part, units_part) = match tok.split_once('/') {
            Some((g, u)) => (g, u.to_string()),
            None => (tok, String::new()),
        };
        units = units_part;
        let (gain_str, base_str) = match gain_part.split_once('(') {
            Some((g, b)) => (g, Some(b.trim_end_matches(')'))),
            None => (gain_part, None),
        };
        gain = gain_str.parse().context("bad ADC gain")?;
        if let Some(b) = base_str {
            baseline = Some(b.parse::<i32>().context("bad baseline")?);
        }
    }
    if gain == 0.0 {
        gain = DEFAULT_GAIN;
    }

    let _adc_resolution = fields.next();
    let adc_zero: i32 = match fields.next() {
        Some(tok) => tok.parse().context("bad ADC zero")?,
        None => 0,
    };
    let _init_value = fields.next();
    let _checksum = fields.next();
    let _block_size = fields.next();
    let description = fields.collect::<Vec<_>>().join(" ");

    // Baseline defaults to ADC zero when not given explicitly.
    let baseline = baseline.unwrap_or(adc_zero);

    if file_name.is_empty() {
        bail!("empty dat file name");
    }

    Ok(SignalSpec { file_name, format, gain, baseline, units, adc_zero, description })
}

fn leading_number<T: std::str::FromStr>(tok: &str) -> Option<T> {
    let end = tok
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
        .unwrap_or(tok.len());
    tok[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const AFDB_HEADER: &str = "\
04015 2 250 9205760
04015.dat 212 200 12 0 -53 28481 0 ECG1
04015.dat 212 200 12 0 -69 12587 0 ECG2
# produced by a Holter recorder
";

    #[test]
    fn parses_record_line() {
        let h = parse_header(AFDB_HEADER).unwrap();
        assert_eq!(h.record_name, "04015");
        assert_eq!(h.n_sig, 2);
        assert_eq!(h.sample_rate, 250.0);
        assert_eq!(h.n_samples, 9205760);
    }

    #[test]
    fn parses_signal_lines() {
        let h = parse_header(AFDB_HEADER).unwrap();
        assert_eq!(h.signals.len(), 2);
        let s = &h.signals[0];
        assert_eq!(s.file_name, "04015.dat");
        assert_eq!(s.format, 212);
        assert_eq!(s.gain, 200.0);
        assert_eq!(s.baseline, 0);
        assert_eq!(s.description, "ECG1");
    }

    #[test]
    fn gain_with_baseline_and_units() {
        let h = parse_header("r 1 200 100\nr.dat 16 1000(512)/mV 16 512 0 0 0 II\n").unwrap();
        let s = &h.signals[0];
        assert_eq!(s.gain, 1000.0);
        assert_eq!(s.baseline, 512);
        assert_eq!(s.units, "mV");
        assert_eq!(s.adc_zero, 512);
    }

    #[test]
    fn baseline_defaults_to_adc_zero() {
        let h = parse_header("r 1 200 100\nr.dat 16 1000/mV 16 512 0 0 0 II\n").unwrap();
        assert_eq!(h.signals[0].baseline, 512);
    }

    #[test]
    fn zero_gain_replaced_by_default() {
        let h = parse_header("r 1 200 100\nr.dat 16 0 16 0 0 0 0 X\n").unwrap();
        assert_eq!(h.signals[0].gain, DEFAULT_GAIN);
    }

    #[test]
    fn too_few_signal_lines_is_an_error() {
        assert!(parse_header("r 2 200 100\nr.dat 16 200 16 0 0 0 0 X\n").is_err());
    }

    #[test]
    fn comment_lines_skipped() {
        let h = parse_header("# leading comment\nr 1 360\nr.dat 212 200 12 0 0 0 0 MLII\n")
            .unwrap();
        assert_eq!(h.sample_rate, 360.0);
        assert_eq!(h.n_samples, 0);
    }
}
