//! Label and event-offset alignment.
//!
//! A recording carries at most a scalar class label plus an optional list of
//! AF episode end offsets (sample indices into the *original*, untruncated
//! signal).  The offset travels next to each training pair for diagnostics;
//! [`expand_event_labels`] additionally expands it into a per-timestep label
//! vector for sequence-output models.
use ndarray::Array1;

use crate::config::WindowConfig;

/// Sentinel event offset meaning "no AF event in this recording".
pub const NO_AF_EVENT: i64 = -1;

/// First AF end offset of a recording, or [`NO_AF_EVENT`] when the list is
/// empty.
pub fn first_af_end(af_ends: &[i64]) -> i64 {
    af_ends.first().copied().unwrap_or(NO_AF_EVENT)
}

/// Whether the label-vector index at the converted event offset itself is
/// set.
///
/// The two policies reflect two readings of the expansion rule: mark every
/// step up to *and including* the AF end step, or stop one step short of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Set indices `0..=end_step`.  Default.
    #[default]
    IncludeEnd,
    /// Set indices `0..end_step`, leaving the end step itself 0.
    ExcludeEnd,
}

/// Expand a scalar AF end offset into a per-timestep binary label vector of
/// length `cfg.label_steps`.
///
/// The offset is converted from input-sample units to label steps via
/// `floor(af_end · label_steps / window_samples)` — the label vector is a
/// fixed-rate downsampling of the input window (1000 steps over 15000
/// samples at the defaults).  Steps up to the converted offset are set to
/// 1.0 according to `policy`; the rest stay 0.0.  The fill range is clipped
/// to the vector length.
///
/// A [`NO_AF_EVENT`] (or any negative) offset yields an all-zero vector.
pub fn expand_event_labels(
    af_end: i64,
    cfg: &WindowConfig,
    policy: BoundaryPolicy,
) -> Array1<f32> {
    let mut y = Array1::<f32>::zeros(cfg.label_steps);
    if af_end < 0 {
        return y;
    }

    let end_step = (af_end as usize).saturating_mul(cfg.label_steps) / cfg.window_samples;
    let fill_end = match policy {
        BoundaryPolicy::IncludeEnd => end_step + 1,
        BoundaryPolicy::ExcludeEnd => end_step,
    };
    for i in 0..fill_end.min(cfg.label_steps) {
        y[i] = 1.0;
    }
    y
}
