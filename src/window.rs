//! Fixed-length windowing.
//!
//! Pads or truncates a variable-length [T, C] recording to exactly
//! `window_samples` rows, then transposes to the channel-first [C, T]
//! layout the model consumes.  Pad on the right, truncate on the right:
//! the signal always starts at output index 0.
use ndarray::{s, Array2, ArrayView2};

use crate::config::WindowConfig;

/// Extend or truncate `sig` ([T, C]) to exactly `length` rows.
///
/// The output is all-zero, with the first `min(length, T)` rows copied from
/// the input.  Always succeeds; an empty input degenerates to an all-zero
/// output.
pub fn fit_length(sig: ArrayView2<f32>, length: usize) -> Array2<f32> {
    let n_ch = sig.ncols();
    let keep = length.min(sig.nrows());

    let mut out = Array2::<f32>::zeros((length, n_ch));
    out.slice_mut(s![..keep, ..]).assign(&sig.slice(s![..keep, ..]));
    out
}

/// Transpose a [T, C] window to channel-first [C, T].
///
/// Pure layout change, no semantic effect.  Returns an owned array in
/// standard (row-major) layout so downstream row slices are contiguous.
pub fn channel_first(sig: &Array2<f32>) -> Array2<f32> {
    sig.t().as_standard_layout().to_owned()
}

/// Window one raw recording: [`fit_length`] to `cfg.window_samples`, then
/// [`channel_first`].  Output shape is always [`cfg.n_channels`,
/// `cfg.window_samples`] for a conforming input.
pub fn window_signal(sig: ArrayView2<f32>, cfg: &WindowConfig) -> Array2<f32> {
    channel_first(&fit_length(sig, cfg.window_samples))
}
