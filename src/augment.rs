//! Randomized training-time augmentation.
//!
//! Both operations act on a channel-first [C, T] window and draw one value
//! per channel:
//!
//! * [`scale_channels`] — multiply every sample of a channel by a factor
//!   drawn from `N(1.0, sigma)`.
//! * [`shift_channels`] — add a constant DC bias of `offset / 1000` to a
//!   channel, `offset` uniform in `[-interval, interval)`.  Despite the name
//!   this is an amplitude bias, not a time shift.
//!
//! All randomness flows through an explicitly passed [`Rng`] handle, so runs
//! are reproducible with a seeded generator and concurrent callers never
//! share hidden state.
use anyhow::{ensure, Context, Result};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, StandardNormal};
use std::sync::Mutex;

use crate::config::{AugmentConfig, GatePolicy};

/// Optional per-sample signal transform attached to a dataset.
///
/// Takes ownership of the windowed [C, T] array and returns it (possibly
/// mutated).  `Send + Sync` so a multi-worker loader can share the dataset.
pub type SignalTransform = Box<dyn Fn(Array2<f32>) -> Array2<f32> + Send + Sync>;

/// Optional label transform; same shape contract as [`SignalTransform`].
pub type LabelTransform =
    Box<dyn Fn(ndarray::Array1<f32>) -> ndarray::Array1<f32> + Send + Sync>;

/// Multiply each channel (row) of `sig` by one factor drawn from
/// `N(1.0, sigma)`.  The factor is constant across the channel's time steps,
/// so within-channel sample ratios are preserved.
///
/// Fails if `sigma` is not a valid standard deviation (negative or NaN).
pub fn scale_channels<R: Rng + ?Sized>(
    sig: &mut Array2<f32>,
    sigma: f32,
    rng: &mut R,
) -> Result<()> {
    let dist = Normal::new(1.0_f32, sigma)
        .with_context(|| format!("invalid scale sigma {sigma}"))?;
    for mut row in sig.rows_mut() {
        let factor = dist.sample(rng);
        row.mapv_inplace(|v| v * factor);
    }
    Ok(())
}

/// Add a per-channel DC bias of `offset / 1000` to `sig`, with `offset`
/// drawn uniform in `[-interval, interval)` independently per channel.
///
/// `interval` must be positive.
pub fn shift_channels<R: Rng + ?Sized>(sig: &mut Array2<f32>, interval: i32, rng: &mut R) {
    for mut row in sig.rows_mut() {
        let offset = rng.random_range(-interval..interval);
        let bias = offset as f32 / 1000.0;
        row.mapv_inplace(|v| v + bias);
    }
}

/// Combined randomized transform: two independent gate draws decide whether
/// scale and shift each fire on a given window.
///
/// The gate semantics are a visible policy choice, see
/// [`GatePolicy`](crate::config::GatePolicy): the default
/// `NormalThreshold` fires at ≈ 30.85% per operation, `FairCoin` at 50%.
pub struct Augmenter {
    cfg: AugmentConfig,
    scale_dist: Normal<f32>,
}

impl Augmenter {
    /// Build an augmenter from `cfg`.
    ///
    /// Fails if `scale_sigma` is not a valid standard deviation or
    /// `shift_interval` is not positive.
    pub fn new(cfg: AugmentConfig) -> Result<Self> {
        ensure!(
            cfg.shift_interval > 0,
            "shift_interval must be positive, got {}",
            cfg.shift_interval
        );
        let scale_dist = Normal::new(1.0_f32, cfg.scale_sigma)
            .with_context(|| format!("invalid scale_sigma {}", cfg.scale_sigma))?;
        Ok(Self { cfg, scale_dist })
    }

    fn gate_fires<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        match self.cfg.gate {
            GatePolicy::NormalThreshold => {
                let z: f32 = rng.sample(StandardNormal);
                z > 0.5
            }
            GatePolicy::FairCoin => rng.random_bool(0.5),
        }
    }

    /// Apply the combined transform to one [C, T] window in place.
    ///
    /// Gate draws happen in a fixed order (scale gate, scale factors if
    /// fired, shift gate, shift offsets if fired) so a seeded generator
    /// reproduces the same augmentation sequence.
    pub fn apply<R: Rng + ?Sized>(&self, sig: &mut Array2<f32>, rng: &mut R) {
        if self.gate_fires(rng) {
            for mut row in sig.rows_mut() {
                let factor = self.scale_dist.sample(rng);
                row.mapv_inplace(|v| v * factor);
            }
        }
        if self.gate_fires(rng) {
            shift_channels(sig, self.cfg.shift_interval, rng);
        }
    }

    /// Package this augmenter as a dataset [`SignalTransform`] with its own
    /// seeded generator.
    ///
    /// The generator sits behind a `Mutex`, so the transform stays usable
    /// from multiple loader workers; draws are then serialized, which keeps
    /// every window's augmentation internally consistent.
    pub fn into_transform(self, seed: u64) -> SignalTransform {
        let rng = Mutex::new(StdRng::seed_from_u64(seed));
        Box::new(move |mut sig| {
            let mut rng = rng.lock().unwrap_or_else(|e| e.into_inner());
            self.apply(&mut sig, &mut *rng);
            sig
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn scale_preserves_shape_and_within_channel_ratios() {
        let mut sig = Array2::from_shape_fn((2, 100), |(c, t)| (t + 1) as f32 * (c + 1) as f32);
        let orig = sig.clone();
        scale_channels(&mut sig, 0.1, &mut rng(7)).unwrap();

        assert_eq!(sig.dim(), orig.dim());
        for c in 0..2 {
            // Ratio of any two samples in a channel is unchanged.
            let r_orig = orig[[c, 10]] / orig[[c, 3]];
            let r_new = sig[[c, 10]] / sig[[c, 3]];
            approx::assert_relative_eq!(r_orig, r_new, max_relative = 1e-5);
        }
    }

    #[test]
    fn shift_bias_bounded_and_constant_per_channel() {
        let interval = 20;
        let mut sig = Array2::from_elem((2, 500), 0.25_f32);
        let orig = sig.clone();
        shift_channels(&mut sig, interval, &mut rng(3));

        let bound = interval as f32 / 1000.0;
        for c in 0..2 {
            let bias = sig[[c, 0]] - orig[[c, 0]];
            assert!(bias.abs() <= bound, "bias {bias} exceeds {bound}");
            for t in 0..500 {
                approx::assert_abs_diff_eq!(sig[[c, t]] - orig[[c, t]], bias, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn shift_channels_draw_independently() {
        // With enough channels, at least two biases must differ.
        let mut sig = Array2::<f32>::zeros((64, 4));
        shift_channels(&mut sig, 20, &mut rng(11));
        let first = sig[[0, 0]];
        assert!((0..64).any(|c| sig[[c, 0]] != first));
    }

    #[test]
    fn seeded_apply_is_reproducible() {
        let aug = Augmenter::new(AugmentConfig::default()).unwrap();
        let base = Array2::from_shape_fn((2, 200), |(c, t)| ((c * 31 + t) as f32).sin());

        let mut a = base.clone();
        let mut b = base.clone();
        aug.apply(&mut a, &mut rng(42));
        aug.apply(&mut b, &mut rng(42));
        assert_eq!(a, b);
    }

    #[test]
    fn fair_coin_gate_fires_about_half_the_time() {
        let aug = Augmenter::new(AugmentConfig {
            gate: GatePolicy::FairCoin,
            ..AugmentConfig::default()
        })
        .unwrap();
        let mut r = rng(1);
        let fired = (0..4000).filter(|_| aug.gate_fires(&mut r)).count();
        assert!((1700..2300).contains(&fired), "fired {fired}/4000");
    }

    #[test]
    fn normal_threshold_gate_fires_less_than_half() {
        // P(N(0,1) > 0.5) ≈ 0.3085.
        let aug = Augmenter::new(AugmentConfig::default()).unwrap();
        let mut r = rng(2);
        let fired = (0..4000).filter(|_| aug.gate_fires(&mut r)).count();
        assert!((1050..1450).contains(&fired), "fired {fired}/4000");
    }

    #[test]
    fn zero_interval_rejected() {
        let err = Augmenter::new(AugmentConfig {
            shift_interval: 0,
            ..AugmentConfig::default()
        });
        assert!(err.is_err());
    }

    #[test]
    fn transform_closure_mutates_under_seed() {
        let aug = Augmenter::new(AugmentConfig {
            gate: GatePolicy::FairCoin,
            ..AugmentConfig::default()
        })
        .unwrap();
        let transform = aug.into_transform(9);
        // Over many windows at 50% per gate, some window must change.
        let base = Array2::from_elem((2, 50), 1.0_f32);
        let changed = (0..32).any(|_| transform(base.clone()) != base);
        assert!(changed);
    }
}
