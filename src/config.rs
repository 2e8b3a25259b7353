//! Pipeline configuration.
//!
//! [`WindowConfig`] holds the shape constants of the windowing pipeline and
//! [`AugmentConfig`] the tunables of the training-time augmentation.  All
//! fields have defaults that match the values used to train the AF model.

/// Shape configuration for the windowing pipeline.
///
/// All fields are `pub` so you can construct one with struct-update syntax:
///
/// ```
/// use afwin::WindowConfig;
///
/// let cfg = WindowConfig {
///     window_samples: 10000,   // 50 s windows instead of 75 s
///     ..WindowConfig::default()
/// };
/// ```
///
/// Or just call [`WindowConfig::default()`] for the training settings.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    /// Number of samples per output window.
    ///
    /// Shorter recordings are zero-padded on the right up to this length,
    /// longer ones are truncated on the right.  At the default 200 Hz this is
    /// a 75 s window.
    ///
    /// Default: `15000`.
    pub window_samples: usize,

    /// Number of leads per recording.
    ///
    /// Every raw signal handed to the pipeline must have exactly this many
    /// columns.
    ///
    /// Default: `2`.
    pub n_channels: usize,

    /// Recording sample rate in Hz.
    ///
    /// Only used for duration bookkeeping ([`window_dur`](Self::window_dur));
    /// no resampling happens anywhere in this crate.
    ///
    /// Default: `200.0` Hz.
    pub sample_rate: f32,

    /// Length of the per-timestep label vector produced by
    /// [`expand_event_labels`](crate::label::expand_event_labels).
    ///
    /// The AF end offset is converted from input-sample units to label steps
    /// via `floor(af_end · label_steps / window_samples)`, i.e. the label
    /// vector is a fixed-rate downsampling of the window
    /// (15000 samples → 1000 steps at the defaults).
    ///
    /// Default: `1000`.
    pub label_steps: usize,

    /// Cap on the number of samples read per record when preloading the
    /// signal store.
    ///
    /// Recordings longer than this are truncated at load time, before
    /// windowing ever sees them.
    ///
    /// Default: `50000`.
    pub max_load_samples: usize,
}

impl Default for WindowConfig {
    /// Returns the training configuration:
    /// 15000-sample windows · 2 leads · 200 Hz · 1000 label steps.
    fn default() -> Self {
        Self {
            window_samples: 15000,
            n_channels: 2,
            sample_rate: 200.0,
            label_steps: 1000,
            max_load_samples: 50000,
        }
    }
}

impl WindowConfig {
    /// Window duration in seconds (`window_samples / sample_rate`).
    ///
    /// # Examples
    ///
    /// ```
    /// use afwin::WindowConfig;
    /// let cfg = WindowConfig::default();
    /// assert_eq!(cfg.window_dur(), 75.0);
    /// ```
    pub fn window_dur(&self) -> f32 {
        self.window_samples as f32 / self.sample_rate
    }
}

/// How the combined augmentation decides whether each operation fires.
///
/// See [`Augmenter`](crate::augment::Augmenter) for where this is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatePolicy {
    /// Fire when a standard-normal draw exceeds 0.5.
    ///
    /// This fires with probability ≈ 30.85%, *not* 50% — the threshold is
    /// compared against a normal sample, not a uniform one.  Kept as the
    /// default for compatibility with models trained under this gate.
    #[default]
    NormalThreshold,

    /// A true fair coin: fire with probability exactly 50%.
    FairCoin,
}

/// Tunables for the randomized training-time augmentation.
#[derive(Debug, Clone)]
pub struct AugmentConfig {
    /// Standard deviation of the per-channel multiplicative scale factor,
    /// drawn from `N(1.0, scale_sigma)`.
    ///
    /// Default: `0.1`.
    pub scale_sigma: f32,

    /// Half-width of the per-channel DC shift draw.  Each channel gets one
    /// integer offset uniform in `[-shift_interval, shift_interval)`, added
    /// to every sample as `offset / 1000`.
    ///
    /// Must be positive.
    ///
    /// Default: `20`.
    pub shift_interval: i32,

    /// Gate policy for the two independent fire/skip decisions.
    ///
    /// Default: [`GatePolicy::NormalThreshold`].
    pub gate: GatePolicy,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            scale_sigma: 0.1,
            shift_interval: 20,
            gate: GatePolicy::default(),
        }
    }
}

impl AugmentConfig {
    /// Largest absolute DC bias [`shift_channels`](crate::augment::shift_channels)
    /// can introduce (`shift_interval / 1000`).
    pub fn max_shift_bias(&self) -> f32 {
        self.shift_interval as f32 / 1000.0
    }
}
