//! Build and training configuration.
//!
//! [`BuildConfig`] holds every tunable parameter of the dataset build and
//! [`TrainerConfig`] those of the cross-validated classifier report.  All
//! fields have defaults matching the values the focus classifier was trained
//! with, and both structs deserialize from JSON with missing fields filled
//! from [`Default`].
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::label::Label;

/// One analysis-window configuration: window length in seconds and the
/// fraction of it used as the advance between consecutive windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowScale {
    pub window_secs: f64,
    pub overlap: f64,
}

impl WindowScale {
    pub const fn new(window_secs: f64, overlap: f64) -> Self {
        Self { window_secs, overlap }
    }

    /// Window length in samples, `floor(window_secs × rate)`.
    ///
    /// ```
    /// use eegfocus::WindowScale;
    /// assert_eq!(WindowScale::new(4.0, 0.5).window_samples(250), 1000);
    /// ```
    pub fn window_samples(&self, sampling_rate: u32) -> usize {
        (self.window_secs * sampling_rate as f64) as usize
    }

    /// Advance between window starts in samples,
    /// `floor(window_secs × overlap × rate)`.
    ///
    /// ```
    /// use eegfocus::WindowScale;
    /// assert_eq!(WindowScale::new(6.0, 0.45).step_samples(250), 675);
    /// ```
    pub fn step_samples(&self, sampling_rate: u32) -> usize {
        (self.window_secs * self.overlap * sampling_rate as f64) as usize
    }

    fn validate(&self) -> Result<()> {
        if !(self.window_secs > 0.0) {
            bail!("window length must be positive, got {}", self.window_secs);
        }
        check_duration("window length", self.window_secs)?;
        if !(self.overlap > 0.0 && self.overlap < 1.0) {
            bail!("overlap must lie in (0, 1), got {}", self.overlap);
        }
        Ok(())
    }
}

/// Longest duration whose sample count fits in `usize` at any `u32` rate.
pub const MAX_DURATION_SECS: f64 = usize::MAX as f64 / u32::MAX as f64;

fn check_duration(what: &str, secs: f64) -> Result<()> {
    if !secs.is_finite() || secs < 0.0 || secs > MAX_DURATION_SECS {
        bail!("{what} must be finite, non-negative and at most {MAX_DURATION_SECS} s, got {secs}");
    }
    Ok(())
}

/// The four scales used as temporal augmentation, in processing order.
pub const DEFAULT_SCALES: [WindowScale; 4] = [
    WindowScale::new(4.0, 0.5),
    WindowScale::new(6.0, 0.45),
    WindowScale::new(8.0, 0.4),
    WindowScale::new(10.0, 0.35),
];

/// Seconds skipped at the start of a recording before the first window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadIn {
    pub relaxed_secs: f64,
    /// Longer than `relaxed_secs`: focused sessions take a while to settle.
    pub focused_secs: f64,
}

impl Default for LeadIn {
    fn default() -> Self {
        Self { relaxed_secs: 3.0, focused_secs: 10.0 }
    }
}

impl LeadIn {
    /// Lead-in for `label` in samples, `floor(secs × rate)`.
    pub fn samples(&self, label: Label, sampling_rate: u32) -> usize {
        let secs = match label {
            Label::Relaxed => self.relaxed_secs,
            Label::Focused => self.focused_secs,
        };
        (secs * sampling_rate as f64) as usize
    }
}

/// A frequency band `[low_hz, high_hz)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub low_hz: f64,
    pub high_hz: f64,
}

impl Band {
    pub const fn new(low_hz: f64, high_hz: f64) -> Self {
        Self { low_hz, high_hz }
    }

    pub fn contains(&self, freq_hz: f64) -> bool {
        freq_hz >= self.low_hz && freq_hz < self.high_hz
    }
}

/// Band-power estimator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandPowerConfig {
    /// The two bands whose power forms the two per-channel statistics.
    ///
    /// Default: alpha (8–13 Hz) and beta (13–30 Hz).
    pub feature_bands: [Band; 2],

    /// Reference band for relative power when normalising.
    ///
    /// Default: 2–45 Hz.
    pub broadband: Band,

    /// Highpass cutoff applied to each window when normalising.
    ///
    /// Default: `2.0` Hz.
    pub highpass_hz: f64,
}

impl Default for BandPowerConfig {
    fn default() -> Self {
        Self {
            feature_bands: [Band::new(8.0, 13.0), Band::new(13.0, 30.0)],
            broadband: Band::new(2.0, 45.0),
            highpass_hz: 2.0,
        }
    }
}

/// Configuration for a dataset build.
///
/// Construct with struct-update syntax:
///
/// ```
/// use eegfocus::{BuildConfig, WindowScale};
///
/// let cfg = BuildConfig {
///     scales: vec![WindowScale::new(4.0, 0.5)],
///     excluded_channels: vec!["O1".into(), "O2".into()],
///     ..BuildConfig::default()
/// };
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Window scales applied to every recording, in order.
    ///
    /// Default: [`DEFAULT_SCALES`].
    pub scales: Vec<WindowScale>,

    /// Per-label lead-in.
    pub lead_in: LeadIn,

    /// EEG channel names never used for features.
    ///
    /// Matching is case-insensitive and ignores spaces (`"o 1"` matches
    /// `"O1"`).
    ///
    /// Default: `[]`.
    pub excluded_channels: Vec<String>,

    /// Extension of recording files inside device directories, without the
    /// dot.  Matched case-insensitively.
    ///
    /// Default: `"csv"`.
    pub file_extension: String,

    /// Detrend, highpass and express band powers relative to broadband power.
    ///
    /// Default: `true`.
    pub normalize: bool,

    pub bandpower: BandPowerConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            scales: DEFAULT_SCALES.to_vec(),
            lead_in: LeadIn::default(),
            excluded_channels: vec![],
            file_extension: "csv".into(),
            normalize: true,
            bandpower: BandPowerConfig::default(),
        }
    }
}

impl BuildConfig {
    /// Load a config from a JSON file; absent fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.scales.is_empty() {
            bail!("at least one window scale is required");
        }
        for (i, scale) in self.scales.iter().enumerate() {
            scale.validate().with_context(|| format!("window scale #{i}"))?;
        }
        check_duration("relaxed lead-in", self.lead_in.relaxed_secs)?;
        check_duration("focused lead-in", self.lead_in.focused_secs)?;
        let bp = &self.bandpower;
        for band in bp.feature_bands.iter().chain(std::iter::once(&bp.broadband)) {
            if !(band.low_hz >= 0.0 && band.high_hz > band.low_hz) {
                bail!("invalid band {:?}", band);
            }
        }
        if bp.highpass_hz <= 0.0 {
            bail!("highpass cutoff must be positive, got {}", bp.highpass_hz);
        }
        Ok(())
    }
}

/// Settings of the cross-validated training report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Cross-validation folds.  Default: `5`.
    pub folds: usize,
    /// Worker threads for fold evaluation.  Default: `8`.
    pub n_jobs: usize,
    /// Seed of the stratified baseline.  Default: `42`.
    pub seed: u64,
    /// Inverse L2 regularisation strength.  Default: `1.0`.
    pub c: f64,
    /// Newton iteration cap.  Default: `3000`.
    pub max_iter: usize,
    /// Gradient-norm stopping tolerance.  Default: `1e-4`.
    pub tol: f64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self { folds: 5, n_jobs: 8, seed: 42, c: 1.0, max_iter: 3000, tol: 1e-4 }
    }
}
