//! Band-power features.
//!
//! [`WelchBandPower`] estimates each channel's power spectral density with
//! Welch's method and integrates it over the two configured feature bands,
//! giving two statistics per channel.  With normalisation on, the window is
//! detrended and highpassed first and both statistics are expressed
//! relative to the broadband power.
use anyhow::{ensure, Result};
use ndarray::{ArrayView1, ArrayView2};
use rustfft::{num_complex::Complex, FftPlanner};
use std::f64::consts::PI;

use crate::config::{Band, BandPowerConfig};
use crate::filter::{apply_fir_zero_phase, design_highpass};
use crate::normalize::detrend_constant_inplace;

/// Per-channel band-power statistics of one analysis window.
pub trait BandPowerEstimator {
    /// `window` is `[channels.len(), T]`, rows in `channels` order.
    ///
    /// Returns two vectors of length `channels.len()`, one per statistic.
    fn band_powers(
        &self,
        window: ArrayView2<f64>,
        channels: &[usize],
        sampling_rate: u32,
        normalize: bool,
    ) -> Result<(Vec<f64>, Vec<f64>)>;
}

/// Concatenate the two statistics into a feature vector
/// (channel order first, then statistic order).
pub fn feature_vector((first, second): (Vec<f64>, Vec<f64>)) -> Vec<f64> {
    let mut out = first;
    out.extend(second);
    out
}

/// Welch-PSD band-power estimator.
#[derive(Debug, Clone, Default)]
pub struct WelchBandPower {
    cfg: BandPowerConfig,
}

impl WelchBandPower {
    pub fn new(cfg: BandPowerConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &BandPowerConfig {
        &self.cfg
    }
}

impl BandPowerEstimator for WelchBandPower {
    fn band_powers(
        &self,
        window: ArrayView2<f64>,
        channels: &[usize],
        sampling_rate: u32,
        normalize: bool,
    ) -> Result<(Vec<f64>, Vec<f64>)> {
        ensure!(
            window.nrows() == channels.len(),
            "window has {} rows for {} channels",
            window.nrows(),
            channels.len()
        );
        ensure!(sampling_rate > 0, "sampling rate must be positive");
        ensure!(window.ncols() >= 2, "window too short: {} samples", window.ncols());

        let fs = sampling_rate as f64;
        let mut data = window.to_owned();
        if normalize {
            detrend_constant_inplace(data.view_mut());
            let h = design_highpass(self.cfg.highpass_hz, fs);
            apply_fir_zero_phase(data.view_mut(), &h)?;
        }

        let nperseg = segment_len(sampling_rate, data.ncols());
        let df = fs / nperseg as f64;
        let [band_a, band_b] = self.cfg.feature_bands;

        let mut first = Vec::with_capacity(channels.len());
        let mut second = Vec::with_capacity(channels.len());
        for row in data.rows() {
            let psd = welch_psd(row, nperseg, fs);
            let mut a = integrate(&psd, df, band_a);
            let mut b = integrate(&psd, df, band_b);
            if normalize {
                let total = integrate(&psd, df, self.cfg.broadband);
                if total > 0.0 {
                    a /= total;
                    b /= total;
                } else {
                    a = 0.0;
                    b = 0.0;
                }
            }
            first.push(a);
            second.push(b);
        }
        Ok((first, second))
    }
}

/// Welch segment length: the power of two nearest the sampling rate, capped
/// to the largest power of two that fits in `n_samples`.
pub fn segment_len(sampling_rate: u32, n_samples: usize) -> usize {
    let rate = sampling_rate.max(1) as usize;
    let upper = rate.next_power_of_two();
    let lower = upper / 2;
    let nearest = if lower > 0 && rate - lower < upper - rate { lower } else { upper };

    let fit = if n_samples.is_power_of_two() {
        n_samples
    } else {
        n_samples.next_power_of_two() / 2
    };
    nearest.min(fit).max(1)
}

/// One-sided PSD density of `x` (Hann window, 50 % overlap).
///
/// Returns `nperseg / 2 + 1` bins spaced `fs / nperseg` Hz apart.
pub fn welch_psd(x: ArrayView1<f64>, nperseg: usize, fs: f64) -> Vec<f64> {
    let n_bins = nperseg / 2 + 1;
    let step = (nperseg / 2).max(1);
    let win: Vec<f64> = (0..nperseg)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / nperseg as f64).cos())
        .collect();
    let win_pow: f64 = win.iter().map(|w| w * w).sum();
    let scale = if win_pow > 0.0 { 1.0 / (fs * win_pow) } else { 1.0 / fs };

    let mut planner: FftPlanner<f64> = FftPlanner::new();
    let fft = planner.plan_fft_forward(nperseg);
    let mut psd = vec![0.0; n_bins];
    let mut buf = vec![Complex::<f64>::default(); nperseg];
    let mut n_segments = 0usize;

    let mut start = 0;
    while start + nperseg <= x.len() {
        for (i, b) in buf.iter_mut().enumerate() {
            *b = Complex { re: x[start + i] * win[i], im: 0.0 };
        }
        fft.process(&mut buf);
        for (p, c) in psd.iter_mut().zip(&buf) {
            *p += c.norm_sqr();
        }
        n_segments += 1;
        start += step;
    }
    if n_segments == 0 {
        return psd;
    }

    let norm = scale / n_segments as f64;
    for (k, p) in psd.iter_mut().enumerate() {
        *p *= norm;
        // Fold negative frequencies, except DC and an even-length Nyquist.
        let nyquist = nperseg % 2 == 0 && k == n_bins - 1;
        if k != 0 && !nyquist {
            *p *= 2.0;
        }
    }
    psd
}

/// Rectangle-rule integral of `psd` over `band`.
fn integrate(psd: &[f64], df: f64, band: Band) -> f64 {
    psd.iter()
        .enumerate()
        .filter(|(k, _)| band.contains(*k as f64 * df))
        .map(|(_, p)| p * df)
        .sum()
}
