//! Overlap-add zero-phase FIR convolution.
//!
//! Zero phase comes from shifting the output left by `(N-1)/2` samples.
//! Edge transients are suppressed by reflect-limited padding of `N-1`
//! samples on each side.
use anyhow::{ensure, Result};
use ndarray::{ArrayViewMut1, ArrayViewMut2};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// A linear-phase FIR with its spectrum precomputed for one block size.
pub struct FirFilter {
    n_taps: usize,
    n_fft: usize,
    h_fft: Vec<Complex<f64>>,
    fwd: Arc<dyn Fft<f64>>,
    inv: Arc<dyn Fft<f64>>,
}

impl FirFilter {
    /// Prepare `h` (odd length) for signals of `n_x` samples.
    pub fn new(h: &[f64], n_x: usize) -> Result<Self> {
        ensure!(h.len() % 2 == 1, "FIR length must be odd, got {}", h.len());
        let n_taps = h.len();
        let n_ext = n_x + 2 * (n_taps - 1);
        let n_fft = choose_fft_len(n_taps, n_ext);

        let mut planner: FftPlanner<f64> = FftPlanner::new();
        let fwd = planner.plan_fft_forward(n_fft);
        let inv = planner.plan_fft_inverse(n_fft);

        let mut h_fft: Vec<Complex<f64>> = h
            .iter()
            .map(|&v| Complex { re: v, im: 0.0 })
            .chain(std::iter::repeat(Complex::default()))
            .take(n_fft)
            .collect();
        fwd.process(&mut h_fft);

        Ok(Self { n_taps, n_fft, h_fft, fwd, inv })
    }

    /// Filter one signal in place.
    pub fn apply(&self, mut x: ArrayViewMut1<f64>) {
        let n_x = x.len();
        if n_x == 0 {
            return;
        }
        let shift = (self.n_taps - 1) / 2;
        let n_edge = self.n_taps - 1;

        let signal: Vec<f64> = x.iter().copied().collect();
        let x_ext = reflect_limited_pad(&signal, n_edge, n_edge);
        let n_ext = x_ext.len();

        let n_seg = self.n_fft - self.n_taps + 1;
        let mut y_ext = vec![0.0_f64; n_ext];
        let inv_scale = 1.0 / self.n_fft as f64;
        let mut buf = vec![Complex::<f64>::default(); self.n_fft];

        for start in (0..n_ext).step_by(n_seg) {
            let stop = (start + n_seg).min(n_ext);
            buf.iter_mut().for_each(|b| *b = Complex::default());
            for (b, &v) in buf.iter_mut().zip(&x_ext[start..stop]) {
                b.re = v;
            }

            self.fwd.process(&mut buf);
            for (b, hf) in buf.iter_mut().zip(&self.h_fft) {
                *b *= *hf;
            }
            self.inv.process(&mut buf);

            let out_start = start.saturating_sub(shift);
            let skip = shift.saturating_sub(start);
            for (o, b) in (out_start..n_ext).zip(buf.iter().skip(skip)) {
                y_ext[o] += b.re * inv_scale;
            }
        }

        for (dst, &v) in x.iter_mut().zip(&y_ext[n_edge..n_edge + n_x]) {
            *dst = v;
        }
    }
}

/// Apply the zero-phase FIR `h` to every row of `data` (`[C, T]`) in place.
pub fn apply_fir_zero_phase(mut data: ArrayViewMut2<f64>, h: &[f64]) -> Result<()> {
    let filter = FirFilter::new(h, data.ncols())?;
    for row in data.rows_mut() {
        filter.apply(row);
    }
    Ok(())
}

/// Reflect-limited padding, zero-filled past the signal length.
///
/// Left:  `pad[i] = 2*x[0] - x[i]`      for i in n_l..=1
/// Right: `pad[i] = 2*x[-1] - x[-1-i]`  for i in 1..=n_r
fn reflect_limited_pad(x: &[f64], n_l: usize, n_r: usize) -> Vec<f64> {
    let n = x.len();
    let actual_l = n_l.min(n - 1);
    let actual_r = n_r.min(n - 1);

    let mut out = Vec::with_capacity(n_l + n + n_r);
    out.extend(std::iter::repeat(0.0).take(n_l - actual_l));
    out.extend((1..=actual_l).rev().map(|i| 2.0 * x[0] - x[i]));
    out.extend_from_slice(x);
    let last = x[n - 1];
    out.extend((1..=actual_r).map(|i| 2.0 * last - x[n - 1 - i]));
    out.extend(std::iter::repeat(0.0).take(n_r - actual_r));
    out
}

/// Power-of-two FFT block size minimising
/// `ceil(n_x / (N - n_h + 1)) · N · (log2 N + 1) + 4e-5 · N · n_x`.
fn choose_fft_len(n_h: usize, n_x: usize) -> usize {
    let min_fft = 2 * n_h - 1;
    let max_pow = (n_x as f64).log2().ceil() as u32 + 1;
    let min_pow = (min_fft as f64).log2().ceil() as u32;

    let mut best_n = 1_usize << max_pow.max(min_pow);
    let mut best_cost = f64::INFINITY;
    for pow in min_pow..=max_pow {
        let n = 1_usize << pow;
        if n < min_fft {
            continue;
        }
        let n_seg = (n - n_h + 1) as f64;
        let cost = (n_x as f64 / n_seg).ceil() * n as f64 * (pow as f64 + 1.0)
            + 4e-5 * n as f64 * n_x as f64;
        if cost < best_cost {
            best_cost = cost;
            best_n = n;
        }
    }
    best_n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::design::design_highpass;
    use ndarray::{Array1, Array2};

    #[test]
    fn reflect_limited_left_pad() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let padded = reflect_limited_pad(&x, 3, 0);
        assert_eq!(&padded[..3], &[-2.0, -1.0, 0.0]);
        assert_eq!(&padded[3..], &x[..]);
    }

    #[test]
    fn pad_longer_than_signal_zero_fills() {
        let padded = reflect_limited_pad(&[1.0, 2.0], 3, 3);
        assert_eq!(padded, vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 0.0, 0.0]);
    }

    #[test]
    fn identity_filter_is_noop() {
        let x: Vec<f64> = (0..300).map(|i| (i as f64 * 0.1).sin()).collect();
        let mut arr = Array1::from(x.clone());
        FirFilter::new(&[0.0, 1.0, 0.0], arr.len()).unwrap().apply(arr.view_mut());
        for (a, b) in arr.iter().zip(&x) {
            approx::assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn highpass_removes_dc_keeps_alpha() {
        let sfreq = 250.0;
        let h = design_highpass(2.0, sfreq);
        let n = 2000;
        let mut data = Array2::from_shape_fn((2, n), |(c, t)| {
            let s = (2.0 * std::f64::consts::PI * 10.0 * t as f64 / sfreq).sin();
            if c == 0 { 5.0 } else { 5.0 + s }
        });
        apply_fir_zero_phase(data.view_mut(), &h).unwrap();

        let interior = h.len()..n - h.len();
        let dc_max = data.row(0).slice(ndarray::s![interior.clone()])
            .iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        assert!(dc_max < 1e-3, "DC not removed: max={dc_max}");

        let peak = data.row(1).slice(ndarray::s![interior])
            .iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        approx::assert_abs_diff_eq!(peak, 1.0, epsilon = 0.02);
    }

    #[test]
    fn even_length_rejected() {
        assert!(FirFilter::new(&[0.5, 0.5], 10).is_err());
    }
}
