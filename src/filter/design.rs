//! Highpass FIR design for band-power normalisation.
//!
//! A Hamming-windowed sinc lowpass is built at the middle of the transition
//! band, scaled to unit DC gain and spectrally inverted.  The transition
//! band is `min(max(l_freq / 4, 2), l_freq)` Hz wide and the tap count is
//! `ceil(3.3 · sfreq / width)`, bumped to odd so the filter has a centre tap.
use std::f64::consts::PI;

fn transition_width(l_freq: f64) -> f64 {
    (0.25 * l_freq).max(2.0).min(l_freq)
}

fn tap_count(width: f64, sfreq: f64) -> usize {
    let n = (3.3 / width * sfreq).ceil() as usize;
    n | 1
}

/// Zero-phase highpass taps with the −6 dB point half a transition band
/// below `l_freq`.  Always odd length and symmetric.
pub fn design_highpass(l_freq: f64, sfreq: f64) -> Vec<f64> {
    let width = transition_width(l_freq);
    let n = tap_count(width, sfreq);
    let fc = (l_freq - width / 2.0) / (sfreq / 2.0);
    let centre = n / 2;

    let lowpass: Vec<f64> = (0..n)
        .map(|i| {
            let k = i as f64 - centre as f64;
            let sinc = if k == 0.0 { fc } else { (PI * fc * k).sin() / (PI * k) };
            let w = if n == 1 { 1.0 } else { 0.54 - 0.46 * (2.0 * PI * i as f64 / (n - 1) as f64).cos() };
            sinc * w
        })
        .collect();
    let gain: f64 = lowpass.iter().sum();

    lowpass
        .iter()
        .enumerate()
        .map(|(i, &v)| if i == centre { 1.0 - v / gain } else { -v / gain })
        .collect()
}
