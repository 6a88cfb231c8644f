use std::hint::black_box;
use criterion::{criterion_group, criterion_main, Criterion};
use eegfocus::{BandPowerEstimator, WelchBandPower};
use ndarray::Array2;

fn window(n_ch: usize, n_t: usize, rate: f64) -> Array2<f64> {
    Array2::from_shape_fn((n_ch, n_t), |(c, t)| {
        let time = t as f64 / rate;
        (2.0 * std::f64::consts::PI * (8.0 + c as f64) * time).sin() + 0.3 * (t as f64 * 0.37).sin()
    })
}

fn bench_band_powers(c: &mut Criterion) {
    let est = WelchBandPower::default();
    let channels: Vec<usize> = (1..=8).collect();
    let data = window(8, 1000, 250.0);

    c.bench_function("band_powers normalised [8×1000 @ 250 Hz]", |b| {
        b.iter(|| est.band_powers(black_box(data.view()), &channels, 250, true).unwrap())
    });
    c.bench_function("band_powers raw [8×1000 @ 250 Hz]", |b| {
        b.iter(|| est.band_powers(black_box(data.view()), &channels, 250, false).unwrap())
    });
}

fn bench_long_window(c: &mut Criterion) {
    let est = WelchBandPower::default();
    let channels: Vec<usize> = (1..=16).collect();
    let data = window(16, 2500, 250.0);
    c.bench_function("band_powers normalised [16×2500 @ 250 Hz]", |b| {
        b.iter(|| est.band_powers(black_box(data.view()), &channels, 250, true).unwrap())
    });
}

criterion_group!(benches, bench_band_powers, bench_long_window);
criterion_main!(benches);
