/// Shared helpers: synthetic recordings and throwaway data trees.
use eegfocus::{write_recording, BoardDescr, BoardRegistry, BuildConfig, WindowScale};
use ndarray::Array2;
use std::f64::consts::PI;
use std::path::Path;

/// Board used by the integration tests: 100 Hz, EEG on rows 1 and 2.
pub const BOARD: i32 = 7;
pub const RATE: u32 = 100;

pub const ALPHA_HZ: f64 = 10.0;
pub const BETA_HZ: f64 = 20.0;

#[allow(unused)]
pub fn boards() -> BoardRegistry {
    BoardRegistry::empty()
        .with_board(BOARD, BoardDescr::new(RATE, vec![1, 2]).with_names(["Fz", "Cz"]))
        // Same rate, one extra EEG row.
        .with_board(8, BoardDescr::new(RATE, vec![1, 2, 3]).with_names(["Fz", "Cz", "Pz"]))
}

/// Single 4 s / 0.5 scale, everything else default.
#[allow(unused)]
pub fn one_scale_config() -> BuildConfig {
    BuildConfig { scales: vec![WindowScale::new(4.0, 0.5)], ..BuildConfig::default() }
}

/// `[1 + n_eeg, n_samples]`: a sample counter row followed by `n_eeg`
/// sinusoids at `freq_hz` with small per-channel phase offsets and a slow
/// drift.
pub fn sine_recording(n_eeg: usize, n_samples: usize, freq_hz: f64) -> Array2<f64> {
    Array2::from_shape_fn((1 + n_eeg, n_samples), |(row, t)| {
        if row == 0 {
            return t as f64;
        }
        let time = t as f64 / RATE as f64;
        let phase = row as f64 * 0.7;
        20.0 * (2.0 * PI * freq_hz * time + phase).sin() + 5.0 + 0.01 * t as f64
    })
}

/// Write `data` to `<root>/<class>/<device>/<file>`.
pub fn put(root: &Path, class: &str, device: &str, file: &str, data: &Array2<f64>) {
    let dir = root.join(class).join(device);
    std::fs::create_dir_all(&dir).unwrap();
    write_recording(&dir.join(file), data).unwrap();
}

/// The two-recording tree: relaxed 3000 samples (alpha), focused 5000
/// samples (beta), both on [`BOARD`].
#[allow(unused)]
pub fn scenario_tree(root: &Path) {
    put(root, "relaxed", &BOARD.to_string(), "r1.csv", &sine_recording(2, 3000, ALPHA_HZ));
    put(root, "focused", &BOARD.to_string(), "f1.csv", &sine_recording(2, 5000, BETA_HZ));
}
