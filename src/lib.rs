//! # eegfocus: focused vs relaxed EEG classification
//!
//! `eegfocus` turns a directory of labelled EEG recordings into a windowed
//! band-power dataset and reports how well a balanced logistic regression
//! separates the two mental states.
//!
//! ## Pipeline overview
//!
//! ```text
//! <data-dir>/{relaxed,focused}/<board_id>/*.csv
//!   │
//!   ├─ channels::select_channels   board EEG channels minus excluded names
//!   ├─ io::read_tsv                [C, T] sample matrix
//!   ├─ window::WindowPlan          lead-in, then overlapping windows × 4 scales
//!   ├─ bandpower::WelchBandPower   detrend + 2 Hz highpass, relative α / β per channel
//!   └─ dataset::Dataset            [N, 2·C] features, [N] labels
//!        │
//!        └─→ trainer::train        5-fold macro F1 (baseline vs model), full fit
//! ```
//!
//! ## Quick start
//!
//! ```no_run
//! use eegfocus::{train, BuildConfig, DatasetBuilder, TrainerConfig};
//! use std::path::Path;
//!
//! let builder = DatasetBuilder::new(BuildConfig::default()).unwrap();
//! let dataset = builder.build(Path::new("data")).unwrap();
//! let report  = train(&dataset, &TrainerConfig::default()).unwrap();
//! println!("mean F1: {:.3}", report.model_mean());
//! ```
//!
//! ## Custom boards and scales
//!
//! ```no_run
//! use eegfocus::{BoardDescr, BoardRegistry, BuildConfig, DatasetBuilder, WindowScale};
//! use std::path::Path;
//!
//! let cfg = BuildConfig {
//!     scales: vec![WindowScale::new(4.0, 0.5)],
//!     excluded_channels: vec!["Fp1".into()],
//!     ..BuildConfig::default()
//! };
//! let boards = BoardRegistry::builtin()
//!     .with_board(57, BoardDescr::new(500, vec![1, 2, 3, 4]).with_names(["Fp1", "Fp2", "O1", "O2"]));
//! let (dataset, summary) = DatasetBuilder::new(cfg)
//!     .unwrap()
//!     .with_boards(boards)
//!     .build_with_summary(Path::new("data"))
//!     .unwrap();
//! println!("{} windows from {} recordings", dataset.len(), summary.recordings_used);
//! ```

pub mod bandpower;
pub mod board;
pub mod channels;
pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod io;
pub mod label;
pub mod logging;
pub mod ml;
pub mod normalize;
pub mod trainer;
pub mod window;

// ── Crate-root re-exports ─────────────────────────────────────────────────

// config
pub use config::{BandPowerConfig, Band, BuildConfig, LeadIn, TrainerConfig, WindowScale};

// collaborators
pub use bandpower::{BandPowerEstimator, WelchBandPower};
pub use board::{BoardDescr, BoardMetadata, BoardRegistry};
pub use io::{read_tsv, write_recording, RecordingReader, StWriter, TsvRecordingReader};

// core
pub use channels::{select_channels, ChannelMap};
pub use dataset::{discover_recordings, BuildSummary, ClassCounts, Dataset, DatasetBuilder};
pub use error::RecordingError;
pub use label::Label;
pub use trainer::{train, TrainingReport};
pub use window::WindowPlan;
