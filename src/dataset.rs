//! Labelled feature dataset and the directory scan that builds it.
//!
//! Expected layout under the data root:
//!
//! ```text
//! <root>/
//!   relaxed/<board_id>/*.csv
//!   focused/<board_id>/*.csv
//! ```
//!
//! Every recording is cut into overlapping windows at each configured
//! [`WindowScale`](crate::WindowScale) and each window becomes one feature
//! vector.  A recording that cannot be used for any reason is logged and
//! skipped; it never aborts the build.
use anyhow::{bail, Context, Result};
use ndarray::{Array1, Array2};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::bandpower::{feature_vector, BandPowerEstimator, WelchBandPower};
use crate::board::{BoardMetadata, BoardRegistry};
use crate::channels::ChannelMap;
use crate::config::BuildConfig;
use crate::error::RecordingError;
use crate::io::{RecordingReader, StWriter, TsvRecordingReader};
use crate::label::Label;
use crate::window::{slice_window, WindowPlan};

// ── Dataset ───────────────────────────────────────────────────────────────────

/// Two parallel, append-only sequences: feature vectors and their labels.
///
/// All feature vectors share one length, fixed by the first one added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    features: Vec<Vec<f64>>,
    labels: Vec<u8>,
    dim: Option<usize>,
}

/// Per-class sample counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassCounts {
    pub relaxed: usize,
    pub focused: usize,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn features(&self) -> &[Vec<f64>] {
        &self.features
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    /// Feature-vector length, once anything has been added.
    pub fn dim(&self) -> Option<usize> {
        self.dim
    }

    /// Check that vectors of length `dim` may be added.
    pub fn check_dim(&self, dim: usize) -> Result<(), RecordingError> {
        match self.dim {
            Some(expected) if expected != dim => {
                Err(RecordingError::DimensionMismatch { expected, got: dim })
            }
            _ => Ok(()),
        }
    }

    pub fn push(&mut self, features: Vec<f64>, label: Label) -> Result<(), RecordingError> {
        self.check_dim(features.len())?;
        self.dim = Some(features.len());
        self.features.push(features);
        self.labels.push(label.as_u8());
        Ok(())
    }

    /// Append every vector of one recording, or none of them.
    pub fn extend(&mut self, rows: Vec<Vec<f64>>, label: Label) -> Result<(), RecordingError> {
        if let Some(first) = rows.first() {
            self.check_dim(first.len())?;
            if let Some(bad) = rows.iter().find(|r| r.len() != first.len()) {
                return Err(RecordingError::DimensionMismatch {
                    expected: first.len(),
                    got: bad.len(),
                });
            }
        }
        for row in rows {
            self.push(row, label)?;
        }
        Ok(())
    }

    pub fn class_counts(&self) -> ClassCounts {
        let focused = self.labels.iter().filter(|&&y| y == Label::Focused.as_u8()).count();
        ClassCounts { relaxed: self.labels.len() - focused, focused }
    }

    /// Feature matrix `[N, D]` and label vector `[N]`.
    pub fn to_arrays(&self) -> Result<(Array2<f64>, Array1<u8>)> {
        let Some(dim) = self.dim else {
            bail!("dataset is empty");
        };
        let flat: Vec<f64> = self.features.iter().flatten().copied().collect();
        let x = Array2::from_shape_vec((self.len(), dim), flat)
            .context("feature vectors have inconsistent lengths")?;
        Ok((x, Array1::from(self.labels.clone())))
    }

    /// Write `features` `[N, D]` (F64) and `labels` `[N]` (I32) to a
    /// safetensors file.
    pub fn write_safetensors(&self, path: &Path) -> Result<()> {
        let (x, y) = self.to_arrays()?;
        let labels: Vec<i32> = y.iter().map(|&v| v as i32).collect();
        let mut w = StWriter::new();
        w.add_f64_arr2("features", &x);
        w.add_i32("labels", &labels, &[labels.len()]);
        w.write(path)
    }
}

// ── Discovery ─────────────────────────────────────────────────────────────────

/// One recording file found under the data root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingEntry {
    pub label: Label,
    /// Name of the enclosing directory; should be an integer board id.
    pub device_dir: String,
    pub path: PathBuf,
}

/// Sorted subdirectories (or files, when `dirs` is false) of `dir`.
fn sorted_children(dir: &Path, dirs: bool) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let path = entry?.path();
        if path.is_dir() == dirs {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// List every recording under `root` in scan order: relaxed before focused,
/// then device directories and files by name.
///
/// Unreadable or missing directories are logged and contribute nothing.
pub fn discover_recordings(root: &Path, extension: &str) -> Vec<RecordingEntry> {
    let mut out = Vec::new();
    for label in Label::ALL {
        let class_dir = root.join(label.dir_name());
        let device_dirs = match sorted_children(&class_dir, true) {
            Ok(d) => d,
            Err(e) => {
                warn!("skipping class {label}: {e:#}");
                continue;
            }
        };
        for device_dir in device_dirs {
            let files = match sorted_children(&device_dir, false) {
                Ok(f) => f,
                Err(e) => {
                    warn!("skipping {}: {e:#}", device_dir.display());
                    continue;
                }
            };
            let name = device_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            out.extend(
                files
                    .into_iter()
                    .filter(|p| has_extension(p, extension))
                    .map(|path| RecordingEntry { label, device_dir: name.clone(), path }),
            );
        }
    }
    out
}

/// Board id encoded in a device directory name.
pub fn parse_board_id(dir: &str) -> Result<i32, RecordingError> {
    dir.trim()
        .parse()
        .map_err(|_| RecordingError::InvalidDeviceDir { dir: dir.to_string() })
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// A recording read from disk, ready for windowing.
#[derive(Debug, Clone)]
pub struct Recording {
    pub label: Label,
    pub board_id: i32,
    pub path: PathBuf,
    /// `[rows, samples]`
    pub data: Array2<f64>,
    pub sampling_rate: u32,
}

/// Counters reported at the end of a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub recordings_found: usize,
    pub recordings_used: usize,
    pub recordings_skipped: usize,
    pub windows: usize,
}

/// Scans a data root and assembles the [`Dataset`].
///
/// ```no_run
/// use eegfocus::{BuildConfig, DatasetBuilder};
/// use std::path::Path;
///
/// let builder = DatasetBuilder::new(BuildConfig::default()).unwrap();
/// let dataset = builder.build(Path::new("data")).unwrap();
/// println!("{} windows", dataset.len());
/// ```
pub struct DatasetBuilder<R = TsvRecordingReader, M = BoardRegistry, B = WelchBandPower> {
    cfg: BuildConfig,
    reader: R,
    meta: M,
    estimator: B,
}

impl DatasetBuilder {
    /// Builder with the tab-separated reader, built-in boards and Welch
    /// band powers.
    pub fn new(cfg: BuildConfig) -> Result<Self> {
        let estimator = WelchBandPower::new(cfg.bandpower.clone());
        Self::with_components(cfg, TsvRecordingReader, BoardRegistry::builtin(), estimator)
    }
}

impl<R, M, B> DatasetBuilder<R, M, B>
where
    R: RecordingReader,
    M: BoardMetadata,
    B: BandPowerEstimator,
{
    pub fn with_components(cfg: BuildConfig, reader: R, meta: M, estimator: B) -> Result<Self> {
        cfg.validate()?;
        Ok(Self { cfg, reader, meta, estimator })
    }

    /// Swap the board-metadata source.
    pub fn with_boards<M2: BoardMetadata>(self, meta: M2) -> DatasetBuilder<R, M2, B> {
        DatasetBuilder { cfg: self.cfg, reader: self.reader, meta, estimator: self.estimator }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.cfg
    }

    /// Build the dataset from every usable recording under `root`.
    pub fn build(&self, root: &Path) -> Result<Dataset> {
        Ok(self.build_with_summary(root)?.0)
    }

    pub fn build_with_summary(&self, root: &Path) -> Result<(Dataset, BuildSummary)> {
        if !root.is_dir() {
            bail!("data root {} is not a directory", root.display());
        }

        let entries = discover_recordings(root, &self.cfg.file_extension);
        let mut summary = BuildSummary { recordings_found: entries.len(), ..Default::default() };
        let mut channels = ChannelMap::new();
        let mut dataset = Dataset::new();

        for entry in &entries {
            info!("{}", entry.path.display());
            let outcome = self
                .load_recording(entry, &mut channels)
                .and_then(|rec| Ok((rec.label, self.extract_features(&rec, &channels)?)))
                .and_then(|(label, rows)| dataset.extend(rows, label));
            match outcome {
                Ok(()) => summary.recordings_used += 1,
                Err(e) => {
                    warn!("skipping {}: {e}", entry.path.display());
                    summary.recordings_skipped += 1;
                }
            }
        }
        summary.windows = dataset.len();

        let counts = dataset.class_counts();
        info!("Class 1: {} Class 0: {}", counts.focused, counts.relaxed);
        info!(
            "{} recordings found, {} used, {} skipped; {} windows",
            summary.recordings_found, summary.recordings_used, summary.recordings_skipped, summary.windows
        );
        Ok((dataset, summary))
    }

    /// Resolve metadata and read one recording.
    pub fn load_recording(
        &self,
        entry: &RecordingEntry,
        channels: &mut ChannelMap,
    ) -> Result<Recording, RecordingError> {
        let board_id = parse_board_id(&entry.device_dir)?;
        let sampling_rate = self
            .meta
            .sampling_rate(board_id)
            .map_err(|source| RecordingError::UnknownBoard { board_id, source })?;
        let selected = channels
            .resolve(&self.meta, board_id, &self.cfg.excluded_channels)
            .map_err(|source| RecordingError::UnknownBoard { board_id, source })?;
        if selected.is_empty() {
            return Err(RecordingError::NoChannels { board_id });
        }

        let data = self
            .reader
            .read(&entry.path)
            .map_err(|source| RecordingError::Read { path: entry.path.clone(), source })?;
        if let Some(&channel) = selected.iter().find(|&&ch| ch >= data.nrows()) {
            return Err(RecordingError::ChannelOutOfRange { channel, rows: data.nrows() });
        }

        Ok(Recording {
            label: entry.label,
            board_id,
            path: entry.path.clone(),
            data,
            sampling_rate,
        })
    }

    /// Feature vectors for every window of every scale, in scale order.
    ///
    /// `channels` must already hold the recording's board.
    pub fn extract_features(
        &self,
        rec: &Recording,
        channels: &ChannelMap,
    ) -> Result<Vec<Vec<f64>>, RecordingError> {
        let selected = channels
            .get(rec.board_id)
            .ok_or(RecordingError::NoChannels { board_id: rec.board_id })?;
        let n_samples = rec.data.ncols();
        let mut rows = Vec::new();

        for scale in &self.cfg.scales {
            let plan = WindowPlan::new(scale, &self.cfg.lead_in, rec.label, rec.sampling_rate);
            if plan.is_degenerate() {
                warn!(
                    "scale {:?} truncates to {plan:?} at {} Hz; no windows",
                    scale, rec.sampling_rate
                );
                continue;
            }
            debug!("{:?}: {} windows", plan, plan.count(n_samples));

            for start in plan.starts(n_samples) {
                let window = slice_window(rec.data.view(), selected, start, plan.len);
                let stats = self
                    .estimator
                    .band_powers(window.view(), selected, rec.sampling_rate, self.cfg.normalize)
                    .map_err(|source| RecordingError::BandPower { start, source })?;
                if stats.0.len() != selected.len() || stats.1.len() != selected.len() {
                    return Err(RecordingError::BandPower {
                        start,
                        source: anyhow::anyhow!(
                            "estimator returned {}+{} values for {} channels",
                            stats.0.len(),
                            stats.1.len(),
                            selected.len()
                        ),
                    });
                }
                rows.push(feature_vector(stats));
            }
        }
        Ok(rows)
    }
}
