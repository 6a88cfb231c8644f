//! Reasons a single recording is left out of the dataset.
//!
//! None of these abort a build: the scan loop logs the reason and moves on
//! to the next file.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordingError {
    /// The enclosing directory name is not an integer board id.
    #[error("device directory {dir:?} is not an integer board id")]
    InvalidDeviceDir { dir: String },

    /// The reader could not produce a sample matrix.
    #[error("cannot read {}: {source:#}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// Sampling rate or EEG channel list unavailable for the board.
    #[error("no metadata for board {board_id}: {source:#}")]
    UnknownBoard {
        board_id: i32,
        #[source]
        source: anyhow::Error,
    },

    /// Every EEG channel of the board is excluded.
    #[error("board {board_id} has no EEG channels left after exclusion")]
    NoChannels { board_id: i32 },

    /// A selected channel row is missing from the recording.
    #[error("channel {channel} out of range for a recording with {rows} rows")]
    ChannelOutOfRange { channel: usize, rows: usize },

    /// The board's feature length differs from the one the dataset fixed.
    #[error("feature length {got} differs from dataset feature length {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    /// The band-power estimator failed on a window.
    #[error("band power failed at sample {start}: {source:#}")]
    BandPower {
        start: usize,
        #[source]
        source: anyhow::Error,
    },
}
