//! Board metadata: sampling rate and EEG channel layout per board id.
//!
//! Board ids follow the BrainFlow numbering (`-1` synthetic, `0` Cyton, …).
//! [`BoardRegistry`] ships descriptors for the boards recordings were made
//! with and can be extended from a JSON file:
//!
//! ```json
//! { "38": { "sampling_rate": 256, "eeg_channels": [1, 2, 3, 4],
//!           "eeg_names": ["TP9", "AF7", "AF8", "TP10"] } }
//! ```
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Lookup of per-board acquisition metadata.
///
/// `eeg_names` may fail on boards that have a channel layout but no
/// published electrode names; callers are expected to cope with that.
pub trait BoardMetadata {
    fn sampling_rate(&self, board_id: i32) -> Result<u32>;

    /// Rows of the recording matrix that carry EEG, in board order.
    fn eeg_channels(&self, board_id: i32) -> Result<Vec<usize>>;

    /// Electrode names, positionally matching [`eeg_channels`](Self::eeg_channels).
    fn eeg_names(&self, board_id: i32) -> Result<Vec<String>>;
}

/// Static description of one board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardDescr {
    pub sampling_rate: u32,
    pub eeg_channels: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eeg_names: Option<Vec<String>>,
}

impl BoardDescr {
    pub fn new(sampling_rate: u32, eeg_channels: Vec<usize>) -> Self {
        Self { sampling_rate, eeg_channels, eeg_names: None }
    }

    pub fn with_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.eeg_names = Some(names.into_iter().map(Into::into).collect());
        self
    }
}

/// In-memory board table.
#[derive(Debug, Clone, Default)]
pub struct BoardRegistry {
    boards: BTreeMap<i32, BoardDescr>,
}

const CYTON_NAMES: [&str; 8] = ["Fp1", "Fp2", "C3", "C4", "P7", "P8", "O1", "O2"];
const DAISY_NAMES: [&str; 16] = [
    "Fp1", "Fp2", "C3", "C4", "P7", "P8", "O1", "O2",
    "F7", "F8", "F3", "F4", "T7", "T8", "P3", "P4",
];
const SYNTHETIC_NAMES: [&str; 16] = [
    "Fz", "C3", "Cz", "C4", "Pz", "PO7", "Oz", "PO8",
    "F5", "F7", "F3", "F1", "F2", "F4", "F6", "F8",
];
const MUSE_NAMES: [&str; 4] = ["TP9", "AF7", "AF8", "TP10"];

impl BoardRegistry {
    /// Registry with no boards.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in boards.
    pub fn builtin() -> Self {
        Self::empty()
            .with_board(-1, BoardDescr::new(250, (1..=16).collect()).with_names(SYNTHETIC_NAMES))
            .with_board(0, BoardDescr::new(250, (1..=8).collect()).with_names(CYTON_NAMES))
            // Ganglion publishes no electrode names.
            .with_board(1, BoardDescr::new(200, (1..=4).collect()))
            .with_board(2, BoardDescr::new(125, (1..=16).collect()).with_names(DAISY_NAMES))
            .with_board(21, BoardDescr::new(256, (1..=4).collect()).with_names(MUSE_NAMES))
            .with_board(22, BoardDescr::new(256, (1..=4).collect()).with_names(MUSE_NAMES))
    }

    /// Add or replace a board.
    pub fn with_board(mut self, board_id: i32, descr: BoardDescr) -> Self {
        self.insert(board_id, descr);
        self
    }

    pub fn insert(&mut self, board_id: i32, descr: BoardDescr) {
        self.boards.insert(board_id, descr);
    }

    /// Merge boards from a JSON map keyed by board id.
    pub fn load_json(&mut self, path: &Path) -> Result<usize> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading board table {}", path.display()))?;
        let table: BTreeMap<String, BoardDescr> = serde_json::from_str(&text)
            .with_context(|| format!("parsing board table {}", path.display()))?;
        let n = table.len();
        for (key, descr) in table {
            let id: i32 = key
                .trim()
                .parse()
                .with_context(|| format!("board key {key:?} is not an integer"))?;
            if descr.sampling_rate == 0 {
                bail!("board {id}: sampling rate must be positive");
            }
            if let Some(names) = &descr.eeg_names {
                if names.len() != descr.eeg_channels.len() {
                    bail!(
                        "board {id}: {} names for {} EEG channels",
                        names.len(),
                        descr.eeg_channels.len()
                    );
                }
            }
            self.insert(id, descr);
        }
        Ok(n)
    }

    fn get(&self, board_id: i32) -> Result<&BoardDescr> {
        self.boards
            .get(&board_id)
            .with_context(|| format!("unsupported board id {board_id}"))
    }
}

impl BoardMetadata for BoardRegistry {
    fn sampling_rate(&self, board_id: i32) -> Result<u32> {
        Ok(self.get(board_id)?.sampling_rate)
    }

    fn eeg_channels(&self, board_id: i32) -> Result<Vec<usize>> {
        Ok(self.get(board_id)?.eeg_channels.clone())
    }

    fn eeg_names(&self, board_id: i32) -> Result<Vec<String>> {
        self.get(board_id)?
            .eeg_names
            .clone()
            .with_context(|| format!("board {board_id} has no EEG channel names"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_cyton() {
        let reg = BoardRegistry::builtin();
        assert_eq!(reg.sampling_rate(0).unwrap(), 250);
        assert_eq!(reg.eeg_channels(0).unwrap(), (1..=8).collect::<Vec<_>>());
        assert_eq!(reg.eeg_names(0).unwrap()[6], "O1");
    }

    #[test]
    fn names_fail_independently() {
        let reg = BoardRegistry::builtin();
        assert!(reg.eeg_channels(1).is_ok());
        assert!(reg.eeg_names(1).is_err());
    }

    #[test]
    fn unknown_board_errors() {
        let reg = BoardRegistry::builtin();
        assert!(reg.sampling_rate(9999).is_err());
        assert!(reg.eeg_channels(9999).is_err());
    }

    #[test]
    fn load_json_merges() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boards.json");
        std::fs::write(
            &path,
            r#"{ "57": { "sampling_rate": 500, "eeg_channels": [0, 1] },
                 "0":  { "sampling_rate": 200, "eeg_channels": [1], "eeg_names": ["Cz"] } }"#,
        )
        .unwrap();
        let mut reg = BoardRegistry::builtin();
        assert_eq!(reg.load_json(&path).unwrap(), 2);
        assert_eq!(reg.sampling_rate(57).unwrap(), 500);
        assert_eq!(reg.eeg_names(0).unwrap(), vec!["Cz".to_string()]);
    }

    #[test]
    fn load_json_rejects_name_count_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boards.json");
        std::fs::write(
            &path,
            r#"{ "7": { "sampling_rate": 100, "eeg_channels": [0, 1], "eeg_names": ["A"] } }"#,
        )
        .unwrap();
        assert!(BoardRegistry::empty().load_json(&path).is_err());
    }
}
