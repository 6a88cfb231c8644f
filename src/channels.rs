//! EEG channel selection.
//!
//! [`select_channels`] resolves the rows of a board's recording matrix that
//! feed the feature extractor, dropping excluded electrodes by name.
//! [`ChannelMap`] memoises the result per board for the duration of one
//! dataset build.
use anyhow::Result;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::board::BoardMetadata;

/// Name normalisation: lowercase + strip spaces.
fn norm(name: &str) -> String {
    name.replace(' ', "").to_lowercase()
}

/// Channel rows to use for `board_id`, in board order.
///
/// Channels whose name appears in `excluded` are dropped.  When the board
/// has no channel names, or their count does not match the channel list,
/// the full EEG list is returned unfiltered.  Only a failure to fetch the
/// EEG channel list itself is returned as an error.
pub fn select_channels<M: BoardMetadata + ?Sized>(
    meta: &M,
    board_id: i32,
    excluded: &[String],
) -> Result<Vec<usize>> {
    let eeg_channels = meta.eeg_channels(board_id)?;

    let selected = match meta.eeg_names(board_id) {
        Ok(names) if names.len() != eeg_channels.len() => {
            warn!(
                "board {board_id}: {} names for {} EEG channels; using all EEG channels",
                names.len(),
                eeg_channels.len()
            );
            eeg_channels
        }
        Ok(names) => {
            let excluded: Vec<String> = excluded.iter().map(|s| norm(s)).collect();
            eeg_channels
                .iter()
                .zip(names.iter())
                .filter(|(_, name)| !excluded.contains(&norm(name)))
                .map(|(&ch, _)| ch)
                .collect()
        }
        Err(e) => {
            warn!("board {board_id}: {e:#}; using all EEG channels");
            eeg_channels
        }
    };

    info!("board {board_id}: channels to use: {selected:?}");
    Ok(selected)
}

/// Per-build cache of board id → selected channels.
#[derive(Debug, Default)]
pub struct ChannelMap {
    by_board: HashMap<i32, Vec<usize>>,
}

impl ChannelMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected channels for `board_id`, resolving them on first use.
    pub fn resolve<M: BoardMetadata + ?Sized>(
        &mut self,
        meta: &M,
        board_id: i32,
        excluded: &[String],
    ) -> Result<&[usize]> {
        if !self.by_board.contains_key(&board_id) {
            let selected = select_channels(meta, board_id, excluded)?;
            self.by_board.insert(board_id, selected);
        }
        Ok(self.by_board[&board_id].as_slice())
    }

    pub fn get(&self, board_id: i32) -> Option<&[usize]> {
        self.by_board.get(&board_id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.by_board.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_board.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardDescr, BoardRegistry};

    fn registry() -> BoardRegistry {
        BoardRegistry::empty()
            .with_board(5, BoardDescr::new(100, vec![2, 4, 6]).with_names(["A", "B", "C"]))
            .with_board(6, BoardDescr::new(100, vec![1, 3]))
    }

    #[test]
    fn excluded_name_dropped_in_order() {
        let sel = select_channels(&registry(), 5, &["B".to_string()]).unwrap();
        assert_eq!(sel, vec![2, 6]);
    }

    #[test]
    fn exclusion_ignores_case_and_spaces() {
        let sel = select_channels(&registry(), 5, &[" a".to_string(), "c".to_string()]).unwrap();
        assert_eq!(sel, vec![4]);
    }

    #[test]
    fn missing_names_fall_back_to_all() {
        let sel = select_channels(&registry(), 6, &["A".to_string()]).unwrap();
        assert_eq!(sel, vec![1, 3]);
    }

    #[test]
    fn short_name_list_falls_back_to_all() {
        let reg = BoardRegistry::empty()
            .with_board(9, BoardDescr::new(100, vec![1, 2, 3]).with_names(["A"]));
        let sel = select_channels(&reg, 9, &["B".to_string()]).unwrap();
        assert_eq!(sel, vec![1, 2, 3]);
    }

    #[test]
    fn unknown_board_is_an_error() {
        assert!(select_channels(&registry(), 42, &[]).is_err());
    }

    #[test]
    fn map_resolves_once_per_board() {
        let reg = registry();
        let mut map = ChannelMap::new();
        assert_eq!(map.resolve(&reg, 5, &[]).unwrap(), &[2, 4, 6]);
        assert_eq!(map.resolve(&reg, 5, &[]).unwrap(), &[2, 4, 6]);
        assert_eq!(map.len(), 1);
        assert!(map.resolve(&reg, 42, &[]).is_err());
        assert_eq!(map.get(42), None);
    }
}
