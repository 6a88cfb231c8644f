//! Mental-state class labels and their on-disk directory names.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary target of the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Relaxed = 0,
    Focused = 1,
}

impl Label {
    /// Scan order of the class directories.
    pub const ALL: [Label; 2] = [Label::Relaxed, Label::Focused];

    /// Integer class id stored in the dataset.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Name of the class directory under the data root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Label::Relaxed => "relaxed",
            Label::Focused => "focused",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}
