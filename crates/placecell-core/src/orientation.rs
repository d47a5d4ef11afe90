use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlaceError;

/// Placement orientation of a cell, using the DEF names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Canonical, unrotated.
    #[default]
    N,
    /// Rotated 180 degrees.
    S,
    /// Mirrored about the Y axis.
    FN,
    /// Mirrored about the X axis.
    FS,
}

/// Row-abutment family. Cells keep their family as they move between rows
/// and alternate mirror state inside it so that power rails line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbutmentGroup {
    /// {N, FS}
    Left,
    /// {S, FN}
    Right,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [Self::N, Self::S, Self::FN, Self::FS];

    pub fn group(self) -> AbutmentGroup {
        match self {
            Self::N | Self::FS => AbutmentGroup::Left,
            Self::S | Self::FN => AbutmentGroup::Right,
        }
    }

    /// Orientation this cell's group takes in placement row `row`.
    pub fn for_row(self, row: i64) -> Orientation {
        let even = row.rem_euclid(2) == 0;
        match (self.group(), even) {
            (AbutmentGroup::Left, true) => Self::FS,
            (AbutmentGroup::Left, false) => Self::N,
            (AbutmentGroup::Right, true) => Self::S,
            (AbutmentGroup::Right, false) => Self::FN,
        }
    }

    /// Counterpart after a horizontal (left-right) mirror.
    pub fn flipped_horizontal(self) -> Orientation {
        match self {
            Self::N => Self::FN,
            Self::FN => Self::N,
            Self::S => Self::FS,
            Self::FS => Self::S,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::N => "N",
            Self::S => "S",
            Self::FN => "FN",
            Self::FS => "FS",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = PlaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|o| o.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PlaceError::MalformedRecord(format!("unknown orientation '{}'", s)))
    }
}
