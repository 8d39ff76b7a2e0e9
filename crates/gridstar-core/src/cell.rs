//! The per-coordinate [`Cell`] record and its [`CellStatus`].

use std::fmt;

use crate::geom::Point;

/// Score sentinel for a cell the search has not reached.
pub const UNSCORED: i32 = i32::MAX;

/// What a cell currently holds. Exactly one status applies at a time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellStatus {
    #[default]
    Empty,
    Wall,
    /// Discovered by the search.
    Checked,
    Start,
    End,
    /// Part of the reconstructed path (start and end keep their own status).
    Path,
}

impl CellStatus {
    /// Walls are the only cells the search never enters.
    #[inline]
    pub const fn is_walkable(self) -> bool {
        !matches!(self, Self::Wall)
    }

    /// Checked and Path are produced by a search and dropped on invalidation.
    #[inline]
    pub const fn is_search_artifact(self) -> bool {
        matches!(self, Self::Checked | Self::Path)
    }

    /// Layout character for this status.
    pub const fn to_char(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Wall => '#',
            Self::Checked => '+',
            Self::Start => 'S',
            Self::End => 'E',
            Self::Path => '*',
        }
    }

    /// Inverse of [`to_char`](Self::to_char).
    pub const fn from_char(ch: char) -> Option<Self> {
        Some(match ch {
            '.' => Self::Empty,
            '#' => Self::Wall,
            '+' => Self::Checked,
            'S' => Self::Start,
            'E' => Self::End,
            '*' => Self::Path,
            _ => return None,
        })
    }
}

impl fmt::Display for CellStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Empty => "empty",
            Self::Wall => "wall",
            Self::Checked => "checked",
            Self::Start => "start",
            Self::End => "end",
            Self::Path => "path",
        };
        f.write_str(name)
    }
}

/// The `(f, g, h)` triple of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scores {
    pub f: i32,
    pub g: i32,
    pub h: i32,
}

impl Scores {
    /// All three scores at [`UNSCORED`].
    pub const UNSCORED: Self = Self {
        f: UNSCORED,
        g: UNSCORED,
        h: UNSCORED,
    };

    /// Build from `g` and `h`; `f` is their sum.
    #[inline]
    pub const fn new(g: i32, h: i32) -> Self {
        Self { f: g + h, g, h }
    }

    /// Whether the search has assigned these scores.
    #[inline]
    pub const fn is_scored(self) -> bool {
        self.g != UNSCORED
    }
}

impl Default for Scores {
    #[inline]
    fn default() -> Self {
        Self::UNSCORED
    }
}

/// One board cell: search scores, status, and predecessor link.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub scores: Scores,
    pub status: CellStatus,
    pub parent: Option<Point>,
}

impl Cell {
    /// Set the status (builder).
    #[inline]
    pub const fn with_status(mut self, status: CellStatus) -> Self {
        self.status = status;
        self
    }

    /// Drop scores and parent, and turn search artifacts back into Empty.
    #[inline]
    pub fn clear_search(&mut self) {
        self.scores = Scores::UNSCORED;
        self.parent = None;
        if self.status.is_search_artifact() {
            self.status = CellStatus::Empty;
        }
    }
}
