//! Boards described as ASCII art.
//!
//! A [`Layout`] is a rectangle of characters, one line per row with row `i`
//! at `y = i`:
//!
//! | char | cell |
//! |---|---|
//! | `.` | empty |
//! | `#` | wall |
//! | `S` | start |
//! | `E` | end |
//!
//! Blank lines are skipped and each line is trimmed, so layouts can be
//! written as indented string literals.

use std::fmt;

use crate::cell::CellStatus;
use crate::geom::Point;
use crate::grid::{Grid, GridError};

/// Characters accepted by [`Layout::parse`].
pub const LAYOUT_RUNES: &str = ".#SE";

/// A validated ASCII board description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    rows: Vec<Vec<CellStatus>>,
    size: Point,
    start: Option<Point>,
    end: Option<Point>,
}

impl Layout {
    /// Parse a layout. Every non-blank line must have the same width.
    pub fn parse(s: &str) -> Result<Self, LayoutError> {
        let mut rows: Vec<Vec<CellStatus>> = Vec::new();
        let mut start = None;
        let mut end = None;

        for line in s.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let y = rows.len() as i32;
            let mut row = Vec::with_capacity(line.len());
            for (x, ch) in line.chars().enumerate() {
                let pos = Point::new(x as i32, y);
                let status = match CellStatus::from_char(ch) {
                    Some(st) if LAYOUT_RUNES.contains(ch) => st,
                    _ => return Err(LayoutError::InvalidRune { ch, pos }),
                };
                let slot = match status {
                    CellStatus::Start => Some(&mut start),
                    CellStatus::End => Some(&mut end),
                    _ => None,
                };
                if let Some(slot) = slot {
                    if let Some(first) = *slot {
                        return Err(LayoutError::Duplicate {
                            status,
                            first,
                            second: pos,
                        });
                    }
                    *slot = Some(pos);
                }
                row.push(status);
            }
            let expected = rows.first().map_or(row.len(), Vec::len);
            if expected != row.len() {
                return Err(LayoutError::InconsistentSize {
                    row: y,
                    expected,
                    found: row.len(),
                });
            }
            rows.push(row);
        }

        let Some(first) = rows.first() else {
            return Err(LayoutError::Empty);
        };
        let size = Point::new(first.len() as i32, rows.len() as i32);
        Ok(Self {
            rows,
            size,
            start,
            end,
        })
    }

    /// Return the (width, height) size of the layout in cells.
    pub fn size(&self) -> Point {
        self.size
    }

    /// Position of the `S` marker.
    pub fn start(&self) -> Option<Point> {
        self.start
    }

    /// Position of the `E` marker.
    pub fn end(&self) -> Option<Point> {
        self.end
    }

    /// Call `f` for every position in row-major order.
    pub fn iter(&self, mut f: impl FnMut(Point, CellStatus)) {
        for (y, row) in self.rows.iter().enumerate() {
            for (x, &st) in row.iter().enumerate() {
                f(Point::new(x as i32, y as i32), st);
            }
        }
    }

    /// Build a fresh board from this layout.
    pub fn to_grid(&self) -> Result<Grid, GridError> {
        let mut grid = Grid::new(self.size.x, self.size.y);
        let mut result = Ok(());
        self.iter(|p, st| {
            if result.is_err() {
                return;
            }
            let edit = match st {
                CellStatus::Wall => grid.set_wall(p),
                CellStatus::Start => grid.set_start(p),
                CellStatus::End => grid.set_end(p),
                _ => Ok(false),
            };
            result = edit.map(|_| ());
        });
        result.map(|()| grid)
    }
}

impl Grid {
    /// Parse `s` as a [`Layout`] and build a board from it.
    pub fn from_layout(s: &str) -> Result<Grid, LayoutError> {
        Ok(Layout::parse(s)?.to_grid()?)
    }
}

/// Errors that can occur when parsing a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// No non-blank lines.
    Empty,
    /// A row's width differs from the first row.
    InconsistentSize {
        row: i32,
        expected: usize,
        found: usize,
    },
    /// A character outside [`LAYOUT_RUNES`].
    InvalidRune { ch: char, pos: Point },
    /// More than one start or end marker.
    Duplicate {
        status: CellStatus,
        first: Point,
        second: Point,
    },
    /// The board rejected a cell while being built.
    Grid(GridError),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("layout: no rows"),
            Self::InconsistentSize {
                row,
                expected,
                found,
            } => write!(
                f,
                "layout: row {row} has width {found}, expected {expected}"
            ),
            Self::InvalidRune { ch, pos } => {
                write!(f, "layout contains invalid rune \u{201c}{ch}\u{201d} at {pos}")
            }
            Self::Duplicate {
                status,
                first,
                second,
            } => write!(f, "layout: second {status} at {second} (first at {first})"),
            Self::Grid(e) => write!(f, "layout: {e}"),
        }
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for LayoutError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}
