//! The [`Grid`] board: an owned, row-major array of [`Cell`]s plus the
//! start and end coordinates.
//!
//! Edits keep one invariant: at most one cell is `Start`, at most one is
//! `End`, and those cells are exactly [`Grid::start`] / [`Grid::end`].
//! Search-side mutation ([`relax`](Grid::relax), [`mark_path`](Grid::mark_path))
//! never touches walls or the start/end roles.

use std::fmt;

use crate::cell::{Cell, CellStatus, Scores};
use crate::geom::{Point, Range};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by grid edits and queries. A failed edit leaves the grid
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The coordinate lies outside the board.
    InvalidCoordinate(Point),
    /// The edit conflicts with the cell's current status.
    IllegalEdit {
        pos: Point,
        found: CellStatus,
        action: &'static str,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCoordinate(p) => write!(f, "coordinate {p} is outside the board"),
            Self::IllegalEdit { pos, found, action } => {
                write!(f, "cannot {action} at {pos}: cell is {found}")
            }
        }
    }
}

impl std::error::Error for GridError {}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Role {
    Start,
    End,
}

impl Role {
    const fn status(self) -> CellStatus {
        match self {
            Self::Start => CellStatus::Start,
            Self::End => CellStatus::End,
        }
    }

    const fn action(self) -> &'static str {
        match self {
            Self::Start => "place start",
            Self::End => "place end",
        }
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A rectangular board of [`Cell`]s (square in the usual N×N setup).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,
    bounds: Range,
    start: Option<Point>,
    end: Option<Point>,
}

impl Grid {
    /// Create a board of the given dimensions with every cell Empty and no
    /// start or end.
    pub fn new(width: i32, height: i32) -> Self {
        let bounds = Range::new(0, 0, width.max(0), height.max(0));
        Self {
            cells: vec![Cell::default(); bounds.len()],
            bounds,
            start: None,
            end: None,
        }
    }

    /// Create an N×N board.
    pub fn square(n: i32) -> Self {
        Self::new(n, n)
    }

    /// The bounding range of the board.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Size of the board as a `Point`.
    #[inline]
    pub fn size(&self) -> Point {
        self.bounds.size()
    }

    /// Width.
    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    /// Height.
    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the board has no cells at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `p` is on the board.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    /// Flat index of `p`, or `None` if `p` is off the board.
    #[inline]
    pub fn index(&self, p: Point) -> Option<usize> {
        self.bounds.index_of(p)
    }

    #[inline]
    fn checked_index(&self, p: Point) -> Result<usize, GridError> {
        self.bounds
            .index_of(p)
            .ok_or(GridError::InvalidCoordinate(p))
    }

    /// The start coordinate, if set.
    #[inline]
    pub fn start(&self) -> Option<Point> {
        self.start
    }

    /// The end coordinate, if set.
    #[inline]
    pub fn end(&self) -> Option<Point> {
        self.end
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The cell at `p`, or `None` off the board.
    #[inline]
    pub fn cell(&self, p: Point) -> Option<&Cell> {
        self.index(p).map(|i| &self.cells[i])
    }

    /// Status of the cell at `p`.
    pub fn status(&self, p: Point) -> Result<CellStatus, GridError> {
        let i = self.checked_index(p)?;
        Ok(self.cells[i].status)
    }

    /// `(f, g, h)` of the cell at `p`.
    pub fn scores(&self, p: Point) -> Result<Scores, GridError> {
        let i = self.checked_index(p)?;
        Ok(self.cells[i].scores)
    }

    /// Predecessor of `p` on its best known path.
    #[inline]
    pub fn parent(&self, p: Point) -> Option<Point> {
        self.cell(p).and_then(|c| c.parent)
    }

    /// Number of cells with the given status.
    pub fn count(&self, status: CellStatus) -> usize {
        self.cells.iter().filter(|c| c.status == status).count()
    }

    /// Row-major iterator over `(Point, &Cell)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &Cell)> + '_ {
        self.bounds.iter().zip(self.cells.iter())
    }

    // -----------------------------------------------------------------------
    // Edits
    // -----------------------------------------------------------------------

    /// Put a wall at `p`. A start or end on that cell loses its role.
    ///
    /// Returns whether the board changed.
    pub fn set_wall(&mut self, p: Point) -> Result<bool, GridError> {
        let i = self.checked_index(p)?;
        if self.cells[i].status == CellStatus::Wall {
            return Ok(false);
        }
        self.release_role_at(p);
        self.cells[i] = Cell::default().with_status(CellStatus::Wall);
        Ok(true)
    }

    /// Remove the wall at `p`. Any other status is left alone.
    ///
    /// Returns whether the board changed.
    pub fn clear_wall(&mut self, p: Point) -> Result<bool, GridError> {
        let i = self.checked_index(p)?;
        if self.cells[i].status != CellStatus::Wall {
            return Ok(false);
        }
        self.cells[i].status = CellStatus::Empty;
        Ok(true)
    }

    /// Click semantics: an open cell becomes a wall, while a wall, start or
    /// end becomes Empty.
    pub fn toggle(&mut self, p: Point) -> Result<bool, GridError> {
        let i = self.checked_index(p)?;
        match self.cells[i].status {
            CellStatus::Wall | CellStatus::Start | CellStatus::End => {
                self.release_role_at(p);
                self.cells[i] = Cell::default();
                Ok(true)
            }
            CellStatus::Empty | CellStatus::Checked | CellStatus::Path => self.set_wall(p),
        }
    }

    /// Place the start at `p`.
    ///
    /// Placing it on the current start unsets it. A previous start elsewhere
    /// is cleared, and an end on `p` is displaced. Walls are rejected.
    pub fn set_start(&mut self, p: Point) -> Result<bool, GridError> {
        self.place(p, Role::Start)
    }

    /// Place the end at `p`. Mirrors [`set_start`](Self::set_start).
    pub fn set_end(&mut self, p: Point) -> Result<bool, GridError> {
        self.place(p, Role::End)
    }

    fn place(&mut self, p: Point, role: Role) -> Result<bool, GridError> {
        let i = self.checked_index(p)?;
        let found = self.cells[i].status;
        if found == CellStatus::Wall {
            return Err(GridError::IllegalEdit {
                pos: p,
                found,
                action: role.action(),
            });
        }

        let current = match role {
            Role::Start => self.start,
            Role::End => self.end,
        };
        if current == Some(p) {
            self.cells[i].status = CellStatus::Empty;
            *self.role_mut(role) = None;
            return Ok(true);
        }

        if let Some(oi) = current.and_then(|old| self.index(old)) {
            self.cells[oi].status = CellStatus::Empty;
        }
        // Displace the other role if it sits on `p`.
        self.release_role_at(p);

        self.cells[i].status = role.status();
        *self.role_mut(role) = Some(p);
        Ok(true)
    }

    fn role_mut(&mut self, role: Role) -> &mut Option<Point> {
        match role {
            Role::Start => &mut self.start,
            Role::End => &mut self.end,
        }
    }

    /// Unset whichever role (if any) is located at `p`, without touching the
    /// cell status.
    fn release_role_at(&mut self, p: Point) {
        if self.start == Some(p) {
            self.start = None;
        }
        if self.end == Some(p) {
            self.end = None;
        }
    }

    /// Reset every cell to Empty and unset start and end.
    pub fn clear_all(&mut self) {
        self.cells.fill(Cell::default());
        self.start = None;
        self.end = None;
    }

    /// Drop every search result: scores and parents are cleared and Checked /
    /// Path cells become Empty. Walls, start and end are preserved.
    pub fn clear_search(&mut self) {
        for c in self.cells.iter_mut() {
            c.clear_search();
        }
    }

    // -----------------------------------------------------------------------
    // Search-side mutation
    // -----------------------------------------------------------------------

    /// Record an improved score for `p` and mark it Checked. Start and end
    /// keep their status. Walls are rejected.
    pub fn relax(&mut self, p: Point, scores: Scores, parent: Point) -> Result<(), GridError> {
        let i = self.checked_index(p)?;
        let cell = &mut self.cells[i];
        match cell.status {
            CellStatus::Wall => Err(GridError::IllegalEdit {
                pos: p,
                found: CellStatus::Wall,
                action: "score",
            }),
            status => {
                cell.scores = scores;
                cell.parent = Some(parent);
                if matches!(status, CellStatus::Empty | CellStatus::Path) {
                    cell.status = CellStatus::Checked;
                }
                Ok(())
            }
        }
    }

    /// Seed the scores of `p` without a parent (the search origin).
    pub fn seed(&mut self, p: Point, scores: Scores) -> Result<(), GridError> {
        let i = self.checked_index(p)?;
        self.cells[i].scores = scores;
        self.cells[i].parent = None;
        Ok(())
    }

    /// Point the parent link of `p` at `parent`, leaving scores alone.
    pub fn set_parent(&mut self, p: Point, parent: Point) -> Result<(), GridError> {
        let i = self.checked_index(p)?;
        self.cells[i].parent = Some(parent);
        Ok(())
    }

    /// Mark `p` as part of the final path. Start and end keep their status.
    pub fn mark_path(&mut self, p: Point) -> Result<(), GridError> {
        let i = self.checked_index(p)?;
        let cell = &mut self.cells[i];
        match cell.status {
            CellStatus::Empty | CellStatus::Checked => {
                cell.status = CellStatus::Path;
                Ok(())
            }
            CellStatus::Start | CellStatus::End | CellStatus::Path => Ok(()),
            CellStatus::Wall => Err(GridError::IllegalEdit {
                pos: p,
                found: CellStatus::Wall,
                action: "mark path",
            }),
        }
    }

    /// Status characters, one line per row (`y = 0` first).
    pub fn to_layout_string(&self) -> String {
        let w = self.width().max(0) as usize;
        let mut s = String::with_capacity(self.cells.len() + self.height().max(0) as usize);
        for (i, c) in self.cells.iter().enumerate() {
            if i > 0 && i % w == 0 {
                s.push('\n');
            }
            s.push(c.status.to_char());
        }
        s
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_layout_string())
    }
}

// ---------------------------------------------------------------------------
// CellChange / changed_cells
// ---------------------------------------------------------------------------

/// A single cell that changed between two snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellChange {
    pub pos: Point,
    pub cell: Cell,
}

/// Compute the cells of `curr` that differ from `prev`.
///
/// Both grids must share the same bounds; a size mismatch reports every cell
/// of `curr`.
pub fn changed_cells(prev: &Grid, curr: &Grid) -> Vec<CellChange> {
    if prev.bounds != curr.bounds {
        return curr
            .iter()
            .map(|(pos, &cell)| CellChange { pos, cell })
            .collect();
    }
    prev.cells
        .iter()
        .zip(curr.iter())
        .filter(|(pc, (_, cc))| pc != cc)
        .map(|(_, (pos, &cell))| CellChange { pos, cell })
        .collect()
}
