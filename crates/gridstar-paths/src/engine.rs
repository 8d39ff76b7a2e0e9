//! The step-driven A* state machine.
//!
//! Each [`SearchEngine::step`] call performs one bounded unit of work:
//!
//! | phase | work | next |
//! |---|---|---|
//! | `Idle` | none | `Initializing` once start and end are both set |
//! | `Initializing` | seed the open set with the start | `Searching` |
//! | `Searching` | pop the lowest `(f, insertion)` node, relax its neighbors | `Reconstructing`, `Failed` or `Searching` |
//! | `Reconstructing` | walk parents, mark the path | `Solved` |
//! | `Solved` / `Failed` | none | stays until reset |

use std::fmt;

use gridstar_core::{CellStatus, Grid, GridError, Point, Range, Scores};
use log::{debug, trace, warn};

use crate::distance::manhattan;
use crate::neighbors::Neighbors;
use crate::open_set::OpenSet;
use crate::reconstruct::reconstruct;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Where the search currently stands.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    #[default]
    Idle,
    Initializing,
    Searching,
    Reconstructing,
    Solved,
    /// The open set ran out without reaching the end: no path exists.
    Failed,
}

impl Phase {
    /// Solved and Failed only change through a reset or an edit.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Solved | Self::Failed)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Initializing => "initializing",
            Self::Searching => "searching",
            Self::Reconstructing => "reconstructing",
            Self::Solved => "solved",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while stepping the search. None of them occur while the
/// engine and grid invariants hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The parent chain is broken or cyclic.
    InternalInconsistency { at: Point, detail: &'static str },
    /// A grid mutation issued by the search was rejected.
    Grid(GridError),
}

impl SearchError {
    pub(crate) fn inconsistency(at: Point, detail: &'static str) -> Self {
        Self::InternalInconsistency { at, detail }
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InternalInconsistency { at, detail } => {
                write!(f, "internal inconsistency at {at}: {detail}")
            }
            Self::Grid(e) => write!(f, "search edit rejected: {e}"),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            Self::InternalInconsistency { .. } => None,
        }
    }
}

impl From<GridError> for SearchError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

// ---------------------------------------------------------------------------
// SearchEngine
// ---------------------------------------------------------------------------

/// Incremental A* over a [`Grid`].
///
/// The engine owns the open and closed sets; scores, parents and statuses
/// are written into the grid passed to each call. Pair one engine with one
/// grid and call [`reset`](Self::reset) after every edit of that grid.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    phase: Phase,
    bounds: Range,
    open: OpenSet,
    closed: Vec<bool>,
    closed_order: Vec<Point>,
    goal_reached: bool,
    path: Vec<Point>,
    neighbors: Neighbors,
}

impl SearchEngine {
    /// Create an idle engine for boards covering `bounds`.
    pub fn new(bounds: Range) -> Self {
        let len = bounds.len();
        Self {
            phase: Phase::Idle,
            bounds,
            open: OpenSet::new(len),
            closed: vec![false; len],
            closed_order: Vec::new(),
            goal_reached: false,
            path: Vec::new(),
            neighbors: Neighbors::new(),
        }
    }

    /// Create an idle engine sized for `grid`.
    pub fn for_grid(grid: &Grid) -> Self {
        Self::new(grid.bounds())
    }

    /// The current phase.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The start-to-end path, available only once the phase is Solved.
    pub fn path(&self) -> Option<&[Point]> {
        (self.phase == Phase::Solved).then_some(self.path.as_slice())
    }

    /// Finalized cells in the order they were popped.
    #[inline]
    pub fn closed_order(&self) -> &[Point] {
        &self.closed_order
    }

    /// Number of cells waiting in the open set.
    #[inline]
    pub fn open_len(&self) -> usize {
        self.open.len()
    }

    /// Open cells in the order they would be popped.
    pub fn open_points(&self) -> Vec<Point> {
        self.open
            .indices()
            .into_iter()
            .map(|i| self.bounds.point_at(i))
            .collect()
    }

    /// Whether `p` is in the open set.
    pub fn is_open(&self, p: Point) -> bool {
        self.bounds.index_of(p).is_some_and(|i| self.open.contains(i))
    }

    /// Whether `p` has been finalized.
    pub fn is_closed(&self, p: Point) -> bool {
        self.bounds
            .index_of(p)
            .is_some_and(|i| self.closed.get(i).copied().unwrap_or(false))
    }

    fn set_phase(&mut self, next: Phase) {
        if next != self.phase {
            debug!("search phase {} -> {}", self.phase, next);
            self.phase = next;
        }
    }

    fn clear_sets(&mut self, bounds: Range) {
        let len = bounds.len();
        self.bounds = bounds;
        self.open.clear(len);
        self.closed.clear();
        self.closed.resize(len, false);
        self.closed_order.clear();
        self.goal_reached = false;
        self.path.clear();
    }

    /// Return to Idle: both sets are emptied and every score, parent and
    /// search status is cleared from `grid`. Walls, start and end stay.
    pub fn reset(&mut self, grid: &mut Grid) {
        grid.clear_search();
        self.clear_sets(grid.bounds());
        self.set_phase(Phase::Idle);
    }

    /// Move from Idle to Initializing if `grid` has both a start and an end.
    pub fn arm(&mut self, grid: &Grid) -> Phase {
        if self.phase == Phase::Idle && grid.start().is_some() && grid.end().is_some() {
            self.set_phase(Phase::Initializing);
        }
        self.phase
    }

    /// Perform one unit of work and return the phase reached.
    ///
    /// An `Err` leaves the phase where it was, so it is never mistaken for
    /// Failed. The board is inconsistent at that point; call
    /// [`reset`](Self::reset) before searching again.
    pub fn step(&mut self, grid: &mut Grid) -> Result<Phase, SearchError> {
        let endpoints = grid.start().zip(grid.end());
        let result = match (self.phase, endpoints) {
            (Phase::Idle, _) => {
                self.arm(grid);
                Ok(())
            }
            (Phase::Solved | Phase::Failed, _) => Ok(()),
            (phase, None) => {
                debug!("start or end unset while {phase}; resetting");
                self.reset(grid);
                Ok(())
            }
            (Phase::Initializing, Some((start, end))) => self.initialize(grid, start, end),
            (Phase::Searching, Some((_, end))) => self.expand(grid, end),
            (Phase::Reconstructing, Some((start, end))) => self.finish(grid, start, end),
        };

        if let Err(e) = result {
            warn!("search step failed while {}: {e}", self.phase);
            return Err(e);
        }
        Ok(self.phase)
    }

    /// Step until the search reaches a terminal phase, or Idle when there is
    /// nothing to search.
    pub fn run(&mut self, grid: &mut Grid) -> Result<Phase, SearchError> {
        loop {
            let phase = self.step(grid)?;
            if phase.is_terminal() || phase == Phase::Idle {
                return Ok(phase);
            }
        }
    }

    fn initialize(&mut self, grid: &mut Grid, start: Point, end: Point) -> Result<(), SearchError> {
        self.clear_sets(grid.bounds());
        let Some(si) = grid.index(start) else {
            return Err(GridError::InvalidCoordinate(start).into());
        };
        let scores = Scores::new(0, manhattan(start, end));
        grid.seed(start, scores)?;
        self.open.push(si, scores.f);
        debug!("search from {start} to {end}, estimate {}", scores.h);
        self.set_phase(Phase::Searching);
        Ok(())
    }

    fn expand(&mut self, grid: &mut Grid, end: Point) -> Result<(), SearchError> {
        let Some((ci, f)) = self.open.pop() else {
            debug!("open set exhausted; no path");
            self.set_phase(Phase::Failed);
            return Ok(());
        };
        self.closed[ci] = true;
        let cur = self.bounds.point_at(ci);
        self.closed_order.push(cur);
        let g = grid.scores(cur)?.g;
        trace!("expand {cur} f={f} g={g}");

        let bounds = self.bounds;
        let mut neighbors = std::mem::take(&mut self.neighbors);
        let mut outcome = Ok(());
        for &np in neighbors.cardinal(cur, |p| bounds.contains(p)) {
            if let Err(e) = self.relax(grid, cur, g, np, end) {
                outcome = Err(e);
                break;
            }
        }
        self.neighbors = neighbors;
        outcome?;

        if self.goal_reached {
            self.set_phase(Phase::Reconstructing);
        } else if self.open.is_empty() {
            debug!(
                "open set exhausted after {} expansions; no path",
                self.closed_order.len()
            );
            self.set_phase(Phase::Failed);
        }
        Ok(())
    }

    fn relax(
        &mut self,
        grid: &mut Grid,
        cur: Point,
        g: i32,
        np: Point,
        end: Point,
    ) -> Result<(), SearchError> {
        let (Some(ni), Some(&cell)) = (self.bounds.index_of(np), grid.cell(np)) else {
            return Ok(());
        };

        if cell.status == CellStatus::End {
            grid.set_parent(np, cur)?;
            self.goal_reached = true;
        }
        if self.closed[ni] || !cell.status.is_walkable() {
            return Ok(());
        }

        // Compared against the stored f, not g.
        let tentative = Scores::new(g + 1, manhattan(np, end));
        if tentative.f < cell.scores.f {
            grid.relax(np, tentative, cur)?;
            if cell.status != CellStatus::End {
                self.open.push(ni, tentative.f);
            }
        }
        Ok(())
    }

    fn finish(&mut self, grid: &mut Grid, start: Point, end: Point) -> Result<(), SearchError> {
        let path = reconstruct(grid, start, end)?;
        if path.len() > 2 {
            for &p in &path[1..path.len() - 1] {
                grid.mark_path(p)?;
            }
        }
        debug!(
            "path found: {} cells, cost {}",
            path.len(),
            grid.scores(end)?.g
        );
        self.path = path;
        self.set_phase(Phase::Solved);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashSet, VecDeque};

    fn board(layout: &str) -> (Grid, SearchEngine) {
        let grid = Grid::from_layout(layout).unwrap();
        let engine = SearchEngine::for_grid(&grid);
        (grid, engine)
    }

    /// Reference unit-cost distances from `from`, avoiding walls.
    fn bfs(grid: &Grid, from: Point) -> Vec<Option<i32>> {
        let mut dist = vec![None; grid.len()];
        let mut queue = VecDeque::new();
        dist[grid.index(from).unwrap()] = Some(0);
        queue.push_back(from);
        while let Some(p) = queue.pop_front() {
            let d = dist[grid.index(p).unwrap()].unwrap();
            for n in [p.shift(-1, 0), p.shift(1, 0), p.shift(0, -1), p.shift(0, 1)] {
                let Some(i) = grid.index(n) else { continue };
                if dist[i].is_none() && grid.status(n).unwrap() != CellStatus::Wall {
                    dist[i] = Some(d + 1);
                    queue.push_back(n);
                }
            }
        }
        dist
    }

    const MAZE: &str = "
        S...#...
        .##.#.#.
        .#..#.#.
        .#.##.#.
        .#....#.
        .####.#.
        ......#E
        .######.
    ";

    #[test]
    fn idle_without_endpoints() {
        let mut grid = Grid::square(4);
        let mut engine = SearchEngine::for_grid(&grid);
        assert_eq!(engine.step(&mut grid), Ok(Phase::Idle));
        grid.set_start(Point::new(0, 0)).unwrap();
        assert_eq!(engine.run(&mut grid), Ok(Phase::Idle));
    }

    #[test]
    fn phases_in_order() {
        let (mut grid, mut engine) = board("S.E");
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.step(&mut grid), Ok(Phase::Initializing));
        assert_eq!(engine.step(&mut grid), Ok(Phase::Searching));
        assert_eq!(engine.open_points(), vec![Point::new(0, 0)]);
        assert_eq!(engine.step(&mut grid), Ok(Phase::Searching));
        assert_eq!(engine.step(&mut grid), Ok(Phase::Reconstructing));
        assert_eq!(engine.step(&mut grid), Ok(Phase::Solved));
        assert_eq!(engine.step(&mut grid), Ok(Phase::Solved));
    }

    #[test]
    fn initializing_seeds_start() {
        let (mut grid, mut engine) = board("
            .....
            .S...
            .....
            ...E.
        ");
        engine.arm(&grid);
        engine.step(&mut grid).unwrap();
        let s = Point::new(1, 1);
        assert_eq!(grid.scores(s), Ok(Scores { f: 4, g: 0, h: 4 }));
        assert_eq!(grid.parent(s), None);
        assert!(engine.is_open(s));
        assert_eq!(engine.open_len(), 1);
    }

    #[test]
    fn first_expansion_relaxes_in_cardinal_order() {
        let (mut grid, mut engine) = board("
            .....
            .....
            ..S..
            .....
            ....E
        ");
        engine.arm(&grid);
        engine.step(&mut grid).unwrap();
        engine.step(&mut grid).unwrap();
        // Right and down have f = 4, left and up f = 6; equal keys keep
        // the left, right, up, down insertion order.
        assert_eq!(
            engine.open_points(),
            vec![
                Point::new(3, 2),
                Point::new(2, 3),
                Point::new(1, 2),
                Point::new(2, 1),
            ]
        );
        assert_eq!(grid.status(Point::new(1, 2)), Ok(CellStatus::Checked));
        assert_eq!(grid.parent(Point::new(2, 3)), Some(Point::new(2, 2)));
        assert!(engine.is_closed(Point::new(2, 2)));
        assert_eq!(grid.status(Point::new(2, 2)), Ok(CellStatus::Start));
    }

    #[test]
    fn straight_corridor() {
        let (mut grid, mut engine) = board("
            S...E
            .....
            .....
            .....
            .....
        ");
        assert_eq!(engine.run(&mut grid), Ok(Phase::Solved));
        let expected: Vec<Point> = (0..5).map(|x| Point::new(x, 0)).collect();
        assert_eq!(engine.path(), Some(expected.as_slice()));
        assert_eq!(grid.scores(Point::new(4, 0)).unwrap().g, 4);
        for x in 1..4 {
            assert_eq!(grid.status(Point::new(x, 0)), Ok(CellStatus::Path));
        }
        assert_eq!(grid.status(Point::new(0, 0)), Ok(CellStatus::Start));
        assert_eq!(grid.status(Point::new(4, 0)), Ok(CellStatus::End));
    }

    #[test]
    fn unreachable_end_fails() {
        let (mut grid, mut engine) = board("
            S..#E
            ....#
            .....
        ");
        assert_eq!(engine.run(&mut grid), Ok(Phase::Failed));
        assert_eq!(engine.path(), None);
        assert_eq!(engine.open_len(), 0);
        assert_eq!(grid.count(CellStatus::Path), 0);
    }

    #[test]
    fn closed_g_is_true_distance() {
        let (mut grid, mut engine) = board(MAZE);
        let start = grid.start().unwrap();
        let dist = bfs(&grid, start);
        assert_eq!(engine.run(&mut grid), Ok(Phase::Solved));
        for &p in engine.closed_order() {
            let i = grid.index(p).unwrap();
            assert_eq!(Some(grid.scores(p).unwrap().g), dist[i], "at {p}");
        }
        let end = grid.end().unwrap();
        let cost = dist[grid.index(end).unwrap()].unwrap();
        assert_eq!(grid.scores(end).unwrap().g, cost);
        assert_eq!(engine.path().unwrap().len(), cost as usize + 1);
    }

    #[test]
    fn popped_f_is_non_decreasing() {
        let (mut grid, mut engine) = board(MAZE);
        engine.run(&mut grid).unwrap();
        let fs: Vec<i32> = engine
            .closed_order()
            .iter()
            .map(|&p| grid.scores(p).unwrap().f)
            .collect();
        assert!(fs.windows(2).all(|w| w[0] <= w[1]), "{fs:?}");
    }

    #[test]
    fn open_and_closed_stay_disjoint() {
        let (mut grid, mut engine) = board(MAZE);
        engine.arm(&grid);
        while !engine.step(&mut grid).unwrap().is_terminal() {
            let open = engine.open_points();
            let unique: HashSet<_> = open.iter().copied().collect();
            assert_eq!(unique.len(), open.len());
            assert_eq!(open.len(), engine.open_len());
            for p in &open {
                assert!(!engine.is_closed(*p), "{p} open and closed");
            }
            let closed: HashSet<_> = engine.closed_order().iter().copied().collect();
            assert_eq!(closed.len(), engine.closed_order().len());
        }
    }

    #[test]
    fn path_is_valid() {
        let (mut grid, mut engine) = board(MAZE);
        engine.run(&mut grid).unwrap();
        let path = engine.path().unwrap().to_vec();
        assert_eq!(path.first().copied(), grid.start());
        assert_eq!(path.last().copied(), grid.end());
        assert!(path.windows(2).all(|w| w[0].is_adjacent_4(w[1])));
        for p in &path {
            assert_ne!(grid.status(*p), Ok(CellStatus::Wall));
        }
    }

    #[test]
    fn reset_reproduces_run() {
        let (mut grid, mut engine) = board(MAZE);
        engine.run(&mut grid).unwrap();
        let path = engine.path().unwrap().to_vec();
        let order = engine.closed_order().to_vec();
        let snapshot = grid.clone();

        engine.reset(&mut grid);
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(grid.count(CellStatus::Checked), 0);
        assert_eq!(grid.count(CellStatus::Path), 0);
        assert!(grid.iter().all(|(_, c)| !c.scores.is_scored()));

        assert_eq!(engine.run(&mut grid), Ok(Phase::Solved));
        assert_eq!(engine.path(), Some(path.as_slice()));
        assert_eq!(engine.closed_order(), order.as_slice());
        assert_eq!(grid, snapshot);
    }

    #[test]
    fn stepping_matches_running() {
        let (mut stepped, mut a) = board(MAZE);
        let (mut ran, mut b) = board(MAZE);
        let mut ticks = 0;
        while !a.step(&mut stepped).unwrap().is_terminal() {
            ticks += 1;
        }
        b.run(&mut ran).unwrap();
        assert!(ticks > 3);
        assert_eq!(a.path(), b.path());
        assert_eq!(a.closed_order(), b.closed_order());
        assert_eq!(stepped, ran);
    }

    #[test]
    fn clearing_endpoint_mid_search_returns_to_idle() {
        let (mut grid, mut engine) = board(MAZE);
        engine.arm(&grid);
        engine.step(&mut grid).unwrap();
        engine.step(&mut grid).unwrap();
        let end = grid.end().unwrap();
        grid.set_end(end).unwrap();
        assert_eq!(engine.step(&mut grid), Ok(Phase::Idle));
        assert_eq!(engine.open_len(), 0);
        assert_eq!(grid.count(CellStatus::Checked), 0);
    }

    #[test]
    fn corrupted_chain_errors_without_failing() {
        let (mut grid, mut engine) = board("S.E");
        engine.arm(&grid);
        engine.step(&mut grid).unwrap();
        engine.step(&mut grid).unwrap();
        assert_eq!(engine.step(&mut grid), Ok(Phase::Reconstructing));
        // Loop the chain between (1, 0) and the end.
        grid.set_parent(Point::new(1, 0), Point::new(2, 0)).unwrap();
        let err = engine.step(&mut grid).unwrap_err();
        assert!(matches!(err, SearchError::InternalInconsistency { .. }));
        assert_eq!(engine.phase(), Phase::Reconstructing);
        assert_eq!(engine.path(), None);
        assert!(engine.step(&mut grid).is_err());
        assert!(engine.run(&mut grid).is_err());

        engine.reset(&mut grid);
        assert_eq!(engine.run(&mut grid), Ok(Phase::Solved));
        assert_eq!(engine.path().map(<[Point]>::len), Some(3));
    }

    #[test]
    fn phase_display() {
        assert_eq!(Phase::Reconstructing.to_string(), "reconstructing");
        assert!(Phase::Failed.is_terminal());
        assert!(!Phase::Searching.is_terminal());
    }
}
