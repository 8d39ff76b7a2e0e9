//! [`Pathfinder`]: a board and its search engine driven as one unit.
//!
//! Every edit that changes the board sends the engine back to Idle and
//! clears all scores. Placing a start or end that completes the pair arms
//! the engine right away; wall edits and [`reset`](Pathfinder::reset) leave
//! it Idle until the next [`step`](Pathfinder::step).

use gridstar_core::{CellStatus, Grid, GridError, LayoutError, Point, Scores};
use log::debug;

use crate::config::PathfinderConfig;
use crate::engine::{Phase, SearchEngine, SearchError};

/// Edit, control and query interface over a [`Grid`] + [`SearchEngine`].
#[derive(Debug, Clone)]
pub struct Pathfinder {
    grid: Grid,
    engine: SearchEngine,
}

impl Default for Pathfinder {
    fn default() -> Self {
        Self::new(PathfinderConfig::default())
    }
}

impl Pathfinder {
    /// An empty board of the configured size.
    pub fn new(config: PathfinderConfig) -> Self {
        Self::with_grid(config.grid())
    }

    /// Take over an existing board. The engine is armed if the board
    /// already has a start and an end.
    pub fn with_grid(mut grid: Grid) -> Self {
        let mut engine = SearchEngine::for_grid(&grid);
        engine.reset(&mut grid);
        engine.arm(&grid);
        Self { grid, engine }
    }

    /// Build from an ASCII layout (see [`gridstar_core::Layout`]).
    pub fn from_layout(s: &str) -> Result<Self, LayoutError> {
        Ok(Self::with_grid(Grid::from_layout(s)?))
    }

    /// The board.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The search engine.
    #[inline]
    pub fn engine(&self) -> &SearchEngine {
        &self.engine
    }

    // -----------------------------------------------------------------------
    // Edit interface
    // -----------------------------------------------------------------------

    fn edit(
        &mut self,
        arm: bool,
        op: impl FnOnce(&mut Grid) -> Result<bool, GridError>,
    ) -> Result<bool, GridError> {
        let changed = op(&mut self.grid).inspect_err(|e| debug!("edit rejected: {e}"))?;
        if changed {
            self.engine.reset(&mut self.grid);
            if arm {
                self.engine.arm(&self.grid);
            }
        }
        Ok(changed)
    }

    /// Put a wall at `p`. See [`Grid::set_wall`].
    pub fn set_wall(&mut self, p: Point) -> Result<bool, GridError> {
        self.edit(false, |g| g.set_wall(p))
    }

    /// Remove the wall at `p`. See [`Grid::clear_wall`].
    pub fn clear_wall(&mut self, p: Point) -> Result<bool, GridError> {
        self.edit(false, |g| g.clear_wall(p))
    }

    /// Click-toggle `p`. See [`Grid::toggle`].
    pub fn toggle(&mut self, p: Point) -> Result<bool, GridError> {
        self.edit(false, |g| g.toggle(p))
    }

    /// Place (or toggle off) the start. See [`Grid::set_start`].
    pub fn set_start(&mut self, p: Point) -> Result<bool, GridError> {
        self.edit(true, |g| g.set_start(p))
    }

    /// Place (or toggle off) the end. See [`Grid::set_end`].
    pub fn set_end(&mut self, p: Point) -> Result<bool, GridError> {
        self.edit(true, |g| g.set_end(p))
    }

    /// Empty the whole board.
    pub fn clear_all(&mut self) {
        self.grid.clear_all();
        self.engine.reset(&mut self.grid);
    }

    // -----------------------------------------------------------------------
    // Control interface
    // -----------------------------------------------------------------------

    /// Perform one unit of search work.
    pub fn step(&mut self) -> Result<Phase, SearchError> {
        self.engine.step(&mut self.grid)
    }

    /// Step until Solved or Failed (or Idle if start or end is missing).
    pub fn run(&mut self) -> Result<Phase, SearchError> {
        self.engine.run(&mut self.grid)
    }

    /// The current phase.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.engine.phase()
    }

    /// Force Idle, keeping walls, start and end.
    pub fn reset(&mut self) {
        self.engine.reset(&mut self.grid);
    }

    // -----------------------------------------------------------------------
    // Query interface
    // -----------------------------------------------------------------------

    /// Status of the cell at `p`.
    pub fn status(&self, p: Point) -> Result<CellStatus, GridError> {
        self.grid.status(p)
    }

    /// `(f, g, h)` of the cell at `p`.
    pub fn scores(&self, p: Point) -> Result<Scores, GridError> {
        self.grid.scores(p)
    }

    /// The path, once the phase is Solved.
    pub fn path(&self) -> Option<&[Point]> {
        self.engine.path()
    }

    /// The start coordinate, if set.
    pub fn start(&self) -> Option<Point> {
        self.grid.start()
    }

    /// The end coordinate, if set.
    pub fn end(&self) -> Option<Point> {
        self.grid.end()
    }
}
