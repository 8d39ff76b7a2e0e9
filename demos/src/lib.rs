//! Headless drivers for the gridstar pathfinder.
//!
//! A real front end would draw the board every frame. Here the "frame" is a
//! tick: pending edits are applied, [`Pathfinder::step`] is called once, and
//! an [`Observer`] polls the phase and the cells that changed since the
//! previous tick.

use clap::Parser;
use clap::builder::PossibleValuesParser;
use gridstar_core::{CellChange, Grid, GridError, Point, changed_cells};
use gridstar_paths::{DEFAULT_BOARD_SIZE, Pathfinder, PathfinderConfig, Phase, SearchError};
use log::info;
use rand::{Rng, RngExt};

/// Named boards used by the `gridstar-presets` binary.
pub const PRESETS: &[(&str, &str)] = &[
    (
        "corridor",
        "
        S...E
        .....
        .....
        .....
        .....
        ",
    ),
    (
        "detour",
        "
        S.#.E
        ..#..
        ..#..
        ..#..
        .....
        ",
    ),
    (
        "walled",
        "
        S..#E
        ....#
        .....
        .....
        .....
        ",
    ),
    (
        "maze",
        "
        S...#...
        .##.#.#.
        .#..#.#.
        .#.##.#.
        .#....#.
        .####.#.
        ......#E
        .######.
        ",
    ),
];

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Arguments of `gridstar-presets`.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(version, about = "Step through the preset boards tick by tick")]
pub struct PresetArgs {
    /// Run only this preset.
    #[arg(value_parser = PossibleValuesParser::new(PRESETS.iter().map(|&(n, _)| n)))]
    pub name: Option<String>,

    /// Stop a board after this many ticks.
    #[arg(long, default_value_t = 10_000)]
    pub max_ticks: usize,
}

impl PresetArgs {
    /// The presets selected on the command line, in declaration order.
    pub fn selected(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        PRESETS
            .iter()
            .copied()
            .filter(|(n, _)| self.name.as_deref().is_none_or(|want| want == *n))
    }
}

/// Arguments of `gridstar-random`.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(version, about = "Search a randomly walled board")]
pub struct RandomArgs {
    /// Seed for the wall layout.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Board side length.
    #[arg(long, default_value_t = DEFAULT_BOARD_SIZE, value_parser = clap::value_parser!(i32).range(1..))]
    pub size: i32,

    /// Chance, in percent, that a cell becomes a wall.
    #[arg(long, default_value_t = 25, value_parser = clap::value_parser!(u32).range(0..=100))]
    pub walls: u32,
}

impl RandomArgs {
    pub fn config(&self) -> PathfinderConfig {
        PathfinderConfig::square(self.size)
    }
}

// ---------------------------------------------------------------------------
// Observer
// ---------------------------------------------------------------------------

/// What the observer saw on one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub tick: usize,
    pub phase: Phase,
    pub changes: Vec<CellChange>,
}

/// Polls a [`Pathfinder`] once per tick and diffs its board against the
/// previous tick.
#[derive(Debug, Clone)]
pub struct Observer {
    prev: Grid,
    tick: usize,
}

impl Observer {
    /// Start observing from the current state of `pf`.
    pub fn new(pf: &Pathfinder) -> Self {
        Self {
            prev: pf.grid().clone(),
            tick: 0,
        }
    }

    /// Record the state reached after a tick.
    pub fn observe(&mut self, pf: &Pathfinder) -> TickReport {
        self.tick += 1;
        let changes = changed_cells(&self.prev, pf.grid());
        self.prev = pf.grid().clone();
        TickReport {
            tick: self.tick,
            phase: pf.phase(),
            changes,
        }
    }
}

/// Run the tick loop: one `step()` per tick until the phase is terminal (or
/// Idle, which means there is nothing to search), calling `on_tick` after
/// each step. At most `max_ticks` ticks are run.
pub fn drive(
    pf: &mut Pathfinder,
    max_ticks: usize,
    mut on_tick: impl FnMut(&TickReport),
) -> Result<Phase, SearchError> {
    let mut observer = Observer::new(pf);
    for _ in 0..max_ticks {
        let phase = pf.step()?;
        let report = observer.observe(pf);
        on_tick(&report);
        if phase.is_terminal() || phase == Phase::Idle {
            break;
        }
    }
    Ok(pf.phase())
}

/// One-line summary of a finished search.
pub fn summary(pf: &Pathfinder) -> String {
    match (pf.phase(), pf.path(), pf.end()) {
        (Phase::Solved, Some(path), Some(end)) => {
            let cost = pf.scores(end).map(|s| s.g).unwrap_or_default();
            format!(
                "solved: {} cells, cost {cost}, {} expansions",
                path.len(),
                pf.engine().closed_order().len()
            )
        }
        (Phase::Failed, _, _) => format!(
            "no path exists ({} expansions)",
            pf.engine().closed_order().len()
        ),
        (phase, _, _) => format!("stopped while {phase}"),
    }
}

// ---------------------------------------------------------------------------
// Random boards
// ---------------------------------------------------------------------------

/// Build a board with roughly `wall_percent`% walls, start in the top-left
/// corner and end in the bottom-right corner.
pub fn random_board(
    config: PathfinderConfig,
    wall_percent: u32,
    rng: &mut impl Rng,
) -> Result<Pathfinder, GridError> {
    let mut pf = Pathfinder::new(config);
    let bounds = config.bounds();
    for p in bounds.iter() {
        if rng.random_range(0..100) < wall_percent {
            pf.set_wall(p)?;
        }
    }

    let start = bounds.min;
    let end = bounds.max - Point::new(1, 1);
    pf.clear_wall(start)?;
    pf.clear_wall(end)?;
    pf.set_start(start)?;
    pf.set_end(end)?;
    info!(
        "random {}x{} board with {} walls",
        bounds.width(),
        bounds.height(),
        pf.grid().count(gridstar_core::CellStatus::Wall)
    );
    Ok(pf)
}
