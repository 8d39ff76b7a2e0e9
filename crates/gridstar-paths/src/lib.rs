//! Incremental A* search over a `gridstar-core` board.
//!
//! The search runs one bounded unit of work per [`SearchEngine::step`] call,
//! so a caller such as a render loop can show progress cell by cell:
//!
//! - the open set is ordered by `(f, insertion order)` ([`OpenSet`]),
//! - neighbors are relaxed left, right, up, down ([`CARDINAL_DIRS`]),
//! - the heuristic is the [`manhattan`] distance,
//! - the final path comes from [`reconstruct`].
//!
//! [`Pathfinder`] bundles a [`Grid`](gridstar_core::Grid) with its engine and
//! invalidates the search on every edit.
//!
//! # Example
//!
//! ```
//! use gridstar_core::Point;
//! use gridstar_paths::{Pathfinder, Phase};
//!
//! let mut pf = Pathfinder::from_layout("
//!     S.#.
//!     ..#E
//!     ....
//! ").unwrap();
//! assert_eq!(pf.run().unwrap(), Phase::Solved);
//! assert_eq!(pf.path().unwrap().len(), 7);
//! assert_eq!(pf.scores(Point::new(3, 1)).unwrap().g, 6);
//! ```

mod config;
mod distance;
mod engine;
mod neighbors;
mod open_set;
mod pathfinder;
mod reconstruct;

pub use config::{DEFAULT_BOARD_SIZE, PathfinderConfig};
pub use distance::manhattan;
pub use engine::{Phase, SearchEngine, SearchError};
pub use neighbors::{CARDINAL_DIRS, Neighbors};
pub use open_set::OpenSet;
pub use pathfinder::Pathfinder;
pub use reconstruct::reconstruct;
