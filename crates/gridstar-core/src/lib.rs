//! **gridstar-core**: board types for an incremental grid pathfinder.
//!
//! This crate provides the data side of the pathfinder: geometry
//! primitives, the per-cell record, the owned [`Grid`] with its edit and
//! query interface, and ASCII [`Layout`]s for describing boards in text.
//! The search itself lives in `gridstar-paths`.

pub mod cell;
pub mod geom;
pub mod grid;
pub mod layout;

pub use cell::{Cell, CellStatus, Scores, UNSCORED};
pub use geom::{Point, Range, RangeIter};
pub use grid::{CellChange, Grid, GridError, changed_cells};
pub use layout::{LAYOUT_RUNES, Layout, LayoutError};
