use gridstar_core::{Grid, Point};

use crate::engine::SearchError;

/// Walk parent links from `end` back to `start` and return the path in
/// start-to-end order, both endpoints included.
///
/// A link that is missing, leaves the board, is not an orthogonal step, or
/// revisits a cell is reported as [`SearchError::InternalInconsistency`].
/// The revisit check bounds the walk to `grid.len()` hops.
pub fn reconstruct(grid: &Grid, start: Point, end: Point) -> Result<Vec<Point>, SearchError> {
    let mut seen = vec![false; grid.len()];
    let mut path = Vec::new();
    let mut cur = end;

    loop {
        let Some(i) = grid.index(cur) else {
            return Err(SearchError::inconsistency(cur, "parent chain leaves the board"));
        };
        if seen[i] {
            return Err(SearchError::inconsistency(cur, "parent chain has a cycle"));
        }
        seen[i] = true;
        path.push(cur);
        if cur == start {
            break;
        }

        let Some(parent) = grid.parent(cur) else {
            return Err(SearchError::inconsistency(cur, "parent chain ends before start"));
        };
        if !parent.is_adjacent_4(cur) {
            return Err(SearchError::inconsistency(cur, "parent is not an orthogonal step"));
        }
        cur = parent;
    }

    path.reverse();
    Ok(path)
}
