use gridstar_core::{Grid, Range};

/// Board size used when nothing else is configured.
pub const DEFAULT_BOARD_SIZE: i32 = 16;

/// Configuration for a [`Pathfinder`](crate::Pathfinder).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PathfinderConfig {
    /// Board width in cells.
    pub width: i32,
    /// Board height in cells.
    pub height: i32,
}

impl PathfinderConfig {
    /// An N×N board.
    pub const fn square(n: i32) -> Self {
        Self {
            width: n,
            height: n,
        }
    }

    /// The board rectangle, anchored at the origin.
    pub fn bounds(&self) -> Range {
        Range::new(0, 0, self.width.max(0), self.height.max(0))
    }

    /// An empty board of the configured size.
    pub fn grid(&self) -> Grid {
        Grid::new(self.width, self.height)
    }
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        Self::square(DEFAULT_BOARD_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridstar_core::Point;

    #[test]
    fn default_is_sixteen_square() {
        let cfg = PathfinderConfig::default();
        assert_eq!(cfg, PathfinderConfig::square(16));
        assert_eq!(cfg.bounds().size(), Point::new(16, 16));
        assert_eq!(cfg.grid().len(), 256);
    }

    #[test]
    fn negative_size_is_empty() {
        let cfg = PathfinderConfig {
            width: -3,
            height: 4,
        };
        assert!(cfg.bounds().is_empty());
        assert!(cfg.grid().is_empty());
    }
}
