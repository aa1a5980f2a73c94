//! Grid cell addresses

use bevy_math::IVec2;
use serde::{Deserialize, Serialize};

/// A cell address (column, row) in a tile grid, zero-based.
///
/// Used both for tiles of a tile set atlas and for cells of a painted tile map.
/// Painted cells may be negative: the tile map grows to the left/top when the
/// user paints outside of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TileCoordinates {
    pub x: i32,
    pub y: i32,
}

impl TileCoordinates {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise minimum
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Component-wise maximum
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// Offset this cell by a number of columns and rows
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<IVec2> for TileCoordinates {
    fn from(value: IVec2) -> Self {
        Self::new(value.x, value.y)
    }
}

impl From<TileCoordinates> for IVec2 {
    fn from(value: TileCoordinates) -> Self {
        IVec2::new(value.x, value.y)
    }
}

impl From<(i32, i32)> for TileCoordinates {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}
