//! Painting instructions produced from a tile selection

use serde::{Deserialize, Serialize};

use crate::TileCoordinates;

/// One instruction over the painted grid.
///
/// Every cell of the inclusive rectangle `[top_left_corner, bottom_right_corner]`
/// is painted with `tile_coordinates` (a tile of the tile set), or cleared when
/// `erase` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileMapTilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_coordinates: Option<TileCoordinates>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub erase: bool,
    pub top_left_corner: TileCoordinates,
    pub bottom_right_corner: TileCoordinates,
}

impl TileMapTilePatch {
    /// Paint `tile` on a single cell
    pub fn tile(tile: TileCoordinates, cell: TileCoordinates) -> Self {
        Self::tile_rect(tile, cell, cell)
    }

    /// Paint `tile` on every cell of an inclusive rectangle
    pub fn tile_rect(
        tile: TileCoordinates,
        top_left_corner: TileCoordinates,
        bottom_right_corner: TileCoordinates,
    ) -> Self {
        Self {
            tile_coordinates: Some(tile),
            erase: false,
            top_left_corner,
            bottom_right_corner,
        }
    }

    /// Clear every cell of an inclusive rectangle
    pub fn erase_rect(top_left_corner: TileCoordinates, bottom_right_corner: TileCoordinates) -> Self {
        Self {
            tile_coordinates: None,
            erase: true,
            top_left_corner,
            bottom_right_corner,
        }
    }

    /// True if the patch covers exactly one cell
    pub fn is_single_cell(&self) -> bool {
        self.top_left_corner == self.bottom_right_corner
    }

    pub fn width(&self) -> i32 {
        self.bottom_right_corner.x - self.top_left_corner.x + 1
    }

    pub fn height(&self) -> i32 {
        self.bottom_right_corner.y - self.top_left_corner.y + 1
    }

    /// Number of cells covered by the patch
    pub fn cell_count(&self) -> usize {
        (self.width().max(0) as usize) * (self.height().max(0) as usize)
    }

    /// Iterate over the covered cells, row by row
    pub fn cells(&self) -> impl Iterator<Item = TileCoordinates> + '_ {
        let (min, max) = (self.top_left_corner, self.bottom_right_corner);
        (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| TileCoordinates::new(x, y)))
    }

    /// True if `cell` lies inside the patch rectangle
    pub fn contains(&self, cell: TileCoordinates) -> bool {
        cell.x >= self.top_left_corner.x
            && cell.x <= self.bottom_right_corner.x
            && cell.y >= self.top_left_corner.y
            && cell.y <= self.bottom_right_corner.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_cover_rectangle() {
        let patch = TileMapTilePatch::tile_rect(
            TileCoordinates::new(0, 0),
            TileCoordinates::new(1, 2),
            TileCoordinates::new(3, 3),
        );
        assert_eq!(patch.width(), 3);
        assert_eq!(patch.height(), 2);
        assert_eq!(patch.cell_count(), 6);
        let cells: Vec<_> = patch.cells().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], TileCoordinates::new(1, 2));
        assert_eq!(cells[5], TileCoordinates::new(3, 3));
        assert!(patch.contains(TileCoordinates::new(2, 3)));
        assert!(!patch.contains(TileCoordinates::new(4, 3)));
    }

    #[test]
    fn test_erase_serialization_omits_tile() {
        let patch = TileMapTilePatch::erase_rect(TileCoordinates::new(0, 0), TileCoordinates::new(0, 0));
        let json = serde_json::to_value(patch).unwrap();
        assert_eq!(json["erase"], serde_json::Value::Bool(true));
        assert!(json.get("tileCoordinates").is_none());
        assert_eq!(json["topLeftCorner"]["x"], 0);
    }
}
