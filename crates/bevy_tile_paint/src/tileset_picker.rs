//! Picking tiles on the displayed tile set atlas

use bevy_math::{Affine2, Vec2};
use bevy_tile_core::{TileCoordinates, TileMapTileSelection, TileSet};

use crate::transform::CoordinateMapper;

/// Turns pointer gestures over the tile set atlas into tile selections.
///
/// The atlas can be displayed zoomed and panned: `to_atlas_space` maps view
/// positions to atlas pixels scaled by `display_tile_size / tile_size`.
#[derive(Debug, Clone)]
pub struct TileSetPicker {
    column_count: u32,
    row_count: u32,
    mapper: CoordinateMapper,
    allow_multiple_selection: bool,
    drag: Option<(TileCoordinates, TileCoordinates)>,
}

impl TileSetPicker {
    pub fn new(tileset: &TileSet, display_tile_size: f32, to_atlas_space: Affine2) -> Self {
        Self {
            column_count: tileset.column_count,
            row_count: tileset.row_count,
            mapper: CoordinateMapper::new(to_atlas_space, display_tile_size),
            allow_multiple_selection: false,
            drag: None,
        }
    }

    /// Pick hit box tiles: clicks toggle tiles and drags add tiles
    pub fn with_multiple_selection(mut self, allow: bool) -> Self {
        self.allow_multiple_selection = allow;
        self
    }

    pub fn allows_multiple_selection(&self) -> bool {
        self.allow_multiple_selection
    }

    /// Tile under a view position
    pub fn tile_at(&self, position: Vec2) -> Option<TileCoordinates> {
        self.mapper
            .to_tile_cell(position, self.column_count, self.row_count)
    }

    pub fn pointer_down(&mut self, position: Vec2) {
        self.drag = self.tile_at(position).map(|tile| (tile, tile));
    }

    pub fn pointer_move(&mut self, position: Vec2) {
        let Some(tile) = self.tile_at(position) else {
            return;
        };
        if let Some((_, current)) = self.drag.as_mut() {
            *current = tile;
        }
    }

    /// Normalized rectangle being dragged, if any
    pub fn preview(&self) -> Option<(TileCoordinates, TileCoordinates)> {
        self.drag.map(|(start, current)| (start.min(current), start.max(current)))
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn cancel(&mut self) {
        self.drag = None;
    }

    /// End the gesture and return the new selection, computed from the current one.
    ///
    /// `None` if nothing was picked (no pointer down on the atlas).
    pub fn pointer_up(
        &mut self,
        position: Vec2,
        current: Option<&TileMapTileSelection>,
    ) -> Option<TileMapTileSelection> {
        self.pointer_move(position);
        let (start, end) = self.drag.take()?;

        if !self.allow_multiple_selection {
            let (flip_horizontally, flip_vertically) = match current {
                Some(selection @ TileMapTileSelection::Rectangle { .. }) => selection.flips(),
                _ => (false, false),
            };
            return Some(
                TileMapTileSelection::rectangle(start, end)
                    .with_flips(flip_horizontally, flip_vertically),
            );
        }

        let mut selection = match current {
            Some(selection @ TileMapTileSelection::Multiple { .. }) => selection.clone(),
            _ => TileMapTileSelection::Multiple {
                coordinates: Vec::new(),
            },
        };
        if start == end {
            selection.toggle_tile(start);
        } else {
            let (min, max) = (start.min(end), start.max(end));
            for y in min.y..=max.y {
                for x in min.x..=max.x {
                    let tile = TileCoordinates::new(x, y);
                    if !selection.contains(tile) {
                        selection.toggle_tile(tile);
                    }
                }
            }
        }
        Some(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: i32, y: i32) -> TileCoordinates {
        TileCoordinates::new(x, y)
    }

    fn picker() -> TileSetPicker {
        // Atlas of 4x3 tiles displayed with 32 pixel tiles
        TileSetPicker::new(&TileSet::new("atlas.png", 16, 4, 3), 32.0, Affine2::IDENTITY)
    }

    #[test]
    fn test_drag_picks_normalized_rectangle() {
        let mut picker = picker();
        picker.pointer_down(Vec2::new(70.0, 40.0));
        picker.pointer_move(Vec2::new(10.0, 5.0));
        assert_eq!(picker.preview(), Some((c(0, 0), c(2, 1))));

        let selection = picker.pointer_up(Vec2::new(10.0, 5.0), None).unwrap();
        assert_eq!(selection, TileMapTileSelection::rectangle(c(0, 0), c(2, 1)));
        assert!(!picker.is_dragging());
    }

    #[test]
    fn test_pointer_outside_atlas_is_clamped() {
        let mut picker = picker();
        picker.pointer_down(Vec2::new(20.0, 20.0));
        let selection = picker.pointer_up(Vec2::new(500.0, 500.0), None).unwrap();
        assert_eq!(selection, TileMapTileSelection::rectangle(c(0, 0), c(3, 2)));
    }

    #[test]
    fn test_rectangle_keeps_previous_flips() {
        let mut picker = picker();
        let previous = TileMapTileSelection::single(c(3, 2)).with_flips(true, false);
        picker.pointer_down(Vec2::new(40.0, 40.0));
        let selection = picker
            .pointer_up(Vec2::new(40.0, 40.0), Some(&previous))
            .unwrap();
        assert_eq!(selection, TileMapTileSelection::single(c(1, 1)).with_flips(true, false));

        picker.pointer_down(Vec2::new(40.0, 40.0));
        let selection = picker
            .pointer_up(Vec2::new(40.0, 40.0), Some(&TileMapTileSelection::Erase))
            .unwrap();
        assert_eq!(selection.flips(), (false, false));
    }

    #[test]
    fn test_multiple_selection_click_toggles() {
        let mut picker = picker().with_multiple_selection(true);
        picker.pointer_down(Vec2::new(40.0, 8.0));
        let selection = picker.pointer_up(Vec2::new(40.0, 8.0), None).unwrap();
        assert_eq!(
            selection,
            TileMapTileSelection::Multiple {
                coordinates: vec![c(1, 0)]
            }
        );

        picker.pointer_down(Vec2::new(40.0, 8.0));
        let selection = picker.pointer_up(Vec2::new(40.0, 8.0), Some(&selection)).unwrap();
        assert_eq!(
            selection,
            TileMapTileSelection::Multiple {
                coordinates: Vec::new()
            }
        );
    }

    #[test]
    fn test_multiple_selection_drag_adds() {
        let mut picker = picker().with_multiple_selection(true);
        let current = TileMapTileSelection::Multiple {
            coordinates: vec![c(1, 0)],
        };
        picker.pointer_down(Vec2::new(8.0, 8.0));
        let selection = picker.pointer_up(Vec2::new(40.0, 8.0), Some(&current)).unwrap();
        assert!(selection.contains(c(0, 0)));
        assert!(selection.contains(c(1, 0)));
        let TileMapTileSelection::Multiple { coordinates } = selection else {
            panic!("expected a multiple selection");
        };
        assert_eq!(coordinates.len(), 2);
    }

    #[test]
    fn test_release_without_press_picks_nothing() {
        let mut picker = picker();
        assert!(picker.pointer_up(Vec2::new(1.0, 1.0), None).is_none());
        picker.pointer_down(Vec2::new(1.0, 1.0));
        picker.cancel();
        assert!(picker.pointer_up(Vec2::new(1.0, 1.0), None).is_none());
    }
}
