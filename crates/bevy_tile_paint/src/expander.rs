//! Mapping of a tile set selection onto painted tile map cells

use bevy_log::debug;
use bevy_math::Vec2;
use bevy_tile_core::{TileCoordinates, TileMapTilePatch, TileMapTileSelection};

use crate::optimizer::optimize_patches;
use crate::transform::CoordinateMapper;

/// Mirror `tile` inside the selection bounds `[min, max]`.
///
/// Applying the same flip twice gives back the original tile.
pub fn flip_tile_coordinates(
    tile: TileCoordinates,
    min: TileCoordinates,
    max: TileCoordinates,
    flip_horizontally: bool,
    flip_vertically: bool,
) -> TileCoordinates {
    let width = max.x - min.x + 1;
    let height = max.y - min.y + 1;
    let dx = tile.x - min.x;
    let dy = tile.y - min.y;
    TileCoordinates::new(
        min.x + if flip_horizontally { width - dx - 1 } else { dx },
        min.y + if flip_vertically { height - dy - 1 } else { dy },
    )
}

/// Offset in the source selection used for a target cell at `delta` along one axis.
///
/// Target edges use the selection edges; the inside of the target repeats the
/// inside of the selection (excluding both edges). A selection with no inside
/// (1 or 2 tiles long) keeps its first tile there.
fn source_offset(delta: i32, target_length: i32, source_length: i32) -> i32 {
    if delta == 0 {
        0
    } else if delta == target_length - 1 {
        source_length - 1
    } else if source_length - 2 <= 0 {
        0
    } else {
        (delta - 1) % (source_length - 2) + 1
    }
}

/// Patches painting `selection` over the cells designated by one or two grid corners.
///
/// - One corner: the cell under the pointer (hover or click).
/// - Two corners: the rectangle between them (drag).
///
/// Multiple selections, malformed rectangles and other corner counts paint nothing.
pub fn expand_selection(
    selection: &TileMapTileSelection,
    corners: &[TileCoordinates],
) -> Vec<TileMapTilePatch> {
    let (top_left, bottom_right) = match corners {
        [cell] => (*cell, *cell),
        [a, b] => (a.min(*b), a.max(*b)),
        _ => {
            debug!("Cannot paint with {} grid corners", corners.len());
            return Vec::new();
        }
    };

    match selection {
        TileMapTileSelection::Erase => vec![TileMapTilePatch::erase_rect(top_left, bottom_right)],
        TileMapTileSelection::Multiple { .. } => Vec::new(),
        TileMapTileSelection::Rectangle {
            flip_horizontally,
            flip_vertically,
            ..
        } => {
            let Some((selection_min, selection_max)) = selection.rectangle_bounds() else {
                debug!("Ignoring malformed rectangle selection: {:?}", selection);
                return Vec::new();
            };
            let flip = |tile| {
                flip_tile_coordinates(
                    tile,
                    selection_min,
                    selection_max,
                    *flip_horizontally,
                    *flip_vertically,
                )
            };

            if corners.len() == 1 {
                return vec![TileMapTilePatch::tile(flip(selection_min), top_left)];
            }
            if selection_min == selection_max {
                return vec![TileMapTilePatch::tile_rect(
                    flip(selection_min),
                    top_left,
                    bottom_right,
                )];
            }

            let source_width = selection_max.x - selection_min.x + 1;
            let source_height = selection_max.y - selection_min.y + 1;
            let target_width = bottom_right.x - top_left.x + 1;
            let target_height = bottom_right.y - top_left.y + 1;

            let mut patches =
                Vec::with_capacity((target_width as usize) * (target_height as usize));
            for dy in 0..target_height {
                for dx in 0..target_width {
                    let cell = top_left.offset(dx, dy);
                    let tile = if cell == top_left {
                        selection_min
                    } else if cell == bottom_right {
                        selection_max
                    } else {
                        selection_min.offset(
                            source_offset(dx, target_width, source_width),
                            source_offset(dy, target_height, source_height),
                        )
                    };
                    patches.push(TileMapTilePatch::tile(flip(tile), cell));
                }
            }

            // With at least 2 inner tiles on both axes, no neighbours share a tile
            if source_width >= 4 && source_height >= 4 {
                patches
            } else {
                optimize_patches(patches)
            }
        }
    }
}

/// Patches for pointer positions in scene space.
///
/// Points are mapped to tile map cells (the grid is unbounded: painting outside
/// makes the tile map grow), then expanded with [`expand_selection`].
pub fn tile_map_patches(
    selection: &TileMapTileSelection,
    scene_points: &[Vec2],
    mapper: &CoordinateMapper,
) -> Vec<TileMapTilePatch> {
    let corners: Option<Vec<TileCoordinates>> =
        scene_points.iter().map(|p| mapper.grid_cell(*p)).collect();
    match corners {
        Some(corners) => expand_selection(selection, &corners),
        None => Vec::new(),
    }
}
