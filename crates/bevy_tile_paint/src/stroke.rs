//! Painting on a tile map instance: previews while the pointer moves, commit on release

use bevy_log::{debug, warn};
use bevy_math::Vec2;
use bevy_tile_core::{
    EditableTileMap, InstanceGeometry, TileMapTilePatch, TileMapTileSelection, TileSet,
    TileSetConfig, TrimData,
};

use crate::expander::tile_map_patches;
use crate::transform::{tile_map_transforms, CoordinateMapper, TileMapTransforms};

/// Layer painted by the editor
const PAINTED_LAYER: i32 = 0;

/// Paints tile set selections on one tile map instance.
///
/// Built from the instance geometry at the start of an operation. Committing
/// can move and resize the instance, so a new painter must be created after
/// each commit.
#[derive(Debug, Clone)]
pub struct TileMapPainter {
    tileset: TileSet,
    transforms: TileMapTransforms,
    mapper: CoordinateMapper,
}

impl TileMapPainter {
    /// `None` (and a warning) if the tile set cannot be painted with, or if the
    /// instance has no usable transform.
    pub fn new(
        config: &TileSetConfig,
        tile_map: &EditableTileMap,
        instance: &impl InstanceGeometry,
        angle_degrees: f32,
    ) -> Option<Self> {
        let tileset = match TileSet::try_from(config.clone()) {
            Ok(tileset) => tileset,
            Err(e) => {
                warn!("Trying to paint on a tile map: {}", e);
                return None;
            }
        };
        let tile_map_size = Vec2::new(tile_map.width() as f32, tile_map.height() as f32);
        let Some(transforms) = tile_map_transforms(instance, angle_degrees, tile_map_size) else {
            debug!("Tile map instance has no invertible transform");
            return None;
        };
        Some(Self {
            mapper: CoordinateMapper::new(transforms.scene_to_tile_map, tileset.tile_size as f32),
            tileset,
            transforms,
        })
    }

    pub fn tileset(&self) -> &TileSet {
        &self.tileset
    }

    pub fn transforms(&self) -> &TileMapTransforms {
        &self.transforms
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// Patches for one (hover, click) or two (drag) scene points. Never mutates anything.
    pub fn patches(
        &self,
        selection: &TileMapTileSelection,
        scene_points: &[Vec2],
    ) -> Vec<TileMapTilePatch> {
        tile_map_patches(selection, scene_points, &self.mapper)
    }

    /// Apply the patches for `scene_points` to the tile map.
    ///
    /// The tile map grows when painting outside of it and shrinks to its content
    /// after erasing. The instance is moved and resized so that tiles stay in
    /// place in the scene. Returns the applied patches.
    pub fn commit(
        &self,
        selection: &TileMapTileSelection,
        scene_points: &[Vec2],
        tile_map: &mut EditableTileMap,
        instance: &mut impl InstanceGeometry,
    ) -> Vec<TileMapTilePatch> {
        let patches = self.patches(selection, scene_points);
        let should_trim = match selection {
            TileMapTileSelection::Rectangle {
                flip_horizontally,
                flip_vertically,
                ..
            } => {
                let was_empty = tile_map.is_empty();
                if tile_map.tile_layer(PAINTED_LAYER).is_none() {
                    return Vec::new();
                }
                self.paint(&patches, *flip_horizontally, *flip_vertically, tile_map, instance);
                was_empty
            }
            TileMapTileSelection::Erase => {
                for patch in &patches {
                    for cell in patch.cells() {
                        tile_map.remove_tile(cell.x, cell.y, PAINTED_LAYER);
                    }
                }
                true
            }
            TileMapTileSelection::Multiple { .. } => return Vec::new(),
        };

        if should_trim {
            if let Some(trim) = tile_map.trim_empty_columns_and_rows(PAINTED_LAYER) {
                self.apply_trim(trim, instance);
            }
        }
        debug!(
            "Committed {} patches, tile map is now {}x{}",
            patches.len(),
            tile_map.dimension_x(),
            tile_map.dimension_y()
        );
        patches
    }

    fn paint(
        &self,
        patches: &[TileMapTilePatch],
        flip_horizontally: bool,
        flip_vertically: bool,
        tile_map: &mut EditableTileMap,
        instance: &mut impl InstanceGeometry,
    ) {
        let step = self.scene_tile_size();
        // Columns and rows inserted before the grid by previous cells
        let mut unshifted_columns = 0;
        let mut unshifted_rows = 0;

        for patch in patches {
            let Some(tile) = patch.tile_coordinates else {
                continue;
            };
            let Some(tile_id) = self.tileset.tile_id(tile) else {
                warn!("Tile {:?} is outside of the tile set", tile);
                continue;
            };

            for grid_x in patch.top_left_corner.x..=patch.bottom_right_corner.x {
                for grid_y in patch.top_left_corner.y..=patch.bottom_right_corner.y {
                    let x = grid_x + unshifted_columns;
                    let y = grid_y + unshifted_rows;
                    let columns_to_append = (x - (tile_map.dimension_x() as i32 - 1)).max(0);
                    let rows_to_append = (y - (tile_map.dimension_y() as i32 - 1)).max(0);
                    let columns_to_unshift = (-x).max(0);
                    let rows_to_unshift = (-y).max(0);
                    tile_map.increase_dimensions(
                        columns_to_append as u32,
                        columns_to_unshift as u32,
                        rows_to_append as u32,
                        rows_to_unshift as u32,
                    );

                    let new_x = x + columns_to_unshift;
                    let new_y = y + rows_to_unshift;
                    tile_map.set_tile_with_flips(
                        new_x,
                        new_y,
                        PAINTED_LAYER,
                        tile_id,
                        flip_horizontally,
                        flip_vertically,
                    );

                    unshifted_columns += columns_to_unshift;
                    unshifted_rows += rows_to_unshift;
                    // The instance position does not include its rotation
                    instance.set_x(instance.x() - columns_to_unshift as f32 * step.x);
                    instance.set_y(instance.y() - rows_to_unshift as f32 * step.y);
                    if instance.has_custom_size() {
                        instance.set_custom_width(
                            instance.custom_width()
                                + step.x * (columns_to_append + columns_to_unshift) as f32,
                        );
                        instance.set_custom_height(
                            instance.custom_height()
                                + step.y * (rows_to_append + rows_to_unshift) as f32,
                        );
                    }
                }
            }
        }
    }

    fn apply_trim(&self, trim: TrimData, instance: &mut impl InstanceGeometry) {
        let step = self.scene_tile_size();
        instance.set_x(instance.x() + trim.shifted_columns as f32 * step.x);
        instance.set_y(instance.y() + trim.shifted_rows as f32 * step.y);
        if instance.has_custom_size() {
            instance.set_custom_width(
                instance.custom_width()
                    - step.x * (trim.popped_columns + trim.shifted_columns) as f32,
            );
            instance.set_custom_height(
                instance.custom_height() - step.y * (trim.popped_rows + trim.shifted_rows) as f32,
            );
        }
    }

    /// Size of a tile once the instance scale is applied
    fn scene_tile_size(&self) -> Vec2 {
        self.transforms.scale * self.tileset.tile_size as f32
    }
}

/// A drag over a tile map, from pointer down to pointer up.
///
/// Previews and the final commit go through the same [`TileMapPainter`], so
/// the committed tiles are the ones that were previewed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintStroke {
    start: Vec2,
}

impl PaintStroke {
    pub fn begin(start: Vec2) -> Self {
        Self { start }
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    /// Patches that releasing the pointer at `current` would paint
    pub fn preview(
        &self,
        painter: &TileMapPainter,
        selection: &TileMapTileSelection,
        current: Vec2,
    ) -> Vec<TileMapTilePatch> {
        painter.patches(selection, &self.points(current))
    }

    /// End the stroke at `end` and paint it on the tile map
    pub fn commit(
        self,
        painter: &TileMapPainter,
        selection: &TileMapTileSelection,
        end: Vec2,
        tile_map: &mut EditableTileMap,
        instance: &mut impl InstanceGeometry,
    ) -> Vec<TileMapTilePatch> {
        painter.commit(selection, &self.points(end), tile_map, instance)
    }

    fn points(&self, current: Vec2) -> [Vec2; 2] {
        [self.start, current]
    }
}
