//! Scene space <-> tile grid conversions
//!
//! A tile map instance is placed in the scene with a position, an angle and an
//! optional custom size. Painting needs the inverse mapping: from a pointer
//! position in the scene to a cell of the tile map grid.

use bevy_math::{Affine2, Vec2};
use bevy_tile_core::{InstanceGeometry, TileCoordinates};

/// Both directions of the tile map placement, plus the signed scale of the instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileMapTransforms {
    pub tile_map_to_scene: Affine2,
    pub scene_to_tile_map: Affine2,
    /// `custom size / tile map pixel size`, or 1 without custom size
    pub scale: Vec2,
}

/// Build the transforms of a tile map instance.
///
/// The tile map is translated by the instance position, rotated around its
/// rendered center by `angle_degrees`, and scaled by its custom size. Returns
/// `None` if the scale cannot be computed or the transform is not invertible.
pub fn tile_map_transforms(
    instance: &impl InstanceGeometry,
    angle_degrees: f32,
    tile_map_size: Vec2,
) -> Option<TileMapTransforms> {
    let scale = if instance.has_custom_size() {
        if tile_map_size.x == 0.0 || tile_map_size.y == 0.0 {
            return None;
        }
        Vec2::new(
            instance.custom_width() / tile_map_size.x,
            instance.custom_height() / tile_map_size.y,
        )
    } else {
        Vec2::ONE
    };
    let abs_scale = scale.abs();

    let mut tile_map_to_scene = Affine2::from_translation(Vec2::new(instance.x(), instance.y()));
    let angle = angle_degrees.to_radians();
    if angle != 0.0 {
        let center = tile_map_size * abs_scale / 2.0;
        tile_map_to_scene = tile_map_to_scene
            * Affine2::from_translation(center)
            * Affine2::from_angle(angle)
            * Affine2::from_translation(-center);
    }
    tile_map_to_scene = tile_map_to_scene * Affine2::from_scale(abs_scale);

    let determinant = tile_map_to_scene.matrix2.determinant();
    if determinant == 0.0 || !determinant.is_finite() {
        return None;
    }
    Some(TileMapTransforms {
        tile_map_to_scene,
        scene_to_tile_map: tile_map_to_scene.inverse(),
        scale,
    })
}

/// Converts continuous positions into tile grid cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    to_grid_space: Affine2,
    tile_size: f32,
}

impl CoordinateMapper {
    /// `to_grid_space` maps a point to the unscaled pixel space of the grid
    pub fn new(to_grid_space: Affine2, tile_size: f32) -> Self {
        Self {
            to_grid_space,
            tile_size,
        }
    }

    /// Mapper for a tile set atlas displayed without transformation
    pub fn untransformed(tile_size: f32) -> Self {
        Self::new(Affine2::IDENTITY, tile_size)
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// The cell under `point`, without bounds. `None` for a degenerate tile size.
    pub fn grid_cell(&self, point: Vec2) -> Option<TileCoordinates> {
        if self.tile_size.is_nan() || self.tile_size <= 0.0 {
            return None;
        }
        let local = self.to_grid_space.transform_point2(point) / self.tile_size;
        if !local.is_finite() {
            return None;
        }
        Some(TileCoordinates::new(
            local.x.floor() as i32,
            local.y.floor() as i32,
        ))
    }

    /// The cell under `point`, clamped to a `column_count` x `row_count` grid.
    ///
    /// `None` if the grid is empty.
    pub fn to_tile_cell(
        &self,
        point: Vec2,
        column_count: u32,
        row_count: u32,
    ) -> Option<TileCoordinates> {
        if column_count == 0 || row_count == 0 {
            return None;
        }
        let cell = self.grid_cell(point)?;
        Some(TileCoordinates::new(
            cell.x.clamp(0, (column_count - 1).min(i32::MAX as u32) as i32),
            cell.y.clamp(0, (row_count - 1).min(i32::MAX as u32) as i32),
        ))
    }

    /// Scene-space top-left corner of a cell, through `to_scene` (the inverse placement)
    pub fn cell_origin(&self, cell: TileCoordinates, to_scene: Affine2) -> Vec2 {
        to_scene.transform_point2(Vec2::new(cell.x as f32, cell.y as f32) * self.tile_size)
    }
}

/// Convenience form of [`CoordinateMapper::to_tile_cell`]
pub fn to_tile_cell(
    scene_point: Vec2,
    transform: Affine2,
    tile_size: f32,
    column_count: u32,
    row_count: u32,
) -> Option<TileCoordinates> {
    CoordinateMapper::new(transform, tile_size).to_tile_cell(scene_point, column_count, row_count)
}
