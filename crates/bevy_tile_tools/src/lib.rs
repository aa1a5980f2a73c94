//! # bevy_tile_tools
//!
//! Tile map painting and composite object layout for Bevy editors.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bevy_tile_tools::prelude::*;
//!
//! fn paint(config: &TileSetConfig, map: &mut EditableTileMap, instance: &mut ChildInstance) {
//!     let Some(painter) = TileMapPainter::new(config, map, instance, 0.0) else {
//!         return;
//!     };
//!     let selection = TileMapTileSelection::rectangle(
//!         TileCoordinates::new(0, 0),
//!         TileCoordinates::new(2, 2),
//!     );
//!     let stroke = PaintStroke::begin(Vec2::new(0.0, 0.0));
//!     stroke.commit(&painter, &selection, Vec2::new(96.0, 64.0), map, instance);
//! }
//! ```
//!
//! ## Features
//!
//! - `paint` (default) - Tile selection, painting and patch optimization
//! - `layout` (default) - Anchored layouts of composite object children
//!
//! ## Crate Structure
//!
//! - [`core`] - Data types shared by both engines
//! - [`paint`] - Tile painting engine (requires `paint` feature)
//! - [`layout`] - Layout engine (requires `layout` feature)

// =============================================================================
// Core module - shared data types
// =============================================================================

/// Data types shared by the engines.
///
/// - [`TileCoordinates`] - A cell of a tile grid
/// - [`TileMapTileSelection`] - What was picked in the tile set
/// - [`TileMapTilePatch`] - One painting instruction
/// - [`EditableTileMap`] - The painted grid
pub mod core {
    pub use bevy_tile_core::*;
}

pub use bevy_tile_core::{
    ChildInstance, EditableTileMap, InstanceGeometry, TileCoordinates, TileMapError,
    TileMapTilePatch, TileMapTileSelection, TileSet, TileSetConfig, TileSetError,
};

// =============================================================================
// Paint module - tile selection and painting (optional)
// =============================================================================

/// Tile selection, painting and patch optimization.
///
/// Requires the `paint` feature (enabled by default).
#[cfg(feature = "paint")]
pub mod paint {
    pub use bevy_tile_paint::*;
}

#[cfg(feature = "paint")]
pub use bevy_tile_paint::{
    expand_selection, optimize_patches, AtlasSlicer, CoordinateMapper, PaintStroke, PanGesture,
    PanSettings, TextureCache, TileMapPainter, TileSetPicker,
};

// =============================================================================
// Layout module - composite object children layout (optional)
// =============================================================================

/// Anchored layouts of composite object children.
///
/// Requires the `layout` feature (enabled by default).
#[cfg(feature = "layout")]
pub mod layout {
    pub use bevy_tile_layout::*;
}

#[cfg(feature = "layout")]
pub use bevy_tile_layout::{
    apply_child_layouts, child_layouts_from_properties, AxisLayout, ChildLayout, EdgeAnchor,
    LayoutChild, LayoutParent, LayoutPropertyDescriptor, LayoutedInstance,
};

// =============================================================================
// Prelude - import everything commonly needed
// =============================================================================

/// Commonly used types and traits.
///
/// Import with:
/// ```rust,ignore
/// use bevy_tile_tools::prelude::*;
/// ```
pub mod prelude {
    pub use bevy_math::{Vec2, Vec3};

    // Core types
    pub use crate::{
        ChildInstance, EditableTileMap, InstanceGeometry, TileCoordinates, TileMapTilePatch,
        TileMapTileSelection, TileSet, TileSetConfig,
    };

    // Paint (if enabled)
    #[cfg(feature = "paint")]
    pub use crate::{
        CoordinateMapper, PaintStroke, PanGesture, TextureCache, TileMapPainter, TileSetPicker,
    };

    // Layout (if enabled)
    #[cfg(feature = "layout")]
    pub use crate::{apply_child_layouts, ChildLayout, LayoutChild, LayoutParent, LayoutedInstance};
}

#[cfg(all(test, feature = "paint", feature = "layout"))]
mod tests {
    use super::prelude::*;
    use super::{child_layouts_from_properties, LayoutPropertyDescriptor};
    use std::collections::HashMap;

    #[test]
    fn test_preview_matches_committed_tiles() {
        let config = TileSetConfig {
            atlas_image: "atlas.png".to_string(),
            tile_size: 8.0,
            column_count: 3.0,
            row_count: 3.0,
        };
        let tileset = TileSet::try_from(config.clone()).unwrap();
        let mut map = EditableTileMap::new(&tileset, 1, 1);
        let mut instance = ChildInstance::new(0.0, 0.0);
        let painter = TileMapPainter::new(&config, &map, &instance, 0.0).unwrap();

        let selection =
            TileMapTileSelection::rectangle(TileCoordinates::new(0, 0), TileCoordinates::new(2, 2));
        let stroke = PaintStroke::begin(Vec2::new(1.0, 1.0));
        let preview = stroke.preview(&painter, &selection, Vec2::new(39.0, 31.0));
        assert!(map.is_empty());

        let committed = stroke.commit(&painter, &selection, Vec2::new(39.0, 31.0), &mut map, &mut instance);
        assert_eq!(preview, committed);
        assert_eq!((map.dimension_x(), map.dimension_y()), (5, 4));
        for patch in &committed {
            let tile = patch.tile_coordinates.unwrap();
            for cell in patch.cells() {
                assert_eq!(map.tile_id(cell.x, cell.y, 0), tileset.tile_id(tile));
            }
        }
        // 9-slice corners
        assert_eq!(map.tile_id(0, 0, 0), Some(0));
        assert_eq!(map.tile_id(4, 3, 0), Some(8));
    }

    #[test]
    fn test_layout_from_properties() {
        let descriptors = [
            LayoutPropertyDescriptor::new("BackgroundLeftPadding", &["Background"]),
            LayoutPropertyDescriptor::new("BackgroundRightPadding", &["Background"]),
            LayoutPropertyDescriptor::new("LabelAnchorOrigin", &["Label"]),
            LayoutPropertyDescriptor::new("LabelAnchorTarget", &["Background"]),
        ];
        let values: HashMap<String, String> = [
            ("BackgroundLeftPadding", "4"),
            ("BackgroundRightPadding", "4"),
            ("LabelAnchorOrigin", "center-center"),
            ("LabelAnchorTarget", "center-center"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let layouts = child_layouts_from_properties(&descriptors, &values);

        let parent = LayoutParent::new_2d(100.0, 40.0, 200.0, 40.0);
        let children = vec![
            LayoutChild::new("Background", ChildInstance::new(0.0, 0.0), Vec3::new(100.0, 40.0, 0.0)),
            LayoutChild::new("Label", ChildInstance::new(30.0, 10.0), Vec3::new(40.0, 20.0, 0.0)),
        ];
        let result = apply_child_layouts(&parent, &children, &layouts);
        assert_eq!(result[0].position.x, 4.0);
        assert_eq!(result[0].size.x, 192.0);
        // Centered in the background horizontally; the height did not change
        assert_eq!(result[1].position.x, 80.0);
        assert_eq!(result[1].position.y, 10.0);
    }
}
