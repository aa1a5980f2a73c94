//! Tile painting engine for tile map editors
//!
//! Converts pointer gestures into tile selections and painting instructions:
//! - `CoordinateMapper` - Scene or view positions to tile grid cells
//! - `TileSetPicker` - Picking a selection on the tile set atlas
//! - `expand_selection` - Tiling a selection over a painted rectangle, with flips
//! - `optimize_patches` - Merging unit patches into same-tile rectangles
//! - `TileMapPainter` / `PaintStroke` - Previewing and committing paint on a tile map
//! - `PanGesture` - Panning the views, with inertia
//! - `TextureCache` - Tile textures sliced from atlases

mod expander;
mod optimizer;
mod pan;
mod stroke;
mod texture_cache;
mod tileset_picker;
mod transform;

pub use expander::{expand_selection, flip_tile_coordinates, tile_map_patches};
pub use optimizer::optimize_patches;
pub use pan::{PanGesture, PanSettings, PanState};
pub use stroke::{PaintStroke, TileMapPainter};
pub use texture_cache::{AtlasSlicer, TextureCache};
pub use tileset_picker::TileSetPicker;
pub use transform::{tile_map_transforms, to_tile_cell, CoordinateMapper, TileMapTransforms};
