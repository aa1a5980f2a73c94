//! Core data structures shared by the tile painting and layout engines
//!
//! This crate provides the plain data types both engines exchange with the editor:
//! - `TileCoordinates` - A cell address in a tile set or tile map grid
//! - `TileMapTileSelection` - What the user picked in the tile set (rectangle, erase, multiple)
//! - `TileMapTilePatch` - One painting instruction over a rectangle of the painted grid
//! - `TileSet` - Validated tile atlas configuration
//! - `EditableTileMap` - The painted grid, with Tiled-compatible flip bits
//! - `InstanceGeometry` - Position and custom size accessors of a placed instance

mod coordinates;
mod instance;
mod patch;
mod selection;
mod tile_map;
mod tileset;

pub use coordinates::TileCoordinates;
pub use instance::{ChildInstance, InstanceGeometry};
pub use patch::TileMapTilePatch;
pub use selection::TileMapTileSelection;
pub use tile_map::{
    tile_flip_x, tile_flip_y, tile_index, tile_with_flips, EditableTileMap, TileLayer, TileMapError,
    TrimData, MAX_TILE_COUNT, TILE_FLIP_DIAGONAL, TILE_FLIP_MASK, TILE_FLIP_X, TILE_FLIP_Y,
};
pub use tileset::{TileSet, TileSetConfig, TileSetError};
