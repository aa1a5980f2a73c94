//! Editable tile map grid painted by the tile engine

use bevy_log::warn;
use serde::{Deserialize, Serialize};

use crate::TileSet;

/// Horizontal flip bit of a tile GID, as stored by Tiled
pub const TILE_FLIP_X: u32 = 1 << 31;
/// Vertical flip bit
pub const TILE_FLIP_Y: u32 = 1 << 30;
/// Anti-diagonal flip bit. Never set by painting, kept when loading a map.
pub const TILE_FLIP_DIAGONAL: u32 = 1 << 29;
pub const TILE_FLIP_MASK: u32 = TILE_FLIP_X | TILE_FLIP_Y | TILE_FLIP_DIAGONAL;
/// Tile ids must stay below the flip bits
pub const MAX_TILE_COUNT: u32 = TILE_FLIP_DIAGONAL;

/// Tile id of a GID
pub fn tile_index(gid: u32) -> u32 {
    gid & !TILE_FLIP_MASK
}

pub fn tile_flip_x(gid: u32) -> bool {
    gid & TILE_FLIP_X != 0
}

pub fn tile_flip_y(gid: u32) -> bool {
    gid & TILE_FLIP_Y != 0
}

/// GID of a tile id painted with the given flips
pub fn tile_with_flips(tile_id: u32, flip_x: bool, flip_y: bool) -> u32 {
    let gid = with_flag(tile_index(tile_id), TILE_FLIP_X, flip_x);
    with_flag(gid, TILE_FLIP_Y, flip_y)
}

#[inline]
fn with_flag(tile: u32, flag: u32, enabled: bool) -> u32 {
    if enabled {
        tile | flag
    } else {
        tile & !flag
    }
}

/// Errors of the tile map persistence format
#[derive(Debug)]
pub enum TileMapError {
    ParseError(String),
    SerializeError(String),
}

impl std::fmt::Display for TileMapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TileMapError::ParseError(e) => write!(f, "Tile map parse error: {}", e),
            TileMapError::SerializeError(e) => write!(f, "Tile map serialize error: {}", e),
        }
    }
}

impl std::error::Error for TileMapError {}

/// Result of trimming empty borders off a tile map.
///
/// `shifted_*` were removed at the start (left/top), `popped_*` at the end (right/bottom).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrimData {
    pub popped_rows: u32,
    pub popped_columns: u32,
    pub shifted_rows: u32,
    pub shifted_columns: u32,
}

/// A layer of tiles. `None` means empty, `Some(gid)` is a tile id with flip flags.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub id: i32,
    pub alpha: f32,
    tiles: Vec<Option<u32>>,
}

/// Number of cells of a `width` x `height` grid, if cells stay addressable with `u32`
fn cell_count(width: u32, height: u32) -> Option<usize> {
    width.checked_mul(height).map(|count| count as usize)
}

impl TileLayer {
    fn new(id: i32, cell_count: usize) -> Self {
        Self {
            id,
            alpha: 1.0,
            tiles: vec![None; cell_count],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.iter().all(|t| t.is_none())
    }

    fn cell_index(x: i32, y: i32, width: u32, height: u32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
            return None;
        }
        Some((y as u32 * width + x as u32) as usize)
    }

    fn resized(
        &self,
        width: u32,
        new_width: u32,
        new_height: u32,
        map_cell: impl Fn(u32, u32) -> Option<(u32, u32)>,
    ) -> Vec<Option<u32>> {
        let mut tiles = vec![None; new_width as usize * new_height as usize];
        for (index, tile) in self.tiles.iter().enumerate() {
            let Some(tile) = tile else { continue };
            let (x, y) = (index as u32 % width, index as u32 / width);
            if let Some((new_x, new_y)) = map_cell(x, y) {
                if new_x < new_width && new_y < new_height {
                    tiles[(new_y * new_width + new_x) as usize] = Some(*tile);
                }
            }
        }
        tiles
    }
}

/// A tile map that can be painted in the editor.
///
/// The grid is `dim_x` columns by `dim_y` rows of `tile_width` x `tile_height` pixels.
/// It grows when tiles are painted outside and can be trimmed to its content.
#[derive(Debug, Clone, PartialEq)]
pub struct EditableTileMap {
    tile_width: u32,
    tile_height: u32,
    dim_x: u32,
    dim_y: u32,
    /// Number of tiles in the tile set; tile ids at or above it are rejected
    tile_count: u32,
    layers: Vec<TileLayer>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TileMapJson {
    #[serde(default)]
    tile_width: u32,
    #[serde(default)]
    tile_height: u32,
    #[serde(default)]
    dim_x: u32,
    #[serde(default)]
    dim_y: u32,
    #[serde(default)]
    layers: Option<Vec<TileLayerJson>>,
}

#[derive(Serialize, Deserialize)]
struct TileLayerJson {
    id: i32,
    #[serde(default = "default_alpha")]
    alpha: f32,
    /// Rows of tile GIDs as signed 32-bit values, -1 for empty cells
    tiles: Vec<Vec<i64>>,
}

fn default_alpha() -> f32 {
    1.0
}

impl EditableTileMap {
    /// Create a map with a single empty layer (id 0).
    ///
    /// Dimensions too large to be addressed fall back to a single cell.
    pub fn new(tileset: &TileSet, dim_x: u32, dim_y: u32) -> Self {
        let (dim_x, dim_y, cells) = match cell_count(dim_x.max(1), dim_y.max(1)) {
            Some(cells) => (dim_x.max(1), dim_y.max(1), cells),
            None => {
                warn!("Tile map of {}x{} cells is too large, using a single cell", dim_x, dim_y);
                (1, 1, 1)
            }
        };
        Self {
            tile_width: tileset.tile_size,
            tile_height: tileset.tile_size,
            dim_x,
            dim_y,
            tile_count: tileset.tile_count(),
            layers: vec![TileLayer::new(0, cells)],
        }
    }

    /// Load a map from its JSON form.
    ///
    /// The tile set is the source of truth for the tile size and the valid tile ids:
    /// tiles that do not exist in it anymore are dropped.
    pub fn from_json(json: &str, tileset: &TileSet) -> Result<Self, TileMapError> {
        let data: TileMapJson =
            serde_json::from_str(json).map_err(|e| TileMapError::ParseError(e.to_string()))?;
        let dim_x = data.dim_x.max(1);
        let dim_y = data.dim_y.max(1);
        let cells = cell_count(dim_x, dim_y).ok_or_else(|| {
            TileMapError::ParseError(format!("{}x{} cells cannot be addressed", dim_x, dim_y))
        })?;
        let tile_count = tileset.tile_count();
        let layers = match data.layers {
            Some(layers) => layers
                .into_iter()
                .map(|layer| {
                    let mut tiles = vec![None; cells];
                    for (y, row) in layer.tiles.iter().enumerate().take(dim_y as usize) {
                        for (x, gid) in row.iter().enumerate().take(dim_x as usize) {
                            if *gid == -1 {
                                continue;
                            }
                            let gid = *gid as i32 as u32;
                            if tile_index(gid) < tile_count {
                                tiles[y * dim_x as usize + x] = Some(gid);
                            }
                        }
                    }
                    TileLayer {
                        id: layer.id,
                        alpha: layer.alpha,
                        tiles,
                    }
                })
                .collect(),
            None => vec![TileLayer::new(0, cells)],
        };
        Ok(Self {
            tile_width: tileset.tile_size,
            tile_height: tileset.tile_size,
            dim_x,
            dim_y,
            tile_count,
            layers,
        })
    }

    /// Serialize the map to the JSON form stored on the instance
    pub fn to_json(&self) -> Result<String, TileMapError> {
        let data = TileMapJson {
            tile_width: self.tile_width,
            tile_height: self.tile_height,
            dim_x: self.dim_x,
            dim_y: self.dim_y,
            layers: Some(
                self.layers
                    .iter()
                    .map(|layer| TileLayerJson {
                        id: layer.id,
                        alpha: layer.alpha,
                        tiles: layer
                            .tiles
                            .chunks(self.dim_x as usize)
                            .map(|row| {
                                row.iter()
                                    .map(|tile| tile.map(|gid| gid as i32 as i64).unwrap_or(-1))
                                    .collect()
                            })
                            .collect(),
                    })
                    .collect(),
            ),
        };
        serde_json::to_string(&data).map_err(|e| TileMapError::SerializeError(e.to_string()))
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    /// Number of columns
    pub fn dimension_x(&self) -> u32 {
        self.dim_x
    }

    /// Number of rows
    pub fn dimension_y(&self) -> u32 {
        self.dim_y
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.tile_width.saturating_mul(self.dim_x)
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.tile_height.saturating_mul(self.dim_y)
    }

    pub fn layers(&self) -> &[TileLayer] {
        &self.layers
    }

    pub fn tile_layer(&self, layer_id: i32) -> Option<&TileLayer> {
        self.layers.iter().find(|l| l.id == layer_id)
    }

    fn tile_layer_mut(&mut self, layer_id: i32) -> Option<&mut TileLayer> {
        self.layers.iter_mut().find(|l| l.id == layer_id)
    }

    /// Add an empty layer, replacing any layer with the same id
    pub fn add_tile_layer(&mut self, layer_id: i32) {
        self.layers.retain(|l| l.id != layer_id);
        self.layers
            .push(TileLayer::new(layer_id, self.dim_x as usize * self.dim_y as usize));
    }

    /// True if no layer contains a tile
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(|l| l.is_empty())
    }

    fn cell(&self, x: i32, y: i32) -> Option<usize> {
        TileLayer::cell_index(x, y, self.dim_x, self.dim_y)
    }

    /// Tile id (without flip flags) at a cell
    pub fn tile_id(&self, x: i32, y: i32, layer_id: i32) -> Option<u32> {
        self.tile_gid(x, y, layer_id).map(tile_index)
    }

    /// Tile value (id with flip flags) at a cell
    pub fn tile_gid(&self, x: i32, y: i32, layer_id: i32) -> Option<u32> {
        let index = self.cell(x, y)?;
        self.tile_layer(layer_id)?.tiles[index]
    }

    /// Set a tile, clearing its flip flags. Out of bounds cells and unknown tiles are ignored.
    pub fn set_tile(&mut self, x: i32, y: i32, layer_id: i32, tile_id: u32) {
        self.set_tile_with_flips(x, y, layer_id, tile_id, false, false);
    }

    /// Set a tile and its horizontal and vertical flips
    pub fn set_tile_with_flips(
        &mut self,
        x: i32,
        y: i32,
        layer_id: i32,
        tile_id: u32,
        flip_x: bool,
        flip_y: bool,
    ) {
        if tile_id >= self.tile_count {
            warn!("Invalid tile definition index: {}", tile_id);
            return;
        }
        let Some(index) = self.cell(x, y) else {
            return;
        };
        if let Some(layer) = self.tile_layer_mut(layer_id) {
            layer.tiles[index] = Some(tile_with_flips(tile_id, flip_x, flip_y));
        }
    }

    pub fn remove_tile(&mut self, x: i32, y: i32, layer_id: i32) {
        let Some(index) = self.cell(x, y) else {
            return;
        };
        if let Some(layer) = self.tile_layer_mut(layer_id) {
            layer.tiles[index] = None;
        }
    }

    fn set_flag(&mut self, x: i32, y: i32, layer_id: i32, flag: u32, enabled: bool) {
        let Some(index) = self.cell(x, y) else {
            return;
        };
        if let Some(layer) = self.tile_layer_mut(layer_id) {
            if let Some(tile) = layer.tiles[index].as_mut() {
                *tile = with_flag(*tile, flag, enabled);
            }
        }
    }

    pub fn flip_tile_on_x(&mut self, x: i32, y: i32, layer_id: i32, flip: bool) {
        self.set_flag(x, y, layer_id, TILE_FLIP_X, flip);
    }

    pub fn flip_tile_on_y(&mut self, x: i32, y: i32, layer_id: i32, flip: bool) {
        self.set_flag(x, y, layer_id, TILE_FLIP_Y, flip);
    }

    pub fn is_tile_flipped_on_x(&self, x: i32, y: i32, layer_id: i32) -> bool {
        self.tile_gid(x, y, layer_id).is_some_and(tile_flip_x)
    }

    pub fn is_tile_flipped_on_y(&self, x: i32, y: i32, layer_id: i32) -> bool {
        self.tile_gid(x, y, layer_id).is_some_and(tile_flip_y)
    }

    /// Add columns and rows at the end and/or at the start of the grid.
    ///
    /// Existing tiles are moved right by `columns_to_unshift` and down by `rows_to_unshift`.
    /// Growing past addressable dimensions is refused with a warning.
    pub fn increase_dimensions(
        &mut self,
        columns_to_append: u32,
        columns_to_unshift: u32,
        rows_to_append: u32,
        rows_to_unshift: u32,
    ) {
        if columns_to_append == 0 && columns_to_unshift == 0 && rows_to_append == 0 && rows_to_unshift == 0 {
            return;
        }
        let width = self.dim_x;
        let new_size = self
            .dim_x
            .checked_add(columns_to_append)
            .and_then(|w| w.checked_add(columns_to_unshift))
            .zip(
                self.dim_y
                    .checked_add(rows_to_append)
                    .and_then(|h| h.checked_add(rows_to_unshift)),
            )
            .filter(|(w, h)| cell_count(*w, *h).is_some());
        let Some((new_width, new_height)) = new_size else {
            warn!("Cannot grow the {}x{} tile map any further", self.dim_x, self.dim_y);
            return;
        };
        for layer in &mut self.layers {
            layer.tiles = layer.resized(width, new_width, new_height, |x, y| {
                Some((x + columns_to_unshift, y + rows_to_unshift))
            });
        }
        self.dim_x = new_width;
        self.dim_y = new_height;
    }

    fn reduce_dimensions(&mut self, trim: TrimData) {
        let width = self.dim_x;
        let new_width = self.dim_x - trim.popped_columns - trim.shifted_columns;
        let new_height = self.dim_y - trim.popped_rows - trim.shifted_rows;
        for layer in &mut self.layers {
            layer.tiles = layer.resized(width, new_width, new_height, |x, y| {
                (x >= trim.shifted_columns && y >= trim.shifted_rows)
                    .then(|| (x - trim.shifted_columns, y - trim.shifted_rows))
            });
        }
        self.dim_x = new_width;
        self.dim_y = new_height;
    }

    /// Empty borders of a layer: `(shifted/popped rows and columns)` that can be removed.
    fn trimming_data(&self, layer: &TileLayer) -> TrimData {
        let mut min_x = u32::MAX;
        let mut min_y = u32::MAX;
        let mut max_x = 0;
        let mut max_y = 0;
        let mut found = false;
        for (index, tile) in layer.tiles.iter().enumerate() {
            if tile.is_none() {
                continue;
            }
            let (x, y) = (index as u32 % self.dim_x, index as u32 / self.dim_x);
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
            found = true;
        }
        if !found {
            return TrimData {
                popped_rows: self.dim_y - 1,
                popped_columns: self.dim_x - 1,
                shifted_rows: 0,
                shifted_columns: 0,
            };
        }
        TrimData {
            popped_rows: self.dim_y - 1 - max_y,
            popped_columns: self.dim_x - 1 - max_x,
            shifted_rows: min_y,
            shifted_columns: min_x,
        }
    }

    /// Remove empty rows and columns around the tiles of a layer, from every layer.
    ///
    /// An empty single-layer map is collapsed to one empty cell.
    pub fn trim_empty_columns_and_rows(&mut self, layer_id: i32) -> Option<TrimData> {
        let layer = self.tile_layer(layer_id)?;
        if layer.is_empty() && self.layers.len() == 1 {
            let trim = TrimData {
                popped_rows: self.dim_y - 1,
                popped_columns: self.dim_x - 1,
                shifted_rows: 0,
                shifted_columns: 0,
            };
            self.dim_x = 1;
            self.dim_y = 1;
            self.layers[0].tiles = vec![None];
            return Some(trim);
        }
        let trim = self.trimming_data(layer);
        self.reduce_dimensions(trim);
        Some(trim)
    }
}
