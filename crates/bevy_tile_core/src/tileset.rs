//! Tile set atlas configuration

use serde::{Deserialize, Serialize};

use crate::{TileCoordinates, MAX_TILE_COUNT};

/// Errors detected when validating a tile set configuration
#[derive(Debug, Clone, PartialEq)]
pub enum TileSetError {
    MissingAtlasImage,
    BadlyConfigured {
        tile_size: f64,
        column_count: f64,
        row_count: f64,
    },
}

impl std::fmt::Display for TileSetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TileSetError::MissingAtlasImage => write!(f, "The tile set has no atlas image"),
            TileSetError::BadlyConfigured {
                tile_size,
                column_count,
                row_count,
            } => write!(
                f,
                "Badly configured tile set: tile size {}, {} columns, {} rows (positive integers expected)",
                tile_size, column_count, row_count
            ),
        }
    }
}

impl std::error::Error for TileSetError {}

/// Tile set properties as authored on the tile map object.
///
/// Values are kept as entered (floats) so that invalid configurations can be
/// reported instead of silently truncated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSetConfig {
    #[serde(default)]
    pub atlas_image: String,
    pub tile_size: f64,
    pub column_count: f64,
    pub row_count: f64,
}

/// A validated tile set: an atlas image cut into `column_count` x `row_count`
/// square tiles of `tile_size` pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSet {
    pub atlas_image: String,
    pub tile_size: u32,
    pub column_count: u32,
    pub row_count: u32,
}

fn is_positive_integer(value: f64) -> bool {
    value.is_finite() && value > 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64
}

impl TileSetConfig {
    /// True if the grid dimensions cannot describe a tile set.
    ///
    /// Painting must be a no-op for such a tile set. The tile count must also
    /// leave room for the flip bits of tile GIDs.
    pub fn is_badly_configured(&self) -> bool {
        if !is_positive_integer(self.tile_size)
            || !is_positive_integer(self.column_count)
            || !is_positive_integer(self.row_count)
        {
            return true;
        }
        (self.column_count as u32)
            .checked_mul(self.row_count as u32)
            .is_none_or(|count| count > MAX_TILE_COUNT)
    }
}

impl TryFrom<TileSetConfig> for TileSet {
    type Error = TileSetError;

    fn try_from(config: TileSetConfig) -> Result<Self, Self::Error> {
        if config.atlas_image.is_empty() {
            return Err(TileSetError::MissingAtlasImage);
        }
        if config.is_badly_configured() {
            return Err(TileSetError::BadlyConfigured {
                tile_size: config.tile_size,
                column_count: config.column_count,
                row_count: config.row_count,
            });
        }
        Ok(Self {
            atlas_image: config.atlas_image,
            tile_size: config.tile_size as u32,
            column_count: config.column_count as u32,
            row_count: config.row_count as u32,
        })
    }
}

impl TileSet {
    pub fn new(atlas_image: impl Into<String>, tile_size: u32, column_count: u32, row_count: u32) -> Self {
        Self {
            atlas_image: atlas_image.into(),
            tile_size,
            column_count,
            row_count,
        }
    }

    /// Total number of tiles in the atlas
    pub fn tile_count(&self) -> u32 {
        self.column_count.saturating_mul(self.row_count)
    }

    /// True if `tile` addresses a tile of the atlas
    pub fn contains(&self, tile: TileCoordinates) -> bool {
        tile.x >= 0
            && tile.y >= 0
            && (tile.x as u32) < self.column_count
            && (tile.y as u32) < self.row_count
    }

    /// Tile id of a tile, counted row by row from the top-left tile
    pub fn tile_id(&self, tile: TileCoordinates) -> Option<u32> {
        self.contains(tile)
            .then(|| tile.y as u32 * self.column_count + tile.x as u32)
    }

    /// Grid coordinates of a tile id
    pub fn tile_coordinates(&self, tile_id: u32) -> Option<TileCoordinates> {
        if tile_id >= self.tile_count() {
            return None;
        }
        Some(TileCoordinates::new(
            (tile_id % self.column_count) as i32,
            (tile_id / self.column_count) as i32,
        ))
    }

    /// Atlas pixel rectangle `(x, y, size)` of a tile
    pub fn pixel_rect(&self, tile: TileCoordinates) -> Option<(u32, u32, u32)> {
        self.contains(tile).then(|| {
            (
                tile.x as u32 * self.tile_size,
                tile.y as u32 * self.tile_size,
                self.tile_size,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(tile_size: f64, column_count: f64, row_count: f64) -> TileSetConfig {
        TileSetConfig {
            atlas_image: "atlas.png".to_string(),
            tile_size,
            column_count,
            row_count,
        }
    }

    #[test]
    fn test_valid_config() {
        let tileset = TileSet::try_from(config(16.0, 8.0, 4.0)).unwrap();
        assert_eq!(tileset.tile_count(), 32);
        assert_eq!(tileset.tile_size, 16);
    }

    #[test]
    fn test_badly_configured() {
        assert!(config(16.0, 0.0, 4.0).is_badly_configured());
        assert!(config(16.0, 2.5, 4.0).is_badly_configured());
        assert!(config(16.0, 8.0, -1.0).is_badly_configured());
        assert!(config(f64::NAN, 8.0, 4.0).is_badly_configured());
        assert!(matches!(
            TileSet::try_from(config(16.0, 2.5, 4.0)),
            Err(TileSetError::BadlyConfigured { .. })
        ));
    }

    #[test]
    fn test_tile_count_must_fit_in_gids() {
        // 70000 x 70000 overflows u32
        let huge = config(16.0, 70000.0, 70000.0);
        assert!(huge.is_badly_configured());
        assert!(matches!(
            TileSet::try_from(huge),
            Err(TileSetError::BadlyConfigured { .. })
        ));
        // Fits in u32 but collides with the flip bits
        assert!(config(16.0, 65536.0, 8193.0).is_badly_configured());
        assert!(!config(16.0, 65536.0, 8192.0).is_badly_configured());

        let unchecked = TileSet::new("atlas.png", 16, 70000, 70000);
        assert_eq!(unchecked.tile_count(), u32::MAX);
    }

    #[test]
    fn test_missing_atlas() {
        let mut config = config(16.0, 8.0, 4.0);
        config.atlas_image.clear();
        assert_eq!(TileSet::try_from(config), Err(TileSetError::MissingAtlasImage));
    }

    #[test]
    fn test_tile_id_round_trip() {
        let tileset = TileSet::new("atlas.png", 16, 5, 3);
        assert_eq!(tileset.tile_id(TileCoordinates::new(2, 1)), Some(7));
        assert_eq!(tileset.tile_coordinates(7), Some(TileCoordinates::new(2, 1)));
        assert_eq!(tileset.tile_id(TileCoordinates::new(5, 0)), None);
        assert_eq!(tileset.tile_coordinates(15), None);
        assert_eq!(tileset.pixel_rect(TileCoordinates::new(2, 1)), Some((32, 16, 16)));
    }

    #[test]
    fn test_config_from_json() {
        let config: TileSetConfig = serde_json::from_str(
            r#"{"atlasImage":"tiles.png","tileSize":8,"columnCount":4,"rowCount":2}"#,
        )
        .unwrap();
        assert!(!config.is_badly_configured());
        assert_eq!(TileSet::try_from(config).unwrap().column_count, 4);
    }
}
