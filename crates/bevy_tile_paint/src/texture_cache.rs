//! Cache of tile textures sliced from tile set atlases

use std::collections::HashMap;

use bevy_ecs::prelude::Resource;
use bevy_log::debug;
use bevy_tile_core::{TileCoordinates, TileSet};

/// Produces the texture of one tile from an atlas image
pub trait AtlasSlicer {
    type Texture;

    /// Slice the `size` x `size` square at pixel `(x, y)` of `atlas_image`.
    ///
    /// `None` if the atlas is not loaded.
    fn slice(&mut self, atlas_image: &str, x: u32, y: u32, size: u32) -> Option<Self::Texture>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TextureKey {
    atlas_image: String,
    tile_size: u32,
    tile: TileCoordinates,
}

/// Tile textures keyed by atlas image, tile size and tile coordinates.
///
/// Entries are pure functions of their key, so the cache can be cleared at
/// any time. Clear it when the project is closed.
#[derive(Resource)]
pub struct TextureCache<T: Send + Sync + 'static> {
    textures: HashMap<TextureKey, T>,
}

impl<T: Send + Sync + 'static> Default for TextureCache<T> {
    fn default() -> Self {
        Self {
            textures: HashMap::new(),
        }
    }
}

impl<T: Send + Sync + 'static> TextureCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture of `tile`, sliced from the atlas on first use
    pub fn get_or_slice<S>(
        &mut self,
        tileset: &TileSet,
        tile: TileCoordinates,
        slicer: &mut S,
    ) -> Option<&T>
    where
        S: AtlasSlicer<Texture = T>,
    {
        let key = TextureKey {
            atlas_image: tileset.atlas_image.clone(),
            tile_size: tileset.tile_size,
            tile,
        };
        if !self.textures.contains_key(&key) {
            let (x, y, size) = tileset.pixel_rect(tile)?;
            let Some(texture) = slicer.slice(&tileset.atlas_image, x, y, size) else {
                debug!("Could not slice tile {:?} of {}", tile, tileset.atlas_image);
                return None;
            };
            self.textures.insert(key.clone(), texture);
        }
        self.textures.get(&key)
    }

    /// Drop the textures of one atlas, when its image changed
    pub fn remove_atlas(&mut self, atlas_image: &str) {
        self.textures.retain(|key, _| key.atlas_image != atlas_image);
    }

    pub fn clear(&mut self) {
        self.textures.clear();
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
