//! Tile set selections

use serde::{Deserialize, Serialize};

use crate::TileCoordinates;

/// What the user picked in the tile set palette.
///
/// Serialized with a `kind` tag (`"multiple"`, `"rectangle"` or `"erase"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TileMapTileSelection {
    /// Individually toggled tiles, used to edit tile hit boxes.
    Multiple { coordinates: Vec<TileCoordinates> },
    /// A rectangle of tiles: `[top_left, bottom_right]`, inclusive.
    ///
    /// Anything other than exactly two coordinates is malformed and paints nothing.
    #[serde(rename_all = "camelCase")]
    Rectangle {
        coordinates: Vec<TileCoordinates>,
        flip_horizontally: bool,
        flip_vertically: bool,
    },
    /// Clears the painted cells.
    Erase,
}

impl TileMapTileSelection {
    /// Build a rectangle selection from two opposite corners, in any order
    pub fn rectangle(a: TileCoordinates, b: TileCoordinates) -> Self {
        Self::Rectangle {
            coordinates: vec![a.min(b), a.max(b)],
            flip_horizontally: false,
            flip_vertically: false,
        }
    }

    /// Build a one-tile rectangle selection
    pub fn single(tile: TileCoordinates) -> Self {
        Self::rectangle(tile, tile)
    }

    /// Set the flip flags of a rectangle selection (other kinds are returned as-is)
    pub fn with_flips(mut self, horizontally: bool, vertically: bool) -> Self {
        if let Self::Rectangle {
            flip_horizontally,
            flip_vertically,
            ..
        } = &mut self
        {
            *flip_horizontally = horizontally;
            *flip_vertically = vertically;
        }
        self
    }

    /// Inclusive `(min, max)` bounds of a well-formed rectangle selection.
    ///
    /// The two corners may be stored in any order.
    pub fn rectangle_bounds(&self) -> Option<(TileCoordinates, TileCoordinates)> {
        match self {
            Self::Rectangle { coordinates, .. } => match coordinates.as_slice() {
                [a, b] => Some((a.min(*b), a.max(*b))),
                _ => None,
            },
            _ => None,
        }
    }

    /// Flip flags `(horizontally, vertically)`; always false for non-rectangle selections
    pub fn flips(&self) -> (bool, bool) {
        match self {
            Self::Rectangle {
                flip_horizontally,
                flip_vertically,
                ..
            } => (*flip_horizontally, *flip_vertically),
            _ => (false, false),
        }
    }

    pub fn toggle_flip_horizontally(&mut self) {
        if let Self::Rectangle {
            flip_horizontally, ..
        } = self
        {
            *flip_horizontally = !*flip_horizontally;
        }
    }

    pub fn toggle_flip_vertically(&mut self) {
        if let Self::Rectangle {
            flip_vertically, ..
        } = self
        {
            *flip_vertically = !*flip_vertically;
        }
    }

    /// True if `tile` is part of the selection
    pub fn contains(&self, tile: TileCoordinates) -> bool {
        match self {
            Self::Multiple { coordinates } => coordinates.contains(&tile),
            Self::Rectangle { .. } => self
                .rectangle_bounds()
                .map(|(min, max)| {
                    tile.x >= min.x && tile.x <= max.x && tile.y >= min.y && tile.y <= max.y
                })
                .unwrap_or(false),
            Self::Erase => false,
        }
    }

    /// Add `tile` to a multiple selection, or remove it if it is already there.
    ///
    /// Returns `false` (and does nothing) for other selection kinds.
    pub fn toggle_tile(&mut self, tile: TileCoordinates) -> bool {
        let Self::Multiple { coordinates } = self else {
            return false;
        };
        if let Some(position) = coordinates.iter().position(|c| *c == tile) {
            coordinates.remove(position);
        } else {
            coordinates.push(tile);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_is_normalized() {
        let selection =
            TileMapTileSelection::rectangle(TileCoordinates::new(4, 1), TileCoordinates::new(2, 3));
        assert_eq!(
            selection.rectangle_bounds(),
            Some((TileCoordinates::new(2, 1), TileCoordinates::new(4, 3)))
        );
        assert!(selection.contains(TileCoordinates::new(3, 2)));
        assert!(!selection.contains(TileCoordinates::new(5, 2)));
    }

    #[test]
    fn test_inverted_corners_are_normalized() {
        let selection: TileMapTileSelection = serde_json::from_str(
            r#"{"kind":"rectangle","coordinates":[{"x":3,"y":0},{"x":1,"y":2}],"flipHorizontally":false,"flipVertically":false}"#,
        )
        .unwrap();
        assert_eq!(
            selection.rectangle_bounds(),
            Some((TileCoordinates::new(1, 0), TileCoordinates::new(3, 2)))
        );
        assert!(selection.contains(TileCoordinates::new(2, 1)));
    }

    #[test]
    fn test_malformed_rectangle_has_no_bounds() {
        let selection = TileMapTileSelection::Rectangle {
            coordinates: vec![TileCoordinates::new(0, 0)],
            flip_horizontally: false,
            flip_vertically: false,
        };
        assert_eq!(selection.rectangle_bounds(), None);
        assert!(!selection.contains(TileCoordinates::new(0, 0)));
    }

    #[test]
    fn test_toggle_tile() {
        let mut selection = TileMapTileSelection::Multiple {
            coordinates: Vec::new(),
        };
        assert!(selection.toggle_tile(TileCoordinates::new(1, 1)));
        assert!(selection.contains(TileCoordinates::new(1, 1)));
        selection.toggle_tile(TileCoordinates::new(1, 1));
        assert!(!selection.contains(TileCoordinates::new(1, 1)));

        let mut erase = TileMapTileSelection::Erase;
        assert!(!erase.toggle_tile(TileCoordinates::new(0, 0)));
    }

    #[test]
    fn test_flip_toggles_only_affect_rectangles() {
        let mut selection = TileMapTileSelection::single(TileCoordinates::new(0, 0));
        selection.toggle_flip_horizontally();
        assert_eq!(selection.flips(), (true, false));
        selection.toggle_flip_vertically();
        selection.toggle_flip_horizontally();
        assert_eq!(selection.flips(), (false, true));

        let mut erase = TileMapTileSelection::Erase;
        erase.toggle_flip_horizontally();
        assert_eq!(erase, TileMapTileSelection::Erase);
    }

    #[test]
    fn test_kind_tag() {
        let selection = TileMapTileSelection::single(TileCoordinates::new(1, 2)).with_flips(true, false);
        let json = serde_json::to_value(&selection).unwrap();
        assert_eq!(json["kind"], "rectangle");
        assert_eq!(json["flipHorizontally"], true);

        let erase: TileMapTileSelection = serde_json::from_str(r#"{"kind":"erase"}"#).unwrap();
        assert_eq!(erase, TileMapTileSelection::Erase);
    }
}
