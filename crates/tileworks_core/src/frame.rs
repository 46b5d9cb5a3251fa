//! Frame and texture metadata
//!
//! A [`Frame`] describes how one sprite is drawn for a tile or item id; a
//! [`TextureData`] bundles a spritesheet's dimensions with its frames. Field
//! names are part of the on-disk JSON contract.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::DataError;

/// Identifier linking editor metadata to the game-side tile or item it
/// represents.
pub type GameId = i32;

/// Whether a frame belongs to a tile or an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameKind {
    Tile,
    Item,
}

/// How the sprite is oriented relative to the ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Angle {
    Orthogonal,
    Parallel,
}

/// Sprite composition: one cell, or a multi-cell composite with an anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "sprite_type", rename_all = "lowercase")]
pub enum Sprite {
    Single,
    Multiple {
        width: u32,
        height: u32,
        /// Cell indices composing the sprite, row-major over the pattern grid.
        pattern: Vec<u32>,
        pattern_width: u32,
        pattern_height: u32,
        anchor_x: i32,
        anchor_y: i32,
    },
}

impl Sprite {
    /// Footprint in tile cells.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Sprite::Single => (1, 1),
            Sprite::Multiple { width, height, .. } => (*width, *height),
        }
    }
}

/// Render metadata for one sprite frame.
///
/// `key` is unique within a texture; `frame` is the ordinal within an
/// animation sequence; `game_id` links to the tile or item the frame draws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub key: u32,
    pub frame: u32,
    pub game_id: GameId,
    #[serde(rename = "type")]
    pub kind: FrameKind,
    pub angle: Angle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_face_id: Option<GameId>,
    #[serde(flatten)]
    pub sprite: Sprite,
}

/// Spritesheet metadata: image dimensions, cell size, and the frames sliced
/// out of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureData {
    pub name: String,
    pub filepath: String,
    pub width: u32,
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    #[serde(default)]
    pub frames: Vec<Frame>,
}

impl TextureData {
    /// Cells per row of the sheet.
    pub fn columns(&self) -> u32 {
        self.width / self.tile_width
    }

    /// Cell rows in the sheet.
    pub fn rows(&self) -> u32 {
        self.height / self.tile_height
    }

    /// Total number of cells in the sheet.
    pub fn tile_count(&self) -> u32 {
        self.columns() * self.rows()
    }

    /// Find a frame by its texture-unique key.
    pub fn frame_by_key(&self, key: u32) -> Option<&Frame> {
        self.frames.iter().find(|f| f.key == key)
    }

    /// Check that frame keys are unique within this texture.
    pub fn validate(&self) -> Result<(), DataError> {
        let mut seen = std::collections::HashSet::new();
        for frame in &self.frames {
            if !seen.insert(frame.key) {
                return Err(DataError::DuplicateFrameKey { key: frame.key });
            }
        }
        Ok(())
    }
}

/// Keyed lookup over a texture's frames.
///
/// Built once per texture; after that, resolving a tile id to its render
/// metadata is a hash lookup. A `game_id` miss is a data-integrity error the
/// caller must surface, never a silent default.
#[derive(Debug)]
pub struct FrameIndex<'a> {
    frames: &'a [Frame],
    by_key: HashMap<u32, usize>,
    by_game_id: HashMap<GameId, Vec<usize>>,
}

impl<'a> FrameIndex<'a> {
    pub fn new(texture: &'a TextureData) -> Self {
        let mut by_key = HashMap::new();
        let mut by_game_id: HashMap<GameId, Vec<usize>> = HashMap::new();

        for (i, frame) in texture.frames.iter().enumerate() {
            by_key.entry(frame.key).or_insert(i);
            by_game_id.entry(frame.game_id).or_default().push(i);
        }

        Self {
            frames: &texture.frames,
            by_key,
            by_game_id,
        }
    }

    /// The frame drawn for a game id — the lowest `frame` ordinal when the
    /// id has an animation sequence.
    pub fn frame(&self, game_id: GameId) -> Result<&'a Frame, DataError> {
        self.by_game_id
            .get(&game_id)
            .and_then(|indices| indices.iter().map(|&i| &self.frames[i]).min_by_key(|f| f.frame))
            .ok_or(DataError::UnknownFrameId { game_id })
    }

    /// All frames registered for a game id, in file order.
    pub fn frames_for(&self, game_id: GameId) -> Vec<&'a Frame> {
        self.by_game_id
            .get(&game_id)
            .map(|indices| indices.iter().map(|&i| &self.frames[i]).collect())
            .unwrap_or_default()
    }

    /// Find a frame by its texture-unique key.
    pub fn frame_by_key(&self, key: u32) -> Option<&'a Frame> {
        self.by_key.get(&key).map(|&i| &self.frames[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn single_frame(key: u32, frame: u32, game_id: GameId) -> Frame {
        Frame {
            key,
            frame,
            game_id,
            kind: FrameKind::Tile,
            angle: Angle::Orthogonal,
            front_face_id: None,
            sprite: Sprite::Single,
        }
    }

    #[test]
    fn test_single_frame_on_disk_shape() {
        let frame = single_frame(0, 0, 7);
        let value = serde_json::to_value(&frame).unwrap();

        assert_eq!(
            value,
            json!({
                "key": 0,
                "frame": 0,
                "game_id": 7,
                "type": "tile",
                "angle": "orthogonal",
                "sprite_type": "single",
            })
        );
    }

    #[test]
    fn test_multiple_frame_round_trip() {
        let json = json!({
            "key": 3,
            "frame": 0,
            "game_id": 12,
            "type": "item",
            "angle": "parallel",
            "front_face_id": 13,
            "sprite_type": "multiple",
            "width": 2,
            "height": 2,
            "pattern": [0, 1, 8, 9],
            "pattern_width": 2,
            "pattern_height": 2,
            "anchor_x": 0,
            "anchor_y": 1,
        });

        let frame: Frame = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(frame.kind, FrameKind::Item);
        assert_eq!(frame.front_face_id, Some(13));
        assert_eq!(frame.sprite.dimensions(), (2, 2));

        assert_eq!(serde_json::to_value(&frame).unwrap(), json);
    }

    #[test]
    fn test_texture_data_grid_math() {
        let texture = TextureData {
            name: "tiles".to_string(),
            filepath: "tiles.png".to_string(),
            width: 128,
            height: 64,
            tile_width: 16,
            tile_height: 16,
            frames: Vec::new(),
        };

        assert_eq!(texture.columns(), 8);
        assert_eq!(texture.rows(), 4);
        assert_eq!(texture.tile_count(), 32);
    }

    #[test]
    fn test_validate_rejects_duplicate_keys() {
        let texture = TextureData {
            name: "tiles".to_string(),
            filepath: "tiles.png".to_string(),
            width: 32,
            height: 32,
            tile_width: 16,
            tile_height: 16,
            frames: vec![single_frame(1, 0, 7), single_frame(1, 0, 8)],
        };

        assert!(matches!(
            texture.validate(),
            Err(DataError::DuplicateFrameKey { key: 1 })
        ));
    }

    #[test]
    fn test_frame_index_lookup() {
        let texture = TextureData {
            name: "tiles".to_string(),
            filepath: "tiles.png".to_string(),
            width: 64,
            height: 64,
            tile_width: 16,
            tile_height: 16,
            // Game id 7 has a two-frame animation, listed out of order.
            frames: vec![
                single_frame(0, 1, 7),
                single_frame(1, 0, 7),
                single_frame(2, 0, 9),
            ],
        };

        let index = FrameIndex::new(&texture);

        assert_eq!(index.frame(7).unwrap().key, 1);
        assert_eq!(index.frames_for(7).len(), 2);
        assert_eq!(index.frame(9).unwrap().key, 2);
        assert_eq!(index.frame_by_key(2).unwrap().game_id, 9);
        assert_eq!(texture.frame_by_key(0).unwrap().frame, 1);

        assert!(matches!(
            index.frame(99),
            Err(DataError::UnknownFrameId { game_id: 99 })
        ));
        assert!(index.frames_for(99).is_empty());
    }
}
