//! Core data structures for tileworks
//!
//! This crate provides the fundamental types for texture and tile assets:
//! - `Frame`/`TextureData` - per-sprite render metadata and the spritesheet
//!   it is sliced from
//! - `FrameIndex` - keyed frame lookup for render-time queries
//! - `Tile`/`TileData` - the game-side tile database
//! - `EditorSession` - explicit editor state, no globals
//!
//! The JSON shapes produced here are shared with existing saved files; field
//! names must be preserved exactly.

mod frame;
mod session;
mod tile;

pub use frame::{Angle, Frame, FrameIndex, FrameKind, GameId, Sprite, TextureData};
pub use session::{EditorSession, Position, SidebarPane, Size};
pub use tile::{Action, Drop, Tile, TileData};

use std::path::Path;
use thiserror::Error;

/// Errors from metadata loading and lookup.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    /// A resolved tile id has no frame metadata. Recoverable: the editor
    /// shows a placeholder and flags the asset as incomplete.
    #[error("no frame metadata for game id {game_id}")]
    UnknownFrameId { game_id: GameId },
    #[error("duplicate frame key {key}")]
    DuplicateFrameKey { key: u32 },
}

/// Load texture metadata from a JSON file.
pub fn load_texture_data(path: &Path) -> Result<TextureData, DataError> {
    let content = std::fs::read_to_string(path).map_err(|e| DataError::IoError(e.to_string()))?;

    parse_texture_data(&content)
}

/// Parse texture metadata from a JSON string, validating frame-key
/// uniqueness.
pub fn parse_texture_data(json: &str) -> Result<TextureData, DataError> {
    let data: TextureData =
        serde_json::from_str(json).map_err(|e| DataError::ParseError(e.to_string()))?;

    data.validate()?;

    Ok(data)
}

/// Save texture metadata to a JSON file.
pub fn save_texture_data(data: &TextureData, path: &Path) -> Result<(), DataError> {
    let content = serde_json::to_string(data).map_err(|e| DataError::ParseError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| DataError::IoError(e.to_string()))?;

    Ok(())
}

/// Load the tile database from a JSON file.
pub fn load_tile_data(path: &Path) -> Result<TileData, DataError> {
    let content = std::fs::read_to_string(path).map_err(|e| DataError::IoError(e.to_string()))?;

    parse_tile_data(&content)
}

/// Parse the tile database from a JSON string.
pub fn parse_tile_data(json: &str) -> Result<TileData, DataError> {
    serde_json::from_str(json).map_err(|e| DataError::ParseError(e.to_string()))
}

/// Save the tile database to a JSON file.
pub fn save_tile_data(data: &TileData, path: &Path) -> Result<(), DataError> {
    let content = serde_json::to_string(data).map_err(|e| DataError::ParseError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| DataError::IoError(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_texture_data_validates_keys() {
        let json = r#"{
            "name": "tiles",
            "filepath": "tiles.png",
            "width": 32,
            "height": 16,
            "tile_width": 16,
            "tile_height": 16,
            "frames": [
                { "key": 0, "frame": 0, "game_id": 1, "type": "tile",
                  "angle": "orthogonal", "sprite_type": "single" },
                { "key": 0, "frame": 1, "game_id": 1, "type": "tile",
                  "angle": "orthogonal", "sprite_type": "single" }
            ]
        }"#;

        let result = parse_texture_data(json);
        assert!(matches!(result, Err(DataError::DuplicateFrameKey { key: 0 })));
    }

    #[test]
    fn test_parse_texture_data_minimal() {
        let json = r#"{
            "name": "tiles",
            "filepath": "tiles.png",
            "width": 32,
            "height": 16,
            "tile_width": 16,
            "tile_height": 16
        }"#;

        let data = parse_texture_data(json).unwrap();
        assert_eq!(data.name, "tiles");
        assert!(data.frames.is_empty());
    }

    #[test]
    fn test_parse_tile_data() {
        let json = r#"{ "tiles": [{ "id": 1, "name": "Dirt" }] }"#;
        let data = parse_tile_data(json).unwrap();
        assert_eq!(data.tile(1).unwrap().name, "Dirt");
    }
}
