//! Editor session state
//!
//! The editor shell owns one [`EditorSession`] and threads it through its
//! update functions. Nothing here is global; every transition is an explicit
//! method so the state is testable without a UI.

use crate::{TextureData, TileData};

/// A cell position within the texture grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Row-major cell index.
    pub index: u32,
    pub x: u32,
    pub y: u32,
}

/// A width/height pair, in pixels or cells depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

/// Which sidebar pane is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarPane {
    Inspector,
    Tiles,
    Tile,
    Rules,
}

/// Mutable state of one editor session.
#[derive(Debug, Clone)]
pub struct EditorSession {
    pub sidebar: Option<SidebarPane>,
    pub tile_size: Size,
    pub zoom: f32,
    pub hovered_tile: Option<Position>,
    pub selected_tiles: Vec<Position>,
    pub texture: Option<TextureData>,
    pub texture_filename: Option<String>,
    pub tile_data: Option<TileData>,
    pub tile_data_filename: Option<String>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self {
            sidebar: None,
            tile_size: Size {
                width: 16,
                height: 16,
            },
            zoom: 1.0,
            hovered_tile: None,
            selected_tiles: Vec::new(),
            texture: None,
            texture_filename: None,
            tile_data: None,
            tile_data_filename: None,
        }
    }
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track the cell under the cursor.
    pub fn hover(&mut self, position: Position) {
        self.hovered_tile = Some(position);
    }

    pub fn clear_hover(&mut self) {
        self.hovered_tile = None;
    }

    /// Replace the selection with a single cell.
    pub fn select(&mut self, position: Position) {
        self.selected_tiles.clear();
        self.selected_tiles.push(position);
    }

    /// Add a cell to the selection, or remove it if already selected.
    pub fn toggle_select(&mut self, position: Position) {
        if let Some(at) = self.selected_tiles.iter().position(|p| *p == position) {
            self.selected_tiles.remove(at);
        } else {
            self.selected_tiles.push(position);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected_tiles.clear();
    }

    /// Install freshly loaded texture metadata, resetting per-texture state.
    pub fn set_texture(&mut self, data: TextureData, filename: Option<String>) {
        self.texture = Some(data);
        self.texture_filename = filename;
        self.hovered_tile = None;
        self.selected_tiles.clear();
    }

    /// Install freshly loaded tile data.
    pub fn set_tile_data(&mut self, data: TileData, filename: Option<String>) {
        self.tile_data = Some(data);
        self.tile_data_filename = filename;
    }
}
