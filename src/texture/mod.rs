//! Pixel buffers consumed and produced by the raycaster.

use std::collections::HashMap;

use glam::UVec2;
use tracing::trace;

use crate::constants::TILE_SIZE;
use crate::texture::frame::Texture;
use crate::texture::sheet::SpriteSheet;

pub mod frame;
pub mod sheet;
pub mod tiles;

/// Number of tile sheets a tileset can reference (A1 to A5, B to E).
pub const TILE_SHEET_COUNT: usize = 9;

/// Decoded images supplied by the host: tile sheets by sheet index and character sheets by name.
#[derive(Debug, Clone)]
pub struct MazeAssets {
    tile_size: UVec2,
    tile_sheets: [Option<Texture>; TILE_SHEET_COUNT],
    sprite_sheets: HashMap<String, SpriteSheet>,
}

impl Default for MazeAssets {
    fn default() -> Self {
        Self::new(TILE_SIZE)
    }
}

impl MazeAssets {
    pub fn new(tile_size: UVec2) -> Self {
        Self {
            tile_size: tile_size.max(UVec2::ONE),
            tile_sheets: Default::default(),
            sprite_sheets: HashMap::new(),
        }
    }

    /// Adds a tile sheet; indices outside the sheet table are ignored.
    pub fn with_tile_sheet(mut self, index: usize, texture: Texture) -> Self {
        match self.tile_sheets.get_mut(index) {
            Some(slot) => *slot = Some(texture),
            None => trace!(index, "Ignoring tile sheet outside the sheet table"),
        }
        self
    }

    pub fn with_sprite_sheet(mut self, name: impl Into<String>, texture: Texture) -> Self {
        let sheet = SpriteSheet::new(name, texture);
        self.sprite_sheets.insert(sheet.name().to_string(), sheet);
        self
    }

    pub fn tile_size(&self) -> UVec2 {
        self.tile_size
    }

    pub fn tile_sheet(&self, index: usize) -> Option<&Texture> {
        self.tile_sheets.get(index).and_then(Option::as_ref)
    }

    pub fn sprite_sheet(&self, name: &str) -> Option<&SpriteSheet> {
        self.sprite_sheets.get(name)
    }
}
