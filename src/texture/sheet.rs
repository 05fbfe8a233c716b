use glam::UVec2;

use crate::texture::frame::Texture;

/// A character sprite sheet.
///
/// Normal sheets hold eight characters in a 4x2 arrangement, each a block of 3 animation
/// patterns by 4 facing rows. Sheets whose name starts with a `$` marker hold a single character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSheet {
    name: String,
    texture: Texture,
    big: bool,
}

impl SpriteSheet {
    pub fn new(name: impl Into<String>, texture: Texture) -> Self {
        let name = name.into();
        let big = Self::is_big_name(&name);
        Self { name, texture, big }
    }

    /// Whether a sheet name marks a single-character sheet: a leading run of `!`/`$` containing a `$`.
    pub fn is_big_name(name: &str) -> bool {
        let prefix: String = name.chars().take_while(|c| matches!(c, '!' | '$')).collect();
        prefix.contains('$')
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn is_big(&self) -> bool {
        self.big
    }

    /// Size of a single frame, in pixels.
    pub fn frame_size(&self) -> UVec2 {
        let frames = if self.big { UVec2::new(3, 4) } else { UVec2::new(12, 8) };
        (self.texture.size() / frames).max(UVec2::ONE)
    }

    /// Top-left frame of the character at `index`, in frame units.
    pub fn block_origin(&self, index: u32) -> UVec2 {
        if self.big {
            UVec2::ZERO
        } else {
            UVec2::new(index % 4 * 3, index / 4 * 4)
        }
    }

    /// Pixel origin of the frame showing `pattern` of character `index` in facing `row`.
    pub fn frame_origin(&self, index: u32, pattern: u32, row: u32) -> UVec2 {
        (self.block_origin(index) + UVec2::new(pattern, row)) * self.frame_size()
    }
}
