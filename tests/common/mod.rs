#![allow(dead_code)]

use std::sync::Arc;

use glam::{IVec2, UVec2};
use mazecast::{
    config::MazeConfig,
    map::{
        direction::Direction,
        grid::GridMap,
        parser::{LayoutLegend, LayoutParser, ParsedLayout},
    },
    systems::{ActorFeed, SpriteRef, TriggerAction},
    texture::{frame::Texture, MazeAssets},
};
use rand::RngCore;

/// Colour of every opaque pixel of the test character sheet.
pub const SPRITE_COLOR: u32 = 0xFFFF_00FF;

/// An RNG that only ever produces zeroes, so every uniform draw picks the lowest option.
pub struct ZeroRng;

impl RngCore for ZeroRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }
}

pub fn parse_layout(rows: &[&str]) -> ParsedLayout {
    LayoutParser::parse(rows, &LayoutLegend::default()).unwrap()
}

pub fn layout_map(rows: &[&str]) -> GridMap {
    let layout = parse_layout(rows);
    GridMap::from_source(&layout.map, layout.tileset).unwrap()
}

pub fn feed(id: u32, tile: IVec2, note: &str) -> ActorFeed {
    ActorFeed {
        id,
        tile,
        facing: Direction::Down,
        sprite: SpriteRef::new("Actor1", 0, 1),
        direction_fixed: false,
        through: false,
        note: note.to_string(),
        trigger: None,
    }
}

pub fn goal_feed(id: u32, tile: IVec2) -> ActorFeed {
    ActorFeed {
        trigger: Some(TriggerAction::Succeed),
        ..feed(id, tile, "<goal>")
    }
}

/// Assets with a solid character sheet and no tile sheets, so walls use the fallback colour.
pub fn test_assets() -> Arc<MazeAssets> {
    let assets = MazeAssets::default();
    let size = assets.tile_size() * UVec2::new(12, 8);
    let sheet = Texture::solid(size.x, size.y, SPRITE_COLOR).unwrap();
    Arc::new(assets.with_sprite_sheet("Actor1", sheet))
}

/// Default configuration with a small frame.
pub fn test_config() -> MazeConfig {
    MazeConfig {
        screen_width: 64,
        screen_height: 48,
        ..MazeConfig::default()
    }
}
