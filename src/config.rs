use std::path::PathBuf;

use figment::providers::{Env, Serialized};
use figment::Figment;
use glam::UVec2;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{
    BLOCK_WIDTH, CAMERA_DISTANCE, CAMERA_WIDTH, GEN_FLOOR, GEN_TILESET_ID, GEN_WALL, MIN_MAZE_SIZE, MOVE_SPEED,
    ROTATION_SPEED, SCREEN_SIZE,
};
use crate::map::tile::TileId;
use crate::systems::quality::QualityMode;
use crate::systems::render::Palette;
use crate::systems::viewpoint::ViewParams;

/// Tunables of the maze engine and the demo binary.
///
/// Every field can be overridden through a `MAZECAST_`-prefixed environment variable,
/// e.g. `MAZECAST_CAMERA_WIDTH=2.5` or `MAZECAST_QUALITY=high`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    // Camera and movement
    pub camera_distance: f32,
    pub camera_width: f32,
    pub speed: f32,
    pub rotation_speed: f32,
    pub block_width: f32,

    // Frame
    pub screen_width: u32,
    pub screen_height: u32,
    pub quality: QualityMode,
    pub palette: Palette,

    // Generated mazes
    pub gen_floor: u16,
    pub gen_wall: u16,
    pub gen_tileset_id: u32,

    // Demo run
    pub frames: u64,
    pub maze_size: u32,
    /// Seed of the generator; a random seed is drawn when unset.
    pub seed: Option<u64>,
    /// Where the last frame is written as a PNG image, if anywhere.
    pub output: Option<PathBuf>,
    /// Frames between two stats lines.
    pub stats_interval: u64,
    /// Whether frames are paced to the loop time.
    pub paced: bool,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            camera_distance: CAMERA_DISTANCE,
            camera_width: CAMERA_WIDTH,
            speed: MOVE_SPEED,
            rotation_speed: ROTATION_SPEED,
            block_width: BLOCK_WIDTH,
            screen_width: SCREEN_SIZE.x,
            screen_height: SCREEN_SIZE.y,
            quality: QualityMode::default(),
            palette: Palette::default(),
            gen_floor: GEN_FLOOR.0,
            gen_wall: GEN_WALL.0,
            gen_tileset_id: GEN_TILESET_ID,
            frames: 600,
            maze_size: 8,
            seed: None,
            output: None,
            stats_interval: 120,
            paced: true,
        }
    }
}

impl MazeConfig {
    /// Loads the configuration: built-in defaults, then `MAZECAST_*` environment variables.
    pub fn load() -> Result<MazeConfig, figment::Error> {
        Self::figment().extract::<MazeConfig>().map(MazeConfig::validated)
    }

    /// The provider stack used by [`MazeConfig::load`].
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(MazeConfig::default())).merge(Env::prefixed("MAZECAST_"))
    }

    /// Replaces values the engine cannot work with by their defaults.
    pub fn validated(mut self) -> MazeConfig {
        let defaults = MazeConfig::default();

        if self.screen_width == 0 || self.screen_height == 0 {
            warn!(
                width = self.screen_width,
                height = self.screen_height,
                "Empty screen size configured, using default"
            );
            self.screen_width = defaults.screen_width;
            self.screen_height = defaults.screen_height;
        }
        for (name, value, default) in [
            ("camera_distance", &mut self.camera_distance, defaults.camera_distance),
            ("camera_width", &mut self.camera_width, defaults.camera_width),
            ("block_width", &mut self.block_width, defaults.block_width),
        ] {
            if !value.is_finite() || *value <= 0.0 {
                warn!(name, value = *value, default, "Non-positive camera parameter, using default");
                *value = default;
            }
        }
        if self.maze_size < MIN_MAZE_SIZE {
            warn!(size = self.maze_size, minimum = MIN_MAZE_SIZE, "Maze size below minimum, clamping");
            self.maze_size = MIN_MAZE_SIZE;
        }
        if self.stats_interval == 0 {
            self.stats_interval = defaults.stats_interval;
        }
        self
    }

    pub fn view_params(&self) -> ViewParams {
        ViewParams {
            camera_distance: self.camera_distance,
            camera_width: self.camera_width,
            speed: self.speed,
            rotation_speed: self.rotation_speed,
            block_width: self.block_width,
        }
    }

    pub fn screen_size(&self) -> UVec2 {
        UVec2::new(self.screen_width, self.screen_height)
    }

    pub fn gen_floor(&self) -> TileId {
        TileId(self.gen_floor)
    }

    pub fn gen_wall(&self) -> TileId {
        TileId(self.gen_wall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = MazeConfig::default();
        assert_eq!(config.view_params(), ViewParams::default());
        assert_eq!(config.screen_size(), SCREEN_SIZE);
        assert_eq!(config.gen_wall(), GEN_WALL);
    }

    #[test]
    fn test_validated_restores_unusable_values() {
        let config = MazeConfig {
            screen_width: 0,
            camera_width: -1.0,
            maze_size: 2,
            ..MazeConfig::default()
        }
        .validated();
        assert_eq!(config.screen_size(), SCREEN_SIZE);
        assert_eq!(config.camera_width, CAMERA_WIDTH);
        assert_eq!(config.maze_size, MIN_MAZE_SIZE);
    }

    #[test]
    fn test_defaults_extract_from_figment() {
        let config: MazeConfig = Figment::from(Serialized::defaults(MazeConfig::default())).extract().unwrap();
        assert_eq!(config, MazeConfig::default());
    }
}
