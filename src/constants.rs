//! This module contains all the constants used by the maze engine.

use std::f32::consts::PI;
use std::time::Duration;

use glam::{UVec2, Vec2};

use crate::map::tile::TileId;

pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// The size of the rendered frame, in pixels.
pub const SCREEN_SIZE: UVec2 = UVec2::new(816, 624);

/// The size of a single tile in the tile sheets, in pixels.
pub const TILE_SIZE: UVec2 = UVec2::new(48, 48);

/// Size of a single 3D block, in world units.
pub const BLOCK_WIDTH: f32 = 1.0;

/// Distance from the eye to the camera plane.
pub const CAMERA_DISTANCE: f32 = 10.0;
/// Half-width of the camera plane.
pub const CAMERA_WIDTH: f32 = 3.0;
/// Distance covered by a single movement step, in world units.
pub const MOVE_SPEED: f32 = 0.05;
/// Angle covered by a single rotation step, in radians.
pub const ROTATION_SPEED: f32 = PI / 64.0;

/// Bounds of the column scale factor.
pub const MIN_SCALE: f32 = 1.0;
pub const MAX_SCALE: f32 = 4.0;
/// Instantaneous FPS below which quality is reduced immediately.
pub const DEGRADE_FPS: f32 = 20.0;
/// Smoothed FPS above which quality is slowly restored.
pub const UPGRADE_FPS: f32 = 59.0;
pub const DEGRADE_STEP: f32 = 0.1;
pub const UPGRADE_STEP: f32 = 0.01;
/// Weight of the previous estimate in the exponential moving average.
pub const FPS_SMOOTHING: f32 = 0.95;
/// Value the moving average is reset to after an upgrade.
pub const NEUTRAL_FPS: f32 = 30.0;

/// Shade applied over east/west facing walls (alpha of a black overlay).
pub const SIDE_SHADE: f32 = 0.25;
/// Billboards are never taller than this many screen heights.
/// Ticks each animation frame of animated wall tiles is shown for.
pub const ANIMATION_TICKS: u32 = 30;
pub const MAX_BILLBOARD_SCREENS: u32 = 4;

/// Smallest side length accepted by the maze generator.
pub const MIN_MAZE_SIZE: u32 = 4;
/// Tile used for the floor of generated mazes.
pub const GEN_FLOOR: TileId = TileId(2860);
/// Tile used for the walls of generated mazes.
pub const GEN_WALL: TileId = TileId(6335);
/// Tileset identity of generated mazes.
pub const GEN_TILESET_ID: u32 = 3;

/// Sprite sheet used by the goal marker when no caller appearance is available.
pub const DEFAULT_GOAL_SHEET: &str = "Actor1";

/// Analog stick dead zone for turning.
pub const TURN_AXIS_DEADZONE: f32 = 0.5;

pub const CEILING_COLOR: u32 = 0xFF20_2028;
pub const FLOOR_COLOR: u32 = 0xFF40_3830;
/// Wall color used when a tile sheet is missing.
pub const FALLBACK_WALL_COLOR: u32 = 0xFF80_8080;

/// Centre of the compass dial, in frame pixels.
pub const COMPASS_CENTER: Vec2 = Vec2::new(40.0, 40.0);
pub const COMPASS_RADIUS: f32 = 25.0;
pub const COMPASS_FACE_COLOR: u32 = 0xFF00_8000;
/// Half of the needle that points at the target.
pub const COMPASS_POINTER_COLOR: u32 = 0xFFFF_0000;
pub const COMPASS_TAIL_COLOR: u32 = 0xFF00_0000;
