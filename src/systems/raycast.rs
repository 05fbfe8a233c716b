//! Grid DDA ray casting against the map's passability predicate.

use glam::{IVec2, Vec2};

use crate::map::grid::{GridMap, Passability};
use crate::systems::viewpoint::Viewpoint;

/// Smallest distance a ray reports, keeping wall heights finite.
pub const MIN_RAY_DISTANCE: f32 = 1e-4;

/// Which kind of grid line a ray crossed last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallSide {
    /// A vertical grid line: the ray hit the east or west face of a tile.
    EastWest,
    /// A horizontal grid line: the ray hit the north or south face of a tile.
    NorthSouth,
}

/// Where and how a ray hit the first impassable tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Euclidean distance from the viewpoint, in world units.
    pub distance: f32,
    pub side: WallSide,
    /// The tile that stopped the ray.
    pub tile: IVec2,
    /// Absolute angle of the ray.
    pub angle: f32,
}

/// Absolute angle of the ray through camera-plane offset `camera_x`.
pub fn ray_angle(viewpoint: &Viewpoint, camera_x: f32) -> f32 {
    viewpoint.facing() + camera_x.atan2(viewpoint.params().camera_distance)
}

/// Casts a ray through camera-plane offset `camera_x` until it reaches a tile the map does
/// not consider passable.
pub fn cast_ray(map: &GridMap, viewpoint: &Viewpoint, camera_x: f32) -> RayHit {
    let angle = ray_angle(viewpoint, camera_x);
    let direction = Vec2::from_angle(angle);
    let origin = viewpoint.grid_position();
    let mut tile = viewpoint.tile();

    // Axis-parallel rays never cross the other axis' grid lines.
    let delta = Vec2::new(
        if direction.x == 0.0 { f32::INFINITY } else { (1.0 / direction.x).abs() },
        if direction.y == 0.0 { f32::INFINITY } else { (1.0 / direction.y).abs() },
    );
    let step = IVec2::new(
        if direction.x < 0.0 { -1 } else { 1 },
        if direction.y < 0.0 { -1 } else { 1 },
    );
    let mut side_distance = Vec2::new(
        first_crossing(origin.x, tile.x, step.x, delta.x),
        first_crossing(origin.y, tile.y, step.y, delta.y),
    );

    // A ray leaves the map after at most one step per row and column.
    let max_steps = map.size().x + map.size().y + 2;
    let mut side = WallSide::NorthSouth;
    let mut steps = 0;
    while map.passable(tile) && steps < max_steps {
        if side_distance.x < side_distance.y {
            side_distance.x += delta.x;
            tile.x += step.x;
            side = WallSide::EastWest;
        } else {
            side_distance.y += delta.y;
            tile.y += step.y;
            side = WallSide::NorthSouth;
        }
        steps += 1;
    }

    let distance = match side {
        WallSide::EastWest => ((tile.x as f32 - origin.x + (1 - step.x) as f32 / 2.0) / direction.x).abs(),
        WallSide::NorthSouth => ((tile.y as f32 - origin.y + (1 - step.y) as f32 / 2.0) / direction.y).abs(),
    };
    let distance = distance * viewpoint.params().block_width;

    RayHit {
        distance: if distance.is_finite() { distance.max(MIN_RAY_DISTANCE) } else { MIN_RAY_DISTANCE },
        side,
        tile,
        angle,
    }
}

/// Distance along the ray to the first grid line crossed on one axis.
fn first_crossing(origin: f32, tile: i32, step: i32, delta: f32) -> f32 {
    if delta.is_infinite() {
        return f32::INFINITY;
    }
    if step < 0 {
        (origin - tile as f32) * delta
    } else {
        (tile as f32 + 1.0 - origin) * delta
    }
}

/// Texture column hit by the ray, mirrored so faces read the same from either side.
pub fn texture_column(hit: &RayHit, viewpoint: &Viewpoint, tile_width: u32) -> u32 {
    let block = viewpoint.params().block_width;
    let position = viewpoint.position();
    let along = match hit.side {
        WallSide::EastWest => position.y + hit.distance * hit.angle.sin(),
        WallSide::NorthSouth => position.x + hit.distance * hit.angle.cos(),
    } / block;

    let fraction = along - along.floor();
    let column = ((fraction * tile_width as f32) as u32).min(tile_width.saturating_sub(1));

    let mirrored = match hit.side {
        WallSide::EastWest => hit.angle.cos() > 0.0,
        WallSide::NorthSouth => hit.angle.sin() < 0.0,
    };
    if mirrored {
        tile_width.saturating_sub(column + 1)
    } else {
        column
    }
}
