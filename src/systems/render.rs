//! Frame rasterization: wall columns, then depth-tested actor billboards.

use std::f32::consts::{FRAC_PI_2, TAU};
use std::sync::Arc;

use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Res, ResMut};
use glam::{IVec2, UVec2, Vec2};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::constants::{
    ANIMATION_TICKS, CEILING_COLOR, COMPASS_CENTER, COMPASS_FACE_COLOR, COMPASS_POINTER_COLOR, COMPASS_RADIUS, COMPASS_TAIL_COLOR,
    FALLBACK_WALL_COLOR, FLOOR_COLOR, MAX_BILLBOARD_SCREENS, SIDE_SHADE,
};
use crate::map::grid::GridMap;
use crate::systems::actor::{Actor, ActorSet};
use crate::systems::compass::Compass;
use crate::systems::quality::QualityController;
use crate::systems::raycast::{cast_ray, texture_column, WallSide};
use crate::systems::viewpoint::Viewpoint;
use crate::texture::frame::{shade, ColumnBlit, FrameBuffer};
use crate::texture::tiles::{self, TileSource};
use crate::texture::MazeAssets;

/// Flat colours used where no texture applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub ceiling: u32,
    pub floor: u32,
    /// Wall colour for tiles whose sheet was not supplied.
    pub fallback_wall: u32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            ceiling: CEILING_COLOR,
            floor: FLOOR_COLOR,
            fallback_wall: FALLBACK_WALL_COLOR,
        }
    }
}

/// Renderer state of a session: per-tile wall sources resolved once, the depth buffer of the
/// last frame and the tick count driving animated walls.
#[derive(Resource, Debug, Clone)]
pub struct Raycaster {
    assets: Arc<MazeAssets>,
    palette: Palette,
    map_width: u32,
    sources: Vec<TileSource>,
    z_buffer: Vec<f32>,
    ticks: u32,
}

impl Raycaster {
    pub fn new(map: &GridMap, assets: Arc<MazeAssets>, palette: Palette) -> Self {
        let sources = tiles::resolve(map, assets.tile_size());
        Self {
            assets,
            palette,
            map_width: map.size().x,
            sources,
            z_buffer: Vec::new(),
            ticks: 0,
        }
    }

    /// Hit distance of every rendered column of the last frame.
    pub fn z_buffer(&self) -> &[f32] {
        &self.z_buffer
    }

    /// Advances animated walls by one tick.
    pub fn tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
    }

    pub fn animation_frame(&self) -> u32 {
        self.ticks / ANIMATION_TICKS
    }

    /// Renders one frame, casting a ray for every `scale`-th screen column.
    pub fn render_frame(
        &mut self,
        frame: &mut FrameBuffer,
        map: &GridMap,
        viewpoint: &Viewpoint,
        actors: &[Actor],
        scale: f32,
    ) {
        let scale = scale.max(1.0);
        let half = frame.height() / 2;
        frame.fill_rows(0, half, self.palette.ceiling);
        frame.fill_rows(half, frame.height(), self.palette.floor);

        self.draw_walls(frame, map, viewpoint, scale);
        for actor in actors {
            self.draw_billboard(frame, viewpoint, actor, scale);
        }
    }

    /// Draws the compass dial in the top-left corner. A heading of zero points straight up.
    pub fn draw_compass(&self, frame: &mut FrameBuffer, heading: f32) {
        frame.fill_circle(COMPASS_CENTER, COMPASS_RADIUS, COMPASS_FACE_COLOR);

        let base = Vec2::from_angle(heading) * (COMPASS_RADIUS * 0.1);
        let needle = |angle: f32| COMPASS_CENTER + Vec2::from_angle(angle) * (COMPASS_RADIUS * 0.75);
        let (left, right) = (COMPASS_CENTER - base, COMPASS_CENTER + base);

        frame.fill_triangle([needle(heading - FRAC_PI_2), left, right], COMPASS_POINTER_COLOR);
        frame.fill_triangle([needle(heading + FRAC_PI_2), left, right], COMPASS_TAIL_COLOR);
    }

    fn draw_walls(&mut self, frame: &mut FrameBuffer, map: &GridMap, viewpoint: &Viewpoint, scale: f32) {
        let (width, height) = (frame.width() as f32, frame.height() as f32);
        let camera_width = viewpoint.params().camera_width;
        let block = viewpoint.params().block_width;
        let tile_size = self.assets.tile_size();
        let columns = column_count(frame.size(), scale);
        let animation_frame = self.animation_frame();

        self.z_buffer.clear();
        self.z_buffer.reserve(columns);

        for i in 0..columns {
            let camera_x = i as f32 * scale * 2.0 * camera_width / width - camera_width;
            let hit = cast_ray(map, viewpoint, camera_x);
            self.z_buffer.push(hit.distance);

            let wall_height = (height * block / hit.distance).floor().min(u32::MAX as f32 / 2.0) as u32;
            let dst_y = ((height - wall_height as f32) / 2.0).floor() as i32;
            let dst_x = (i as f32 * scale).floor() as i32;
            let dst_w = scale.ceil() as u32;
            let shade_amount = (hit.side == WallSide::EastWest).then_some(SIDE_SHADE);

            let texture = self
                .source(map, hit.tile)
                .and_then(|source| self.assets.tile_sheet(source.sheet).map(|sheet| (source, sheet)));

            match texture {
                Some((source, sheet)) => {
                    let column = texture_column(&hit, viewpoint, tile_size.x);
                    let origin = source.origin_at(animation_frame, tile_size);
                    frame.blit_column(
                        sheet,
                        ColumnBlit {
                            src_x: origin.x + column,
                            src_y: origin.y,
                            src_h: tile_size.y,
                            dst_x,
                            dst_w,
                            dst_y,
                            dst_h: wall_height,
                        },
                        shade_amount,
                    );
                }
                None => {
                    let color = shade_amount.map_or(self.palette.fallback_wall, |amount| {
                        shade(self.palette.fallback_wall, amount)
                    });
                    frame.fill_rect(dst_x, dst_y, dst_w, wall_height, color);
                }
            }
        }
    }

    fn source(&self, map: &GridMap, tile: IVec2) -> Option<TileSource> {
        if !map.contains(tile) {
            return None;
        }
        self.sources.get((tile.y as u32 * self.map_width + tile.x as u32) as usize).copied()
    }

    fn draw_billboard(&self, frame: &mut FrameBuffer, viewpoint: &Viewpoint, actor: &Actor, scale: f32) {
        let distance = actor.distance();
        if distance <= 0.0 {
            trace!(id = actor.id, "Skipping billboard at the viewpoint");
            return;
        }
        let Some(sheet) = self.assets.sprite_sheet(&actor.sprite.sheet) else {
            trace!(id = actor.id, sheet = actor.sprite.sheet.as_str(), "Skipping billboard without a sprite sheet");
            return;
        };

        let (width, height) = (frame.width() as f32, frame.height() as f32);
        let (low, high) = viewpoint.view_bounds();
        let mut sprite_angle = actor.angle() - low;
        // The view straddles the zero angle and the actor sits past it.
        if sprite_angle < 0.0 && high > TAU {
            sprite_angle += TAU;
        }
        let sprite_x = width * sprite_angle / (high - low);

        let frame_size = sheet.frame_size();
        let tile_height = self.assets.tile_size().y as f32;
        let block = viewpoint.params().block_width;
        let sprite_height = (height * frame_size.y as f32 / tile_height * block / distance)
            .floor()
            .min(height * MAX_BILLBOARD_SCREENS as f32);
        let sprite_width = (sprite_height * frame_size.x as f32 / frame_size.y as f32).floor();
        if sprite_width < 1.0 || sprite_height < 1.0 {
            return;
        }
        if sprite_x + sprite_width / 2.0 < 0.0 || sprite_x - sprite_width / 2.0 >= width {
            return;
        }

        let origin = sheet.frame_origin(actor.sprite.index, actor.sprite.pattern, actor.view_row() as u32);
        let dst_y = ((height - sprite_height) / 2.0).floor() as i32;
        let dst_w = scale.ceil() as u32;
        let texel_width = frame_size.x as f32 / sprite_width;

        let mut i = 0.0;
        while i < sprite_width {
            let x = sprite_x + i - sprite_width / 2.0;
            let column = (x / scale).floor();
            let occluded = column < 0.0
                || self
                    .z_buffer
                    .get(column as usize)
                    .is_none_or(|&wall_distance| distance >= wall_distance);

            if !occluded {
                let texel = ((i * texel_width) as u32).min(frame_size.x - 1);
                frame.blit_column_keyed(
                    sheet.texture(),
                    ColumnBlit {
                        src_x: origin.x + texel,
                        src_y: origin.y,
                        src_h: frame_size.y,
                        dst_x: x.floor() as i32,
                        dst_w,
                        dst_y,
                        dst_h: sprite_height as u32,
                    },
                );
            }
            i += scale;
        }
    }
}

/// Renders the session frame from the current map, viewpoint, actors and quality scale.
pub fn render_system(
    mut raycaster: ResMut<Raycaster>,
    mut frame: ResMut<FrameBuffer>,
    map: Res<GridMap>,
    viewpoint: Res<Viewpoint>,
    actors: Res<ActorSet>,
    quality: Res<QualityController>,
    compass: Res<Compass>,
) {
    raycaster.tick();
    raycaster.render_frame(&mut frame, &map, &viewpoint, actors.actors(), quality.scale());
    raycaster.draw_compass(&mut frame, compass.heading);
}

/// Number of columns a frame of `size` casts at column scale `scale`.
pub fn column_count(size: UVec2, scale: f32) -> usize {
    (size.x as f32 / scale.max(1.0)).ceil() as usize
}
