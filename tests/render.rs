use std::f32::consts::FRAC_PI_2;

use glam::{IVec2, UVec2};
use mazecast::constants::{ANIMATION_TICKS, COMPASS_FACE_COLOR, COMPASS_POINTER_COLOR, COMPASS_TAIL_COLOR};
use mazecast::map::direction::Direction;
use mazecast::map::grid::GridMap;
use mazecast::systems::render::column_count;
use mazecast::systems::{ActorSet, Palette, Raycaster, ViewParams, Viewpoint};
use mazecast::texture::frame::FrameBuffer;
use speculoos::prelude::*;

mod common;

use common::{feed, layout_map, test_assets, SPRITE_COLOR};

const FRAME: UVec2 = UVec2::new(64, 48);

fn corridor(blocked: bool) -> GridMap {
    let middle = if blocked { "#..#.......#" } else { "#..........#" };
    layout_map(&["############", middle, "############"])
}

fn render(map: &GridMap, actor_tile: IVec2, scale: f32) -> (FrameBuffer, Raycaster) {
    let viewpoint = Viewpoint::new(ViewParams::default(), IVec2::new(1, 1), Direction::Right);
    let mut actors = ActorSet::from_feeds(&[feed(1, actor_tile, "")]);
    actors.update(&viewpoint);

    let mut raycaster = Raycaster::new(map, test_assets(), Palette::default());
    let mut frame = FrameBuffer::new(FRAME);
    raycaster.render_frame(&mut frame, map, &viewpoint, actors.actors(), scale);
    (frame, raycaster)
}

fn sprite_pixels(frame: &FrameBuffer) -> usize {
    frame.pixels().iter().filter(|&&pixel| pixel == SPRITE_COLOR).count()
}

#[test]
fn test_visible_actor_is_drawn_across_zero_angle() {
    let map = corridor(false);
    let (frame, raycaster) = render(&map, IVec2::new(4, 1), 1.0);

    assert_that(&raycaster.z_buffer().len()).is_equal_to(64);
    assert_that(&sprite_pixels(&frame)).is_greater_than(0);
    // The billboard is centred on screen.
    assert_that(&frame.pixel(32, 24)).is_equal_to(Some(SPRITE_COLOR));
}

#[test]
fn test_wall_occludes_actor_behind_it() {
    let map = corridor(true);
    let (frame, raycaster) = render(&map, IVec2::new(4, 1), 1.0);

    assert_that(&sprite_pixels(&frame)).is_equal_to(0);
    let centre = raycaster.z_buffer()[32];
    assert_that(&(centre < 3.0)).is_true();
}

#[test]
fn test_actor_on_viewer_tile_is_skipped() {
    let map = corridor(false);
    let (frame, _) = render(&map, IVec2::new(1, 1), 1.0);
    assert_that(&sprite_pixels(&frame)).is_equal_to(0);
}

#[test]
fn test_ceiling_and_floor_fill_around_far_wall() {
    let map = corridor(false);
    let (frame, _) = render(&map, IVec2::new(1, 1), 1.0);
    let palette = Palette::default();

    assert_that(&frame.pixel(32, 0)).is_equal_to(Some(palette.ceiling));
    assert_that(&frame.pixel(32, 47)).is_equal_to(Some(palette.floor));
    // The far wall has no sheet, so the fallback colour shows at the horizon.
    let horizon = frame.pixel(32, 24).unwrap();
    assert_that(&(horizon == palette.fallback_wall || horizon == mazecast::texture::frame::shade(palette.fallback_wall, 0.25)))
        .is_true();
}

#[test]
fn test_coarser_scale_casts_fewer_columns() {
    let map = corridor(false);
    let (frame, raycaster) = render(&map, IVec2::new(4, 1), 2.0);

    assert_that(&raycaster.z_buffer().len()).is_equal_to(column_count(FRAME, 2.0));
    assert_that(&raycaster.z_buffer().len()).is_equal_to(32);
    assert_that(&sprite_pixels(&frame)).is_greater_than(0);
}

#[test]
fn test_column_count() {
    assert_that(&column_count(UVec2::new(816, 624), 1.0)).is_equal_to(816);
    assert_that(&column_count(UVec2::new(816, 624), 4.0)).is_equal_to(204);
    assert_that(&column_count(UVec2::new(10, 10), 3.0)).is_equal_to(4);
    // Scales below one are clamped.
    assert_that(&column_count(UVec2::new(10, 10), 0.5)).is_equal_to(10);
}

/// Screen columns holding at least one sprite pixel.
fn sprite_columns(frame: &FrameBuffer) -> Vec<u32> {
    (0..frame.width())
        .filter(|&x| (0..frame.height()).any(|y| frame.pixel(x, y) == Some(SPRITE_COLOR)))
        .collect()
}

#[test]
fn test_wall_edge_clips_part_of_billboard() {
    // The corner of the wall at (3, 2) lies on the line from the viewer to the actor.
    let open = layout_map(&["############", "#..........#", "#..........#", "############"]);
    let clipped = layout_map(&["############", "#..........#", "#..#.......#", "############"]);
    let actor = IVec2::new(6, 2);
    let distance = 26f32.sqrt();

    let (full, _) = render(&open, actor, 1.0);
    let (frame, raycaster) = render(&clipped, actor, 1.0);
    let full_columns = sprite_columns(&full);
    let drawn = sprite_columns(&frame);

    assert_that(&drawn.is_empty()).is_false();
    assert_that(&drawn.len()).is_less_than(full_columns.len());
    for &column in &drawn {
        assert_that(&raycaster.z_buffer()[column as usize]).is_greater_than(distance);
    }
    for column in full_columns.iter().filter(|column| !drawn.contains(column)) {
        assert_that(&raycaster.z_buffer()[*column as usize]).is_less_than(distance);
    }
}

#[test]
fn test_compass_dial_follows_heading() {
    let map = corridor(false);
    let raycaster = Raycaster::new(&map, test_assets(), Palette::default());

    let mut frame = FrameBuffer::new(UVec2::new(100, 100));
    raycaster.draw_compass(&mut frame, 0.0);
    assert_that(&frame.pixel(40, 30)).is_equal_to(Some(COMPASS_POINTER_COLOR));
    assert_that(&frame.pixel(40, 50)).is_equal_to(Some(COMPASS_TAIL_COLOR));
    assert_that(&frame.pixel(55, 40)).is_equal_to(Some(COMPASS_FACE_COLOR));
    assert_that(&frame.pixel(66, 40)).is_equal_to(Some(0));

    // A quarter turn clockwise swings the needle to the right.
    let mut frame = FrameBuffer::new(UVec2::new(100, 100));
    raycaster.draw_compass(&mut frame, FRAC_PI_2);
    assert_that(&frame.pixel(50, 40)).is_equal_to(Some(COMPASS_POINTER_COLOR));
    assert_that(&frame.pixel(30, 40)).is_equal_to(Some(COMPASS_TAIL_COLOR));
    assert_that(&frame.pixel(40, 30)).is_equal_to(Some(COMPASS_FACE_COLOR));
}

#[test]
fn test_animation_frame_advances_with_ticks() {
    let map = corridor(false);
    let mut raycaster = Raycaster::new(&map, test_assets(), Palette::default());
    assert_that(&raycaster.animation_frame()).is_equal_to(0);

    for _ in 0..ANIMATION_TICKS - 1 {
        raycaster.tick();
    }
    assert_that(&raycaster.animation_frame()).is_equal_to(0);
    raycaster.tick();
    assert_that(&raycaster.animation_frame()).is_equal_to(1);

    for _ in 0..ANIMATION_TICKS * 2 {
        raycaster.tick();
    }
    assert_that(&raycaster.animation_frame()).is_equal_to(3);
}
