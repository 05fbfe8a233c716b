use std::f32::consts::FRAC_PI_2;

use glam::{IVec2, Vec2};
use mazecast::map::direction::Direction;
use mazecast::systems::raycast::{cast_ray, ray_angle, texture_column, MIN_RAY_DISTANCE};
use mazecast::systems::{ViewParams, Viewpoint, WallSide};
use speculoos::prelude::*;

mod common;

use common::layout_map;

const EPSILON: f32 = 1e-4;

#[test]
fn test_east_ray_hits_corridor_end() {
    let map = layout_map(&[".....#"]);
    let mut viewpoint = Viewpoint::new(ViewParams::default(), IVec2::ZERO, Direction::Right);
    viewpoint.place(Vec2::new(0.0, 0.5), 0.0);

    let hit = cast_ray(&map, &viewpoint, 0.0);
    assert_that(&(hit.distance - 5.0).abs()).is_less_than(EPSILON);
    assert_that(&hit.side).is_equal_to(WallSide::EastWest);
    assert_that(&hit.tile).is_equal_to(IVec2::new(5, 0));
}

#[test]
fn test_south_ray_hits_north_south_face() {
    let map = layout_map(&[".", ".", ".", ".", ".", "#"]);
    let mut viewpoint = Viewpoint::new(ViewParams::default(), IVec2::ZERO, Direction::Down);
    viewpoint.place(Vec2::new(0.5, 0.0), FRAC_PI_2);

    let hit = cast_ray(&map, &viewpoint, 0.0);
    assert_that(&(hit.distance - 5.0).abs()).is_less_than(EPSILON);
    assert_that(&hit.side).is_equal_to(WallSide::NorthSouth);
    assert_that(&hit.tile).is_equal_to(IVec2::new(0, 5));
}

#[test]
fn test_ray_leaving_the_map_stops_at_the_edge() {
    let map = layout_map(&["...."]);
    let viewpoint = Viewpoint::new(ViewParams::default(), IVec2::new(1, 0), Direction::Left);

    let hit = cast_ray(&map, &viewpoint, 0.0);
    assert_that(&hit.tile).is_equal_to(IVec2::new(-1, 0));
    assert_that(&(hit.distance - 1.5).abs()).is_less_than(EPSILON);
}

#[test]
fn test_ray_inside_wall_is_floored() {
    let map = layout_map(&["#"]);
    let mut viewpoint = Viewpoint::new(ViewParams::default(), IVec2::ZERO, Direction::Right);
    viewpoint.place(Vec2::new(0.0, 0.5), 0.0);

    let hit = cast_ray(&map, &viewpoint, 0.0);
    assert_that(&hit.distance).is_equal_to(MIN_RAY_DISTANCE);
    assert_that(&hit.distance.is_finite()).is_true();
}

#[test]
fn test_rays_spread_across_camera_plane() {
    let viewpoint = Viewpoint::new(ViewParams::default(), IVec2::ZERO, Direction::Down);
    let width = viewpoint.params().camera_width;

    let left = ray_angle(&viewpoint, -width);
    let right = ray_angle(&viewpoint, width);
    assert_that(&((right - left) - viewpoint.field_of_view()).abs()).is_less_than(EPSILON);
    assert_that(&(ray_angle(&viewpoint, 0.0) - FRAC_PI_2).abs()).is_less_than(EPSILON);
}

#[test]
fn test_diagonal_ray_stays_finite() {
    let map = layout_map(&["#####", "#...#", "#...#", "#...#", "#####"]);
    let viewpoint = Viewpoint::new(ViewParams::default(), IVec2::new(2, 2), Direction::Right);

    for i in 0..=32 {
        let camera_x = -3.0 + i as f32 * 6.0 / 32.0;
        let hit = cast_ray(&map, &viewpoint, camera_x);
        assert_that(&hit.distance.is_finite()).is_true();
        assert_that(&(hit.distance >= MIN_RAY_DISTANCE)).is_true();
        assert_that(&(hit.distance < 3.0)).is_true();
    }
}

#[test]
fn test_texture_column_in_range() {
    let map = layout_map(&["#####", "#...#", "#####"]);
    let viewpoint = Viewpoint::new(ViewParams::default(), IVec2::new(2, 1), Direction::Right);

    for i in 0..=16 {
        let camera_x = -3.0 + i as f32 * 6.0 / 16.0;
        let hit = cast_ray(&map, &viewpoint, camera_x);
        assert_that(&texture_column(&hit, &viewpoint, 48)).is_less_than(48);
    }
}
