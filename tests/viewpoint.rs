use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use glam::{IVec2, Vec2};
use mazecast::map::direction::Direction;
use mazecast::map::grid::Passability;
use mazecast::systems::raycast::cast_ray;
use mazecast::systems::{ViewParams, Viewpoint};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use speculoos::prelude::*;

mod common;

use common::layout_map;

const EPSILON: f32 = 1e-5;

#[test]
fn test_new_viewpoint_sits_at_tile_centre() {
    let viewpoint = Viewpoint::new(ViewParams::default(), IVec2::new(2, 3), Direction::Left);
    assert_that(&viewpoint.position()).is_equal_to(Vec2::new(2.5, 3.5));
    assert_that(&viewpoint.tile()).is_equal_to(IVec2::new(2, 3));
    assert_that(&viewpoint.facing()).is_equal_to(PI);
    assert_that(&viewpoint.direction()).is_equal_to(Direction::Left);
}

#[test]
fn test_rotation_wraps_into_range() {
    let mut viewpoint = Viewpoint::new(ViewParams::default(), IVec2::ZERO, Direction::Right);
    viewpoint.rotate_left();
    assert_that(&(viewpoint.facing() >= 0.0 && viewpoint.facing() < TAU)).is_true();
    assert_that(&((viewpoint.facing() - (TAU - PI / 64.0)).abs() < EPSILON)).is_true();

    viewpoint.rotate_right();
    assert_that(&(viewpoint.facing() < EPSILON || viewpoint.facing() > TAU - EPSILON)).is_true();

    for _ in 0..500 {
        viewpoint.rotate_right();
        assert_that(&(viewpoint.facing() >= 0.0 && viewpoint.facing() < TAU)).is_true();
    }
}

#[test]
fn test_direction_quantization() {
    let cases = [
        (0.0, Direction::Right),
        (FRAC_PI_4, Direction::Right),
        (FRAC_PI_4 + 0.01, Direction::Down),
        (FRAC_PI_2, Direction::Down),
        (3.0 * FRAC_PI_4, Direction::Left),
        (PI, Direction::Left),
        (5.0 * FRAC_PI_4, Direction::Left),
        (5.0 * FRAC_PI_4 + 0.01, Direction::Up),
        (7.0 * FRAC_PI_4, Direction::Up),
        (7.0 * FRAC_PI_4 + 0.01, Direction::Right),
        (-FRAC_PI_2, Direction::Up),
    ];

    for (angle, expected) in cases {
        assert_that(&Direction::from_angle(angle)).is_equal_to(expected);
    }
}

#[test]
fn test_field_of_view_matches_bounds() {
    let viewpoint = Viewpoint::new(ViewParams::default(), IVec2::ZERO, Direction::Down);
    let (low, high) = viewpoint.view_bounds();
    assert_that(&((high - low) - viewpoint.field_of_view()).abs()).is_less_than(EPSILON);

    // Facing right, the view straddles zero and the upper bound is lifted past 2π.
    let viewpoint = Viewpoint::new(ViewParams::default(), IVec2::ZERO, Direction::Right);
    let (low, high) = viewpoint.view_bounds();
    assert_that(&(high > TAU)).is_true();
    assert_that(&((high - low) - viewpoint.field_of_view()).abs()).is_less_than(EPSILON);
}

#[test]
fn test_teleport_resets_position_and_facing() {
    let map = layout_map(&["....", "...."]);
    let mut viewpoint = Viewpoint::new(ViewParams::default(), IVec2::ZERO, Direction::Right);
    viewpoint.move_forward(&map);
    viewpoint.rotate_left();

    viewpoint.teleport(IVec2::new(3, 1), Direction::Up);
    assert_that(&viewpoint.position()).is_equal_to(Vec2::new(3.5, 1.5));
    assert_that(&viewpoint.tile()).is_equal_to(IVec2::new(3, 1));
    assert_that(&viewpoint.direction()).is_equal_to(Direction::Up);
}

#[test]
fn test_movement_blocked_by_walls() {
    let map = layout_map(&["..#"]);
    let mut viewpoint = Viewpoint::new(ViewParams::default(), IVec2::ZERO, Direction::Right);

    let mut moves = 0;
    while viewpoint.move_forward(&map) {
        moves += 1;
        assert_that(&moves).is_less_than(100);
    }
    assert_that(&viewpoint.tile()).is_equal_to(IVec2::new(1, 0));
    assert_that(&(viewpoint.position().x < 2.0)).is_true();

    // Strafing runs into the top boundary within half a tile.
    let mut strafes = 0;
    while viewpoint.strafe_left(&map) {
        strafes += 1;
        assert_that(&strafes).is_less_than(20);
    }
    assert_that(&viewpoint.tile()).is_equal_to(IVec2::new(1, 0));
    assert_that(&viewpoint.move_backward(&map)).is_true();
}

#[test]
fn test_movement_containment() {
    let map = layout_map(&["#....#", "..##..", ".#..#.", "......"]);
    let mut rng = SmallRng::seed_from_u64(11);
    let mut viewpoint = Viewpoint::new(ViewParams::default(), IVec2::new(1, 0), Direction::Down);

    for _ in 0..5000 {
        match rng.random_range(0..6) {
            0 => viewpoint.move_forward(&map),
            1 => viewpoint.move_backward(&map),
            2 => viewpoint.strafe_left(&map),
            3 => viewpoint.strafe_right(&map),
            4 => {
                viewpoint.rotate_left();
                true
            }
            _ => {
                viewpoint.rotate_right();
                true
            }
        };

        let tile = viewpoint.tile();
        assert_that(&map.contains(tile)).is_true();
        assert_that(&map.passable(tile)).is_true();
        assert_that(&(viewpoint.position().floor().as_ivec2())).is_equal_to(tile);
    }
}

#[test]
fn test_movement_and_rays_share_passability() {
    let map = layout_map(&["#..#.", "..#..", ".#...", "...#."]);
    let size = map.size().as_ivec2();

    for y in 0..size.y {
        for x in 1..=size.x {
            let target = IVec2::new(x, y);
            let origin = target - IVec2::X;
            if !map.passable(origin) {
                continue;
            }

            let mut viewpoint = Viewpoint::new(ViewParams::default(), origin, Direction::Right);
            for _ in 0..11 {
                viewpoint.move_forward(&map);
            }
            let entered = viewpoint.tile() == target;

            viewpoint.teleport(origin, Direction::Right);
            let hit = cast_ray(&map, &viewpoint, 0.0);
            let stopped = hit.tile == target;

            assert_that(&entered).is_equal_to(map.passable(target));
            assert_that(&stopped).is_equal_to(!map.passable(target));
        }
    }
}
