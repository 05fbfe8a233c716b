use std::f32::consts::{FRAC_PI_2, PI};

use glam::IVec2;
use mazecast::map::direction::Direction;
use mazecast::systems::{compass_heading, ActorSet, ViewParams, Viewpoint};
use speculoos::prelude::*;

mod common;

use common::feed;

const EPSILON: f32 = 1e-5;

fn projected(viewpoint: &Viewpoint, feeds: &[mazecast::systems::ActorFeed]) -> ActorSet {
    let mut actors = ActorSet::from_feeds(feeds);
    actors.update(viewpoint);
    actors
}

#[test]
fn test_single_goal_south_of_east_facing_viewer() {
    let viewpoint = Viewpoint::new(ViewParams::default(), IVec2::new(1, 1), Direction::Right);
    let actors = projected(&viewpoint, &[feed(1, IVec2::new(1, 4), "<goal>")]);

    let heading = compass_heading(&viewpoint, actors.actors()).unwrap();
    assert_that(&(heading - FRAC_PI_2).abs()).is_less_than(EPSILON);
}

#[test]
fn test_heading_is_relative_to_facing() {
    let viewpoint = Viewpoint::new(ViewParams::default(), IVec2::new(1, 1), Direction::Down);
    let actors = projected(&viewpoint, &[feed(1, IVec2::new(1, 4), "<goal>")]);

    let heading = compass_heading(&viewpoint, actors.actors()).unwrap();
    assert_that(&(heading.min(std::f32::consts::TAU - heading))).is_less_than(EPSILON);
}

#[test]
fn test_heading_is_deterministic() {
    let viewpoint = Viewpoint::new(ViewParams::default(), IVec2::new(3, 2), Direction::Up);
    let feeds = [
        feed(1, IVec2::new(7, 9), "<goal>"),
        feed(2, IVec2::new(0, 1), "<fake:2>"),
        feed(3, IVec2::new(5, 0), "<fake:0.25>"),
        feed(4, IVec2::new(2, 2), "a plain bystander"),
    ];
    let actors = projected(&viewpoint, &feeds);

    let first = compass_heading(&viewpoint, actors.actors()).unwrap();
    for _ in 0..100 {
        let again = compass_heading(&viewpoint, actors.actors()).unwrap();
        assert_that(&again.to_bits()).is_equal_to(first.to_bits());
    }
}

#[test]
fn test_strong_decoy_overrides_goal() {
    let viewpoint = Viewpoint::new(ViewParams::default(), IVec2::new(5, 5), Direction::Right);
    let feeds = [feed(1, IVec2::new(8, 5), "<goal>"), feed(2, IVec2::new(2, 5), "<fake:10>")];
    let actors = projected(&viewpoint, &feeds);

    let heading = compass_heading(&viewpoint, actors.actors()).unwrap();
    assert_that(&(heading - PI).abs()).is_less_than(EPSILON);
}

#[test]
fn test_closer_contributor_pulls_harder() {
    let viewpoint = Viewpoint::new(ViewParams::default(), IVec2::new(5, 5), Direction::Right);
    let feeds = [feed(1, IVec2::new(6, 5), "<goal>"), feed(2, IVec2::new(1, 5), "<fake:2>")];
    let actors = projected(&viewpoint, &feeds);

    let heading = compass_heading(&viewpoint, actors.actors()).unwrap();
    assert_that(&heading.min(std::f32::consts::TAU - heading)).is_less_than(EPSILON);
}

#[test]
fn test_degenerate_inputs_yield_no_heading() {
    let viewpoint = Viewpoint::new(ViewParams::default(), IVec2::new(2, 2), Direction::Right);

    // No contributors at all.
    let plain = projected(&viewpoint, &[feed(1, IVec2::new(4, 4), "")]);
    assert_that(&compass_heading(&viewpoint, plain.actors())).is_none();

    // A goal standing on the viewer contributes nothing.
    let on_top = projected(&viewpoint, &[feed(1, IVec2::new(2, 2), "<goal>")]);
    assert_that(&compass_heading(&viewpoint, on_top.actors())).is_none();

    // Equal pulls in opposite directions cancel out.
    let balanced = projected(
        &viewpoint,
        &[feed(1, IVec2::new(0, 2), "<goal>"), feed(2, IVec2::new(4, 2), "<goal>")],
    );
    assert_that(&compass_heading(&viewpoint, balanced.actors())).is_none();
}
