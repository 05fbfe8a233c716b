use glam::{IVec2, Vec2};
use mazecast::error::ParseError;
use mazecast::map::direction::Direction;
use mazecast::systems::{Actor, ActorPose, ActorRole, ActorSet, NoteTags, ViewParams, Viewpoint};
use speculoos::prelude::*;

mod common;

use common::feed;

#[test]
fn test_note_tags() {
    let cases = [
        ("", ActorRole::Plain),
        ("a chest", ActorRole::Plain),
        ("<goal>", ActorRole::Goal),
        ("exit <goal> here", ActorRole::Goal),
        ("<fake:2.5>", ActorRole::Decoy { strength: 2.5 }),
        ("lure <fake: 4 > nearby", ActorRole::Decoy { strength: 4.0 }),
        // The goal marker wins regardless of order or a broken decoy marker.
        ("<fake:3><goal>", ActorRole::Goal),
        ("<fake:abc> <goal>", ActorRole::Goal),
    ];

    for (note, expected) in cases {
        assert_that(&NoteTags::parse(note)).is_equal_to(Ok(expected));
    }
}

#[test]
fn test_malformed_decoy_strength() {
    assert_that(&NoteTags::parse("<fake:abc>")).is_equal_to(Err(ParseError::InvalidStrength("abc".to_string())));
    assert_that(&NoteTags::parse("<fake:0>")).is_equal_to(Err(ParseError::InvalidStrength("0".to_string())));
    assert_that(&NoteTags::parse("<fake:-2>")).is_equal_to(Err(ParseError::InvalidStrength("-2".to_string())));
    assert_that(&NoteTags::parse("<fake:inf>").is_err()).is_true();
    assert_that(&NoteTags::parse("<fake:3").is_err()).is_true();
}

#[test]
fn test_role_strength() {
    assert_that(&ActorRole::Plain.strength()).is_none();
    assert_that(&ActorRole::Goal.strength()).is_equal_to(Some(1.0));
    assert_that(&ActorRole::Decoy { strength: 0.5 }.strength()).is_equal_to(Some(0.5));
}

#[test]
fn test_malformed_note_ingests_as_plain() {
    let actor = Actor::from_feed(&feed(3, IVec2::new(1, 1), "<fake:lots>"));
    assert_that(&actor.role).is_equal_to(ActorRole::Plain);
    assert_that(&actor.id).is_equal_to(3);
}

#[test]
fn test_update_projects_relative_to_viewpoint() {
    let viewpoint = Viewpoint::new(ViewParams::default(), IVec2::new(1, 1), Direction::Right);
    let mut actor = Actor::from_feed(&feed(1, IVec2::new(4, 1), ""));
    actor.update(&viewpoint);

    assert_that(&actor.position()).is_equal_to(Vec2::new(4.5, 1.5));
    assert_that(&(actor.distance() - 3.0).abs()).is_less_than(1e-5);
    assert_that(&actor.angle()).is_equal_to(0.0);
}

#[test]
fn test_view_row_follows_viewing_angle() {
    // (actor facing, viewer tile relative to the actor at (5, 5), expected row)
    let cases = [
        (Direction::Down, IVec2::new(5, 8), 0),
        (Direction::Down, IVec2::new(5, 2), 3),
        (Direction::Down, IVec2::new(2, 5), 2),
        (Direction::Down, IVec2::new(8, 5), 1),
        (Direction::Left, IVec2::new(2, 5), 0),
        (Direction::Left, IVec2::new(8, 5), 3),
        (Direction::Right, IVec2::new(8, 5), 0),
        (Direction::Up, IVec2::new(5, 2), 0),
        (Direction::Up, IVec2::new(5, 8), 3),
    ];

    for (facing, viewer, expected) in cases {
        let viewpoint = Viewpoint::new(ViewParams::default(), viewer, Direction::Right);
        let mut source = feed(1, IVec2::new(5, 5), "");
        source.facing = facing;
        let mut actor = Actor::from_feed(&source);
        actor.update(&viewpoint);
        assert_that(&actor.view_row()).is_equal_to(expected);
    }
}

#[test]
fn test_direction_fixed_keeps_row() {
    let viewpoint = Viewpoint::new(ViewParams::default(), IVec2::new(5, 2), Direction::Down);
    let mut source = feed(1, IVec2::new(5, 5), "");
    source.direction_fixed = true;
    source.facing = Direction::Left;
    let mut actor = Actor::from_feed(&source);
    actor.update(&viewpoint);
    assert_that(&actor.view_row()).is_equal_to(Direction::Left.sprite_row());
}

#[test]
fn test_actor_set_sorts_far_to_near() {
    let viewpoint = Viewpoint::new(ViewParams::default(), IVec2::ZERO, Direction::Right);
    let feeds = [
        feed(1, IVec2::new(2, 0), ""),
        feed(2, IVec2::new(6, 0), ""),
        feed(3, IVec2::new(4, 0), ""),
    ];
    let mut actors = ActorSet::from_feeds(&feeds);
    actors.update(&viewpoint);

    let ids: Vec<u32> = actors.actors().iter().map(|actor| actor.id).collect();
    assert_that(&ids).is_equal_to(vec![2, 3, 1]);
}

#[test]
fn test_apply_pose_moves_actor() {
    let viewpoint = Viewpoint::new(ViewParams::default(), IVec2::ZERO, Direction::Right);
    let mut actors = ActorSet::from_feeds(&[feed(9, IVec2::new(2, 0), "")]);

    let pose = ActorPose {
        real: Vec2::new(2.5, 0.0),
        tile: IVec2::new(3, 0),
        facing: Direction::Left,
        pattern: Some(2),
    };
    assert_that(&actors.apply_pose(9, pose)).is_true();
    assert_that(&actors.apply_pose(10, pose)).is_false();

    actors.update(&viewpoint);
    let actor = actors.get(9).unwrap();
    assert_that(&actor.tile).is_equal_to(IVec2::new(3, 0));
    assert_that(&actor.position()).is_equal_to(Vec2::new(3.0, 0.5));
    assert_that(&actor.sprite.pattern).is_equal_to(2);
}
