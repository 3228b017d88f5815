use avian2d::prelude::*;
use bevy::prelude::*;

use super::{ArenaBounds, LevelError, LevelGrid, TILE_SIZE};
use crate::common::test_utils::run_system_once;

#[test]
fn parse_rejects_empty_grid() {
    assert_eq!(LevelGrid::parse("").unwrap_err(), LevelError::Empty);
}

#[test]
fn parse_rejects_ragged_rows() {
    let err = LevelGrid::parse("111\n11").unwrap_err();
    assert_eq!(
        err,
        LevelError::Ragged {
            row: 1,
            got: 2,
            expected: 3
        }
    );
}

#[test]
fn parse_counts_solid_tiles() {
    let grid = LevelGrid::parse("010\n111").unwrap();
    assert_eq!(grid.cols(), 3);
    assert_eq!(grid.rows(), 2);
    assert_eq!(grid.solid_tiles().count(), 4);
}

#[test]
fn bounds_cover_grid() {
    let grid = LevelGrid::parse("000\n111").unwrap();
    let bounds = grid.bounds();
    assert!(bounds.min_x < bounds.max_x);
    assert!(bounds.top_y > bounds.floor_y);
    assert_eq!(bounds.floor_y, -TILE_SIZE);
}

#[test]
fn solid_tiles_center_on_origin() {
    let grid = LevelGrid::parse("1").unwrap();
    let tiles: Vec<Vec2> = grid.solid_tiles().collect();
    assert_eq!(tiles, vec![Vec2::ZERO]);
}

#[test]
fn spawn_tiles_spawns_static_colliders() {
    let mut world = World::new();
    world.insert_resource(LevelGrid::parse("101\n111").unwrap());

    run_system_once(&mut world, super::spawn_tiles);

    let tiles = world
        .query::<(&Name, &RigidBody)>()
        .iter(&world)
        .filter(|(n, rb)| n.as_str() == "Tile" && matches!(**rb, RigidBody::Static))
        .count();
    assert_eq!(tiles, 5);
}

#[test]
fn default_level_parses_and_has_floor() {
    let grid = LevelGrid::parse(super::DEFAULT_LEVEL).unwrap();
    let bounds = grid.bounds();
    assert!(grid.solid_tiles().any(|p| p.y == bounds.floor_y + TILE_SIZE * 0.5));
}

#[test]
fn plugin_publishes_grid_and_bounds() {
    let mut app = App::new();
    super::plugin(&mut app);
    assert!(app.world().get_resource::<LevelGrid>().is_some());
    assert!(app.world().get_resource::<ArenaBounds>().is_some());
}
