//! Arena plugin: level grid parsing and static terrain.
//!
//! The level is a text grid of single characters, one row per line:
//! `'0'` is empty, anything else is a solid 32x32 tile. The grid also
//! defines the spawn bounds published as [`ArenaBounds`], which the hazard
//! spawner and out-of-bounds cleanup read.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use thiserror::Error;

use crate::common::{layers::Layer, state::GameState};

pub const TILE_SIZE: f32 = 32.0;

const DEFAULT_LEVEL: &str = "\
1000000000000000000000001
1000000000000000000000001
1000000000000000000000001
1000000000000000000000001
1000000000000000000000001
1000000000111110000000001
1000000000000000000000001
1000000000000000000000001
1000111111000001111110001
1000000000000000000000001
1000000000000000000000001
1000000000000000000000001
1111111111111111111111111
1111111111111111111111111";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("level grid is empty")]
    Empty,
    #[error("level row {row} has width {got}, expected {expected}")]
    Ragged {
        row: usize,
        got: usize,
        expected: usize,
    },
}

/// Solid-tile mask parsed from a level text grid.
#[derive(Resource, Debug, Clone)]
pub struct LevelGrid {
    solid: Vec<Vec<bool>>,
}

impl LevelGrid {
    pub fn parse(text: &str) -> Result<Self, LevelError> {
        let solid: Vec<Vec<bool>> = text
            .lines()
            .map(|line| line.chars().map(|c| c != '0').collect())
            .collect();

        let Some(first) = solid.first() else {
            return Err(LevelError::Empty);
        };
        if first.is_empty() {
            return Err(LevelError::Empty);
        }

        let expected = first.len();
        for (row, cells) in solid.iter().enumerate() {
            if cells.len() != expected {
                return Err(LevelError::Ragged {
                    row,
                    got: cells.len(),
                    expected,
                });
            }
        }

        Ok(Self { solid })
    }

    pub fn cols(&self) -> usize {
        self.solid[0].len()
    }

    pub fn rows(&self) -> usize {
        self.solid.len()
    }

    /// World-space centers of all solid tiles, grid centered on the origin.
    pub fn solid_tiles(&self) -> impl Iterator<Item = Vec2> + '_ {
        let half_w = self.cols() as f32 * TILE_SIZE * 0.5;
        let half_h = self.rows() as f32 * TILE_SIZE * 0.5;

        self.solid.iter().enumerate().flat_map(move |(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, solid)| **solid)
                .map(move |(col, _)| {
                    Vec2::new(
                        (col as f32 + 0.5) * TILE_SIZE - half_w,
                        half_h - (row as f32 + 0.5) * TILE_SIZE,
                    )
                })
        })
    }

    pub fn bounds(&self) -> ArenaBounds {
        let half_w = self.cols() as f32 * TILE_SIZE * 0.5;
        let half_h = self.rows() as f32 * TILE_SIZE * 0.5;

        ArenaBounds {
            min_x: -half_w + TILE_SIZE,
            max_x: half_w - TILE_SIZE,
            top_y: half_h + TILE_SIZE,
            floor_y: -half_h,
        }
    }
}

/// Playable extents: min/max x for hazard placement and full-width queries,
/// the spawn line above the arena, and the lowest solid line.
#[derive(Resource, Debug, Clone, Copy)]
pub struct ArenaBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub top_y: f32,
    pub floor_y: f32,
}

pub fn plugin(app: &mut App) {
    let grid = LevelGrid::parse(DEFAULT_LEVEL).expect("built-in level grid must parse");
    app.insert_resource(grid.bounds());
    app.insert_resource(grid);
    app.add_systems(OnEnter(GameState::InGame), spawn_tiles);
}

fn spawn_tiles(mut commands: Commands, grid: Res<LevelGrid>) {
    let tile_layers = CollisionLayers::new(
        Layer::World,
        [Layer::Fighter, Layer::Shot, Layer::Hazard],
    );

    for pos in grid.solid_tiles() {
        commands.spawn((
            Name::new("Tile"),
            Sprite {
                color: Color::srgb(0.25, 0.27, 0.33),
                custom_size: Some(Vec2::splat(TILE_SIZE)),
                ..default()
            },
            Transform::from_translation(pos.extend(0.0)),
            RigidBody::Static,
            Collider::rectangle(TILE_SIZE, TILE_SIZE),
            tile_layers,
            Friction::ZERO,
            DespawnOnExit(GameState::InGame),
        ));
    }
}

#[cfg(test)]
mod tests;
