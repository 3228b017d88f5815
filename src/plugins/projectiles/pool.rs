use avian2d::prelude::*;
use bevy::prelude::*;

use super::components::{PooledShot, Shot, ShotState};
use crate::common::layers::Layer;

#[derive(Resource, Debug)]
pub struct ShotPool {
    free: Vec<Entity>,
    capacity: usize,
}

impl ShotPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn pop_free(&mut self) -> Option<Entity> {
        self.free.pop()
    }

    pub fn push_free(&mut self, e: Entity) {
        self.free.push(e);
    }

    pub fn free_len(&self) -> usize {
        self.free.len()
    }
}

#[inline]
pub fn active_shot_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Shot, [Layer::World, Layer::Fighter])
}

/// "Disabled" without structural changes: empty filters means we collide
/// with nothing and generate no collision messages.
#[inline]
pub fn inactive_shot_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Shot, [] as [Layer; 0])
}

/// Pre-spawn pooled shots (inactive).
///
/// Shots are kinematic sensors: they travel in a fixed direction and fire
/// collision messages without any physical response, so a shot passes
/// through whatever it touched while the resolver applies the effect.
pub fn init_shot_pool(mut commands: Commands, mut pool: ResMut<ShotPool>) {
    pool.free.clear();
    let cap = pool.capacity;
    pool.free.reserve(cap);

    for _ in 0..cap {
        let e = commands
            .spawn((
                Name::new("Shot(Pooled)"),
                PooledShot,
                ShotState::Inactive,
                Shot {
                    owner: Entity::PLACEHOLDER,
                    damage: 0,
                },
                Sprite {
                    color: Color::srgb(1.0, 0.85, 0.3),
                    custom_size: Some(Vec2::splat(8.0)),
                    ..default()
                },
                Transform::from_xyz(0.0, 0.0, 2.0),
                Visibility::Hidden,
                RigidBody::Kinematic,
                Collider::circle(4.0),
                Sensor,
                inactive_shot_layers(),
                LinearVelocity(Vec2::ZERO),
                // Kept always; inactive shots won't collide anyway because
                // their filters are empty.
                CollisionEventsEnabled,
            ))
            .id();

        pool.free.push(e);
    }
}
