//! Spawn consumer: activate shots from the pool.
//!
//! # Fail-fast invariants
//! - The pool free list contains only valid pooled shot entities.
//! - Therefore, a pooled entity must match the shot query.
//!
//! If this is violated, we `expect()` and crash loudly. This removes
//! branches from the hot loop and makes invariant violations obvious.

use avian2d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use super::components::{PooledShot, Shot, ShotState};
use super::messages::SpawnShotRequest;
use super::pool::{ShotPool, active_shot_layers};

pub fn allocate_shots_from_pool(
    mut pool: ResMut<ShotPool>,
    mut reader: MessageReader<SpawnShotRequest>,
    mut q_shots: Query<
        (
            &mut ShotState,
            &mut Shot,
            &mut Transform,
            &mut LinearVelocity,
            &mut Visibility,
            &mut CollisionLayers,
        ),
        With<PooledShot>,
    >,
) {
    for req in reader.read() {
        let Some(e) = pool.pop_free() else {
            // Capacity decision, not a correctness failure.
            debug!("shot pool exhausted; dropping spawn request");
            continue;
        };

        let (mut state, mut shot, mut tf, mut vel, mut vis, mut layers) = q_shots
            .get_mut(e)
            .expect("ShotPool contained an entity missing pooled shot components");

        *state = ShotState::Active;
        shot.reset_for_fire(req.owner, req.damage);
        tf.translation = req.pos.extend(2.0);
        vel.0 = req.vel;
        *vis = Visibility::Visible;
        *layers = active_shot_layers();
    }
}
