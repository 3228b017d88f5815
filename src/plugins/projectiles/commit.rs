//! Return commit: recycle shots back into the pool.
//!
//! This system is the owner of the *Inactive invariants*.
//!
//! Invariant: Inactive shots must be:
//! - hidden
//! - velocity = 0
//! - collide with nothing (filters empty)
//!
//! Centralizing these writes here prevents inconsistencies.

use avian2d::prelude::*;
use bevy::prelude::*;

use super::components::{PooledShot, ShotState};
use super::pool::{ShotPool, inactive_shot_layers};

pub fn return_to_pool_commit(
    mut pool: ResMut<ShotPool>,
    mut q_shots: Query<
        (
            Entity,
            &mut ShotState,
            &mut Visibility,
            &mut LinearVelocity,
            &mut CollisionLayers,
        ),
        With<PooledShot>,
    >,
) {
    for (e, mut state, mut vis, mut vel, mut layers) in &mut q_shots {
        if *state != ShotState::PendingReturn {
            continue;
        }

        *state = ShotState::Inactive;
        *vis = Visibility::Hidden;
        vel.0 = Vec2::ZERO;
        *layers = inactive_shot_layers();

        pool.push_free(e);
    }
}

/// Mark every live shot for return. Used when the arena tears down.
pub fn recall_all_shots(mut q_shots: Query<&mut ShotState, With<PooledShot>>) {
    for mut state in &mut q_shots {
        if *state == ShotState::Active {
            *state = ShotState::PendingReturn;
        }
    }
}
