//! Projectiles plugin: message-based producer -> consumer spawning with
//! data-driven pooling.
//!
//! # Data flow
//! ```text
//!   Update schedule
//! ┌──────────────────────────────────────────────────────────────┐
//! │  (A) Producer: request_fighter_shots                         │
//! │      - reads: FighterInput, Facing, Combat                   │
//! │      - writes: SpawnShotRequest message, ActionState         │
//! │                                                              │
//! │  (B) Consumer: allocate_shots_from_pool                      │
//! │      - reads: SpawnShotRequest messages                      │
//! │      - mutates: ShotPool free list + shot components         │
//! └──────────────────────────────────────────────────────────────┘
//!                │
//!                v
//! FixedPostUpdate
//! ┌──────────────────────────────────────────────────────────────┐
//! │  (C) Physics emits CollisionStart messages (Avian)           │
//! │                                                              │
//! │  (D) Resolve collisions: resolve_shot_collisions             │
//! │      - terrain absorbs, opponents take damage, owners are    │
//! │        excluded, one shot spent per target per pass          │
//! │                                                              │
//! │  (E) Commit returns: return_to_pool_commit                   │
//! └──────────────────────────────────────────────────────────────┘
//!
//! Feedback loop:
//!   commit pushes the entity back into ShotPool
//!   allocator pops it on the next request
//! ```
//!
//! Producers do **not** borrow `ResMut<ShotPool>`; they only enqueue
//! intent. The allocator is the single writer that mutates the pool.

pub mod components;
pub mod pool;
pub mod collision;

pub mod messages;
pub mod request;
pub mod allocator;
pub mod commit;

use avian2d::collision::narrow_phase::CollisionEventSystems;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::arena::ArenaBounds;

use components::{PooledShot, ShotState};

pub struct ProjectilesPlugin;

/// Maintain spawn request message buffers.
///
/// Messages are double-buffered; `update()` advances buffers.
fn update_spawn_messages(mut msgs: ResMut<Messages<messages::SpawnShotRequest>>) {
    msgs.update();
}

/// Shots that leave the playable bounds expire without a collision.
fn expire_out_of_bounds(
    bounds: Res<ArenaBounds>,
    mut q_shots: Query<(&Transform, &mut ShotState), With<PooledShot>>,
) {
    let margin = 64.0;
    for (tf, mut state) in &mut q_shots {
        if *state != ShotState::Active {
            continue;
        }
        let x = tf.translation.x;
        if x < bounds.min_x - margin || x > bounds.max_x + margin {
            *state = ShotState::PendingReturn;
        }
    }
}

impl Plugin for ProjectilesPlugin {
    fn build(&self, app: &mut App) {
        // Pool + pre-spawn
        app.insert_resource(pool::ShotPool::new(32))
            .add_systems(Startup, pool::init_shot_pool);

        // Message storage for spawn requests.
        app.init_resource::<Messages<messages::SpawnShotRequest>>();
        app.add_systems(PostUpdate, update_spawn_messages);

        // Update-phase pipeline: request -> allocate
        app.add_systems(
            Update,
            (
                request::request_fighter_shots,
                allocator::allocate_shots_from_pool.after(request::request_fighter_shots),
            )
                .run_if(in_state(GameState::InGame)),
        );

        app.add_systems(
            FixedUpdate,
            expire_out_of_bounds.run_if(in_state(GameState::InGame)),
        );

        // Fixed collision pipeline
        app.add_systems(
            FixedPostUpdate,
            collision::resolve_shot_collisions
                .after(CollisionEventSystems)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            FixedPostUpdate,
            commit::return_to_pool_commit
                .after(collision::resolve_shot_collisions)
                .run_if(in_state(GameState::InGame)),
        );

        // Live shots do not outlive the arena.
        app.add_systems(
            OnExit(GameState::InGame),
            (commit::recall_all_shots, commit::return_to_pool_commit).chain(),
        );
    }
}
