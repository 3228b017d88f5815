use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use super::components::{PooledShot, Shot, ShotState};
use crate::common::layers::Layer;
use crate::common::tunables::Tunables;
use crate::plugins::fighters::{ActionState, Combat, Fighter};

#[derive(Clone, Copy, Debug)]
struct CollisionTarget {
    collider: Entity,
    body: Option<Entity>,
}

impl CollisionTarget {
    #[inline]
    pub fn gameplay_owner(self) -> Entity {
        self.body.unwrap_or(self.collider)
    }
}

#[inline]
fn targets(ev: &CollisionStart) -> (CollisionTarget, CollisionTarget) {
    (
        CollisionTarget {
            collider: ev.collider1,
            body: ev.body1,
        },
        CollisionTarget {
            collider: ev.collider2,
            body: ev.body2,
        },
    )
}

#[inline]
fn is_in_layer(layers: &CollisionLayers, layer: Layer) -> bool {
    layers.memberships.has_all(layer)
}

/// Resolve shot pairings for this frame.
///
/// - Shot x terrain: the shot is spent, no damage.
/// - Shot x opposing fighter: `hurt` + the shot is spent. The hurt call is
///   a no-op on an invulnerable target, but the shot is spent regardless.
/// - Shot x its own firer: skipped entirely, the shot flies on.
///
/// When several shots reach the same fighter in one frame, only the first
/// alive one in message order is spent and credited; the rest stay in
/// flight for the next pass.
pub fn resolve_shot_collisions(
    tunables: Res<Tunables>,
    mut started: MessageReader<CollisionStart>,
    // Fast "is this a pooled shot?" check
    q_is_shot: Query<(), With<PooledShot>>,
    mut q_shots: Query<(&Shot, &mut ShotState), With<PooledShot>>,
    // Read layers from collider entities
    q_layers: Query<&CollisionLayers>,
    // Gameplay state
    mut q_fighters: Query<(&mut Combat, &mut ActionState), With<Fighter>>,
    // Per-frame "first alive" pick per target
    mut hit_this_pass: Local<HashSet<Entity>>,
) {
    hit_this_pass.clear();

    for ev in started.read() {
        let (t1, t2) = targets(ev);

        // Identify the shot side without get_mut probing
        let s1 = q_is_shot.contains(t1.collider);
        let s2 = q_is_shot.contains(t2.collider);
        if !(s1 ^ s2) {
            continue; // must be exactly one shot
        }
        let (shot_side, other_side) = if s1 { (t1, t2) } else { (t2, t1) };

        let Ok(other_layers) = q_layers.get(other_side.collider) else {
            continue;
        };

        let Ok((shot, mut state)) = q_shots.get_mut(shot_side.collider) else {
            continue;
        };

        // Already spent earlier this pass.
        if *state != ShotState::Active {
            continue;
        }

        // TERRAIN: spent, no damage
        if is_in_layer(other_layers, Layer::World) {
            *state = ShotState::PendingReturn;
            continue;
        }

        // FIGHTER: owner exclusion -> first-alive pick -> damage
        if is_in_layer(other_layers, Layer::Fighter) {
            let fighter = other_side.gameplay_owner();

            if shot.owner == fighter {
                continue; // never pair a fighter with its own shot
            }

            if !hit_this_pass.insert(fighter) {
                continue;
            }

            if let Ok((mut combat, mut action)) = q_fighters.get_mut(fighter) {
                combat.hurt(shot.damage, &mut action, tunables.hit_stun_secs);
            }

            *state = ShotState::PendingReturn;
            continue;
        }
    }
}
