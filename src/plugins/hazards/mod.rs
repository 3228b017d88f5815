//! Hazards plugin: bombs dropped on a fixed cadence.
//!
//! A repeating timer spawns one bomb at a random x inside the arena bounds.
//! Bombs fall at a fixed speed as kinematic sensors and are resolved against
//! terrain and fighters from collision messages. The spawn timer is **not**
//! stopped while the round resolves; bombs keep falling for the settle
//! window, they just can no longer change the outcome.
//!
//! Destruction is two-phase: resolvers flip `HazardState` immediately (so a
//! bomb is consumed at most once per frame), and the marked entities are
//! despawned in PostUpdate, never mid-iteration.

use avian2d::collision::narrow_phase::CollisionEventSystems;
use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use rand::Rng;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};
use crate::plugins::arena::ArenaBounds;
use crate::plugins::fighters::{ActionState, Combat, Fighter};
use crate::plugins::projectiles::collision::resolve_shot_collisions;

#[derive(Component)]
pub struct Hazard;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HazardState {
    #[default]
    Falling,
    PendingDespawn,
}

#[derive(Resource, Debug)]
pub struct HazardSpawnTimer(pub Timer);

pub fn plugin(app: &mut App) {
    let cadence = app.world().resource::<Tunables>().hazard_spawn_secs;
    app.insert_resource(HazardSpawnTimer(Timer::from_seconds(
        cadence,
        TimerMode::Repeating,
    )));

    app.add_systems(
        FixedUpdate,
        (spawn_hazards, cull_fallen_hazards).run_if(in_state(GameState::InGame)),
    );
    app.add_systems(
        FixedPostUpdate,
        resolve_hazard_collisions
            .after(CollisionEventSystems)
            // Keep the two damage resolvers in a fixed order so hit
            // attribution is deterministic within a frame.
            .after(resolve_shot_collisions)
            .run_if(in_state(GameState::InGame)),
    );
    app.add_systems(
        PostUpdate,
        despawn_marked_hazards.run_if(in_state(GameState::InGame)),
    );
}

fn spawn_hazards(
    time: Res<Time<Fixed>>,
    tunables: Res<Tunables>,
    bounds: Res<ArenaBounds>,
    mut timer: ResMut<HazardSpawnTimer>,
    mut commands: Commands,
) {
    timer.0.tick(time.delta());
    if !timer.0.just_finished() {
        return;
    }

    let x = rand::thread_rng().gen_range(bounds.min_x..bounds.max_x);

    commands.spawn((
        Name::new("Bomb"),
        Hazard,
        HazardState::Falling,
        Sprite {
            color: Color::srgb(0.92, 0.18, 0.14),
            custom_size: Some(Vec2::splat(18.0)),
            ..default()
        },
        Transform::from_xyz(x, bounds.top_y, 2.0),
        RigidBody::Kinematic,
        Collider::circle(9.0),
        Sensor,
        CollisionLayers::new(Layer::Hazard, [Layer::World, Layer::Fighter]),
        LinearVelocity(Vec2::new(0.0, -tunables.hazard_fall_speed)),
        CollisionEventsEnabled,
        DespawnOnExit(GameState::InGame),
    ));
}

/// Resolve hazard pairings for this frame.
///
/// - Hazard x terrain: the bomb is destroyed, no damage.
/// - Hazard x fighter: `hurt` + the bomb is destroyed. The hurt call is a
///   no-op on an invulnerable fighter, but the bomb is destroyed either way
///   so visual cleanup continues during round resolution.
///
/// When several bombs overlap one fighter in the same frame, only the first
/// alive one in message order is consumed and credited.
pub fn resolve_hazard_collisions(
    tunables: Res<Tunables>,
    mut started: MessageReader<CollisionStart>,
    q_is_hazard: Query<(), With<Hazard>>,
    mut q_hazards: Query<&mut HazardState, With<Hazard>>,
    q_layers: Query<&CollisionLayers>,
    mut q_fighters: Query<(&mut Combat, &mut ActionState), With<Fighter>>,
    mut hit_this_pass: Local<HashSet<Entity>>,
) {
    hit_this_pass.clear();

    for ev in started.read() {
        let h1 = q_is_hazard.contains(ev.collider1);
        let h2 = q_is_hazard.contains(ev.collider2);
        if !(h1 ^ h2) {
            continue; // must be exactly one hazard
        }
        let (hazard, other) = if h1 {
            (ev.collider1, ev.collider2)
        } else {
            (ev.collider2, ev.collider1)
        };
        let other_body = if h1 { ev.body2 } else { ev.body1 };

        let Ok(other_layers) = q_layers.get(other) else {
            continue;
        };

        let Ok(mut state) = q_hazards.get_mut(hazard) else {
            continue;
        };

        // Already consumed earlier this frame.
        if *state != HazardState::Falling {
            continue;
        }

        // TERRAIN: destroyed, no damage
        if is_in_layer(other_layers, Layer::World) {
            *state = HazardState::PendingDespawn;
            continue;
        }

        // FIGHTER: first-alive pick -> damage
        if is_in_layer(other_layers, Layer::Fighter) {
            let fighter = other_body.unwrap_or(other);

            if !hit_this_pass.insert(fighter) {
                continue;
            }

            if let Ok((mut combat, mut action)) = q_fighters.get_mut(fighter) {
                combat.hurt(tunables.hazard_damage, &mut action, tunables.hit_stun_secs);
            }

            *state = HazardState::PendingDespawn;
            continue;
        }
    }
}

#[inline]
fn is_in_layer(layers: &CollisionLayers, layer: Layer) -> bool {
    layers.memberships.has_all(layer)
}

/// Bombs that somehow miss all terrain fall out of the arena; reap them.
fn cull_fallen_hazards(
    bounds: Res<ArenaBounds>,
    mut q_hazards: Query<(&Transform, &mut HazardState), With<Hazard>>,
) {
    let margin = 64.0;
    for (tf, mut state) in &mut q_hazards {
        if *state == HazardState::Falling && tf.translation.y < bounds.floor_y - margin {
            *state = HazardState::PendingDespawn;
        }
    }
}

/// Centralized structural cleanup, after all fixed-step work is done.
fn despawn_marked_hazards(
    mut commands: Commands,
    q_hazards: Query<(Entity, &HazardState), With<Hazard>>,
) {
    for (e, state) in &q_hazards {
        if *state == HazardState::PendingDespawn {
            commands.entity(e).despawn();
        }
    }
}
