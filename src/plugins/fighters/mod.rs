//! Fighters plugin.
//!
//! Pipeline:
//! - Update: sample each fighter's key map into its `FighterInput`
//! - FixedUpdate: apply velocity + jump to the dynamic rigid body
//! - FixedPostUpdate: maintain ground contacts from collision messages,
//!   then re-derive the action state machine
//!
//! Damage does not live here as a system: `Combat::hurt` is called by the
//! shot and hazard collision resolvers.

pub mod components;

use avian2d::collision::narrow_phase::CollisionEventSystems;
use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};

pub use components::{
    ActionState, Combat, ControlMap, Facing, Fighter, FighterInput, GroundContacts, Participant,
};

pub fn plugin(app: &mut App) {
    app.add_systems(Update, sample_input.run_if(in_state(GameState::InGame)));
    app.add_systems(
        FixedUpdate,
        apply_movement.run_if(in_state(GameState::InGame)),
    );
    app.add_systems(
        FixedPostUpdate,
        (
            track_ground_contacts.after(CollisionEventSystems),
            update_action_state.after(track_ground_contacts),
        )
            .run_if(in_state(GameState::InGame)),
    );
}

fn sample_input(
    keys: Res<ButtonInput<KeyCode>>,
    mut q_fighters: Query<(&ControlMap, &mut FighterInput)>,
) {
    for (map, mut input) in &mut q_fighters {
        let mut axis = 0.0;
        if keys.pressed(map.left) {
            axis -= 1.0;
        }
        if keys.pressed(map.right) {
            axis += 1.0;
        }

        input.move_axis = axis;
        input.jump = keys.pressed(map.jump);
        input.attack = keys.just_pressed(map.attack);
    }
}

fn apply_movement(
    tunables: Res<Tunables>,
    mut q_fighters: Query<
        (
            &FighterInput,
            &Combat,
            &GroundContacts,
            &mut LinearVelocity,
            &mut Facing,
        ),
        With<Fighter>,
    >,
) {
    for (input, combat, ground, mut vel, mut facing) in &mut q_fighters {
        if combat.is_dead() {
            vel.x = 0.0;
            continue;
        }

        vel.x = input.move_axis * tunables.move_speed;

        if input.move_axis > 0.0 {
            *facing = Facing::Right;
        } else if input.move_axis < 0.0 {
            *facing = Facing::Left;
        }

        if input.jump && ground.grounded() {
            vel.y = tunables.jump_speed;
        }
    }
}

/// Resolve one collision message side-pair into the fighter entity if the
/// pair is a fighter touching a world tile below it.
fn ground_pair(
    a: Entity,
    b: Entity,
    q_ground: &Query<&mut GroundContacts>,
    q_layers: &Query<&CollisionLayers>,
    q_transforms: &Query<&Transform>,
) -> Option<Entity> {
    let (fighter, terrain) = if q_ground.contains(a) {
        (a, b)
    } else if q_ground.contains(b) {
        (b, a)
    } else {
        return None;
    };

    let layers = q_layers.get(terrain).ok()?;
    if !layers.memberships.has_all(Layer::World) {
        return None;
    }

    // Only contacts from below count as ground.
    let fighter_y = q_transforms.get(fighter).ok()?.translation.y;
    let terrain_y = q_transforms.get(terrain).ok()?.translation.y;
    (terrain_y < fighter_y).then_some(fighter)
}

fn track_ground_contacts(
    mut started: MessageReader<CollisionStart>,
    mut ended: MessageReader<CollisionEnd>,
    mut q_ground: Query<&mut GroundContacts>,
    q_layers: Query<&CollisionLayers>,
    q_transforms: Query<&Transform>,
) {
    for ev in started.read() {
        if let Some(fighter) =
            ground_pair(ev.collider1, ev.collider2, &q_ground, &q_layers, &q_transforms)
        {
            if let Ok(mut contacts) = q_ground.get_mut(fighter) {
                contacts.0 += 1;
            }
        }
    }

    for ev in ended.read() {
        if let Some(fighter) =
            ground_pair(ev.collider1, ev.collider2, &q_ground, &q_layers, &q_transforms)
        {
            if let Ok(mut contacts) = q_ground.get_mut(fighter) {
                contacts.0 = contacts.0.saturating_sub(1);
            }
        }
    }
}

fn update_action_state(
    time: Res<Time<Fixed>>,
    mut q_fighters: Query<(&mut ActionState, &LinearVelocity, &GroundContacts), With<Fighter>>,
) {
    for (mut action, vel, ground) in &mut q_fighters {
        match &mut *action {
            ActionState::Dead => continue,
            ActionState::Hit(timer)
            | ActionState::ShootIdle(timer)
            | ActionState::ShootWalk(timer) => {
                timer.tick(time.delta());
                if !timer.is_finished() {
                    continue;
                }
            }
            _ => {}
        }

        *action = if !ground.grounded() {
            ActionState::Jump
        } else if vel.x.abs() > 1.0 {
            ActionState::Walk
        } else {
            ActionState::Idle
        };
    }
}
