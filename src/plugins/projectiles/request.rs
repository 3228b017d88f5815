use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::common::tunables::Tunables;
use crate::plugins::fighters::{ActionState, Combat, Facing, Fighter, FighterInput};

use super::messages::SpawnShotRequest;

/// Horizontal offset of the muzzle from the fighter center.
const MUZZLE_OFFSET: f32 = 22.0;

/// Producer: turn each fighter's attack input into a SpawnShotRequest and
/// enter the matching shooting state.
///
/// This system intentionally does **not** access ShotPool.
pub fn request_fighter_shots(
    tunables: Res<Tunables>,
    mut q_fighters: Query<
        (
            Entity,
            &FighterInput,
            &Transform,
            &Facing,
            &Combat,
            &mut ActionState,
        ),
        With<Fighter>,
    >,
    mut writer: MessageWriter<SpawnShotRequest>,
) {
    for (e, input, tf, facing, combat, mut action) in &mut q_fighters {
        if !input.attack {
            continue;
        }
        // No attacks from dead fighters, and none once the round outcome
        // is frozen.
        if combat.is_dead() || combat.invulnerable {
            continue;
        }
        if !action.can_act() {
            continue;
        }

        let dir = facing.sign();
        let origin = tf.translation.truncate() + Vec2::new(dir * MUZZLE_OFFSET, 0.0);

        writer.write(SpawnShotRequest {
            owner: e,
            pos: origin,
            vel: Vec2::new(dir * tunables.shot_speed, 0.0),
            damage: tunables.shot_damage,
        });

        *action = action.shooting(tunables.shoot_secs);
    }
}
