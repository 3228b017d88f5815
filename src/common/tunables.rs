//! Tunable gameplay constants.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub pixels_per_meter: f32,
    pub gravity: f32,
    pub move_speed: f32,
    pub jump_speed: f32,
    pub max_hp: i32,
    pub shot_speed: f32,
    pub shot_damage: i32,
    pub hazard_damage: i32,
    pub hazard_fall_speed: f32,
    pub hazard_spawn_secs: f32,
    pub shoot_secs: f32,
    pub hit_stun_secs: f32,
    pub settle_secs: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: 20.0,
            gravity: 1100.0,
            move_speed: 220.0,
            jump_speed: 560.0,
            max_hp: 100,
            shot_speed: 480.0,
            shot_damage: 20,
            hazard_damage: 25,
            hazard_fall_speed: 240.0,
            hazard_spawn_secs: 2.5,
            shoot_secs: 0.25,
            hit_stun_secs: 0.3,
            settle_secs: 3.0,
        }
    }
}
