use bevy::prelude::*;

#[derive(Component)]
pub struct PooledShot;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShotState {
    #[default]
    Inactive,
    Active,
    PendingReturn,
}

/// A fighter-fired shot. The owner reference exists so the collision
/// resolver can exclude self-damage.
#[derive(Component, Debug, Clone, Copy)]
pub struct Shot {
    pub owner: Entity,
    pub damage: i32,
}

impl Shot {
    #[inline]
    pub fn reset_for_fire(&mut self, owner: Entity, damage: i32) {
        self.owner = owner;
        self.damage = damage;
    }
}
