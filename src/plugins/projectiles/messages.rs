//! Buffered spawn requests.
//!
//! Producers create *intent*; the allocator is the single consumer that
//! mutates the pool. This keeps pool mutation localized.

use bevy::prelude::*;

#[derive(Message, Clone, Copy, Debug)]
pub struct SpawnShotRequest {
    pub owner: Entity,
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: i32,
}
