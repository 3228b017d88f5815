//! Global state machine.
//!
//! `InGame` hosts the whole round lifecycle (running and resolving);
//! `Results` is the post-match stage. Gameplay systems are gated on
//! `InGame`, so frames arriving after the hand-off are no-ops.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    InGame,
    Results,
}
