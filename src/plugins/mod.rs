//! Feature plugins.

use bevy::prelude::*;

use crate::plugins::projectiles::ProjectilesPlugin;

pub mod arena;
pub mod core;
pub mod fighters;
pub mod hazards;
pub mod physics;
pub mod projectiles;
pub mod results;
pub mod round;

// Render-only
pub mod camera;
pub mod lighting;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    arena::plugin(app);
    fighters::plugin(app);
    hazards::plugin(app);
    round::plugin(app);
    results::plugin(app);
    app.add_plugins(ProjectilesPlugin);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    lighting::plugin(app);
    camera::plugin(app);
}

/// Register all plugins (full app).
pub fn register_all(app: &mut App) {
    register_gameplay(app);
    register_render(app);
}
