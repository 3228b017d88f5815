//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides the core ECS runtime.
//! - `TimeUpdateStrategy::ManualDuration` makes every `app.update()` advance
//!   time by exactly one frame, so fixed-step systems run deterministically.
//! - we then call `arena_duel::game::configure_headless` to install gameplay
//!   plugins.

use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

pub const FRAME: Duration = Duration::from_micros(16_667);

pub fn app_headless() -> App {
    let mut app = App::new();

    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));

    arena_duel::game::configure_headless(&mut app);
    app
}
