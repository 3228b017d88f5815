//! Lighting plugin (Firefly) (render-only).

use bevy::prelude::*;
use bevy_firefly::prelude::*;

use crate::plugins::fighters::Fighter;

/// Marker: this fighter already carries a light child.
#[derive(Component)]
struct Lit;

pub fn plugin(app: &mut App) {
    if !app.is_plugin_added::<FireflyPlugin>() {
        app.add_plugins(FireflyPlugin);
    }

    app.add_systems(Update, attach_fighter_lights);
}

fn attach_fighter_lights(
    mut commands: Commands,
    q_fighters: Query<Entity, (With<Fighter>, Without<Lit>)>,
) {
    for e in &q_fighters {
        commands.entity(e).insert(Lit).with_children(|parent| {
            parent.spawn((
                Name::new("FighterLight"),
                PointLight2d {
                    color: Color::srgb(1.0, 0.9, 0.75),
                    range: 320.0,
                    ..default()
                },
                Transform::from_xyz(0.0, 0.0, 10.0),
            ));
        });
    }
}
