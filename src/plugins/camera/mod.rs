//! Camera plugin (render-only).
//!
//! One fixed camera covers the whole arena; it eases toward the midpoint
//! between the two fighters so the duel stays centered without snapping.

use bevy::prelude::*;
use bevy_firefly::prelude::*;

use crate::plugins::fighters::Fighter;

#[derive(Component)]
pub struct MainCamera {
    pub responsiveness: f32,
}

pub fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_camera).add_systems(
        PostUpdate,
        frame_fighters.before(TransformSystems::Propagate),
    );
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("MainCamera"),
        Camera2d,
        MainCamera {
            responsiveness: 4.0,
        },
        FireflyConfig::default(),
        Transform::from_xyz(0.0, 0.0, 999.0),
    ));
}

fn frame_fighters(
    time: Res<Time>,
    // Disjointness proof: Fighter entities are not MainCamera entities.
    q_fighters: Query<&Transform, (With<Fighter>, Without<MainCamera>)>,
    mut q_cam: Query<(&mut Transform, &MainCamera), Without<Fighter>>,
) {
    let Ok((mut tf_cam, cam)) = q_cam.single_mut() else {
        return;
    };

    let mut midpoint = Vec2::ZERO;
    let mut count = 0;
    for tf in &q_fighters {
        midpoint += tf.translation.truncate();
        count += 1;
    }
    if count == 0 {
        return;
    }
    midpoint /= count as f32;

    let dt = time.delta_secs();
    let alpha = 1.0 - (-cam.responsiveness * dt).exp();

    tf_cam.translation.x += (midpoint.x - tf_cam.translation.x) * alpha;
    tf_cam.translation.y += (midpoint.y - tf_cam.translation.y) * alpha;
}
