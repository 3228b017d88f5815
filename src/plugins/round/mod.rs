//! Round plugin: match setup, win evaluation, and the terminal hand-off.
//!
//! Lifecycle: `Running` -> (a fighter dies) -> `Resolving` -> (settle timer
//! fires) -> `Terminal`, which hands the outcome to the results stage. On
//! entering `Resolving` both fighters become bulletproof, so damage already
//! in flight can no longer change the decided outcome; the hand-off happens
//! exactly once because only the `Resolving` arm can reach `Terminal`.

use avian2d::collision::narrow_phase::CollisionEventSystems;
use avian2d::prelude::*;
use bevy::ecs::message::{MessageWriter, Messages};
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use thiserror::Error;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};
use crate::plugins::fighters::{
    ActionState, Combat, ControlMap, Facing, Fighter, FighterInput, GroundContacts, Participant,
};
use crate::plugins::hazards::resolve_hazard_collisions;
use crate::plugins::projectiles::collision::resolve_shot_collisions;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("a duel needs exactly two participants, got {got}")]
    ParticipantCount { got: usize },
}

/// Everything needed to field one fighter.
#[derive(Debug, Clone)]
pub struct FighterConfig {
    pub participant: Participant,
    pub spawn: Vec2,
    pub controls: ControlMap,
}

/// Validated match setup. Construction is the setup boundary: an invalid
/// participant list never reaches the simulation.
#[derive(Resource, Debug, Clone)]
pub struct MatchConfig {
    fighters: Vec<FighterConfig>,
}

impl MatchConfig {
    pub fn new(fighters: Vec<FighterConfig>) -> Result<Self, SetupError> {
        if fighters.len() != 2 {
            return Err(SetupError::ParticipantCount {
                got: fighters.len(),
            });
        }
        Ok(Self { fighters })
    }

    pub fn fighters(&self) -> &[FighterConfig] {
        &self.fighters
    }

    /// Two local players on one keyboard.
    pub fn local_duo() -> Self {
        Self {
            fighters: vec![
                FighterConfig {
                    participant: Participant {
                        user_id: "player-one".into(),
                        display_name: "Player One".into(),
                    },
                    spawn: Vec2::new(-200.0, -100.0),
                    controls: ControlMap::arrows(),
                },
                FighterConfig {
                    participant: Participant {
                        user_id: "player-two".into(),
                        display_name: "Player Two".into(),
                    },
                    spawn: Vec2::new(200.0, -100.0),
                    controls: ControlMap::letters(),
                },
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub enum RoundPhase {
    Running,
    Resolving { settle: Timer },
    Terminal,
}

/// Round lifecycle truth. `winner` is only ever written on the transition
/// into `Resolving`; `None` after that transition encodes a simultaneous
/// defeat.
#[derive(Resource, Debug, Clone)]
pub struct Round {
    pub phase: RoundPhase,
    pub winner: Option<Participant>,
}

impl Round {
    pub fn new() -> Self {
        Self {
            phase: RoundPhase::Running,
            winner: None,
        }
    }
}

impl Default for Round {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminal hand-off payload, emitted exactly once per round.
#[derive(Message, Debug, Clone)]
pub struct RoundOver {
    pub winner: Option<Participant>,
}

/// Same payload as a resource, for the results stage entered next frame.
#[derive(Resource, Debug, Clone)]
pub struct MatchOutcome {
    pub winner: Option<Participant>,
}

pub fn plugin(app: &mut App) {
    app.init_resource::<Messages<RoundOver>>();
    app.add_systems(PostUpdate, update_round_messages);

    app.add_systems(OnEnter(GameState::InGame), spawn_fighters);

    app.add_systems(
        FixedPostUpdate,
        (
            evaluate_round
                .after(CollisionEventSystems)
                .after(resolve_shot_collisions)
                .after(resolve_hazard_collisions),
            settle_round.after(evaluate_round),
        )
            .run_if(in_state(GameState::InGame)),
    );
}

fn update_round_messages(mut msgs: ResMut<Messages<RoundOver>>) {
    msgs.update();
}

fn spawn_fighters(
    mut commands: Commands,
    tunables: Res<Tunables>,
    config: Option<Res<MatchConfig>>,
) {
    let Some(config) = config else {
        error!("no match configuration; the round cannot start");
        return;
    };

    let fighter_layers = CollisionLayers::new(
        Layer::Fighter,
        [Layer::World, Layer::Fighter, Layer::Shot, Layer::Hazard],
    );
    let colors = [Color::srgb(0.26, 0.28, 0.98), Color::srgb(0.46, 0.92, 0.39)];

    for (i, fc) in config.fighters().iter().enumerate() {
        // Face the arena center.
        let facing = if fc.spawn.x <= 0.0 {
            Facing::Right
        } else {
            Facing::Left
        };

        commands.spawn((
            Name::new(format!("Fighter({})", fc.participant.user_id)),
            Fighter,
            fc.participant.clone(),
            Combat::new(tunables.max_hp),
            ActionState::default(),
            facing,
            GroundContacts::default(),
            fc.controls,
            FighterInput::default(),
            Sprite {
                color: colors[i % colors.len()],
                custom_size: Some(Vec2::new(26.0, 34.0)),
                ..default()
            },
            Transform::from_translation(fc.spawn.extend(1.0)),
            RigidBody::Dynamic,
            Collider::rectangle(22.0, 32.0),
            fighter_layers,
            LockedAxes::ROTATION_LOCKED,
            Friction::ZERO,
            LinearVelocity::ZERO,
            CollisionEventsEnabled,
            DespawnOnExit(GameState::InGame),
        ));
    }

    commands.insert_resource(Round::new());
    info!(
        "round started: {} vs {}",
        config.fighters()[0].participant.display_name,
        config.fighters()[1].participant.display_name
    );
}

/// Aggregate per-fighter death into the round outcome.
///
/// Runs after all collision resolution so it sees this frame's damage.
fn evaluate_round(
    tunables: Res<Tunables>,
    mut round: ResMut<Round>,
    mut q_fighters: Query<(&Participant, &mut Combat), With<Fighter>>,
) {
    if !matches!(round.phase, RoundPhase::Running) {
        return;
    }

    let mut survivor = None;
    let mut dead = 0;
    for (participant, combat) in q_fighters.iter() {
        if combat.is_dead() {
            dead += 1;
        } else {
            survivor = Some(participant.clone());
        }
    }
    if dead == 0 {
        return;
    }

    // Exactly one death this frame crowns the survivor; two is a tie.
    let winner = if dead == 1 { survivor } else { None };

    // Freeze the outcome before any still-airborne hazard or shot lands.
    for (_, mut combat) in &mut q_fighters {
        combat.make_bulletproof();
    }

    match &winner {
        Some(p) => info!("round decided: {} wins", p.display_name),
        None => info!("round decided: no winner"),
    }

    round.winner = winner;
    round.phase = RoundPhase::Resolving {
        settle: Timer::from_seconds(tunables.settle_secs, TimerMode::Once),
    };
}

/// Let the decided round settle, then hand off to the results stage.
fn settle_round(
    time: Res<Time<Fixed>>,
    mut round: ResMut<Round>,
    mut commands: Commands,
    mut writer: MessageWriter<RoundOver>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let RoundPhase::Resolving { settle } = &mut round.phase else {
        return;
    };

    settle.tick(time.delta());
    if !settle.is_finished() {
        return;
    }

    round.phase = RoundPhase::Terminal;

    let winner = round.winner.clone();
    writer.write(RoundOver {
        winner: winner.clone(),
    });
    commands.insert_resource(MatchOutcome { winner });
    next_state.set(GameState::Results);
}
