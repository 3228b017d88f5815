//! End-to-end round lifecycle scenarios, headless.
//!
//! Damage is driven through `Combat::hurt` (the only damage entry point) or
//! injected `CollisionStart` messages, then the app is ticked until the
//! round settles and hands off to the results stage.

mod common;

use avian2d::prelude::*;
use bevy::prelude::*;

use arena_duel::common::layers::Layer;
use arena_duel::common::state::GameState;
use arena_duel::plugins::fighters::{ActionState, Combat, Fighter, Participant};
use arena_duel::plugins::hazards::{Hazard, HazardSpawnTimer, HazardState};
use arena_duel::plugins::results::store::{MemoryStore, Profile, ProfileSet, ProfileStore};
use arena_duel::plugins::results::{Recorder, ResultsMessage};
use arena_duel::plugins::round::{Round, RoundOver, RoundPhase};

/// Every terminal hand-off observed, in order.
#[derive(Resource, Default)]
struct HandOffs(Vec<Option<String>>);

fn collect_hand_offs(mut reader: MessageReader<RoundOver>, mut log: ResMut<HandOffs>) {
    for msg in reader.read() {
        log.0.push(msg.winner.as_ref().map(|p| p.user_id.clone()));
    }
}

fn seeded_profiles() -> ProfileSet {
    ProfileSet {
        main_user: Profile::new("player-one", "Player One"),
        secondary_user: Profile::new("player-two", "Player Two"),
    }
}

/// Headless app with a shared in-memory store and bomb drops suppressed, so
/// the scenarios control every point of damage.
fn scenario_app() -> (App, MemoryStore) {
    let mut app = common::app_headless();

    let store = MemoryStore::seeded(seeded_profiles());
    app.insert_resource(Recorder::new(store.clone()));
    app.insert_resource(HazardSpawnTimer(Timer::from_seconds(
        10_000.0,
        TimerMode::Repeating,
    )));
    app.init_resource::<HandOffs>();
    app.add_systems(Update, collect_hand_offs);

    // First update runs the initial state transition and fields the fighters.
    app.update();

    (app, store)
}

fn set_health(app: &mut App, user_id: &str, hp: i32) {
    let world = app.world_mut();
    let mut q = world.query::<(&Participant, &mut Combat)>();
    for (p, mut combat) in q.iter_mut(world) {
        if p.user_id == user_id {
            combat.hp = hp;
        }
    }
}

fn hurt_fighter(app: &mut App, user_id: &str, damage: i32) {
    let world = app.world_mut();
    let mut q = world.query::<(&Participant, &mut Combat, &mut ActionState)>();
    for (p, mut combat, mut action) in q.iter_mut(world) {
        if p.user_id == user_id {
            combat.hurt(damage, &mut action, 0.3);
        }
    }
}

fn fighter_entity(app: &mut App, user_id: &str) -> Entity {
    let world = app.world_mut();
    let mut q = world.query::<(Entity, &Participant)>();
    q.iter(world)
        .find(|(_, p)| p.user_id == user_id)
        .map(|(e, _)| e)
        .expect("fighter not found")
}

fn current_state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}

fn run_until_results(app: &mut App) {
    for _ in 0..600 {
        if current_state(app) == GameState::Results {
            return;
        }
        app.update();
    }
    panic!("match never reached the results stage");
}

// --------------------------------------------------------------------------
// Scenario: decisive win
// --------------------------------------------------------------------------

#[test]
fn decisive_win_records_and_announces_the_survivor() {
    let (mut app, store) = scenario_app();

    set_health(&mut app, "player-two", 60);
    hurt_fighter(&mut app, "player-one", 1_000);

    run_until_results(&mut app);

    let round = app.world().resource::<Round>();
    assert!(matches!(round.phase, RoundPhase::Terminal));
    assert_eq!(round.winner.as_ref().unwrap().user_id, "player-two");

    // The recorder credited exactly the winner.
    let profiles = store.load().unwrap();
    assert_eq!(profiles.secondary_user.session_wins, 1);
    assert_eq!(profiles.main_user.session_wins, 0);
    assert_eq!(profiles.secondary_user.matches.len(), 1);
    assert!(profiles.secondary_user.matches[0].win);
    assert_eq!(profiles.main_user.matches.len(), 1);
    assert!(!profiles.main_user.matches[0].win);

    // The results stage renders from in-memory participant data.
    let message = app.world().resource::<ResultsMessage>();
    assert!(message.0.contains("Player Two"));

    // The hand-off fired exactly once.
    let hand_offs = app.world().resource::<HandOffs>();
    assert_eq!(hand_offs.0, vec![Some("player-two".to_string())]);
}

#[test]
fn winner_is_decided_through_resolving_first() {
    let (mut app, _store) = scenario_app();

    hurt_fighter(&mut app, "player-one", 1_000);
    app.update();
    app.update();

    // The round is decided but still settling; both fighters are frozen.
    assert_eq!(current_state(&app), GameState::InGame);
    let round = app.world().resource::<Round>();
    assert!(matches!(round.phase, RoundPhase::Resolving { .. }));
    assert_eq!(round.winner.as_ref().unwrap().user_id, "player-two");

    let world = app.world_mut();
    let mut q = world.query::<&Combat>();
    for combat in q.iter(world) {
        assert!(combat.invulnerable);
    }
}

// --------------------------------------------------------------------------
// Scenario: simultaneous defeat
// --------------------------------------------------------------------------

#[test]
fn simultaneous_defeat_is_a_tie_with_no_persistence() {
    let (mut app, store) = scenario_app();

    hurt_fighter(&mut app, "player-one", 1_000);
    hurt_fighter(&mut app, "player-two", 1_000);

    run_until_results(&mut app);

    let round = app.world().resource::<Round>();
    assert!(matches!(round.phase, RoundPhase::Terminal));
    assert!(round.winner.is_none());

    // No win counters moved, no match records were appended.
    assert_eq!(store.load().unwrap(), seeded_profiles());

    let message = app.world().resource::<ResultsMessage>();
    assert!(message.0.contains("no winner"));

    let hand_offs = app.world().resource::<HandOffs>();
    assert_eq!(hand_offs.0, vec![None]);
}

// --------------------------------------------------------------------------
// Scenario: damage suppression during resolution
// --------------------------------------------------------------------------

#[test]
fn hazard_landing_during_resolving_is_destroyed_without_damage() {
    let (mut app, _store) = scenario_app();

    hurt_fighter(&mut app, "player-one", 1_000);
    app.update();
    app.update();
    assert!(matches!(
        app.world().resource::<Round>().phase,
        RoundPhase::Resolving { .. }
    ));

    let survivor = fighter_entity(&mut app, "player-two");
    let hp_before = app.world().get::<Combat>(survivor).unwrap().hp;

    // A bomb still airborne when the round was decided now lands on the
    // survivor.
    let hazard = app
        .world_mut()
        .spawn((
            Hazard,
            HazardState::Falling,
            CollisionLayers::new(Layer::Hazard, [Layer::World, Layer::Fighter]),
            Transform::from_xyz(0.0, 0.0, 2.0),
        ))
        .id();
    app.world_mut().write_message(CollisionStart {
        collider1: hazard,
        collider2: survivor,
        body1: Some(hazard),
        body2: Some(survivor),
    });

    app.update();
    app.update();

    // Damage was suppressed, but the bomb was still cleaned up.
    assert_eq!(
        app.world().get::<Combat>(survivor).unwrap().hp,
        hp_before
    );
    assert!(app.world().get_entity(hazard).is_err());
}

// --------------------------------------------------------------------------
// Scenario: idempotent termination
// --------------------------------------------------------------------------

#[test]
fn terminal_round_ignores_further_ticks() {
    let (mut app, store) = scenario_app();

    hurt_fighter(&mut app, "player-one", 1_000);
    run_until_results(&mut app);

    let winner_before = app.world().resource::<Round>().winner.clone();
    let message_before = app.world().resource::<ResultsMessage>().clone();
    let profiles_before = store.load().unwrap();

    for _ in 0..30 {
        app.update();
    }

    assert!(matches!(
        app.world().resource::<Round>().phase,
        RoundPhase::Terminal
    ));
    assert_eq!(app.world().resource::<Round>().winner, winner_before);
    assert_eq!(*app.world().resource::<ResultsMessage>(), message_before);
    assert_eq!(store.load().unwrap(), profiles_before);

    // The hand-off never re-fires.
    assert_eq!(app.world().resource::<HandOffs>().0.len(), 1);

    // The arena tore down with the match.
    let world = app.world_mut();
    let fighters = world.query::<&Fighter>().iter(world).count();
    assert_eq!(fighters, 0);
}
