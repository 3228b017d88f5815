//! Results plugin: record the outcome and present the results stage.
//!
//! Persistence is deliberately soft: a missing or malformed profile store
//! degrades to "no persistence" with a warning. The round has already
//! concluded by the time we get here, and a storage problem must never
//! block showing the result.

pub mod store;

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::round::MatchOutcome;

use store::{MatchRecord, MemoryStore, ProfileSet, ProfileStore};

/// Injected persistence collaborator.
#[derive(Resource)]
pub struct Recorder(Box<dyn ProfileStore>);

impl Recorder {
    pub fn new(store: impl ProfileStore) -> Self {
        Self(Box::new(store))
    }

    pub fn store(&self) -> &dyn ProfileStore {
        self.0.as_ref()
    }
}

/// The user-facing conclusion line, consumed by whatever renders the
/// results screen.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct ResultsMessage(pub String);

pub fn plugin(app: &mut App) {
    if !app.world().contains_resource::<Recorder>() {
        app.insert_resource(Recorder::new(MemoryStore::default()));
    }
    app.add_systems(OnEnter(GameState::Results), conclude_match);
}

/// Apply a decided outcome to the stored profiles.
///
/// Returns false when the winner matches neither profile; nothing is
/// mutated in that case.
pub fn record_outcome(profiles: &mut ProfileSet, winner_id: &str) -> bool {
    let (winner, loser) = if profiles.main_user.id == winner_id {
        (&mut profiles.main_user, &mut profiles.secondary_user)
    } else if profiles.secondary_user.id == winner_id {
        (&mut profiles.secondary_user, &mut profiles.main_user)
    } else {
        return false;
    };

    winner.session_wins += 1;
    winner.matches.push(MatchRecord { win: true });
    loser.matches.push(MatchRecord { win: false });
    true
}

fn conclude_match(
    outcome: Option<Res<MatchOutcome>>,
    recorder: Res<Recorder>,
    mut commands: Commands,
) {
    let Some(outcome) = outcome else {
        warn!("results stage entered without an outcome");
        return;
    };

    let message = match &outcome.winner {
        Some(winner) => format!("{} wins the match!", winner.display_name),
        None => "Looks like there is no winner this time!".to_string(),
    };

    // A tie mutates nothing; a decided round updates the winner's record.
    if let Some(winner) = &outcome.winner {
        match recorder.store().load() {
            Ok(mut profiles) => {
                if record_outcome(&mut profiles, &winner.user_id) {
                    match recorder.store().save(&profiles) {
                        Ok(()) => info!("recorded win for {}", winner.user_id),
                        Err(err) => warn!("failed to persist match result: {err}"),
                    }
                } else {
                    warn!(
                        "winner {} has no stored profile; result not persisted",
                        winner.user_id
                    );
                }
            }
            Err(err) => warn!("profiles unavailable, skipping persistence: {err}"),
        }
    }

    info!("{message}");
    commands.insert_resource(ResultsMessage(message));
}
