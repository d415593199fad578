//! League business logic: scoring, standings, knockout progression, bookkeeping.

mod fixtures;
mod pairing;
mod registry;
mod scoring;
mod stage_gate;
mod standings;

pub use fixtures::{FixtureReport, NewClash};
pub use pairing::pair_key;
pub use registry::{NewNotification, NewPlayer, NewTeam};
pub use scoring::{
    decide_game, decide_knockout_game, decide_league_game, duration_minutes, evaluate,
    ScoreOutcome, ScoreSubmission, ScoringPolicy, Tally, Verdict, GAMES_TO_WIN,
};
pub use stage_gate::PoolStatus;
pub use standings::{compare_standings, rank_teams, MatchResult, LEAGUE_WIN_POINTS};

use crate::config::LeagueSettings;
use crate::models::Game;
use crate::store::Store;
use std::sync::Arc;

/// The league engine. Holds the persistence handle it was constructed with;
/// every operation runs to completion within the calling request.
#[derive(Clone)]
pub struct League {
    store: Arc<dyn Store>,
    settings: LeagueSettings,
}

impl League {
    pub fn new(store: Arc<dyn Store>, settings: LeagueSettings) -> Self {
        Self { store, settings }
    }

    /// The games a freshly created clash starts with.
    pub(crate) fn empty_games(&self) -> Vec<Game> {
        (1..=self.settings.games_per_clash as u32)
            .map(|n| Game {
                points_value: self.settings.policy.points_value(n),
                ..Game::empty(n)
            })
            .collect()
    }
}
