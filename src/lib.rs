//! Badminton league organizer: library with models, scoring and tournament logic.

pub mod api;
pub mod auth;
pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use auth::AdminAuth;
pub use config::{Config, ConfigError, LeagueSettings};
pub use logic::{
    compare_standings, pair_key, rank_teams, FixtureReport, League, MatchResult, NewClash,
    NewNotification, NewPlayer, NewTeam, PoolStatus, ScoreOutcome, ScoreSubmission, ScoringPolicy,
};
pub use models::{
    Clash, ClashId, ClashStatus, Game, GameSide, Grouping, Notification, Player, PlayerId,
    RecordDelta, Side, Stage, Team, TeamId, TeamRecord, TournamentError,
};
pub use store::{MemoryStore, Store, StoreError};
