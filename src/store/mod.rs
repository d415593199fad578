//! Persistence interface consumed by the league core.
//!
//! Documents are keyed by id. Besides plain insert/find/delete the store offers
//! the atomic primitives the core relies on: counter increments, set-add on a
//! player's pairing history, and a clash write conditional on the lock flag.

mod memory;

pub use memory::MemoryStore;

use crate::models::{
    Clash, ClashId, ClashStatus, Grouping, Notification, Player, PlayerId, RecordDelta, Stage,
    Team, TeamId, TeamRecord,
};
use async_trait::async_trait;

/// Failures of the storage backend itself.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Exact-match filter over clashes.
#[derive(Clone, Debug, Default)]
pub struct ClashFilter {
    /// Any of these stages; empty matches every stage.
    pub stages: Vec<Stage>,
    pub status: Option<ClashStatus>,
    /// Both teams must be in this set.
    pub within: Option<Vec<TeamId>>,
}

impl ClashFilter {
    pub fn stage(stage: Stage) -> Self {
        Self {
            stages: vec![stage],
            ..Self::default()
        }
    }

    pub fn stages(stages: &[Stage]) -> Self {
        Self {
            stages: stages.to_vec(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: ClashStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn within(mut self, teams: Vec<TeamId>) -> Self {
        self.within = Some(teams);
        self
    }

    pub fn matches(&self, clash: &Clash) -> bool {
        (self.stages.is_empty() || self.stages.contains(&clash.stage))
            && self.status.is_none_or(|s| s == clash.status)
            && self.within.as_ref().is_none_or(|teams| clash.is_within(teams))
    }
}

/// Result of a clash write conditional on the stored clash being unlocked.
#[derive(Clone, Debug)]
pub enum ClashWrite {
    /// Written; carries the version it replaced.
    Replaced(Clash),
    /// The stored clash is locked; nothing was written.
    Locked,
    Missing,
}

/// Document store for the league. Results of `find_*` come back in insertion order.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_team(&self, team: Team) -> Result<(), StoreError>;
    async fn find_team(&self, id: TeamId) -> Result<Option<Team>, StoreError>;
    /// All teams, or only those whose grouping label equals `pool`.
    async fn find_teams(&self, pool: Option<&str>) -> Result<Vec<Team>, StoreError>;
    /// Replace name and grouping. Returns the updated team, `None` when absent.
    async fn update_team_details(
        &self,
        id: TeamId,
        name: String,
        grouping: Grouping,
    ) -> Result<Option<Team>, StoreError>;
    /// Atomically apply `delta` and recompute the point difference.
    async fn increment_team_record(
        &self,
        id: TeamId,
        delta: &RecordDelta,
    ) -> Result<Option<TeamRecord>, StoreError>;
    async fn push_team_player(&self, team: TeamId, player: PlayerId) -> Result<bool, StoreError>;
    async fn pull_team_player(&self, team: TeamId, player: PlayerId) -> Result<bool, StoreError>;
    async fn delete_team(&self, id: TeamId) -> Result<bool, StoreError>;

    async fn insert_player(&self, player: Player) -> Result<(), StoreError>;
    async fn find_player(&self, id: PlayerId) -> Result<Option<Player>, StoreError>;
    async fn find_players(&self, team: Option<TeamId>) -> Result<Vec<Player>, StoreError>;
    async fn update_player_details(
        &self,
        id: PlayerId,
        name: String,
        team_id: TeamId,
    ) -> Result<Option<Player>, StoreError>;
    async fn increment_player_matches(&self, id: PlayerId, by: u32) -> Result<bool, StoreError>;
    /// Set-add: adding a key already present is a no-op.
    async fn add_player_pair(&self, id: PlayerId, key: &str) -> Result<bool, StoreError>;
    async fn delete_player(&self, id: PlayerId) -> Result<bool, StoreError>;
    /// Returns the number of players removed.
    async fn delete_team_players(&self, team: TeamId) -> Result<usize, StoreError>;

    async fn insert_clash(&self, clash: Clash) -> Result<(), StoreError>;
    async fn find_clash(&self, id: ClashId) -> Result<Option<Clash>, StoreError>;
    async fn find_clashes(&self, filter: &ClashFilter) -> Result<Vec<Clash>, StoreError>;
    /// Overwrite the clash with the same id only if the stored one is not locked.
    async fn replace_unlocked_clash(&self, clash: Clash) -> Result<ClashWrite, StoreError>;
    async fn set_clash_photo(&self, id: ClashId, url: String) -> Result<bool, StoreError>;
    async fn delete_clash(&self, id: ClashId) -> Result<bool, StoreError>;

    async fn insert_notification(&self, notification: Notification) -> Result<(), StoreError>;
    async fn find_notifications(&self) -> Result<Vec<Notification>, StoreError>;
}
