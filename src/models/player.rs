//! Player data structure.

use crate::models::team::TeamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Unique identifier for a player (used in games and lookups).
pub type PlayerId = Uuid;

/// A player registered to exactly one team.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub team_id: TeamId,
    /// Completed games this player took part in.
    pub matches_played: u32,
    /// Canonical keys of every doubles pair this player has been part of.
    pub pairs_history: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Create a new player with the given name. Counters start at zero.
    pub fn new(name: impl Into<String>, team_id: TeamId) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            team_id,
            matches_played: 0,
            pairs_history: BTreeSet::new(),
            created_at: Utc::now(),
        }
    }

    /// Whether this player has partnered `other` before.
    pub fn has_partnered(&self, other: PlayerId) -> bool {
        self.pairs_history
            .contains(&crate::logic::pair_key(self.id, other))
    }
}
