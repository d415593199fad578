//! Team, its grouping and its standings record.

use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team.
pub type TeamId = Uuid;

/// Where a team sits in the league: a numbered slot in a pool, or a captain's block.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Grouping {
    Pool { pool: String, pool_number: u32 },
    Block { captain: String, block: String },
}

impl Grouping {
    /// Label shared by every team playing the same round-robin (pool or block name).
    pub fn label(&self) -> &str {
        match self {
            Grouping::Pool { pool, .. } => pool,
            Grouping::Block { block, .. } => block,
        }
    }

    /// Fixture-table code such as `X3`. Blocks have no numbered slots.
    pub fn code(&self) -> Option<String> {
        match self {
            Grouping::Pool { pool, pool_number } => Some(format!("{pool}{pool_number}")),
            Grouping::Block { .. } => None,
        }
    }
}

/// Aggregate league record. Only the standings ledger mutates it.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub matches_played: u32,
    pub matches_won: u32,
    pub matches_lost: u32,
    pub points: u32,
    pub total_games_won: u32,
    pub total_games_lost: u32,
    /// Always `total_games_won - total_games_lost`.
    pub point_difference: i64,
}

/// Increments applied to one team's record for one completed clash.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RecordDelta {
    pub won: u32,
    pub lost: u32,
    pub points: u32,
    pub games_won: u32,
    pub games_lost: u32,
}

impl TeamRecord {
    /// Add the delta and recompute the point difference.
    pub fn apply(&mut self, delta: &RecordDelta) {
        self.matches_played += delta.won + delta.lost;
        self.matches_won += delta.won;
        self.matches_lost += delta.lost;
        self.points += delta.points;
        self.total_games_won += delta.games_won;
        self.total_games_lost += delta.games_lost;
        self.point_difference = i64::from(self.total_games_won) - i64::from(self.total_games_lost);
    }
}

/// A registered team.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(flatten)]
    pub grouping: Grouping,
    /// Player ids in registration order.
    pub players: Vec<PlayerId>,
    #[serde(flatten)]
    pub record: TeamRecord,
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// Create a new team with an empty roster and a zeroed record.
    pub fn new(name: impl Into<String>, grouping: Grouping) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            grouping,
            players: Vec::new(),
            record: TeamRecord::default(),
            created_at: Utc::now(),
        }
    }

    pub fn pool(&self) -> &str {
        self.grouping.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_keeps_point_difference_consistent() {
        let mut record = TeamRecord::default();
        record.apply(&RecordDelta { won: 1, points: 2, games_won: 3, games_lost: 1, ..Default::default() });
        record.apply(&RecordDelta { lost: 1, games_won: 0, games_lost: 3, ..Default::default() });
        assert_eq!(record.matches_played, 2);
        assert_eq!(record.points, 2);
        assert_eq!(record.point_difference, -1);
        assert_eq!(
            record.point_difference,
            i64::from(record.total_games_won) - i64::from(record.total_games_lost)
        );
    }

    #[test]
    fn grouping_serializes_flat() {
        let team = Team::new("Smashers", Grouping::Pool { pool: "X".into(), pool_number: 3 });
        let json = serde_json::to_value(&team).unwrap();
        assert_eq!(json["pool"], "X");
        assert_eq!(json["pool_number"], 3);
        assert_eq!(json["points"], 0);
        let back: Team = serde_json::from_value(json).unwrap();
        assert_eq!(back.grouping.code().as_deref(), Some("X3"));
    }
}
