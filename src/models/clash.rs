//! Clash (a tie between two teams), Stage and ClashStatus.

use crate::models::game::{Game, Side};
use crate::models::team::TeamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a clash.
pub type ClashId = Uuid;

/// Phase of the tournament a clash belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    League,
    Semifinal,
    Final,
    ThirdPlace,
}

impl Stage {
    pub fn is_knockout(self) -> bool {
        !matches!(self, Stage::League)
    }
}

/// Lifecycle of a clash.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClashStatus {
    #[default]
    Upcoming,
    Live,
    Completed,
}

/// A tie between two teams, made of up to five games.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Clash {
    pub id: ClashId,
    pub clash_name: String,
    pub team1_id: TeamId,
    pub team2_id: TeamId,
    pub stage: Stage,
    pub status: ClashStatus,
    pub scheduled_time: Option<String>,
    /// Raw caller-supplied timestamps; may not parse.
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub duration_minutes: Option<i64>,
    pub scores: Vec<Game>,
    /// Games won (set-based) or points earned (points-awarded) by each side.
    pub team1_games_won: u32,
    pub team2_games_won: u32,
    pub winner_id: Option<TeamId>,
    /// Set once the tie is decided; no score changes are accepted afterwards.
    pub is_locked: bool,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Clash {
    /// Create an upcoming clash with the given (usually empty) games.
    pub fn new(
        clash_name: impl Into<String>,
        team1_id: TeamId,
        team2_id: TeamId,
        stage: Stage,
        scores: Vec<Game>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            clash_name: clash_name.into(),
            team1_id,
            team2_id,
            stage,
            status: ClashStatus::Upcoming,
            scheduled_time: None,
            start_time: None,
            end_time: None,
            duration_minutes: None,
            scores,
            team1_games_won: 0,
            team2_games_won: 0,
            winner_id: None,
            is_locked: false,
            photo_url: None,
            created_at: Utc::now(),
        }
    }

    pub fn team(&self, side: Side) -> TeamId {
        match side {
            Side::One => self.team1_id,
            Side::Two => self.team2_id,
        }
    }

    /// Which side `team` plays on, if it plays in this clash at all.
    pub fn side_of(&self, team: TeamId) -> Option<Side> {
        if team == self.team1_id {
            Some(Side::One)
        } else if team == self.team2_id {
            Some(Side::Two)
        } else {
            None
        }
    }

    /// The decided loser, if a winner is set.
    pub fn loser_id(&self) -> Option<TeamId> {
        let winner = self.side_of(self.winner_id?)?;
        Some(self.team(winner.other()))
    }

    /// Whether both teams belong to `teams`.
    pub fn is_within(&self, teams: &[TeamId]) -> bool {
        teams.contains(&self.team1_id) && teams.contains(&self.team2_id)
    }
}
