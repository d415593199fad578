//! Game (one contest inside a clash) and Side.

use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};

/// Which side of a clash: the first or the second listed team.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "team1")]
    One,
    #[serde(rename = "team2")]
    Two,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }
}

/// One side's line-up and set scores in a game.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameSide {
    #[serde(default)]
    pub player1_id: Option<PlayerId>,
    /// Partner for doubles; absent for singles.
    #[serde(default)]
    pub player2_id: Option<PlayerId>,
    /// Points per set, 0 for a set not played.
    #[serde(default)]
    pub sets: [u32; 3],
}

impl GameSide {
    /// Named participants on this side.
    pub fn participants(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.player1_id.iter().chain(self.player2_id.iter()).copied()
    }

    /// Both partners, when this side played doubles.
    pub fn pair(&self) -> Option<(PlayerId, PlayerId)> {
        Some((self.player1_id?, self.player2_id?))
    }
}

/// A single game inside a clash.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// 1-based position inside the clash.
    pub match_number: u32,
    #[serde(default)]
    pub team1: GameSide,
    #[serde(default)]
    pub team2: GameSide,
    /// None until decided.
    #[serde(default)]
    pub winner: Option<Side>,
    #[serde(default)]
    pub completed: bool,
    /// Points the winner earns under points-awarded scoring.
    #[serde(default)]
    pub points_value: Option<u32>,
}

impl Game {
    /// An unplayed game at position `match_number`.
    pub fn empty(match_number: u32) -> Self {
        Self {
            match_number,
            ..Self::default()
        }
    }

    pub fn side(&self, side: Side) -> &GameSide {
        match side {
            Side::One => &self.team1,
            Side::Two => &self.team2,
        }
    }

    /// Set scores `(team1, team2)` for set `index` (0-based).
    pub fn set(&self, index: usize) -> (u32, u32) {
        (self.team1.sets[index], self.team2.sets[index])
    }

    /// Every named participant on both sides.
    pub fn participants(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.team1.participants().chain(self.team2.participants())
    }
}
