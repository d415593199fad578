//! Standings ledger: record increments for completed league clashes, and leaderboard order.

use crate::logic::{League, ScoringPolicy};
use crate::models::{Clash, RecordDelta, Team, TeamId, TournamentError};
use std::cmp::Ordering;

/// League points for winning a clash under set-based scoring.
pub const LEAGUE_WIN_POINTS: u32 = 2;

/// A decided league clash, from the winner's point of view.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MatchResult {
    pub winner: TeamId,
    pub loser: TeamId,
    pub winner_games_won: u32,
    pub winner_games_lost: u32,
    pub points_earned: u32,
}

impl MatchResult {
    pub fn winner_delta(&self) -> RecordDelta {
        RecordDelta {
            won: 1,
            lost: 0,
            points: self.points_earned,
            games_won: self.winner_games_won,
            games_lost: self.winner_games_lost,
        }
    }

    pub fn loser_delta(&self) -> RecordDelta {
        RecordDelta {
            won: 0,
            lost: 1,
            points: 0,
            games_won: self.winner_games_lost,
            games_lost: self.winner_games_won,
        }
    }
}

/// Leaderboard order: points desc, then matches lost asc, then point difference desc.
pub fn compare_standings(a: &Team, b: &Team) -> Ordering {
    b.record
        .points
        .cmp(&a.record.points)
        .then_with(|| a.record.matches_lost.cmp(&b.record.matches_lost))
        .then_with(|| b.record.point_difference.cmp(&a.record.point_difference))
}

/// Sort teams best first. Stable: full ties keep their registration order.
pub fn rank_teams(teams: &mut [Team]) {
    teams.sort_by(compare_standings);
}

impl League {
    /// The ledger entry a decided clash produces, if it has a winner.
    pub(crate) fn match_result(&self, clash: &Clash) -> Option<MatchResult> {
        let winner = clash.winner_id?;
        let loser = clash.loser_id()?;
        let (won, lost) = if winner == clash.team1_id {
            (clash.team1_games_won, clash.team2_games_won)
        } else {
            (clash.team2_games_won, clash.team1_games_won)
        };
        let points_earned = match self.settings.policy {
            ScoringPolicy::SetBased => LEAGUE_WIN_POINTS,
            ScoringPolicy::PointsAwarded { .. } => won,
        };
        Some(MatchResult {
            winner,
            loser,
            winner_games_won: won,
            winner_games_lost: lost,
            points_earned,
        })
    }

    /// Credit a decided clash to both teams' records.
    ///
    /// Performs no deduplication: the caller invokes it once per clash, on the
    /// transition into `completed`.
    pub async fn apply_match_result(&self, result: &MatchResult) -> Result<(), TournamentError> {
        for id in [result.winner, result.loser] {
            if self.store.find_team(id).await?.is_none() {
                return Err(TournamentError::TeamNotFound(id));
            }
        }
        let winner = self
            .store
            .increment_team_record(result.winner, &result.winner_delta())
            .await?
            .ok_or(TournamentError::TeamNotFound(result.winner))?;
        let loser = self
            .store
            .increment_team_record(result.loser, &result.loser_delta())
            .await?
            .ok_or(TournamentError::TeamNotFound(result.loser))?;
        log::info!(
            "Standings: {} now {} pts ({:+}), {} now {} pts ({:+})",
            result.winner,
            winner.points,
            winner.point_difference,
            result.loser,
            loser.points,
            loser.point_difference
        );
        Ok(())
    }

    /// Teams in leaderboard order, optionally restricted to one pool.
    pub async fn leaderboard(&self, pool: Option<&str>) -> Result<Vec<Team>, TournamentError> {
        let mut teams = self.store.find_teams(pool).await?;
        rank_teams(&mut teams);
        Ok(teams)
    }
}
