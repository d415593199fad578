//! Match scoring: per-game decisions, clash tally, lock state and score submission.

use crate::logic::League;
use crate::models::{
    Clash, ClashId, ClashStatus, Game, Side, Stage, TeamId, TournamentError,
};
use crate::store::ClashWrite;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Games one side must win to decide a best-of-five tie.
pub const GAMES_TO_WIN: u32 = 3;

/// How a clash's games turn into a result.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScoringPolicy {
    /// Winners are computed from set scores; first side to [`GAMES_TO_WIN`] locks the tie.
    SetBased,
    /// Caller supplies each game's winner; the winner earns that game's points value.
    /// `schedule[i]` is the value of game `i + 1`; games past the end are worth 1.
    PointsAwarded { schedule: Vec<u32> },
}

impl ScoringPolicy {
    /// Points value of the game at 1-based position `match_number`.
    pub fn points_value(&self, match_number: u32) -> Option<u32> {
        match self {
            ScoringPolicy::SetBased => None,
            ScoringPolicy::PointsAwarded { schedule } => Some(
                match_number
                    .checked_sub(1)
                    .and_then(|i| schedule.get(i as usize))
                    .copied()
                    .unwrap_or(1),
            ),
        }
    }
}

/// Games (set-based) or points (points-awarded) credited to each side.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Tally {
    pub team1: u32,
    pub team2: u32,
}

impl Tally {
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::One => self.team1,
            Side::Two => self.team2,
        }
    }

    fn add(&mut self, side: Side, amount: u32) {
        match side {
            Side::One => self.team1 += amount,
            Side::Two => self.team2 += amount,
        }
    }
}

/// Score payload for one clash. Client-side aggregates are ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct ScoreSubmission {
    pub scores: Vec<Game>,
    pub status: ClashStatus,
    /// Only consulted under points-awarded scoring.
    #[serde(default)]
    pub winner_id: Option<TeamId>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

/// What a submission does to a clash, before anything is persisted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Verdict {
    /// Submitted games with winners (and points values) filled in.
    pub games: Vec<Game>,
    pub tally: Tally,
    /// Set only when the tie is decided.
    pub winner: Option<Side>,
    pub status: ClashStatus,
}

impl Verdict {
    pub fn is_locked(&self) -> bool {
        self.winner.is_some()
    }
}

/// Reply to an accepted score submission.
#[derive(Clone, Debug, Serialize)]
pub struct ScoreOutcome {
    pub success: bool,
    pub is_locked: bool,
    pub winner_id: Option<TeamId>,
    pub team1_games_won: u32,
    pub team2_games_won: u32,
    pub duration_minutes: Option<i64>,
}

/// League game: set 1 alone decides. Equal set-1 scores decide nothing.
pub fn decide_league_game(game: &Game) -> Option<Side> {
    let (one, two) = game.set(0);
    match one.cmp(&two) {
        std::cmp::Ordering::Greater => Some(Side::One),
        std::cmp::Ordering::Less => Some(Side::Two),
        std::cmp::Ordering::Equal => None,
    }
}

/// Knockout game: best of three sets.
///
/// Set 1 always counts and goes to side 2 unless side 1 is strictly ahead.
/// Sets 2 and 3 count only when both sides scored in them. A 1-1 split of
/// played sets decides nothing.
pub fn decide_knockout_game(game: &Game) -> Option<Side> {
    let mut sets = Tally::default();
    for index in 0..3 {
        let (one, two) = game.set(index);
        if index > 0 && (one == 0 || two == 0) {
            continue;
        }
        sets.add(if one > two { Side::One } else { Side::Two }, 1);
    }
    match sets.team1.cmp(&sets.team2) {
        std::cmp::Ordering::Greater => Some(Side::One),
        std::cmp::Ordering::Less => Some(Side::Two),
        std::cmp::Ordering::Equal => None,
    }
}

/// Winner of a completed game under set-based scoring.
pub fn decide_game(stage: Stage, game: &Game) -> Option<Side> {
    if stage.is_knockout() {
        decide_knockout_game(game)
    } else {
        decide_league_game(game)
    }
}

/// Evaluate a submission for a clash at `stage`.
///
/// `claimed_winner` is the caller's winner, already resolved to a side; only
/// points-awarded scoring uses it.
pub fn evaluate(
    policy: &ScoringPolicy,
    stage: Stage,
    submission: &ScoreSubmission,
    claimed_winner: Option<Side>,
) -> Verdict {
    let mut games = submission.scores.clone();
    let mut tally = Tally::default();

    match policy {
        ScoringPolicy::SetBased => {
            for game in &mut games {
                game.winner = if game.completed { decide_game(stage, game) } else { None };
                log::debug!("game {} decided for {:?}", game.match_number, game.winner);
                if let Some(side) = game.winner {
                    tally.add(side, 1);
                }
            }
            let winner = [Side::One, Side::Two]
                .into_iter()
                .find(|&side| tally.get(side) >= GAMES_TO_WIN);
            let status = if winner.is_some() {
                ClashStatus::Completed
            } else {
                submission.status
            };
            Verdict { games, tally, winner, status }
        }
        ScoringPolicy::PointsAwarded { .. } => {
            for game in &mut games {
                if game.points_value.is_none() {
                    game.points_value = policy.points_value(game.match_number);
                }
                if let Some(side) = game.winner {
                    game.completed = true;
                    tally.add(side, game.points_value.unwrap_or(1));
                }
            }
            let winner = claimed_winner.filter(|_| submission.status == ClashStatus::Completed);
            Verdict {
                games,
                tally,
                winner,
                status: submission.status,
            }
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .ok()
        .or_else(|| raw.parse::<NaiveDateTime>().ok().map(|t| t.and_utc()))
}

/// Whole minutes between two caller timestamps, rounded down.
///
/// Unparseable input leaves the duration unset; it never fails the request.
pub fn duration_minutes(start: Option<&str>, end: Option<&str>) -> Option<i64> {
    let (start, end) = (start?, end?);
    match (parse_timestamp(start), parse_timestamp(end)) {
        (Some(start), Some(end)) => Some((end - start).num_seconds().div_euclid(60)),
        _ => {
            log::warn!("Ignoring unparseable clash times {start:?} / {end:?}");
            None
        }
    }
}

impl League {
    /// Apply a score submission to a clash.
    ///
    /// Locked clashes are rejected with [`TournamentError::ClashLocked`] and left untouched.
    /// The clash write is conditional on the stored clash still being unlocked, so
    /// standings are credited at most once per clash.
    pub async fn submit_score(
        &self,
        clash_id: ClashId,
        submission: ScoreSubmission,
    ) -> Result<ScoreOutcome, TournamentError> {
        if submission.scores.len() > self.settings.games_per_clash {
            return Err(TournamentError::Validation(format!(
                "a clash has at most {} games, got {}",
                self.settings.games_per_clash,
                submission.scores.len()
            )));
        }
        let clash = self
            .store
            .find_clash(clash_id)
            .await?
            .ok_or(TournamentError::ClashNotFound(clash_id))?;
        if clash.is_locked {
            log::warn!("Rejected score for locked clash {}", clash.clash_name);
            return Err(TournamentError::ClashLocked(clash_id));
        }
        let claimed_winner = submission
            .winner_id
            .map(|team| {
                clash.side_of(team).ok_or_else(|| {
                    TournamentError::Validation(format!("team {team} does not play in this clash"))
                })
            })
            .transpose()?;

        let verdict = evaluate(&self.settings.policy, clash.stage, &submission, claimed_winner);
        let duration = duration_minutes(submission.start_time.as_deref(), submission.end_time.as_deref());
        let updated = Clash {
            scores: verdict.games.clone(),
            team1_games_won: verdict.tally.team1,
            team2_games_won: verdict.tally.team2,
            winner_id: verdict.winner.map(|side| clash.team(side)),
            status: verdict.status,
            is_locked: verdict.is_locked(),
            start_time: submission.start_time,
            end_time: submission.end_time,
            duration_minutes: duration,
            ..clash
        };

        let previous = match self.store.replace_unlocked_clash(updated.clone()).await? {
            ClashWrite::Replaced(previous) => previous,
            ClashWrite::Locked => {
                log::warn!("Clash {} was locked by a concurrent submission", updated.clash_name);
                return Err(TournamentError::ClashLocked(clash_id));
            }
            ClashWrite::Missing => return Err(TournamentError::ClashNotFound(clash_id)),
        };

        if updated.is_locked {
            log::info!(
                "Clash {} decided {}-{}",
                updated.clash_name,
                updated.team1_games_won,
                updated.team2_games_won
            );
        }
        if updated.stage == Stage::League && updated.status == ClashStatus::Completed {
            if let Some(result) = self.match_result(&updated) {
                self.apply_match_result(&result).await?;
            }
        }
        self.record_participation(&previous.scores, &updated.scores).await?;

        Ok(ScoreOutcome {
            success: true,
            is_locked: updated.is_locked,
            winner_id: updated.winner_id,
            team1_games_won: updated.team1_games_won,
            team2_games_won: updated.team2_games_won,
            duration_minutes: updated.duration_minutes,
        })
    }
}
