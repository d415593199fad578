//! Stage progression: pool completion, semi-final seeding, finals and third place.
//!
//! `league → semifinal → final / third_place`. Each generator checks every
//! precondition before writing, so a rejected call leaves the store untouched.

use crate::logic::League;
use crate::models::{Clash, Stage, Team, TeamId, TournamentError};
use crate::store::ClashFilter;
use serde::Serialize;
use std::collections::HashMap;

/// Progress of one pool's league stage.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PoolStatus {
    pub pool: String,
    pub total_clashes: usize,
    pub completed_clashes: usize,
    /// At least one league clash exists and all of them are locked.
    pub is_complete: bool,
}

impl League {
    async fn pool_team_ids(&self, pool: &str) -> Result<Vec<TeamId>, TournamentError> {
        Ok(self
            .store
            .find_teams(Some(pool))
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect())
    }

    async fn status_of(&self, pool: &str, team_ids: Vec<TeamId>) -> Result<PoolStatus, TournamentError> {
        let clashes = self
            .store
            .find_clashes(&ClashFilter::stage(Stage::League).within(team_ids))
            .await?;
        let completed = clashes.iter().filter(|c| c.is_locked).count();
        Ok(PoolStatus {
            pool: pool.to_string(),
            total_clashes: clashes.len(),
            completed_clashes: completed,
            is_complete: !clashes.is_empty() && completed == clashes.len(),
        })
    }

    /// League progress for the teams of `pool`. Never vacuously complete.
    pub async fn pool_status(&self, pool: &str) -> Result<PoolStatus, TournamentError> {
        let team_ids = self.pool_team_ids(pool).await?;
        self.status_of(pool, team_ids).await
    }

    /// Through the engine's own writes a pool with one team has no league clash,
    /// so `PoolIncomplete` fires first; this guards stores seeded elsewhere.
    async fn top_two(&self, pool: &str) -> Result<(Team, Team), TournamentError> {
        let mut ranked = self.leaderboard(Some(pool)).await?.into_iter();
        match (ranked.next(), ranked.next()) {
            (Some(first), Some(second)) => Ok((first, second)),
            _ => Err(TournamentError::NotEnoughTeams(pool.to_string())),
        }
    }

    /// Seed the semi-finals from the two pools' leaderboards.
    ///
    /// SF1 is pool A's first against pool B's second, SF2 is A's second against B's first.
    pub async fn generate_semifinals(&self) -> Result<Vec<Clash>, TournamentError> {
        let [pool_a, pool_b] = &self.settings.pools;
        for pool in [pool_a, pool_b] {
            let team_ids = self.pool_team_ids(pool).await?;
            if team_ids.is_empty() {
                return Err(TournamentError::NoTeamsInPool(pool.clone()));
            }
            if !self.status_of(pool, team_ids).await?.is_complete {
                return Err(TournamentError::PoolIncomplete(pool.clone()));
            }
        }
        let existing = self.store.find_clashes(&ClashFilter::stage(Stage::Semifinal)).await?;
        if existing.len() >= 2 {
            return Err(TournamentError::SemiFinalsAlreadyGenerated);
        }

        let (a1, a2) = self.top_two(pool_a).await?;
        let (b1, b2) = self.top_two(pool_b).await?;
        let semis = vec![
            self.knockout_clash(&a1, &b2, Stage::Semifinal),
            self.knockout_clash(&a2, &b1, Stage::Semifinal),
        ];
        for clash in &semis {
            self.store.insert_clash(clash.clone()).await?;
        }
        log::info!("Semi-finals generated: {} / {}", semis[0].clash_name, semis[1].clash_name);
        Ok(semis)
    }

    /// Final between the semi-final winners, third place between the losers.
    pub async fn generate_finals(&self) -> Result<Vec<Clash>, TournamentError> {
        let semis = self.store.find_clashes(&ClashFilter::stage(Stage::Semifinal)).await?;
        if semis.len() < 2 {
            return Err(TournamentError::SemiFinalsNotCreated);
        }
        if semis.len() > 2 {
            return Err(TournamentError::TooManySemiFinals(semis.len()));
        }
        if semis.iter().any(|sf| !sf.is_locked) {
            return Err(TournamentError::SemiFinalsIncomplete);
        }
        let existing = self
            .store
            .find_clashes(&ClashFilter::stages(&[Stage::Final, Stage::ThirdPlace]))
            .await?;
        if existing.len() >= 2 {
            return Err(TournamentError::FinalsAlreadyGenerated);
        }

        let (sf1, sf2) = (&semis[0], &semis[1]);
        let (Some(w1), Some(l1), Some(w2), Some(l2)) =
            (sf1.winner_id, sf1.loser_id(), sf2.winner_id, sf2.loser_id())
        else {
            return Err(TournamentError::SemiFinalsIncomplete);
        };

        let teams: HashMap<TeamId, Team> = self
            .store
            .find_teams(None)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();
        let name = |id: TeamId| teams.get(&id).map_or("TBD", |t| t.name.as_str()).to_string();

        let finals = vec![
            Clash::new(
                format!("{} vs {}", name(w1), name(w2)),
                w1,
                w2,
                Stage::Final,
                self.empty_games(),
            ),
            Clash::new(
                format!("{} vs {}", name(l1), name(l2)),
                l1,
                l2,
                Stage::ThirdPlace,
                self.empty_games(),
            ),
        ];
        for clash in &finals {
            self.store.insert_clash(clash.clone()).await?;
        }
        log::info!("Finals generated: {} / {}", finals[0].clash_name, finals[1].clash_name);
        Ok(finals)
    }

    fn knockout_clash(&self, team1: &Team, team2: &Team, stage: Stage) -> Clash {
        Clash::new(
            format!("{} vs {}", team1.name, team2.name),
            team1.id,
            team2.id,
            stage,
            self.empty_games(),
        )
    }
}
