//! League fixtures: the static round-robin pairing table, and manual clash creation.

use crate::logic::League;
use crate::models::{Clash, Stage, TeamId, TournamentError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Opponents of each numbered slot in a seven-team pool. Every slot meets four others.
const SLOT_OPPONENTS: [(u32, [u32; 4]); 7] = [
    (1, [2, 3, 6, 7]),
    (2, [1, 3, 4, 7]),
    (3, [1, 2, 4, 5]),
    (4, [2, 3, 5, 6]),
    (5, [3, 4, 6, 7]),
    (6, [1, 4, 5, 7]),
    (7, [1, 2, 5, 6]),
];

/// Request body for creating a clash by hand.
#[derive(Clone, Debug, Deserialize)]
pub struct NewClash {
    pub clash_name: String,
    pub team1_id: TeamId,
    pub team2_id: TeamId,
    pub stage: Stage,
    #[serde(default)]
    pub scheduled_time: Option<String>,
}

/// What `generate_fixtures` created.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct FixtureReport {
    pub success: bool,
    pub created: usize,
    pub clashes: Vec<String>,
}

impl League {
    /// Create the league clashes of both pools from the pairing table.
    ///
    /// Slots with no registered team are skipped; each team pair gets one clash
    /// per call.
    pub async fn generate_fixtures(&self) -> Result<FixtureReport, TournamentError> {
        let slots: HashMap<String, TeamId> = self
            .store
            .find_teams(None)
            .await?
            .into_iter()
            .filter_map(|t| Some((t.grouping.code()?, t.id)))
            .collect();

        let mut seen: HashSet<(TeamId, TeamId)> = HashSet::new();
        let mut report = FixtureReport {
            success: true,
            ..FixtureReport::default()
        };
        for pool in &self.settings.pools {
            for (slot, opponents) in SLOT_OPPONENTS {
                let code = format!("{pool}{slot}");
                let Some(&team1) = slots.get(&code) else {
                    continue;
                };
                for opponent in opponents {
                    let opponent_code = format!("{pool}{opponent}");
                    let Some(&team2) = slots.get(&opponent_code) else {
                        continue;
                    };
                    if !seen.insert((team1.min(team2), team1.max(team2))) {
                        continue;
                    }
                    let clash = Clash::new(
                        format!("{code} vs {opponent_code}"),
                        team1,
                        team2,
                        Stage::League,
                        self.empty_games(),
                    );
                    report.clashes.push(clash.clash_name.clone());
                    self.store.insert_clash(clash).await?;
                }
            }
        }
        report.created = report.clashes.len();
        log::info!("Generated {} league fixtures", report.created);
        Ok(report)
    }

    /// Create a single upcoming clash between two registered teams.
    pub async fn create_clash(&self, new: NewClash) -> Result<Clash, TournamentError> {
        if new.team1_id == new.team2_id {
            return Err(TournamentError::Validation("a team cannot play itself".into()));
        }
        for id in [new.team1_id, new.team2_id] {
            if self.store.find_team(id).await?.is_none() {
                return Err(TournamentError::TeamNotFound(id));
            }
        }
        let mut clash = Clash::new(
            new.clash_name,
            new.team1_id,
            new.team2_id,
            new.stage,
            self.empty_games(),
        );
        clash.scheduled_time = new.scheduled_time;
        self.store.insert_clash(clash.clone()).await?;
        Ok(clash)
    }
}
