//! Two submissions that both read a clash as unlocked: the conditional write
//! lets exactly one through, and standings and appearances are credited once.

use async_trait::async_trait;
use badminton_league::store::{ClashFilter, ClashWrite};
use badminton_league::{
    Clash, ClashId, ClashStatus, Game, GameSide, Grouping, League, LeagueSettings, MemoryStore,
    NewClash, NewPlayer, NewTeam, Notification, Player, PlayerId, RecordDelta, ScoreSubmission,
    Stage, Store, StoreError, Team, TeamId, TeamRecord, TournamentError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Delegates to [`MemoryStore`], but `find_clash` suspends after reading, so a
/// concurrent submission can lock the clash before the reader resumes.
#[derive(Default)]
struct SlowReads {
    inner: MemoryStore,
    refused_writes: AtomicUsize,
}

#[async_trait]
impl Store for SlowReads {
    async fn insert_team(&self, team: Team) -> Result<(), StoreError> {
        self.inner.insert_team(team).await
    }
    async fn find_team(&self, id: TeamId) -> Result<Option<Team>, StoreError> {
        self.inner.find_team(id).await
    }
    async fn find_teams(&self, pool: Option<&str>) -> Result<Vec<Team>, StoreError> {
        self.inner.find_teams(pool).await
    }
    async fn update_team_details(
        &self,
        id: TeamId,
        name: String,
        grouping: Grouping,
    ) -> Result<Option<Team>, StoreError> {
        self.inner.update_team_details(id, name, grouping).await
    }
    async fn increment_team_record(
        &self,
        id: TeamId,
        delta: &RecordDelta,
    ) -> Result<Option<TeamRecord>, StoreError> {
        self.inner.increment_team_record(id, delta).await
    }
    async fn push_team_player(&self, team: TeamId, player: PlayerId) -> Result<bool, StoreError> {
        self.inner.push_team_player(team, player).await
    }
    async fn pull_team_player(&self, team: TeamId, player: PlayerId) -> Result<bool, StoreError> {
        self.inner.pull_team_player(team, player).await
    }
    async fn delete_team(&self, id: TeamId) -> Result<bool, StoreError> {
        self.inner.delete_team(id).await
    }

    async fn insert_player(&self, player: Player) -> Result<(), StoreError> {
        self.inner.insert_player(player).await
    }
    async fn find_player(&self, id: PlayerId) -> Result<Option<Player>, StoreError> {
        self.inner.find_player(id).await
    }
    async fn find_players(&self, team: Option<TeamId>) -> Result<Vec<Player>, StoreError> {
        self.inner.find_players(team).await
    }
    async fn update_player_details(
        &self,
        id: PlayerId,
        name: String,
        team_id: TeamId,
    ) -> Result<Option<Player>, StoreError> {
        self.inner.update_player_details(id, name, team_id).await
    }
    async fn increment_player_matches(&self, id: PlayerId, by: u32) -> Result<bool, StoreError> {
        self.inner.increment_player_matches(id, by).await
    }
    async fn add_player_pair(&self, id: PlayerId, key: &str) -> Result<bool, StoreError> {
        self.inner.add_player_pair(id, key).await
    }
    async fn delete_player(&self, id: PlayerId) -> Result<bool, StoreError> {
        self.inner.delete_player(id).await
    }
    async fn delete_team_players(&self, team: TeamId) -> Result<usize, StoreError> {
        self.inner.delete_team_players(team).await
    }

    async fn insert_clash(&self, clash: Clash) -> Result<(), StoreError> {
        self.inner.insert_clash(clash).await
    }
    async fn find_clash(&self, id: ClashId) -> Result<Option<Clash>, StoreError> {
        let snapshot = self.inner.find_clash(id).await?;
        tokio::task::yield_now().await;
        Ok(snapshot)
    }
    async fn find_clashes(&self, filter: &ClashFilter) -> Result<Vec<Clash>, StoreError> {
        self.inner.find_clashes(filter).await
    }
    async fn replace_unlocked_clash(&self, clash: Clash) -> Result<ClashWrite, StoreError> {
        let write = self.inner.replace_unlocked_clash(clash).await?;
        if matches!(write, ClashWrite::Locked) {
            self.refused_writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(write)
    }
    async fn set_clash_photo(&self, id: ClashId, url: String) -> Result<bool, StoreError> {
        self.inner.set_clash_photo(id, url).await
    }
    async fn delete_clash(&self, id: ClashId) -> Result<bool, StoreError> {
        self.inner.delete_clash(id).await
    }

    async fn insert_notification(&self, notification: Notification) -> Result<(), StoreError> {
        self.inner.insert_notification(notification).await
    }
    async fn find_notifications(&self) -> Result<Vec<Notification>, StoreError> {
        self.inner.find_notifications().await
    }
}

async fn team(league: &League, code: &str, n: u32) -> Team {
    league
        .create_team(NewTeam {
            name: code.to_string(),
            grouping: Grouping::Pool { pool: "X".into(), pool_number: n },
        })
        .await
        .unwrap()
}

async fn player(league: &League, name: &str, team: &Team) -> Player {
    league
        .create_player(NewPlayer { name: name.into(), team_id: team.id })
        .await
        .unwrap()
}

#[tokio::test]
async fn interleaved_submissions_are_settled_by_the_conditional_write() {
    let store = Arc::new(SlowReads::default());
    let league = League::new(store.clone(), LeagueSettings::default());
    let x1 = team(&league, "X1", 1).await;
    let x2 = team(&league, "X2", 2).await;
    let ana = player(&league, "Ana", &x1).await;
    let cai = player(&league, "Cai", &x2).await;
    let clash = league
        .create_clash(NewClash {
            clash_name: "X1 vs X2".into(),
            team1_id: x1.id,
            team2_id: x2.id,
            stage: Stage::League,
            scheduled_time: None,
        })
        .await
        .unwrap();

    let scores: Vec<Game> = (1..=3)
        .map(|n| Game {
            team1: GameSide { player1_id: Some(ana.id), player2_id: None, sets: [21, 0, 0] },
            team2: GameSide { player1_id: Some(cai.id), player2_id: None, sets: [11, 0, 0] },
            completed: true,
            ..Game::empty(n)
        })
        .collect();
    let submission = || ScoreSubmission {
        scores: scores.clone(),
        status: ClashStatus::Live,
        winner_id: None,
        start_time: None,
        end_time: None,
    };

    let (first, second) = tokio::join!(
        league.submit_score(clash.id, submission()),
        league.submit_score(clash.id, submission()),
    );

    assert!(first.unwrap().is_locked);
    assert!(matches!(second, Err(TournamentError::ClashLocked(id)) if id == clash.id));
    assert_eq!(store.refused_writes.load(Ordering::SeqCst), 1);

    let winner = league.team(x1.id).await.unwrap().record;
    assert_eq!((winner.points, winner.matches_played, winner.total_games_won), (2, 1, 3));
    let loser = league.team(x2.id).await.unwrap().record;
    assert_eq!((loser.matches_played, loser.matches_lost), (1, 1));
    assert_eq!(league.player(ana.id).await.unwrap().matches_played, 3);
    assert_eq!(league.player(cai.id).await.unwrap().matches_played, 3);
}
