//! Integration tests for registration, the standings ledger and notifications.

use badminton_league::{
    ClashStatus, Grouping, League, LeagueSettings, MatchResult, MemoryStore, NewClash,
    NewNotification, NewPlayer, NewTeam, ScoreSubmission, Stage, Team, TeamId, TournamentError,
};
use std::sync::Arc;

fn league() -> League {
    League::new(Arc::new(MemoryStore::new()), LeagueSettings::default())
}

async fn team(league: &League, name: &str, pool: &str, n: u32) -> Team {
    league
        .create_team(NewTeam {
            name: name.to_string(),
            grouping: Grouping::Pool { pool: pool.to_string(), pool_number: n },
        })
        .await
        .unwrap()
}

fn win(winner: TeamId, loser: TeamId, won: u32, lost: u32) -> MatchResult {
    MatchResult {
        winner,
        loser,
        winner_games_won: won,
        winner_games_lost: lost,
        points_earned: 2,
    }
}

#[tokio::test]
async fn ledger_keeps_point_difference_and_orders_leaderboard() {
    let league = league();
    let a = team(&league, "Aces", "X", 1).await;
    let b = team(&league, "Birdies", "X", 2).await;
    let c = team(&league, "Clears", "X", 3).await;
    let y = team(&league, "Yonder", "Y", 1).await;

    league.apply_match_result(&win(a.id, b.id, 3, 2)).await.unwrap();
    league.apply_match_result(&win(b.id, c.id, 3, 0)).await.unwrap();
    league.apply_match_result(&win(c.id, a.id, 3, 1)).await.unwrap();
    league.apply_match_result(&win(y.id, c.id, 3, 0)).await.unwrap();

    for team in league.teams().await.unwrap() {
        let r = &team.record;
        assert_eq!(r.point_difference, i64::from(r.total_games_won) - i64::from(r.total_games_lost));
        assert_eq!(r.matches_played, r.matches_won + r.matches_lost);
    }

    // All on 2 points; Aces and Birdies lost one each, Clears two.
    // Birdies (+2) ahead of Aces (-1) on difference.
    let table = league.leaderboard(Some("X")).await.unwrap();
    let order: Vec<_> = table.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(order, ["Birdies", "Aces", "Clears"]);
    assert_eq!(league.leaderboard(None).await.unwrap().len(), 4);
}

#[tokio::test]
async fn ledger_rejects_unknown_team_without_partial_update() {
    let league = league();
    let a = team(&league, "Aces", "X", 1).await;

    let result = league.apply_match_result(&win(a.id, TeamId::new_v4(), 3, 0)).await;
    assert!(matches!(result, Err(TournamentError::TeamNotFound(_))));
    assert_eq!(league.team(a.id).await.unwrap().record.points, 0);
}

#[tokio::test]
async fn ledger_applies_every_call() {
    let league = league();
    let a = team(&league, "Aces", "X", 1).await;
    let b = team(&league, "Birdies", "X", 2).await;

    let result = win(a.id, b.id, 3, 1);
    league.apply_match_result(&result).await.unwrap();
    league.apply_match_result(&result).await.unwrap();
    assert_eq!(league.team(a.id).await.unwrap().record.points, 4);
}

#[tokio::test]
async fn players_follow_their_roster() {
    let league = league();
    let a = team(&league, "Aces", "X", 1).await;
    let b = team(&league, "Birdies", "X", 2).await;

    let p = league
        .create_player(NewPlayer { name: " Kim ".into(), team_id: a.id })
        .await
        .unwrap();
    assert_eq!(p.name, "Kim");
    assert_eq!(league.team(a.id).await.unwrap().players, [p.id]);

    league
        .update_player(p.id, NewPlayer { name: "Kim".into(), team_id: b.id })
        .await
        .unwrap();
    assert!(league.team(a.id).await.unwrap().players.is_empty());
    assert_eq!(league.team(b.id).await.unwrap().players, [p.id]);
    assert_eq!(league.players(Some(b.id)).await.unwrap().len(), 1);

    league.delete_player(p.id).await.unwrap();
    assert!(league.team(b.id).await.unwrap().players.is_empty());
    assert!(matches!(league.player(p.id).await, Err(TournamentError::PlayerNotFound(_))));
}

#[tokio::test]
async fn registration_validates_input() {
    let league = league();
    let blank = league
        .create_team(NewTeam {
            name: "  ".into(),
            grouping: Grouping::Pool { pool: "X".into(), pool_number: 1 },
        })
        .await;
    assert!(matches!(blank, Err(TournamentError::Validation(_))));

    let orphan = league
        .create_player(NewPlayer { name: "Kim".into(), team_id: TeamId::new_v4() })
        .await;
    assert!(matches!(orphan, Err(TournamentError::TeamNotFound(_))));
}

#[tokio::test]
async fn deleting_a_team_removes_its_players() {
    let league = league();
    let a = team(&league, "Aces", "X", 1).await;
    let b = team(&league, "Birdies", "X", 2).await;
    for name in ["Kim", "Lee"] {
        league
            .create_player(NewPlayer { name: name.into(), team_id: a.id })
            .await
            .unwrap();
    }
    league
        .create_player(NewPlayer { name: "Max".into(), team_id: b.id })
        .await
        .unwrap();

    league.delete_team(a.id).await.unwrap();
    assert_eq!(league.players(None).await.unwrap().len(), 1);
    assert!(matches!(league.delete_team(a.id).await, Err(TournamentError::TeamNotFound(_))));
}

#[tokio::test]
async fn captain_blocks_group_teams() {
    let league = league();
    let team = league
        .create_team(NewTeam {
            name: "Smashers".into(),
            grouping: Grouping::Block { captain: "Ravi".into(), block: "B".into() },
        })
        .await
        .unwrap();
    assert_eq!(team.pool(), "B");
    assert_eq!(league.leaderboard(Some("B")).await.unwrap(), [team]);
}

#[tokio::test]
async fn notifications_are_newest_first_and_capped() {
    let league = league();
    for i in 0..105 {
        league
            .create_notification(NewNotification {
                title: format!("Update {i}"),
                message: "Court 2 is free".into(),
                clash_id: None,
            })
            .await
            .unwrap();
    }
    let listed = league.notifications().await.unwrap();
    assert_eq!(listed.len(), 100);
    assert_eq!(listed[0].title, "Update 104");
    assert_eq!(listed[99].title, "Update 5");
}

#[tokio::test]
async fn clash_listing_filters_by_stage_and_status() {
    let league = league();
    let a = team(&league, "Aces", "X", 1).await;
    let b = team(&league, "Birdies", "X", 2).await;
    let mut created = Vec::new();
    for stage in [Stage::League, Stage::Semifinal] {
        let clash = league
            .create_clash(NewClash {
                clash_name: "Aces vs Birdies".into(),
                team1_id: a.id,
                team2_id: b.id,
                stage,
                scheduled_time: None,
            })
            .await
            .unwrap();
        created.push(clash.id);
    }
    let (group, semi) = (created[0], created[1]);
    league
        .submit_score(
            semi,
            ScoreSubmission {
                scores: Vec::new(),
                status: ClashStatus::Live,
                winner_id: None,
                start_time: None,
                end_time: None,
            },
        )
        .await
        .unwrap();

    let ids = |clashes: Vec<badminton_league::Clash>| clashes.iter().map(|c| c.id).collect::<Vec<_>>();
    assert_eq!(ids(league.clashes(None, Some(ClashStatus::Live)).await.unwrap()), [semi]);
    assert_eq!(
        ids(league.clashes(Some(Stage::League), Some(ClashStatus::Upcoming)).await.unwrap()),
        [group]
    );
    assert!(league
        .clashes(Some(Stage::Semifinal), Some(ClashStatus::Upcoming))
        .await
        .unwrap()
        .is_empty());
    assert_eq!(ids(league.clashes(None, None).await.unwrap()), [semi, group]);
}
