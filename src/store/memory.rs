//! In-memory store: every collection behind one `RwLock`, so each primitive is atomic.

use super::{ClashFilter, ClashWrite, Store, StoreError};
use crate::models::{
    Clash, ClashId, Grouping, Notification, Player, PlayerId, RecordDelta, Team, TeamId,
    TeamRecord,
};
use async_trait::async_trait;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Collections {
    teams: Vec<Team>,
    players: Vec<Player>,
    clashes: Vec<Clash>,
    notifications: Vec<Notification>,
}

impl Collections {
    fn team_mut(&mut self, id: TeamId) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| t.id == id)
    }

    fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }
}

/// Process-local store, used by the web binary and the tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Collections>, StoreError> {
        self.inner.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Collections>, StoreError> {
        self.inner.write().map_err(|_| StoreError::Poisoned)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_team(&self, team: Team) -> Result<(), StoreError> {
        self.write()?.teams.push(team);
        Ok(())
    }

    async fn find_team(&self, id: TeamId) -> Result<Option<Team>, StoreError> {
        Ok(self.read()?.teams.iter().find(|t| t.id == id).cloned())
    }

    async fn find_teams(&self, pool: Option<&str>) -> Result<Vec<Team>, StoreError> {
        Ok(self
            .read()?
            .teams
            .iter()
            .filter(|t| pool.is_none_or(|p| t.pool() == p))
            .cloned()
            .collect())
    }

    async fn update_team_details(
        &self,
        id: TeamId,
        name: String,
        grouping: Grouping,
    ) -> Result<Option<Team>, StoreError> {
        let mut g = self.write()?;
        Ok(g.team_mut(id).map(|t| {
            t.name = name;
            t.grouping = grouping;
            t.clone()
        }))
    }

    async fn increment_team_record(
        &self,
        id: TeamId,
        delta: &RecordDelta,
    ) -> Result<Option<TeamRecord>, StoreError> {
        let mut g = self.write()?;
        Ok(g.team_mut(id).map(|t| {
            t.record.apply(delta);
            t.record.clone()
        }))
    }

    async fn push_team_player(&self, team: TeamId, player: PlayerId) -> Result<bool, StoreError> {
        let mut g = self.write()?;
        let Some(t) = g.team_mut(team) else {
            return Ok(false);
        };
        t.players.push(player);
        Ok(true)
    }

    async fn pull_team_player(&self, team: TeamId, player: PlayerId) -> Result<bool, StoreError> {
        let mut g = self.write()?;
        let Some(t) = g.team_mut(team) else {
            return Ok(false);
        };
        t.players.retain(|p| *p != player);
        Ok(true)
    }

    async fn delete_team(&self, id: TeamId) -> Result<bool, StoreError> {
        let mut g = self.write()?;
        let before = g.teams.len();
        g.teams.retain(|t| t.id != id);
        Ok(g.teams.len() != before)
    }

    async fn insert_player(&self, player: Player) -> Result<(), StoreError> {
        self.write()?.players.push(player);
        Ok(())
    }

    async fn find_player(&self, id: PlayerId) -> Result<Option<Player>, StoreError> {
        Ok(self.read()?.players.iter().find(|p| p.id == id).cloned())
    }

    async fn find_players(&self, team: Option<TeamId>) -> Result<Vec<Player>, StoreError> {
        Ok(self
            .read()?
            .players
            .iter()
            .filter(|p| team.is_none_or(|t| p.team_id == t))
            .cloned()
            .collect())
    }

    async fn update_player_details(
        &self,
        id: PlayerId,
        name: String,
        team_id: TeamId,
    ) -> Result<Option<Player>, StoreError> {
        let mut g = self.write()?;
        Ok(g.player_mut(id).map(|p| {
            p.name = name;
            p.team_id = team_id;
            p.clone()
        }))
    }

    async fn increment_player_matches(&self, id: PlayerId, by: u32) -> Result<bool, StoreError> {
        let mut g = self.write()?;
        let Some(p) = g.player_mut(id) else {
            return Ok(false);
        };
        p.matches_played += by;
        Ok(true)
    }

    async fn add_player_pair(&self, id: PlayerId, key: &str) -> Result<bool, StoreError> {
        let mut g = self.write()?;
        let Some(p) = g.player_mut(id) else {
            return Ok(false);
        };
        p.pairs_history.insert(key.to_owned());
        Ok(true)
    }

    async fn delete_player(&self, id: PlayerId) -> Result<bool, StoreError> {
        let mut g = self.write()?;
        let before = g.players.len();
        g.players.retain(|p| p.id != id);
        Ok(g.players.len() != before)
    }

    async fn delete_team_players(&self, team: TeamId) -> Result<usize, StoreError> {
        let mut g = self.write()?;
        let before = g.players.len();
        g.players.retain(|p| p.team_id != team);
        Ok(before - g.players.len())
    }

    async fn insert_clash(&self, clash: Clash) -> Result<(), StoreError> {
        self.write()?.clashes.push(clash);
        Ok(())
    }

    async fn find_clash(&self, id: ClashId) -> Result<Option<Clash>, StoreError> {
        Ok(self.read()?.clashes.iter().find(|c| c.id == id).cloned())
    }

    async fn find_clashes(&self, filter: &ClashFilter) -> Result<Vec<Clash>, StoreError> {
        Ok(self
            .read()?
            .clashes
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }

    async fn replace_unlocked_clash(&self, clash: Clash) -> Result<ClashWrite, StoreError> {
        let mut g = self.write()?;
        let Some(stored) = g.clashes.iter_mut().find(|c| c.id == clash.id) else {
            return Ok(ClashWrite::Missing);
        };
        if stored.is_locked {
            return Ok(ClashWrite::Locked);
        }
        Ok(ClashWrite::Replaced(std::mem::replace(stored, clash)))
    }

    async fn set_clash_photo(&self, id: ClashId, url: String) -> Result<bool, StoreError> {
        let mut g = self.write()?;
        let Some(c) = g.clashes.iter_mut().find(|c| c.id == id) else {
            return Ok(false);
        };
        c.photo_url = Some(url);
        Ok(true)
    }

    async fn delete_clash(&self, id: ClashId) -> Result<bool, StoreError> {
        let mut g = self.write()?;
        let before = g.clashes.len();
        g.clashes.retain(|c| c.id != id);
        Ok(g.clashes.len() != before)
    }

    async fn insert_notification(&self, notification: Notification) -> Result<(), StoreError> {
        self.write()?.notifications.push(notification);
        Ok(())
    }

    async fn find_notifications(&self) -> Result<Vec<Notification>, StoreError> {
        Ok(self.read()?.notifications.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Game, Stage};

    #[tokio::test]
    async fn replace_refuses_locked_clash() {
        let store = MemoryStore::new();
        let mut clash = Clash::new("A vs B", TeamId::new_v4(), TeamId::new_v4(), Stage::League, vec![Game::empty(1)]);
        clash.is_locked = true;
        store.insert_clash(clash.clone()).await.unwrap();

        let mut edited = clash.clone();
        edited.team1_games_won = 5;
        assert!(matches!(store.replace_unlocked_clash(edited).await.unwrap(), ClashWrite::Locked));
        assert_eq!(store.find_clash(clash.id).await.unwrap().unwrap(), clash);
    }

    #[tokio::test]
    async fn pair_add_is_a_set_union() {
        let store = MemoryStore::new();
        let player = Player::new("Ana", TeamId::new_v4());
        let id = player.id;
        store.insert_player(player).await.unwrap();
        store.add_player_pair(id, "a-b").await.unwrap();
        store.add_player_pair(id, "a-b").await.unwrap();
        let stored = store.find_player(id).await.unwrap().unwrap();
        assert_eq!(stored.pairs_history.len(), 1);
    }
}
