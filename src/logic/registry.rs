//! Registration and record keeping: teams, players, clash lookups, photos, notifications.

use crate::logic::League;
use crate::models::{
    Clash, ClashId, ClashStatus, Grouping, Notification, Player, PlayerId, Stage, Team, TeamId,
    TournamentError,
};
use crate::store::ClashFilter;
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;

/// Notifications returned by [`League::notifications`].
const NOTIFICATION_LIMIT: usize = 100;

/// Request body for creating or updating a team.
#[derive(Clone, Debug, Deserialize)]
pub struct NewTeam {
    pub name: String,
    #[serde(flatten)]
    pub grouping: Grouping,
}

/// Request body for creating or updating a player.
#[derive(Clone, Debug, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    pub team_id: TeamId,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub clash_id: Option<ClashId>,
}

fn required(field: &str, value: &str) -> Result<String, TournamentError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TournamentError::Validation(format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}

/// Newest first; equal timestamps keep the later insertion first.
fn newest_first<T>(mut items: Vec<T>, created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) -> Vec<T> {
    items.reverse();
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
    items
}

impl League {
    pub async fn create_team(&self, new: NewTeam) -> Result<Team, TournamentError> {
        let team = Team::new(required("name", &new.name)?, new.grouping);
        self.store.insert_team(team.clone()).await?;
        log::info!("Registered team {} in {}", team.name, team.pool());
        Ok(team)
    }

    pub async fn teams(&self) -> Result<Vec<Team>, TournamentError> {
        Ok(self.store.find_teams(None).await?)
    }

    pub async fn team(&self, id: TeamId) -> Result<Team, TournamentError> {
        self.store
            .find_team(id)
            .await?
            .ok_or(TournamentError::TeamNotFound(id))
    }

    /// Rename or regroup a team. The standings record is left alone.
    pub async fn update_team(&self, id: TeamId, new: NewTeam) -> Result<Team, TournamentError> {
        self.store
            .update_team_details(id, required("name", &new.name)?, new.grouping)
            .await?
            .ok_or(TournamentError::TeamNotFound(id))
    }

    /// Delete a team together with its players.
    pub async fn delete_team(&self, id: TeamId) -> Result<(), TournamentError> {
        if !self.store.delete_team(id).await? {
            return Err(TournamentError::TeamNotFound(id));
        }
        let removed = self.store.delete_team_players(id).await?;
        log::info!("Deleted team {id} and {removed} player(s)");
        Ok(())
    }

    pub async fn create_player(&self, new: NewPlayer) -> Result<Player, TournamentError> {
        let name = required("name", &new.name)?;
        self.team(new.team_id).await?;
        let player = Player::new(name, new.team_id);
        self.store.insert_player(player.clone()).await?;
        self.store.push_team_player(new.team_id, player.id).await?;
        Ok(player)
    }

    pub async fn players(&self, team: Option<TeamId>) -> Result<Vec<Player>, TournamentError> {
        Ok(self.store.find_players(team).await?)
    }

    pub async fn player(&self, id: PlayerId) -> Result<Player, TournamentError> {
        self.store
            .find_player(id)
            .await?
            .ok_or(TournamentError::PlayerNotFound(id))
    }

    /// Rename a player or move them to another team's roster.
    pub async fn update_player(&self, id: PlayerId, new: NewPlayer) -> Result<Player, TournamentError> {
        let name = required("name", &new.name)?;
        let current = self.player(id).await?;
        if current.team_id != new.team_id {
            self.team(new.team_id).await?;
        }
        let updated = self
            .store
            .update_player_details(id, name, new.team_id)
            .await?
            .ok_or(TournamentError::PlayerNotFound(id))?;
        if current.team_id != new.team_id {
            self.store.pull_team_player(current.team_id, id).await?;
            self.store.push_team_player(new.team_id, id).await?;
        }
        Ok(updated)
    }

    /// Delete a player and drop them from their team's roster.
    pub async fn delete_player(&self, id: PlayerId) -> Result<(), TournamentError> {
        let player = self.player(id).await?;
        self.store.delete_player(id).await?;
        self.store.pull_team_player(player.team_id, id).await?;
        Ok(())
    }

    /// Clashes, newest first, optionally filtered by stage and status.
    pub async fn clashes(
        &self,
        stage: Option<Stage>,
        status: Option<ClashStatus>,
    ) -> Result<Vec<Clash>, TournamentError> {
        let mut filter = ClashFilter::stages(&stage.into_iter().collect::<Vec<_>>());
        if let Some(status) = status {
            filter = filter.with_status(status);
        }
        let clashes = self.store.find_clashes(&filter).await?;
        Ok(newest_first(clashes, |c| c.created_at))
    }

    pub async fn clash(&self, id: ClashId) -> Result<Clash, TournamentError> {
        self.store
            .find_clash(id)
            .await?
            .ok_or(TournamentError::ClashNotFound(id))
    }

    /// Remove a clash. Standings already credited from it are not reverted.
    pub async fn delete_clash(&self, id: ClashId) -> Result<(), TournamentError> {
        if !self.store.delete_clash(id).await? {
            return Err(TournamentError::ClashNotFound(id));
        }
        Ok(())
    }

    /// Store a clash photo as an inline data URL and return the URL.
    pub async fn upload_photo(
        &self,
        id: ClashId,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<String, TournamentError> {
        if bytes.is_empty() {
            return Err(TournamentError::Validation("photo is empty".into()));
        }
        let url = format!(
            "data:{content_type};base64,{}",
            general_purpose::STANDARD.encode(bytes)
        );
        if !self.store.set_clash_photo(id, url.clone()).await? {
            return Err(TournamentError::ClashNotFound(id));
        }
        Ok(url)
    }

    pub async fn create_notification(&self, new: NewNotification) -> Result<Notification, TournamentError> {
        let notification = Notification::new(
            required("title", &new.title)?,
            required("message", &new.message)?,
            new.clash_id,
        );
        self.store.insert_notification(notification.clone()).await?;
        Ok(notification)
    }

    /// The most recent notifications, newest first.
    pub async fn notifications(&self) -> Result<Vec<Notification>, TournamentError> {
        let mut all = newest_first(self.store.find_notifications().await?, |n| n.created_at);
        all.truncate(NOTIFICATION_LIMIT);
        Ok(all)
    }
}
