//! Data structures for the league: teams, players, clashes, games, notifications.

mod clash;
mod error;
mod game;
mod notification;
mod player;
mod team;

pub use clash::{Clash, ClashId, ClashStatus, Stage};
pub use error::TournamentError;
pub use game::{Game, GameSide, Side};
pub use notification::{Notification, NotificationId};
pub use player::{Player, PlayerId};
pub use team::{Grouping, RecordDelta, Team, TeamId, TeamRecord};
