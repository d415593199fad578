//! Errors surfaced by league operations.

use crate::models::clash::ClashId;
use crate::models::player::PlayerId;
use crate::models::team::TeamId;
use crate::store::StoreError;

/// Errors that can occur during league operations.
///
/// `*NotFound` variants mean a referenced id is absent; [`Validation`](Self::Validation)
/// means the payload was rejected before any scoring logic ran; every other
/// variant is a rejected precondition and guarantees nothing was written.
#[derive(Debug, thiserror::Error)]
pub enum TournamentError {
    #[error("Team not found")]
    TeamNotFound(TeamId),
    #[error("Player not found")]
    PlayerNotFound(PlayerId),
    #[error("Clash not found")]
    ClashNotFound(ClashId),
    /// Score submitted against a decided tie.
    #[error("Clash is locked")]
    ClashLocked(ClashId),
    #[error("No teams in pool {0}")]
    NoTeamsInPool(String),
    #[error("Pool {0} league stage not complete yet")]
    PoolIncomplete(String),
    #[error("Not enough teams in pool {0}")]
    NotEnoughTeams(String),
    #[error("Semi-finals already generated")]
    SemiFinalsAlreadyGenerated,
    #[error("Semi-finals not yet created")]
    SemiFinalsNotCreated,
    #[error("Expected 2 semi-finals, found {0}")]
    TooManySemiFinals(usize),
    #[error("Semi-finals not yet complete")]
    SemiFinalsIncomplete,
    #[error("Finals already generated")]
    FinalsAlreadyGenerated,
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("Invalid password")]
    Unauthorized,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TournamentError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TeamNotFound(_) | Self::PlayerNotFound(_) | Self::ClashNotFound(_)
        )
    }

    /// A rejected precondition: nothing was mutated.
    pub fn is_invalid_state(&self) -> bool {
        matches!(
            self,
            Self::ClashLocked(_)
                | Self::NoTeamsInPool(_)
                | Self::PoolIncomplete(_)
                | Self::NotEnoughTeams(_)
                | Self::SemiFinalsAlreadyGenerated
                | Self::SemiFinalsNotCreated
                | Self::TooManySemiFinals(_)
                | Self::SemiFinalsIncomplete
                | Self::FinalsAlreadyGenerated
        )
    }
}
