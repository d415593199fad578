//! Shared admin password check. Success or failure only; no session is issued.

use crate::models::TournamentError;
use argon2::{Argon2, PasswordHash, PasswordVerifier};

/// Verifies the admin password against a configured argon2 PHC hash.
#[derive(Clone, Debug, Default)]
pub struct AdminAuth {
    hash: Option<String>,
}

impl AdminAuth {
    /// `None` rejects every login.
    pub fn new(hash: Option<String>) -> Self {
        Self { hash }
    }

    pub fn is_configured(&self) -> bool {
        self.hash.is_some()
    }

    pub fn verify(&self, password: &str) -> Result<(), TournamentError> {
        let Some(hash) = &self.hash else {
            log::warn!("Admin login attempted but no ADMIN_PASSWORD_HASH is configured");
            return Err(TournamentError::Unauthorized);
        };
        let parsed = PasswordHash::new(hash).map_err(|e| {
            log::error!("ADMIN_PASSWORD_HASH is not a valid PHC string: {e}");
            TournamentError::Unauthorized
        })?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| TournamentError::Unauthorized)
    }
}
