//! Player bookkeeping for completed games: appearances and doubles pairing history.

use crate::logic::League;
use crate::models::{Game, PlayerId, TournamentError};
use std::collections::BTreeSet;

/// Canonical key for an unordered pair of partners: both ids sorted, joined with `-`.
pub fn pair_key(a: PlayerId, b: PlayerId) -> String {
    let (a, b) = (a.to_string(), b.to_string());
    if a <= b {
        format!("{a}-{b}")
    } else {
        format!("{b}-{a}")
    }
}

impl League {
    /// Record appearances and pairings for the completed games in `after`.
    ///
    /// Appearances count only games that were not already completed in `before`.
    /// Pairings are a set union and are recorded for every completed game.
    pub(crate) async fn record_participation(
        &self,
        before: &[Game],
        after: &[Game],
    ) -> Result<(), TournamentError> {
        for game in after.iter().filter(|g| g.completed) {
            let newly_completed = !before
                .iter()
                .any(|b| b.match_number == game.match_number && b.completed);
            if newly_completed {
                for player in game.participants() {
                    if !self.store.increment_player_matches(player, 1).await? {
                        log::warn!("Game {} names unknown player {player}", game.match_number);
                    }
                }
            }
            for side in [&game.team1, &game.team2] {
                if let Some((a, b)) = side.pair() {
                    self.record_pair(a, b).await?;
                }
            }
        }
        Ok(())
    }

    async fn record_pair(&self, a: PlayerId, b: PlayerId) -> Result<(), TournamentError> {
        let key = pair_key(a, b);
        for player in [a, b] {
            self.store.add_player_pair(player, &key).await?;
        }
        Ok(())
    }

    /// Pair keys a player has been part of.
    pub async fn pairing_history(&self, player: PlayerId) -> Result<BTreeSet<String>, TournamentError> {
        Ok(self
            .store
            .find_player(player)
            .await?
            .ok_or(TournamentError::PlayerNotFound(player))?
            .pairs_history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn pair_key_is_order_independent() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(pair_key(a, b), pair_key(b, a));
        assert!(pair_key(a, b).contains(&a.to_string()));
    }
}
