//! Runtime configuration, read from the environment.
//!
//! | Variable              | Default       |
//! |-----------------------|---------------|
//! | `HOST`                | `0.0.0.0`     |
//! | `PORT`                | `8080`        |
//! | `SCORING_VARIANT`     | `pool`        |
//! | `GAMES_PER_CLASH`     | `5`           |
//! | `POINTS_SCHEDULE`     | `3,4,5,3,6`   |
//! | `POOLS`               | `X,Y`         |
//! | `ADMIN_PASSWORD_HASH` | unset         |

use crate::logic::ScoringPolicy;
use std::env;

/// Rules the league engine runs with.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LeagueSettings {
    pub policy: ScoringPolicy,
    /// Number of empty games a new clash starts with.
    pub games_per_clash: usize,
    /// The two pools whose top teams meet in the semi-finals.
    pub pools: [String; 2],
}

impl Default for LeagueSettings {
    fn default() -> Self {
        Self {
            policy: ScoringPolicy::SetBased,
            games_per_clash: 5,
            pools: ["X".to_string(), "Y".to_string()],
        }
    }
}

/// Errors in the environment configuration, reported at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid number: {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("SCORING_VARIANT must be `pool` or `captain`, got {0:?}")]
    UnknownVariant(String),
    #[error("POOLS must name exactly two pools, got {0:?}")]
    InvalidPools(String),
}

/// Full process configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// PHC-format argon2 hash of the shared admin password.
    pub admin_password_hash: Option<String>,
    pub league: LeagueSettings,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_points_schedule() -> Vec<u32> {
    vec![3, 4, 5, 3, 6]
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: value.to_string(),
    })
}

fn parse_schedule(value: &str) -> Result<Vec<u32>, ConfigError> {
    value
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse_number("POINTS_SCHEDULE", s))
        .collect()
}

fn parse_pools(value: &str) -> Result<[String; 2], ConfigError> {
    let pools: Vec<String> = value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    <[String; 2]>::try_from(pools).map_err(|_| ConfigError::InvalidPools(value.to_string()))
}

impl Config {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = get("HOST").unwrap_or_else(default_host);
        let port = match get("PORT") {
            Some(p) => parse_number("PORT", &p)?,
            None => default_port(),
        };
        let games_per_clash = match get("GAMES_PER_CLASH") {
            Some(n) => parse_number("GAMES_PER_CLASH", &n)?,
            None => LeagueSettings::default().games_per_clash,
        };
        let policy = match get("SCORING_VARIANT").as_deref().map(str::trim) {
            None | Some("pool") => ScoringPolicy::SetBased,
            Some("captain") => ScoringPolicy::PointsAwarded {
                schedule: match get("POINTS_SCHEDULE") {
                    Some(s) => parse_schedule(&s)?,
                    None => default_points_schedule(),
                },
            },
            Some(other) => return Err(ConfigError::UnknownVariant(other.to_string())),
        };
        let pools = match get("POOLS") {
            Some(p) => parse_pools(&p)?,
            None => LeagueSettings::default().pools,
        };
        Ok(Self {
            host,
            port,
            admin_password_hash: get("ADMIN_PASSWORD_HASH").filter(|h| !h.trim().is_empty()),
            league: LeagueSettings {
                policy,
                games_per_clash,
                pools,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.league, LeagueSettings::default());
        assert!(config.admin_password_hash.is_none());
    }

    #[test]
    fn captain_variant_reads_schedule() {
        let config = Config::from_lookup(lookup(&[
            ("SCORING_VARIANT", "captain"),
            ("POINTS_SCHEDULE", "1, 2,3"),
            ("POOLS", "A,B"),
        ]))
        .unwrap();
        assert_eq!(
            config.league.policy,
            ScoringPolicy::PointsAwarded { schedule: vec![1, 2, 3] }
        );
        assert_eq!(config.league.pools, ["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("PORT", "eighty")])),
            Err(ConfigError::InvalidNumber { var: "PORT", .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("SCORING_VARIANT", "elo")])),
            Err(ConfigError::UnknownVariant(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("POOLS", "X")])),
            Err(ConfigError::InvalidPools(_))
        ));
    }
}
