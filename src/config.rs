//! Configuration types.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Conversation and search tuning.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// How many candidates survive ranking.
    pub max_search_results: usize,
    /// How many of the selected candidates are rendered in one reply.
    pub display_results: usize,
    /// Cap on candidates fetched from the store per search.
    pub candidate_limit: usize,
    /// Searches allowed per identity per UTC day.
    pub daily_search_limit: u32,
    /// Bound applied to every AI call before falling back.
    pub ai_timeout: Duration,
    /// Full result rendering is replaced by the compact form above this size.
    pub response_char_budget: usize,
    /// Consecutive validation failures before help tips are appended.
    pub retry_help_threshold: u32,
    /// Session idle timeout (sessions are pruned after this duration).
    pub session_idle_timeout: Duration,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            max_search_results: 6,
            display_results: 3,
            candidate_limit: 50,
            daily_search_limit: 30,
            ai_timeout: Duration::from_secs(30),
            response_char_budget: 4000,
            retry_help_threshold: 3,
            session_idle_timeout: Duration::from_secs(3600), // 1 hour
        }
    }
}

impl BotConfig {
    /// Load from `ALUMNI_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            max_search_results: env_or("ALUMNI_MAX_SEARCH_RESULTS", defaults.max_search_results)?,
            display_results: env_or("ALUMNI_DISPLAY_RESULTS", defaults.display_results)?,
            candidate_limit: env_or("ALUMNI_CANDIDATE_LIMIT", defaults.candidate_limit)?,
            daily_search_limit: env_or("ALUMNI_DAILY_SEARCH_LIMIT", defaults.daily_search_limit)?,
            ai_timeout: Duration::from_secs(env_or(
                "ALUMNI_AI_TIMEOUT_SECS",
                defaults.ai_timeout.as_secs(),
            )?),
            response_char_budget: env_or(
                "ALUMNI_RESPONSE_CHAR_BUDGET",
                defaults.response_char_budget,
            )?,
            retry_help_threshold: defaults.retry_help_threshold,
            session_idle_timeout: Duration::from_secs(env_or(
                "ALUMNI_SESSION_IDLE_SECS",
                defaults.session_idle_timeout.as_secs(),
            )?),
        })
    }
}

/// Host process settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub db_path: PathBuf,
    pub http_port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let db_path = std::env::var("ALUMNI_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/alumni.db"));
        Ok(Self {
            db_path,
            http_port: env_or("ALUMNI_HTTP_PORT", 8080)?,
        })
    }
}

/// Read and parse an environment variable, using `default` when it is unset.
fn env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_bot_limits() {
        let config = BotConfig::default();
        assert_eq!(config.max_search_results, 6);
        assert_eq!(config.display_results, 3);
        assert_eq!(config.candidate_limit, 50);
        assert_eq!(config.daily_search_limit, 30);
        assert_eq!(config.ai_timeout, Duration::from_secs(30));
        assert_eq!(config.response_char_budget, 4000);
        assert_eq!(config.session_idle_timeout, Duration::from_secs(3600));
    }

    #[test]
    fn env_or_falls_back_when_unset() {
        let value: usize = env_or("ALUMNI_TEST_DEFINITELY_UNSET_VAR", 42).unwrap();
        assert_eq!(value, 42);
    }
}
