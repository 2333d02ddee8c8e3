use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::ai::AiProvider;
use crate::matching::MatchingSettings;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    pub rust_log: String,
    /// `None` runs every scorer deterministically.
    pub ai: Option<AiConfig>,
    pub matching: MatchingSettings,
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub provider: AiProvider,
    pub api_key: String,
    pub model: Option<String>,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = MatchingSettings::default();
        let matching = MatchingSettings {
            min_ats_score: env_or("MATCH_MIN_ATS_SCORE", defaults.min_ats_score)?,
            match_threshold: env_or("MATCH_THRESHOLD", defaults.match_threshold)?,
            concurrency: env_or("MATCH_SCORING_CONCURRENCY", defaults.concurrency)?,
        };
        let database_max_connections = env_or("DATABASE_MAX_CONNECTIONS", 10)?;
        check_limits(&matching, database_max_connections)?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            database_max_connections,
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            ai: ai_from_env()?,
            matching,
        })
    }
}

fn check_limits(matching: &MatchingSettings, database_max_connections: u32) -> Result<()> {
    if matching.match_threshold > 100 {
        return Err(anyhow!("MATCH_THRESHOLD must be between 0 and 100"));
    }
    if matching.concurrency == 0 {
        return Err(anyhow!("MATCH_SCORING_CONCURRENCY must be at least 1"));
    }
    if database_max_connections == 0 {
        return Err(anyhow!("DATABASE_MAX_CONNECTIONS must be at least 1"));
    }
    Ok(())
}

fn ai_from_env() -> Result<Option<AiConfig>> {
    let raw = std::env::var("AI_PROVIDER").unwrap_or_default();
    let Some(provider) = parse_provider(&raw)? else {
        return Ok(None);
    };

    Ok(Some(AiConfig {
        provider,
        api_key: require_env(provider.api_key_var())?,
        model: std::env::var("AI_MODEL").ok().filter(|m| !m.trim().is_empty()),
        timeout: Duration::from_secs(env_or("AI_TIMEOUT_SECS", 20)?),
    }))
}

/// Empty or `none` disables AI assistance.
fn parse_provider(raw: &str) -> Result<Option<AiProvider>> {
    match raw.trim() {
        "" => Ok(None),
        v if v.eq_ignore_ascii_case("none") => Ok(None),
        v => v
            .parse::<AiProvider>()
            .map(Some)
            .map_err(|e| anyhow!("AI_PROVIDER: {e}")),
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{key} has an invalid value '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider() {
        assert_eq!(parse_provider("").unwrap(), None);
        assert_eq!(parse_provider("None").unwrap(), None);
        assert_eq!(parse_provider("openai").unwrap(), Some(AiProvider::OpenAi));
        assert_eq!(parse_provider("grok").unwrap(), Some(AiProvider::Xai));
        assert!(parse_provider("gemini").is_err());
    }

    #[test]
    fn test_check_limits() {
        let defaults = MatchingSettings::default();
        assert!(check_limits(&defaults, 10).is_ok());
        assert!(check_limits(&defaults, 0).is_err());

        let no_workers = MatchingSettings {
            concurrency: 0,
            ..defaults
        };
        assert!(check_limits(&no_workers, 10).is_err());

        let impossible = MatchingSettings {
            match_threshold: 101,
            ..defaults
        };
        assert!(check_limits(&impossible, 10).is_err());
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value::<u8>("MATCH_THRESHOLD", " 65 ").unwrap(), 65);
        assert_eq!(parse_value::<u16>("PORT", "9090").unwrap(), 9090);

        let err = parse_value::<u16>("PORT", "eighty").unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
