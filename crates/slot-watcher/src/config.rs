//! Configuration for the watch engine.

use std::env;
use std::time::Duration;

use crate::error::ConfigError;
use crate::i18n::Language;

/// Delay between two polls of the coefficient feed.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Lifetime of the cached warehouse directory.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Configuration for [`SlotWatcher`](crate::SlotWatcher).
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Sleep between feed polls while a watch finds nothing.
    pub poll_interval: Duration,
    /// How long a fetched warehouse list is served before refetching.
    pub cache_ttl: Duration,
    /// Language used when the client reports none we support.
    pub default_language: Language,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            cache_ttl: DEFAULT_CACHE_TTL,
            default_language: Language::Ru,
        }
    }
}

impl WatcherConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional env vars:
    /// - `WATCH_POLL_INTERVAL_SECS` (default: 60)
    /// - `WAREHOUSE_CACHE_TTL_SECS` (default: 3600)
    /// - `DEFAULT_LANGUAGE` (default: ru)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(secs) = parse_var::<u64>("WATCH_POLL_INTERVAL_SECS")? {
            config.poll_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64>("WAREHOUSE_CACHE_TTL_SECS")? {
            config.cache_ttl = Duration::from_secs(secs);
        }
        if let Some(language) = parse_var::<Language>("DEFAULT_LANGUAGE")? {
            config.default_language = language;
        }

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WatcherConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(60));
        assert_eq!(config.cache_ttl, Duration::from_secs(3600));
        assert_eq!(config.default_language, Language::Ru);
    }

    #[test]
    fn test_parse_var_missing_is_none() {
        let parsed = parse_var::<u64>("SLOT_WATCHER_TEST_SURELY_UNSET").unwrap();
        assert_eq!(parsed, None);
    }
}
