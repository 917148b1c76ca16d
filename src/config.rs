use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

pub const DEFAULT_PROXY_URL: &str = "https://api.allorigins.win/get";
const DEFAULT_DB_PATH: &str = "data/recipes.sqlite";
const DEFAULT_CONCURRENCY: i64 = 10;

/// Runtime settings, read from `RECIPE_*` environment variables on top of defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub proxy_url: String,
    /// "proxy" (default) or "spider".
    pub provider: String,
    #[serde(default)]
    pub spider_api_key: Option<String>,
    pub db_path: String,
    pub concurrency: usize,
    pub max_retries: u32,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_config(
            Config::builder().add_source(Environment::with_prefix("RECIPE").try_parsing(true)),
        )
    }

    fn from_config(
        builder: config::builder::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        builder
            .set_default("proxy_url", DEFAULT_PROXY_URL)?
            .set_default("provider", "proxy")?
            .set_default("db_path", DEFAULT_DB_PATH)?
            .set_default("concurrency", DEFAULT_CONCURRENCY)?
            .set_default("max_retries", 0)?
            .build()
            .context("Failed to build settings")?
            .try_deserialize()
            .context("Invalid RECIPE_* settings")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_env() {
        let s = Settings::from_config(Config::builder()).unwrap();
        assert_eq!(s.proxy_url, DEFAULT_PROXY_URL);
        assert_eq!(s.provider, "proxy");
        assert_eq!(s.db_path, "data/recipes.sqlite");
        assert_eq!(s.concurrency, 10);
        assert_eq!(s.max_retries, 0);
        assert!(s.timeout_secs.is_none());
        assert!(s.spider_api_key.is_none());
    }

    #[test]
    fn overrides_win() {
        let builder = Config::builder()
            .set_override("provider", "spider")
            .unwrap()
            .set_override("max_retries", 3)
            .unwrap();
        let s = Settings::from_config(builder).unwrap();
        assert_eq!(s.provider, "spider");
        assert_eq!(s.max_retries, 3);
    }
}
