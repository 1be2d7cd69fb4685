#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::time::Duration;
use toml_config::FileConfig;

pub const DEFAULT_API_BASE_URL: &str = "https://api.bintray.com/";
pub const DEFAULT_CACHE_DIR: &str = ".bintray-cache";
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 3600;

pub fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base_url: String,
    pub api_username: String,
    pub api_key: String,
    pub user_agent: String,
    pub request_timeout_seconds: Option<u64>,
    pub cache_enabled: bool,
    pub cache_dir: String,
    pub cache_ttl_seconds: u64,
}

/// Values given on the command line; `None` falls through to the config file, then defaults.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub api_base_url: Option<String>,
    pub api_username: Option<String>,
    pub api_key: Option<String>,
    pub request_timeout_seconds: Option<u64>,
    pub cache_enabled: Option<bool>,
    pub cache_dir: Option<String>,
    pub cache_ttl_seconds: Option<u64>,
}

impl Settings {
    pub fn new(api_username: &str, api_key: &str) -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_username: api_username.to_string(),
            api_key: api_key.to_string(),
            user_agent: default_user_agent(),
            request_timeout_seconds: None,
            cache_enabled: true,
            cache_dir: DEFAULT_CACHE_DIR.to_string(),
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
        }
    }

    /// Merges command-line overrides over the config file over defaults, then validates.
    pub fn resolve(file: Option<FileConfig>, overrides: SettingsOverrides) -> Result<Self> {
        let file = file.unwrap_or_default();
        let api = file.api.unwrap_or_default();
        let cache = file.cache.unwrap_or_default();

        let api_username = overrides.api_username.or(api.username);
        let api_key = overrides.api_key.or(api.api_key);
        let api_username = validation::validate_required_field("api_username", &api_username)?;
        let api_key = validation::validate_required_field("api_key", &api_key)?;

        let mut api_base_url = overrides
            .api_base_url
            .or(api.base_url)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        if !api_base_url.ends_with('/') {
            api_base_url.push('/');
        }

        let settings = Self {
            api_base_url,
            api_username: api_username.clone(),
            api_key: api_key.clone(),
            user_agent: api.user_agent.unwrap_or_else(default_user_agent),
            request_timeout_seconds: overrides
                .request_timeout_seconds
                .or(api.request_timeout_seconds),
            cache_enabled: overrides.cache_enabled.or(cache.enabled).unwrap_or(true),
            cache_dir: overrides
                .cache_dir
                .or(cache.dir)
                .unwrap_or_else(|| DEFAULT_CACHE_DIR.to_string()),
            cache_ttl_seconds: overrides
                .cache_ttl_seconds
                .or(cache.ttl_seconds)
                .unwrap_or(DEFAULT_CACHE_TTL_SECONDS),
        };

        settings.validate()?;
        Ok(settings)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api_base_url", &self.api_base_url)?;
        validation::validate_non_empty_string("api_username", &self.api_username)?;
        validation::validate_non_empty_string("api_key", &self.api_key)?;
        validation::validate_non_empty_string("user_agent", &self.user_agent)?;
        if let Some(timeout) = self.request_timeout_seconds {
            validation::validate_positive_number("request_timeout_seconds", timeout, 1)?;
        }
        if self.cache_enabled {
            validation::validate_path("cache_dir", &self.cache_dir)?;
        }
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn api_username(&self) -> &str {
        &self.api_username
    }

    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs)
    }

    fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}
