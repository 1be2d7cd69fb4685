use crate::adapters::cache::ResponseCache;
use crate::core::{ConfigProvider, RepositoryClient, Storage};
use crate::domain::model::{ApiPath, Verb};
use crate::utils::display;
use crate::utils::error::{CleanupError, Result};
use async_trait::async_trait;
use colored::Colorize;
use reqwest::header::HeaderMap;
use reqwest::Client;
use url::Url;

const ERROR_BODY_LIMIT: usize = 512;

/// Package API client with basic auth and an optional GET response cache.
pub struct HttpRepositoryClient<S: Storage> {
    client: Client,
    base_url: Url,
    username: String,
    api_key: String,
    cache: Option<ResponseCache<S>>,
}

impl<S: Storage> HttpRepositoryClient<S> {
    pub fn new<C: ConfigProvider>(config: &C, storage: S) -> Result<Self> {
        let mut base = config.api_base_url().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| CleanupError::InvalidConfigValueError {
            field: "api_base_url".to_string(),
            value: base.clone(),
            reason: e.to_string(),
        })?;

        let mut builder = Client::builder().user_agent(config.user_agent());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| CleanupError::ConfigError {
            message: format!("Could not build HTTP client: {}", e),
        })?;

        let cache = if config.cache_enabled() {
            Some(ResponseCache::new(storage, config.cache_ttl()))
        } else {
            None
        };

        Ok(Self {
            client,
            base_url,
            username: config.api_username().to_string(),
            api_key: config.api_key().to_string(),
            cache,
        })
    }

    /// Base URL with each path segment appended and percent-encoded.
    pub fn endpoint(&self, path: &ApiPath) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CleanupError::ConfigError {
                message: format!("API base URL cannot take a path: {}", self.base_url),
            })?
            .pop_if_empty()
            .extend(path.segments());
        Ok(url)
    }

    async fn send(&self, verb: Verb, path: &ApiPath, url: Url) -> Result<serde_json::Value> {
        let request = match verb {
            Verb::Get => self.client.get(url),
            Verb::Delete => self.client.delete(url),
        }
        .basic_auth(&self.username, Some(&self.api_key));

        let api_error = |source: reqwest::Error| CleanupError::ApiError {
            verb: verb.to_string(),
            path: path.to_string(),
            source,
        };

        let response = request.send().await.map_err(api_error)?;
        let status = response.status();
        tracing::debug!("{} {} -> {}", verb, path, status);
        log_rate_limit(response.headers());

        let body = response.bytes().await.map_err(api_error)?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            return Err(CleanupError::HttpStatusError {
                verb: verb.to_string(),
                path: path.to_string(),
                status: status.as_u16(),
                body: text.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        if body.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_slice(&body).map_err(|e| CleanupError::ResponseDecodeError {
            verb: verb.to_string(),
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

fn log_rate_limit(headers: &HeaderMap) {
    let limit = headers
        .get("X-RateLimit-Limit")
        .and_then(|v| v.to_str().ok());
    let remaining = headers
        .get("X-RateLimit-Remaining")
        .and_then(|v| v.to_str().ok());

    if let (Some(limit), Some(remaining)) = (limit, remaining) {
        tracing::debug!("Remaining API rate-limit: {} / {}", remaining, limit);
    }
}

#[async_trait]
impl<S: Storage> RepositoryClient for HttpRepositoryClient<S> {
    async fn request_json(&self, verb: Verb, path: &ApiPath) -> Result<serde_json::Value> {
        let url = self.endpoint(path)?;

        if verb == Verb::Get {
            if let Some(cache) = &self.cache {
                if let Some(body) = cache.get(url.as_str()).await? {
                    tracing::debug!("{} {} (cached)", verb, url);
                    return Ok(body);
                }
            }
        }

        let line = format!("{} {}", verb, url);
        match verb {
            Verb::Delete => tracing::info!("{}", line.red()),
            Verb::Get => tracing::info!("{}", line.cyan()),
        }

        let body = self.send(verb, path, url.clone()).await?;
        tracing::debug!("{}", display::pretty_json(&body));

        if verb == Verb::Get {
            if let Some(cache) = &self.cache {
                cache.put(url.as_str(), &body).await?;
            }
        }

        Ok(body)
    }

    async fn clear_cache(&self) -> Result<bool> {
        match &self.cache {
            Some(cache) => {
                let removed = cache.clear().await?;
                tracing::info!("Cleared HTTP response cache ({} entries)", removed);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
