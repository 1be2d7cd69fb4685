use crate::domain::model::{ApiPath, Verb};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Names of the regular files directly under `dir`. A missing directory has none.
    fn list_files(&self, dir: &str) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
    /// A file that is already gone is not an error.
    fn remove_file(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn api_username(&self) -> &str;
    fn api_key(&self) -> &str;
    fn user_agent(&self) -> &str;
    fn request_timeout(&self) -> Option<Duration>;
    fn cache_enabled(&self) -> bool;
    fn cache_ttl(&self) -> Duration;
}

/// Authenticated access to the package API.
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    /// Issues `verb` against `path` and returns the parsed body. Non-2xx is an error.
    async fn request_json(&self, verb: Verb, path: &ApiPath) -> Result<serde_json::Value>;

    /// Drops every cached response. Returns false when the client has no cache.
    async fn clear_cache(&self) -> Result<bool>;
}

/// Asks the operator a yes/no question.
pub trait Confirmer {
    fn confirm(&self, prompt: &str) -> Result<bool>;
}
