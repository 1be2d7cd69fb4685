use crate::core::Storage;
use crate::utils::error::{CleanupError, Result};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    url: String,
    stored_at: DateTime<Utc>,
    body: serde_json::Value,
}

/// Subdirectory of the storage root that holds cache entries.
const ENTRY_DIR: &str = "responses";

/// GET response cache, one JSON file per URL under `responses/`.
pub struct ResponseCache<S: Storage> {
    storage: S,
    ttl: TimeDelta,
}

impl<S: Storage> ResponseCache<S> {
    pub fn new(storage: S, ttl: Duration) -> Self {
        Self {
            storage,
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
        }
    }

    fn file_name(url: &str) -> String {
        format!("{}.json", hex::encode(Sha256::digest(url.as_bytes())))
    }

    fn key(url: &str) -> String {
        format!("{}/{}", ENTRY_DIR, Self::file_name(url))
    }

    /// True for names this cache could have written: 64 lowercase hex digits plus `.json`.
    fn is_entry_name(name: &str) -> bool {
        name.strip_suffix(".json").is_some_and(|digest| {
            digest.len() == 64
                && digest
                    .bytes()
                    .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        })
    }

    pub async fn get(&self, url: &str) -> Result<Option<serde_json::Value>> {
        self.get_at(url, Utc::now()).await
    }

    /// Returns the cached body unless it is missing, unreadable or older than the TTL.
    pub async fn get_at(&self, url: &str, now: DateTime<Utc>) -> Result<Option<serde_json::Value>> {
        let raw = match self.storage.read_file(&Self::key(url)).await {
            Ok(raw) => raw,
            Err(CleanupError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(None)
            }
            Err(e) => return Err(e),
        };

        let entry: CacheEntry = match serde_json::from_slice(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Ignoring unreadable cache entry for {}: {}", url, e);
                return Ok(None);
            }
        };

        if entry.url != url || now - entry.stored_at > self.ttl {
            return Ok(None);
        }
        Ok(Some(entry.body))
    }

    pub async fn put(&self, url: &str, body: &serde_json::Value) -> Result<()> {
        self.put_at(url, body, Utc::now()).await
    }

    pub async fn put_at(&self, url: &str, body: &serde_json::Value, now: DateTime<Utc>) -> Result<()> {
        let entry = CacheEntry {
            url: url.to_string(),
            stored_at: now,
            body: body.clone(),
        };
        let data = serde_json::to_vec(&entry)?;
        self.storage.write_file(&Self::key(url), &data).await
    }

    /// Removes the cache's own entries. Anything else in the directory is left alone.
    pub async fn clear(&self) -> Result<usize> {
        let mut removed = 0;
        for name in self.storage.list_files(ENTRY_DIR).await? {
            if Self::is_entry_name(&name) {
                self.storage
                    .remove_file(&format!("{}/{}", ENTRY_DIR, name))
                    .await?;
                removed += 1;
            } else {
                tracing::debug!("Leaving {}/{} in place, not a cache entry", ENTRY_DIR, name);
            }
        }
        Ok(removed)
    }
}
