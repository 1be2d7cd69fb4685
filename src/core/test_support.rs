use crate::domain::model::{ApiPath, Verb, Version};
use crate::domain::ports::{Confirmer, RepositoryClient};
use crate::utils::error::{CleanupError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// In-memory package API keyed by `VERB path`.
#[derive(Default)]
pub struct MockRepositoryClient {
    responses: Mutex<HashMap<String, serde_json::Value>>,
    failures: Mutex<HashMap<String, u16>>,
    calls: Mutex<Vec<String>>,
    cache_clears: Mutex<usize>,
    uncached: bool,
}

impl MockRepositoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client whose response cache is switched off.
    pub fn uncached() -> Self {
        Self {
            uncached: true,
            ..Self::default()
        }
    }

    pub fn respond(&self, verb: Verb, path: ApiPath, body: serde_json::Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(format!("{} {}", verb, path), body);
    }

    pub fn fail(&self, verb: Verb, path: ApiPath, status: u16) {
        self.failures
            .lock()
            .unwrap()
            .insert(format!("{} {}", verb, path), status);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("DELETE "))
            .collect()
    }

    pub fn cache_clears(&self) -> usize {
        *self.cache_clears.lock().unwrap()
    }
}

#[async_trait]
impl RepositoryClient for MockRepositoryClient {
    async fn request_json(&self, verb: Verb, path: &ApiPath) -> Result<serde_json::Value> {
        let key = format!("{} {}", verb, path);
        self.calls.lock().unwrap().push(key.clone());

        if let Some(status) = self.failures.lock().unwrap().get(&key) {
            return Err(CleanupError::HttpStatusError {
                verb: verb.to_string(),
                path: path.to_string(),
                status: *status,
                body: "mock failure".to_string(),
            });
        }

        match self.responses.lock().unwrap().get(&key) {
            Some(body) => Ok(body.clone()),
            None if verb == Verb::Delete => Ok(serde_json::json!({"message": "success"})),
            None => Err(CleanupError::HttpStatusError {
                verb: verb.to_string(),
                path: path.to_string(),
                status: 404,
                body: "not mocked".to_string(),
            }),
        }
    }

    async fn clear_cache(&self) -> Result<bool> {
        if self.uncached {
            return Ok(false);
        }
        *self.cache_clears.lock().unwrap() += 1;
        Ok(true)
    }
}

/// Answers prompts from a fixed script; panics if asked more often than scripted.
pub struct ScriptedConfirmer {
    answers: Mutex<VecDeque<bool>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirmer {
    pub fn new(answers: &[bool]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Confirmer for ScriptedConfirmer {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self
            .answers
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected confirmation prompt"))
    }
}

pub fn days_ago(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}

pub fn version_at(package: &str, name: &str, created: DateTime<Utc>) -> Version {
    Version::new("acme", "maven", package, name, created, created)
}

pub fn version_json(package: &str, name: &str, created: DateTime<Utc>) -> serde_json::Value {
    let stamp = created.format("%Y-%m-%dT%H:%M:%S%.6f%z").to_string();
    serde_json::json!({
        "name": name,
        "owner": "acme",
        "repo": "maven",
        "package": package,
        "created": stamp,
        "updated": stamp,
        "desc": null
    })
}
