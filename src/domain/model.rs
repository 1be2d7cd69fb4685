use crate::utils::error::{CleanupError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire format of the `created` / `updated` fields, e.g. `2019-05-22T12:34:56.123456+0000`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// One published version of a package.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Version {
    pub owner: String,
    pub repo: String,
    pub package: String,
    pub name: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    /// Provider-specific fields, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Version {
    pub fn new(
        owner: &str,
        repo: &str,
        package: &str,
        name: &str,
        created: DateTime<Utc>,
        updated: DateTime<Utc>,
    ) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            package: package.to_string(),
            name: name.to_string(),
            created,
            updated,
            extra: serde_json::Map::new(),
        }
    }

    /// Decodes a version detail response.
    ///
    /// Identifying fields must be non-empty strings and both timestamps must
    /// match [`TIMESTAMP_FORMAT`]; anything else is a hard error.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let mut fields = match value {
            serde_json::Value::Object(map) => map,
            other => {
                return Err(CleanupError::InvalidRecordError {
                    message: format!("expected a JSON object, got {}", json_kind(&other)),
                })
            }
        };

        let owner = take_identifier(&mut fields, "owner")?;
        let repo = take_identifier(&mut fields, "repo")?;
        let package = take_identifier(&mut fields, "package")?;
        let name = take_identifier(&mut fields, "name")?;
        let created = take_timestamp(&mut fields, "created")?;
        let updated = take_timestamp(&mut fields, "updated")?;

        if created > updated {
            tracing::warn!(
                "{}/{}/{}@{} was updated ({}) before it was created ({})",
                owner,
                repo,
                package,
                name,
                updated,
                created
            );
        }

        Ok(Self {
            owner,
            repo,
            package,
            name,
            created,
            updated,
            extra: fields,
        })
    }

    /// `owner/repo/package@name`
    pub fn coordinates(&self) -> String {
        format!("{}/{}/{}@{}", self.owner, self.repo, self.package, self.name)
    }

    pub fn api_path(&self) -> ApiPath {
        ApiPath::version(&self.owner, &self.repo, &self.package, &self.name)
    }
}

fn take_identifier(
    fields: &mut serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Result<String> {
    match fields.remove(key) {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Ok(s),
        Some(serde_json::Value::String(_)) => Err(CleanupError::InvalidRecordError {
            message: format!("field '{}' is empty", key),
        }),
        Some(other) => Err(CleanupError::InvalidRecordError {
            message: format!("field '{}' must be a string, got {}", key, json_kind(&other)),
        }),
        None => Err(CleanupError::InvalidRecordError {
            message: format!("missing field '{}'", key),
        }),
    }
}

fn take_timestamp(
    fields: &mut serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Result<DateTime<Utc>> {
    match fields.remove(key) {
        Some(serde_json::Value::String(raw)) => parse_timestamp(key, &raw),
        Some(other) => Err(CleanupError::InvalidRecordError {
            message: format!("field '{}' must be a string, got {}", key, json_kind(&other)),
        }),
        None => Err(CleanupError::InvalidRecordError {
            message: format!("missing field '{}'", key),
        }),
    }
}

/// Parses a wire timestamp into UTC. A trailing `Z` is read as `+0000`.
///
/// The fractional seconds are mandatory (1 to 9 digits), even though
/// [`TIMESTAMP_FORMAT`] alone would accept them missing.
pub fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>> {
    let invalid = |reason: String| CleanupError::TimestampError {
        field: field.to_string(),
        value: raw.to_string(),
        reason,
    };

    let normalized = match raw.strip_suffix('Z') {
        Some(head) => format!("{}+0000", head),
        None => raw.to_string(),
    };

    let parsed = DateTime::parse_from_str(&normalized, TIMESTAMP_FORMAT)
        .map_err(|e| invalid(e.to_string()))?;
    if !has_fractional_seconds(&normalized) {
        return Err(invalid("fractional seconds are missing".to_string()));
    }
    Ok(parsed.with_timezone(&Utc))
}

/// `...THH:MM:SS.f...`: a dot and at least one digit right after the seconds.
fn has_fractional_seconds(timestamp: &str) -> bool {
    timestamp
        .split_once('T')
        .and_then(|(_, time)| time.get(8..))
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|digits| digits.starts_with(|c: char| c.is_ascii_digit()))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Response of `GET packages/{owner}/{repo}/{package}`; only the version list matters.
/// A descriptor without `versions` is malformed, not empty.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageDescriptor {
    pub versions: Vec<String>,
}

/// One entry of `GET repos/{owner}/{repo}/packages`.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageListing {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CutoffResult {
    pub cutoff: DateTime<Utc>,
    pub old: Vec<Version>,
    pub new: Vec<Version>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PackageGroup {
    pub package: String,
    pub versions: Vec<Version>,
}

/// Versions keyed by package name, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageGroups {
    groups: Vec<PackageGroup>,
}

impl PackageGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group_by_package(versions: &[Version]) -> Self {
        let mut groups = Self::new();
        for version in versions {
            groups.push(version.clone());
        }
        groups
    }

    /// Appends to the version's package group, creating the group at the end if needed.
    pub fn push(&mut self, version: Version) {
        match self
            .groups
            .iter_mut()
            .find(|g| g.package == version.package)
        {
            Some(group) => group.versions.push(version),
            None => self.groups.push(PackageGroup {
                package: version.package.clone(),
                versions: vec![version],
            }),
        }
    }

    pub fn get(&self, package: &str) -> Option<&[Version]> {
        self.groups
            .iter()
            .find(|g| g.package == package)
            .map(|g| g.versions.as_slice())
    }

    pub fn get_mut(&mut self, package: &str) -> Option<&mut Vec<Version>> {
        self.groups
            .iter_mut()
            .find(|g| g.package == package)
            .map(|g| &mut g.versions)
    }

    /// True if the package has at least one version in this grouping.
    pub fn contains(&self, package: &str) -> bool {
        self.get(package).is_some_and(|versions| !versions.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PackageGroup> {
        self.groups.iter()
    }

    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.package.as_str())
    }

    pub fn version_count(&self) -> usize {
        self.groups.iter().map(|g| g.versions.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.version_count() == 0
    }

    pub fn remove_empty(&mut self) {
        self.groups.retain(|g| !g.versions.is_empty());
    }

    /// Group order first, then version order within each group.
    pub fn flatten(&self) -> Vec<&Version> {
        self.groups.iter().flat_map(|g| g.versions.iter()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Delete,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A path relative to the API base URL, kept as raw segments so each one
/// can be percent-encoded when the request URL is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiPath {
    segments: Vec<String>,
}

impl ApiPath {
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn package(owner: &str, repo: &str, package: &str) -> Self {
        Self::from_segments(["packages", owner, repo, package])
    }

    pub fn version(owner: &str, repo: &str, package: &str, version: &str) -> Self {
        Self::from_segments(["packages", owner, repo, package, "versions", version])
    }

    pub fn repo_packages(owner: &str, repo: &str) -> Self {
        Self::from_segments(["repos", owner, repo, "packages"])
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}
