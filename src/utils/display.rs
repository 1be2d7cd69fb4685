use crate::domain::model::Version;
use colored::Colorize;

/// Space-separated version names, in the order given.
pub fn version_names(versions: &[Version]) -> String {
    versions
        .iter()
        .map(|v| v.name.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn version_details(version: &Version) -> String {
    match serde_json::to_string_pretty(version) {
        Ok(json) => json,
        Err(_) => version.coordinates(),
    }
}

pub fn pretty_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

pub fn dryrun_prefix(dryrun: bool) -> String {
    if dryrun {
        format!("{} ", "(DRYRUN)".cyan())
    } else {
        String::new()
    }
}
