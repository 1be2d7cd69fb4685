use crate::config::SettingsOverrides;
use crate::core::executor::ExecuteOptions;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "bintray-cleanup", version)]
#[command(about = "Delete old package versions from Bintray, keeping at least one per package")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Defaults to https://api.bintray.com/
    #[arg(long)]
    pub api_base_url: Option<String>,

    #[arg(long, env = "BINTRAY_USERNAME", hide_env_values = true)]
    pub api_username: Option<String>,

    #[arg(long, env = "BINTRAY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// TOML settings file; command-line values take precedence
    #[arg(long, env = "BINTRAY_CLEANUP_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub cache_dir: Option<String>,

    /// Seconds a cached GET response stays valid
    #[arg(long)]
    pub cache_ttl_seconds: Option<u64>,

    #[arg(long, help = "Bypass the HTTP response cache")]
    pub no_cache: bool,

    #[arg(long)]
    pub request_timeout_seconds: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl GlobalArgs {
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            api_base_url: self.api_base_url.clone(),
            api_username: self.api_username.clone(),
            api_key: self.api_key.clone(),
            request_timeout_seconds: self.request_timeout_seconds,
            cache_enabled: if self.no_cache { Some(false) } else { None },
            cache_dir: self.cache_dir.clone(),
            cache_ttl_seconds: self.cache_ttl_seconds,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct RepoArgs {
    pub subject: String,
    pub repo: String,
}

#[derive(Debug, Clone, Args)]
pub struct PackageArgs {
    pub subject: String,
    pub repo: String,
    pub package: String,
}

#[derive(Debug, Clone, Args)]
pub struct DeleteArgs {
    /// Only report what would be deleted (default)
    #[arg(long = "dryrun", overrides_with = "no_dryrun")]
    pub dryrun_flag: bool,

    /// Actually delete
    #[arg(long = "no-dryrun", overrides_with = "dryrun_flag")]
    pub no_dryrun: bool,

    /// Delete at most this many versions
    #[arg(long)]
    pub limit: Option<usize>,

    /// Skip the per-version confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

impl DeleteArgs {
    pub fn options(&self) -> ExecuteOptions {
        ExecuteOptions {
            dryrun: !self.no_dryrun,
            limit: self.limit,
            auto_confirm: self.yes,
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List every version of a package
    ListVersions(PackageArgs),

    /// Split a package's versions at now minus OLDER_THAN_DAYS
    ListOldVersions {
        #[command(flatten)]
        package: PackageArgs,
        #[arg(allow_negative_numbers = true)]
        older_than_days: i64,
    },

    /// List the packages of a repository
    ListPackages(RepoArgs),

    /// Split the versions of every package in a repository at now minus OLDER_THAN_DAYS
    ListOldVersionsInRepo {
        #[command(flatten)]
        repo: RepoArgs,
        #[arg(allow_negative_numbers = true)]
        older_than_days: i64,
    },

    /// Delete a package's versions older than OLDER_THAN_DAYS, keeping at least one
    DeleteOldVersions {
        #[command(flatten)]
        package: PackageArgs,
        #[arg(allow_negative_numbers = true)]
        older_than_days: i64,
        #[command(flatten)]
        delete: DeleteArgs,
    },

    /// Delete old versions across every package of a repository, keeping at least one per package
    DeleteOldVersionsInRepo {
        #[command(flatten)]
        repo: RepoArgs,
        #[arg(allow_negative_numbers = true)]
        older_than_days: i64,
        #[command(flatten)]
        delete: DeleteArgs,
    },

    /// Remove every cached API response
    ClearCache,
}
