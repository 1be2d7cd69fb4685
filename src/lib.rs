pub mod adapters;
#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::Cli;

pub use adapters::{HttpRepositoryClient, LocalStorage, StdinConfirmer};
pub use config::{toml_config::FileConfig, Settings, SettingsOverrides};
pub use core::cleanup::{CleanupEngine, CleanupOutcome, Scope};
pub use core::executor::ExecuteOptions;
pub use utils::error::{CleanupError, Result};
