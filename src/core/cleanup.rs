use crate::core::catalog::VersionCatalog;
use crate::core::executor::{limit_candidates, DeletionExecutor, ExecuteOptions, ExecutionReport};
use crate::core::partition::partition;
use crate::core::selection::{select_deletions, Selection};
use crate::domain::model::{CutoffResult, Version};
use crate::domain::ports::{Confirmer, RepositoryClient};
use crate::utils::display;
use crate::utils::error::Result;
use colored::Colorize;

/// Which versions a command works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Package {
        owner: String,
        repo: String,
        package: String,
    },
    Repo {
        owner: String,
        repo: String,
    },
}

impl Scope {
    pub fn package(owner: &str, repo: &str, package: &str) -> Self {
        Scope::Package {
            owner: owner.to_string(),
            repo: repo.to_string(),
            package: package.to_string(),
        }
    }

    pub fn repo(owner: &str, repo: &str) -> Self {
        Scope::Repo {
            owner: owner.to_string(),
            repo: repo.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CleanupOutcome {
    NothingToDelete { selection: Selection },
    Completed { selection: Selection, report: ExecutionReport },
}

impl CleanupOutcome {
    pub fn deleted(&self) -> &[Version] {
        match self {
            CleanupOutcome::NothingToDelete { .. } => &[],
            CleanupOutcome::Completed { report, .. } => &report.deleted,
        }
    }
}

/// Load, partition, select, execute.
pub struct CleanupEngine<'a, C: RepositoryClient + ?Sized, F: Confirmer + ?Sized> {
    client: &'a C,
    confirmer: &'a F,
}

impl<'a, C: RepositoryClient + ?Sized, F: Confirmer + ?Sized> CleanupEngine<'a, C, F> {
    pub fn new(client: &'a C, confirmer: &'a F) -> Self {
        Self { client, confirmer }
    }

    pub async fn list_versions(&self, scope: &Scope) -> Result<Vec<Version>> {
        let catalog = VersionCatalog::new(self.client);
        match scope {
            Scope::Package {
                owner,
                repo,
                package,
            } => catalog.load_versions(owner, repo, package).await,
            Scope::Repo { owner, repo } => catalog.load_versions_for_repo(owner, repo).await,
        }
    }

    pub async fn list_packages(&self, owner: &str, repo: &str) -> Result<Vec<String>> {
        VersionCatalog::new(self.client).list_packages(owner, repo).await
    }

    pub async fn list_old_versions(&self, scope: &Scope, older_than_days: i64) -> Result<CutoffResult> {
        let versions = self.list_versions(scope).await?;
        let result = partition(versions, older_than_days);
        report_cutoff(&result, older_than_days);
        Ok(result)
    }

    pub async fn delete_old_versions(
        &self,
        scope: &Scope,
        older_than_days: i64,
        options: &ExecuteOptions,
    ) -> Result<CleanupOutcome> {
        let result = self.list_old_versions(scope, older_than_days).await?;
        println!();

        let selection = select_deletions(&result);
        for kept in &selection.rescued {
            println!(
                "Keeping {} as the newest remaining version of {}",
                kept.name.green(),
                kept.package
            );
        }

        if limit_candidates(&selection.to_delete, options.limit).is_empty() {
            println!("{}", "No versions to delete, exiting.".green());
            return Ok(CleanupOutcome::NothingToDelete { selection });
        }

        let executor = DeletionExecutor::new(self.client, self.confirmer);
        let report = executor.execute(&selection.to_delete, options).await?;
        Ok(CleanupOutcome::Completed { selection, report })
    }

    /// Returns false when the client runs without a cache.
    pub async fn clear_cache(&self) -> Result<bool> {
        let cleared = self.client.clear_cache().await?;
        if cleared {
            println!("Cleared HTTP response cache");
        } else {
            println!("{}", "Response cache is disabled, nothing to clear.".yellow());
        }
        Ok(cleared)
    }
}

fn report_cutoff(result: &CutoffResult, older_than_days: i64) {
    let cutoff = result.cutoff.to_string().yellow();
    println!(
        "Cutoff date {} days ago: {}",
        older_than_days.to_string().yellow(),
        cutoff
    );
    println!(
        "Found {} versions created BEFORE {}: {}",
        result.old.len().to_string().red(),
        cutoff,
        display::version_names(&result.old)
    );
    println!(
        "Found {} versions created AFTER {}: {}",
        result.new.len().to_string().green(),
        cutoff,
        display::version_names(&result.new)
    );
}
