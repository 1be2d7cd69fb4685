use crate::config::cli::Command;
use crate::core::cleanup::{CleanupEngine, Scope};
use crate::core::{Confirmer, RepositoryClient};
use crate::utils::display;
use crate::utils::error::Result;

/// Maps a parsed command onto the engine.
pub async fn run<C, F>(command: &Command, engine: &CleanupEngine<'_, C, F>) -> Result<()>
where
    C: RepositoryClient + ?Sized,
    F: Confirmer + ?Sized,
{
    match command {
        Command::ListVersions(args) => {
            let scope = Scope::package(&args.subject, &args.repo, &args.package);
            for version in engine.list_versions(&scope).await? {
                println!("{}", display::version_details(&version));
            }
        }
        Command::ListOldVersions {
            package,
            older_than_days,
        } => {
            let scope = Scope::package(&package.subject, &package.repo, &package.package);
            engine.list_old_versions(&scope, *older_than_days).await?;
        }
        Command::ListPackages(args) => {
            for package in engine.list_packages(&args.subject, &args.repo).await? {
                println!("{}", package);
            }
        }
        Command::ListOldVersionsInRepo {
            repo,
            older_than_days,
        } => {
            let scope = Scope::repo(&repo.subject, &repo.repo);
            engine.list_old_versions(&scope, *older_than_days).await?;
        }
        Command::DeleteOldVersions {
            package,
            older_than_days,
            delete,
        } => {
            let scope = Scope::package(&package.subject, &package.repo, &package.package);
            engine
                .delete_old_versions(&scope, *older_than_days, &delete.options())
                .await?;
        }
        Command::DeleteOldVersionsInRepo {
            repo,
            older_than_days,
            delete,
        } => {
            let scope = Scope::repo(&repo.subject, &repo.repo);
            engine
                .delete_old_versions(&scope, *older_than_days, &delete.options())
                .await?;
        }
        Command::ClearCache => {
            engine.clear_cache().await?;
        }
    }
    Ok(())
}
