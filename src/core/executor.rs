use crate::domain::model::{PackageGroups, Verb, Version};
use crate::domain::ports::{Confirmer, RepositoryClient};
use crate::utils::display;
use crate::utils::error::Result;
use colored::Colorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteOptions {
    pub dryrun: bool,
    pub limit: Option<usize>,
    pub auto_confirm: bool,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            dryrun: true,
            limit: None,
            auto_confirm: false,
        }
    }
}

/// Where a candidate ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateState {
    Confirmed,
    Skipped,
    Deleted,
    Simulated,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionReport {
    /// Deleted versions, or in a dry run the ones that would have been.
    pub deleted: Vec<Version>,
    pub skipped: Vec<Version>,
}

/// Flattens the groups and keeps the first `limit` versions, group order first.
pub fn limit_candidates(to_delete: &PackageGroups, limit: Option<usize>) -> Vec<&Version> {
    let flat = to_delete.flatten();
    match limit {
        Some(limit) => flat.into_iter().take(limit).collect(),
        None => flat,
    }
}

pub struct DeletionExecutor<'a, C: RepositoryClient + ?Sized, F: Confirmer + ?Sized> {
    client: &'a C,
    confirmer: &'a F,
}

impl<'a, C: RepositoryClient + ?Sized, F: Confirmer + ?Sized> DeletionExecutor<'a, C, F> {
    pub fn new(client: &'a C, confirmer: &'a F) -> Self {
        Self { client, confirmer }
    }

    /// Walks the candidates oldest first, package by package.
    ///
    /// A declined prompt skips the version and moves on. A failed DELETE aborts
    /// the rest of the batch. Unless this is a dry run the response cache is
    /// cleared afterwards, also when the batch was aborted.
    pub async fn execute(
        &self,
        to_delete: &PackageGroups,
        options: &ExecuteOptions,
    ) -> Result<ExecutionReport> {
        let prefix = display::dryrun_prefix(options.dryrun);
        let candidates = limit_candidates(to_delete, options.limit);
        let mut report = ExecutionReport::default();

        if candidates.is_empty() {
            println!("{}", "No versions to delete, exiting.".green());
            return Ok(report);
        }

        let selected: Vec<Version> = candidates.iter().map(|v| (*v).clone()).collect();
        println!(
            "{}{}",
            prefix,
            format!(
                "Selected {} versions to delete: {}",
                selected.len(),
                display::version_names(&selected)
            )
            .red()
        );

        let outcome = self.process_all(&candidates, options, &prefix, &mut report).await;

        if !options.dryrun {
            if let Err(e) = self.client.clear_cache().await {
                if outcome.is_ok() {
                    return Err(e);
                }
                tracing::warn!("Could not clear the response cache after a failed batch: {}", e);
            }
        }
        outcome?;

        println!(
            "{}Deleted {} versions: {}",
            prefix,
            report.deleted.len().to_string().red(),
            display::version_names(&report.deleted)
        );
        if !report.skipped.is_empty() {
            println!(
                "Skipped {} versions: {}",
                report.skipped.len(),
                display::version_names(&report.skipped)
            );
        }

        Ok(report)
    }

    async fn process_all(
        &self,
        candidates: &[&Version],
        options: &ExecuteOptions,
        prefix: &str,
        report: &mut ExecutionReport,
    ) -> Result<()> {
        for version in candidates {
            let coordinates = version.coordinates().red();
            println!("{}Candidate for deletion: {}", prefix, coordinates);
            println!("{}", display::version_details(version));

            let state = self.process(version, options, prefix).await?;
            tracing::debug!("{} -> {:?}", version.coordinates(), state);
            match state {
                CandidateState::Deleted | CandidateState::Simulated => {
                    report.deleted.push((*version).clone())
                }
                CandidateState::Skipped => report.skipped.push((*version).clone()),
                CandidateState::Confirmed => {}
            }

            println!("Done processing {}\n", coordinates);
        }
        Ok(())
    }

    async fn process(
        &self,
        version: &Version,
        options: &ExecuteOptions,
        prefix: &str,
    ) -> Result<CandidateState> {
        let state = self.confirm(version, options, prefix)?;
        if state != CandidateState::Confirmed {
            return Ok(state);
        }

        if options.dryrun {
            println!(
                "{}",
                format!("This is a dry-run, not deleting {}", version.coordinates()).cyan()
            );
            return Ok(CandidateState::Simulated);
        }

        tracing::info!("🗑️  Deleting {}", version.coordinates());
        self.client
            .request_json(Verb::Delete, &version.api_path())
            .await?;
        Ok(CandidateState::Deleted)
    }

    fn confirm(
        &self,
        version: &Version,
        options: &ExecuteOptions,
        prefix: &str,
    ) -> Result<CandidateState> {
        if options.auto_confirm {
            println!("{}", "Invoked with --yes, skipping confirmation prompt.".cyan());
            return Ok(CandidateState::Confirmed);
        }

        let prompt = format!("{}Confirm deletion of {}", prefix, version.coordinates().red());
        if self.confirmer.confirm(&prompt)? {
            Ok(CandidateState::Confirmed)
        } else {
            tracing::info!("Skipping {}", version.coordinates());
            Ok(CandidateState::Skipped)
        }
    }
}
