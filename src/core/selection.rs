use crate::domain::model::{CutoffResult, PackageGroups, Version};

/// Outcome of the deletion selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub to_delete: PackageGroups,
    pub to_keep: PackageGroups,
    /// Old versions moved into `to_keep` so their package is not emptied.
    pub rescued: Vec<Version>,
}

impl Selection {
    /// True when there is nothing left to delete after the rescue step.
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty()
    }
}

/// Groups old and new versions by package and picks the versions to delete.
///
/// A package whose every version is older than the cutoff keeps its most
/// recent one: the last element of its (ascending) old group moves into
/// `to_keep`. Packages with nothing left to delete are dropped from
/// `to_delete`.
pub fn select_deletions(result: &CutoffResult) -> Selection {
    let mut to_keep = PackageGroups::group_by_package(&result.new);
    let mut to_delete = PackageGroups::group_by_package(&result.old);
    let mut rescued = Vec::new();

    let unprotected: Vec<String> = to_delete
        .packages()
        .filter(|package| !to_keep.contains(package))
        .map(str::to_string)
        .collect();

    for package in unprotected {
        if let Some(newest) = to_delete.get_mut(&package).and_then(Vec::pop) {
            tracing::debug!("Keeping {} so {} is not left empty", newest.name, package);
            rescued.push(newest.clone());
            to_keep.push(newest);
        }
    }
    to_delete.remove_empty();

    Selection {
        to_delete,
        to_keep,
        rescued,
    }
}
