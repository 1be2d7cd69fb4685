pub mod catalog;
pub mod cleanup;
pub mod executor;
pub mod partition;
pub mod selection;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::model::{CutoffResult, PackageGroups, Version};
pub use crate::domain::ports::{ConfigProvider, Confirmer, RepositoryClient, Storage};
pub use crate::utils::error::Result;
