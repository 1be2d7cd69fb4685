use crate::domain::model::{ApiPath, PackageDescriptor, PackageListing, Verb, Version};
use crate::domain::ports::RepositoryClient;
use crate::utils::error::{CleanupError, Result};

/// Loads version records from the package API.
pub struct VersionCatalog<'a, C: RepositoryClient + ?Sized> {
    client: &'a C,
}

impl<'a, C: RepositoryClient + ?Sized> VersionCatalog<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Every version of one package, in the order the package descriptor lists them.
    pub async fn load_versions(&self, owner: &str, repo: &str, package: &str) -> Result<Vec<Version>> {
        let path = ApiPath::package(owner, repo, package);
        let descriptor: PackageDescriptor = self.get_typed(&path).await?;
        tracing::debug!(
            "📦 {}/{}/{}: {} versions listed",
            owner,
            repo,
            package,
            descriptor.versions.len()
        );

        let mut versions = Vec::with_capacity(descriptor.versions.len());
        for version_name in &descriptor.versions {
            let version_path = ApiPath::version(owner, repo, package, version_name);
            let raw = self.client.request_json(Verb::Get, &version_path).await?;
            let version = Version::from_json(raw).map_err(|source| CleanupError::RecordDecodeError {
                verb: Verb::Get.to_string(),
                path: version_path.to_string(),
                source: Box::new(source),
            })?;
            versions.push(version);
        }

        Ok(versions)
    }

    pub async fn list_packages(&self, owner: &str, repo: &str) -> Result<Vec<String>> {
        let path = ApiPath::repo_packages(owner, repo);
        let listing: Vec<PackageListing> = self.get_typed(&path).await?;
        Ok(listing.into_iter().map(|p| p.name).collect())
    }

    /// Versions of every package in the repository, concatenated in listing order.
    pub async fn load_versions_for_repo(&self, owner: &str, repo: &str) -> Result<Vec<Version>> {
        let packages = self.list_packages(owner, repo).await?;
        tracing::info!("📦 {}/{}: {} packages", owner, repo, packages.len());

        let mut versions = Vec::new();
        for package in &packages {
            versions.extend(self.load_versions(owner, repo, package).await?);
        }
        Ok(versions)
    }

    async fn get_typed<T: serde::de::DeserializeOwned>(&self, path: &ApiPath) -> Result<T> {
        let raw = self.client.request_json(Verb::Get, path).await?;
        serde_json::from_value(raw).map_err(|e| CleanupError::ResponseDecodeError {
            verb: Verb::Get.to_string(),
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}
