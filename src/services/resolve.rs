use tracing::{debug, info};

use crate::error::{ExportError, Result};
use crate::services::SecretsApi;
use crate::types::{
    Owner, Repository, ScopedRepositoriesResponse, SecretAccess, SecretCategory,
    SecretExportRow, SecretsResponse,
};

/// Turns secret metadata into report rows for a fixed repository snapshot
///
/// The snapshot is the enumerated repository list. "private" organization
/// secrets are expanded against it without a fresh lookup, so a repository
/// whose visibility changed after enumeration is reported as it was then.
pub struct SecretResolver<'a, A> {
    api: &'a A,
    owner: &'a Owner,
    repositories: &'a [Repository],
}

impl<'a, A: SecretsApi> SecretResolver<'a, A> {
    pub fn new(api: &'a A, owner: &'a Owner, repositories: &'a [Repository]) -> Self {
        Self {
            api,
            owner,
            repositories,
        }
    }

    /// Resolves every category in turn.
    ///
    /// For each category the organization rows come first (only when
    /// `include_organization` is set), followed by the repository rows in
    /// snapshot order. The first failed fetch aborts the whole resolution.
    pub async fn resolve(
        &self,
        categories: &[SecretCategory],
        include_organization: bool,
    ) -> Result<Vec<SecretExportRow>> {
        let mut rows = Vec::new();

        for category in categories {
            let start_time = std::time::Instant::now();
            let before = rows.len();

            if include_organization {
                rows.extend(self.organization_rows(*category).await?);
            }
            rows.extend(self.repository_rows(*category).await?);

            info!(
                "Resolved {} {} secret rows for {} in {:?}",
                rows.len() - before,
                category,
                self.owner,
                start_time.elapsed()
            );
        }

        Ok(rows)
    }

    /// Rows for the organization-level secrets of one category.
    pub async fn organization_rows(&self, category: SecretCategory) -> Result<Vec<SecretExportRow>> {
        let body = self
            .api
            .fetch_org_secrets(self.owner, category)
            .await
            .inspect_err(|e| {
                debug!(
                    "Failed to list {} organization secrets for {}: {}",
                    category, self.owner, e
                )
            })?;

        let what = || format!("{} organization secrets of {}", category, self.owner);
        let response: SecretsResponse =
            serde_json::from_value(body).map_err(|e| ExportError::decode(what(), e))?;
        ensure_complete(what, response.total_count, response.missing_count())?;

        let mut rows = Vec::new();
        for secret in &response.secrets {
            let access = secret.declared_visibility();

            match secret.access() {
                SecretAccess::Selected => {
                    let scoped = self.scoped_repositories(category, &secret.name).await?;
                    debug!(
                        "{} secret {} is granted to {} repositories",
                        category,
                        secret.name,
                        scoped.repositories.len()
                    );
                    rows.extend(scoped.repositories.iter().map(|repository| {
                        SecretExportRow::organization_scoped(
                            category,
                            &secret.name,
                            access,
                            repository,
                        )
                    }));
                }
                SecretAccess::Private => {
                    rows.extend(
                        self.repositories
                            .iter()
                            .filter(|repository| !repository.visibility.is_public())
                            .map(|repository| {
                                SecretExportRow::organization_for_repository(
                                    category,
                                    &secret.name,
                                    access,
                                    repository,
                                )
                            }),
                    );
                }
                SecretAccess::All => {
                    rows.push(SecretExportRow::organization_wide(
                        category,
                        &secret.name,
                        access,
                    ));
                }
            }
        }

        Ok(rows)
    }

    /// Rows for the secrets defined directly on each repository of the snapshot.
    pub async fn repository_rows(&self, category: SecretCategory) -> Result<Vec<SecretExportRow>> {
        let mut rows = Vec::new();

        for repository in self.repositories {
            let body = self
                .api
                .fetch_repository_secrets(self.owner, &repository.name, category)
                .await
                .inspect_err(|e| {
                    debug!(
                        "Failed to list {} secrets of {}/{}: {}",
                        category, self.owner, repository.name, e
                    )
                })?;

            let what = || format!("{} secrets of {}/{}", category, self.owner, repository.name);
            let response: SecretsResponse =
                serde_json::from_value(body).map_err(|e| ExportError::decode(what(), e))?;
            ensure_complete(what, response.total_count, response.missing_count())?;

            rows.extend(response.secrets.iter().map(|secret| {
                SecretExportRow::repository_only(category, &secret.name, repository)
            }));
        }

        Ok(rows)
    }

    async fn scoped_repositories(
        &self,
        category: SecretCategory,
        secret_name: &str,
    ) -> Result<ScopedRepositoriesResponse> {
        let body = self
            .api
            .fetch_scoped_repositories(self.owner, category, secret_name)
            .await
            .inspect_err(|e| {
                debug!(
                    "Failed to list repositories for {} secret {}: {}",
                    category, secret_name, e
                )
            })?;

        let what = || format!("repositories of {} secret {}", category, secret_name);
        let response: ScopedRepositoriesResponse =
            serde_json::from_value(body).map_err(|e| ExportError::decode(what(), e))?;
        ensure_complete(what, response.total_count, response.missing_count())?;

        Ok(response)
    }
}

/// Rejects a listing that holds fewer entries than its `total_count`.
///
/// Listings are fetched as a single page, so a shortfall means rows would be
/// missing from the report.
fn ensure_complete<F>(what: F, total_count: u64, missing: u64) -> Result<()>
where
    F: FnOnce() -> String,
{
    if missing == 0 {
        return Ok(());
    }

    Err(ExportError::Decode {
        what: what(),
        message: format!(
            "listing returned {} of {} entries",
            total_count - missing,
            total_count
        ),
    })
}
