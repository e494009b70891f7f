//! Export pipeline: repository enumeration, secret resolution and the run
//! that ties them to a report

pub mod enumerate;
pub mod export;
pub mod resolve;

#[cfg(test)]
pub(crate) mod testing;

pub use enumerate::*;
pub use export::*;
pub use resolve::*;

use crate::error::Result;
use crate::types::{Owner, Repository, RepositoryCursor, RepositoryName, RepositoryPage, SecretCategory};

/// The GitHub calls the export is built from
///
/// Every method is one network round-trip. Secret listings are returned as
/// raw JSON and decoded by the caller.
#[allow(async_fn_in_trait)]
pub trait SecretsApi {
    /// One page of the organization repository listing, starting after `cursor`
    async fn fetch_repository_page(
        &self,
        owner: &Owner,
        cursor: Option<&RepositoryCursor>,
    ) -> Result<RepositoryPage>;

    async fn fetch_repository(&self, owner: &Owner, name: &RepositoryName) -> Result<Repository>;

    async fn fetch_org_secrets(
        &self,
        owner: &Owner,
        category: SecretCategory,
    ) -> Result<serde_json::Value>;

    async fn fetch_repository_secrets(
        &self,
        owner: &Owner,
        repository: &RepositoryName,
        category: SecretCategory,
    ) -> Result<serde_json::Value>;

    /// Repositories granted a "selected" organization secret
    async fn fetch_scoped_repositories(
        &self,
        owner: &Owner,
        category: SecretCategory,
        secret_name: &str,
    ) -> Result<serde_json::Value>;
}
