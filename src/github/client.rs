use crate::config::GitHubHost;
use crate::error::{ExportError, Result};
use crate::github::error::from_octocrab_error;
use crate::services::SecretsApi;
use crate::types::{
    Owner, Repository, RepositoryCursor, RepositoryId, RepositoryName, RepositoryPage,
    SecretCategory,
};

use super::graphql::error::graphql_errors_to_export_error;
use super::graphql::graphql_types::{
    GraphQLPayload, GraphQLQuery, GraphQLResponse, OrganizationRepositoriesResponse,
    RepositoryResponse,
};
use super::graphql::repository::{
    OrganizationRepositoriesVariable, REPOSITORY_PAGE_SIZE, RepositoryVariable,
    organization_repositories_query, repository_query,
};

use octocrab::Octocrab;
use octocrab::service::middleware::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Connect timeout applied to every request
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Read and write timeout applied to every request
pub const READ_WRITE_TIMEOUT: Duration = Duration::from_secs(60);

/// Largest page the REST listing endpoints serve
pub const LISTING_PAGE_SIZE: u8 = 100;

#[derive(Serialize)]
struct ListingParameters {
    per_page: u8,
}

pub trait GraphQLExecutor {
    #[allow(async_fn_in_trait)]
    async fn execute_graphql<T: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        query_name: &str,
        payload: GraphQLPayload<T>,
    ) -> Result<GraphQLResponse<R>>;
}

/// Authenticated client for the REST and GraphQL APIs of one GitHub host
///
/// Each method performs exactly one request. Nothing is cached and failed
/// requests are not retried.
#[derive(Clone)]
pub struct GitHubClient {
    pub(crate) client: octocrab::Octocrab,
    host: GitHubHost,
}

impl GitHubClient {
    pub fn new(host: GitHubHost, token: String) -> Result<Self> {
        let client = Octocrab::builder()
            .base_uri(host.base_uri())
            .map_err(|e| {
                ExportError::Config(format!("invalid API base URI {}: {}", host.base_uri(), e))
            })?
            .personal_token(token)
            .add_retry_config(RetryConfig::None)
            .set_connect_timeout(Some(CONNECT_TIMEOUT))
            .set_read_timeout(Some(READ_WRITE_TIMEOUT))
            .set_write_timeout(Some(READ_WRITE_TIMEOUT))
            .build()
            .map_err(|e| ExportError::Config(format!("failed to build GitHub client: {}", e)))?;

        Ok(Self { client, host })
    }

    /// Fetches one page of an organization's repositories.
    ///
    /// # Arguments
    ///
    /// * `owner` - Organization login
    /// * `cursor` - End cursor of the previous page, `None` for the first page
    ///
    /// # Errors
    ///
    /// - Transport failures and GraphQL errors (unknown organization, missing
    ///   permissions) as [`ExportError::Transport`] / [`ExportError::GraphQL`]
    /// - Nodes without a database id or with malformed timestamps as
    ///   [`ExportError::Decode`]
    pub async fn fetch_organization_repositories(
        &self,
        owner: &Owner,
        cursor: Option<&RepositoryCursor>,
    ) -> Result<RepositoryPage> {
        let variables = OrganizationRepositoriesVariable {
            owner: owner.clone(),
            first: REPOSITORY_PAGE_SIZE,
            end_cursor: cursor.map(|c| c.0.clone()),
        };

        let payload = GraphQLPayload {
            query: GraphQLQuery(organization_repositories_query()),
            variables: Some(variables),
        };

        let response: GraphQLResponse<OrganizationRepositoriesResponse> = self
            .execute_graphql("organization_repositories", payload)
            .await?;

        let organization = response
            .data
            .and_then(|data| data.organization)
            .ok_or_else(|| ExportError::GraphQL {
                operation: "organization_repositories".to_string(),
                message: format!("organization not found: {}", owner),
            })?;

        let connection = organization.repositories;
        let repositories = connection
            .nodes
            .into_iter()
            .map(Repository::try_from)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Fetched {} of {} repositories for {}",
            repositories.len(),
            connection.total_count,
            owner
        );

        Ok(RepositoryPage {
            repositories,
            end_cursor: connection.page_info.next_cursor(),
            has_next_page: connection.page_info.has_next_page,
        })
    }

    /// Fetches a single repository by owner and name.
    pub async fn fetch_repository_by_id(&self, repository_id: &RepositoryId) -> Result<Repository> {
        let variables = RepositoryVariable {
            owner: repository_id.owner().clone(),
            repository_name: repository_id.repo_name().clone(),
        };

        let payload = GraphQLPayload {
            query: GraphQLQuery(repository_query()),
            variables: Some(variables),
        };

        let response: GraphQLResponse<RepositoryResponse> =
            self.execute_graphql("fetch_repository", payload).await?;

        let repository_node = response
            .data
            .and_then(|data| data.repository)
            .ok_or_else(|| ExportError::RepositoryNotFound(repository_id.clone()))?;

        Repository::try_from(repository_node)
    }

    /// Issues a GET against a REST listing route and returns the raw JSON body.
    ///
    /// The largest page size is requested; callers compare `total_count`
    /// against what came back.
    pub async fn get_json(&self, operation: &str, route: &str) -> Result<serde_json::Value> {
        let route = self.host.rest_route(route);
        info!("Starting REST request {} GET {}", operation, route);

        let parameters = ListingParameters {
            per_page: LISTING_PAGE_SIZE,
        };
        let start_time = std::time::Instant::now();
        let body = self
            .client
            .get::<serde_json::Value, _, _>(&route, Some(&parameters))
            .await
            .map_err(|e| from_octocrab_error(operation, e))?;

        debug!("REST request {} completed in {:?}", operation, start_time.elapsed());
        Ok(body)
    }
}

impl GraphQLExecutor for GitHubClient {
    async fn execute_graphql<T: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        query_name: &str,
        payload: GraphQLPayload<T>,
    ) -> Result<GraphQLResponse<R>> {
        debug!(
            "Starting GraphQL request {} with payload: {}",
            query_name,
            serde_json::to_string_pretty(&payload).unwrap_or_else(|_| "Invalid JSON".to_string())
        );

        let start_time = std::time::Instant::now();

        let response: GraphQLResponse<R> = self
            .client
            .post(self.host.graphql_route(), Some(&payload))
            .await
            .map_err(|e| from_octocrab_error(query_name, e))?;

        info!(
            "GraphQL request {} completed in {:?}",
            query_name,
            start_time.elapsed()
        );

        if let Some(errors) = &response.errors {
            if let Some(error) = graphql_errors_to_export_error(query_name, errors) {
                return Err(error);
            }
        }

        Ok(response)
    }
}

impl SecretsApi for GitHubClient {
    async fn fetch_repository_page(
        &self,
        owner: &Owner,
        cursor: Option<&RepositoryCursor>,
    ) -> Result<RepositoryPage> {
        self.fetch_organization_repositories(owner, cursor).await
    }

    async fn fetch_repository(&self, owner: &Owner, name: &RepositoryName) -> Result<Repository> {
        let repository_id = RepositoryId {
            owner: owner.clone(),
            repository_name: name.clone(),
        };
        self.fetch_repository_by_id(&repository_id).await
    }

    async fn fetch_org_secrets(
        &self,
        owner: &Owner,
        category: SecretCategory,
    ) -> Result<serde_json::Value> {
        let operation = format!("org_{}_secrets", category.as_ref().to_lowercase());
        self.get_json(&operation, &category.org_secrets_route(owner))
            .await
    }

    async fn fetch_repository_secrets(
        &self,
        owner: &Owner,
        repository: &RepositoryName,
        category: SecretCategory,
    ) -> Result<serde_json::Value> {
        let operation = format!("repo_{}_secrets", category.as_ref().to_lowercase());
        self.get_json(
            &operation,
            &category.repository_secrets_route(owner, repository),
        )
        .await
    }

    async fn fetch_scoped_repositories(
        &self,
        owner: &Owner,
        category: SecretCategory,
        secret_name: &str,
    ) -> Result<serde_json::Value> {
        let operation = format!(
            "scoped_{}_secret_repositories",
            category.as_ref().to_lowercase()
        );
        self.get_json(
            &operation,
            &category.scoped_repositories_route(owner, secret_name),
        )
        .await
    }
}
