//! Secret categories and the REST payloads describing secrets
//!
//! Actions, Dependabot and Codespaces expose the same three listing endpoints,
//! so a category is modelled as a single descriptor carrying its endpoint
//! templates rather than three parallel sets of functions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

use super::{Owner, RepositoryName};

/// Kind of secret store on GitHub
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
    AsRefStr, EnumIter,
)]
pub enum SecretCategory {
    Actions,
    Dependabot,
    Codespaces,
}

/// REST path templates for one secret category
///
/// Placeholders are `{owner}`, `{repo}` and `{secret}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretEndpoints {
    pub org_secrets: &'static str,
    pub repository_secrets: &'static str,
    pub scoped_repositories: &'static str,
}

const ACTIONS_ENDPOINTS: SecretEndpoints = SecretEndpoints {
    org_secrets: "/orgs/{owner}/actions/secrets",
    repository_secrets: "/repos/{owner}/{repo}/actions/secrets",
    scoped_repositories: "/orgs/{owner}/actions/secrets/{secret}/repositories",
};

const DEPENDABOT_ENDPOINTS: SecretEndpoints = SecretEndpoints {
    org_secrets: "/orgs/{owner}/dependabot/secrets",
    repository_secrets: "/repos/{owner}/{repo}/dependabot/secrets",
    scoped_repositories: "/orgs/{owner}/dependabot/secrets/{secret}/repositories",
};

const CODESPACES_ENDPOINTS: SecretEndpoints = SecretEndpoints {
    org_secrets: "/orgs/{owner}/codespaces/secrets",
    repository_secrets: "/repos/{owner}/{repo}/codespaces/secrets",
    scoped_repositories: "/orgs/{owner}/codespaces/secrets/{secret}/repositories",
};

impl SecretCategory {
    pub fn endpoints(&self) -> &'static SecretEndpoints {
        match self {
            Self::Actions => &ACTIONS_ENDPOINTS,
            Self::Dependabot => &DEPENDABOT_ENDPOINTS,
            Self::Codespaces => &CODESPACES_ENDPOINTS,
        }
    }

    /// Route listing the organization-level secrets of this category
    pub fn org_secrets_route(&self, owner: &Owner) -> String {
        render_route(self.endpoints().org_secrets, &[("owner", owner.as_str())])
    }

    /// Route listing the secrets defined directly on a repository
    pub fn repository_secrets_route(&self, owner: &Owner, repo: &RepositoryName) -> String {
        render_route(
            self.endpoints().repository_secrets,
            &[("owner", owner.as_str()), ("repo", repo.as_str())],
        )
    }

    /// Route listing the repositories granted a "selected" organization secret
    pub fn scoped_repositories_route(&self, owner: &Owner, secret_name: &str) -> String {
        render_route(
            self.endpoints().scoped_repositories,
            &[("owner", owner.as_str()), ("secret", secret_name)],
        )
    }
}

/// Substitutes `{key}` placeholders with percent-encoded values.
fn render_route(template: &str, params: &[(&str, &str)]) -> String {
    params
        .iter()
        .fold(template.to_string(), |route, (key, value)| {
            route.replace(&format!("{{{}}}", key), &urlencoding::encode(value))
        })
}

/// Access policy of an organization secret, derived from its visibility string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretAccess {
    /// Every repository in the organization
    All,
    /// Every non-public repository in the organization
    Private,
    /// An explicit allow-list, fetched separately
    Selected,
}

/// A secret as listed by the REST API (organization or repository scope)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Present only on organization secrets
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub selected_repositories_url: Option<String>,
}

impl Secret {
    /// Visibility string exactly as declared upstream, empty when absent
    pub fn declared_visibility(&self) -> &str {
        self.visibility.as_deref().unwrap_or_default()
    }

    /// Anything other than "selected" or "private" is treated as "all".
    pub fn access(&self) -> SecretAccess {
        match self.declared_visibility() {
            "selected" => SecretAccess::Selected,
            "private" => SecretAccess::Private,
            _ => SecretAccess::All,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretsResponse {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub secrets: Vec<Secret>,
}

impl SecretsResponse {
    /// Secrets counted by `total_count` but absent from this response
    pub fn missing_count(&self) -> u64 {
        self.total_count.saturating_sub(self.secrets.len() as u64)
    }
}

/// A repository granted access to a "selected" organization secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopedRepository {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopedRepositoriesResponse {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub repositories: Vec<ScopedRepository>,
}

impl ScopedRepositoriesResponse {
    pub fn missing_count(&self) -> u64 {
        self.total_count.saturating_sub(self.repositories.len() as u64)
    }
}
