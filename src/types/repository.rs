//! Repository domain types
//!
//! Repositories are collected once per run, either page by page from the
//! organization listing or one by one from explicit names. The resulting
//! ordered list is immutable for the rest of the export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::github::graphql::graphql_types::repository::{RepositoryNode, RepositoryVisibilityNode};

/// Owner (organization login) wrapper for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Owner(pub String);

impl Owner {
    pub fn new(owner: String) -> Self {
        Self(owner)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Owner {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Owner {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Repository name wrapper for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct RepositoryName(pub String);

impl RepositoryName {
    pub fn new(repo_name: String) -> Self {
        Self(repo_name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RepositoryName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RepositoryName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identity of a repository within a run: (owner, name)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct RepositoryId {
    pub owner: Owner,
    pub repository_name: RepositoryName,
}

impl RepositoryId {
    pub fn new<T1: Into<String>, T2: Into<String>>(owner: T1, name: T2) -> Self {
        Self {
            owner: Owner::new(owner.into()),
            repository_name: RepositoryName::new(name.into()),
        }
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub fn repo_name(&self) -> &RepositoryName {
        &self.repository_name
    }
}

impl std::fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repository_name)
    }
}

/// Repository visibility as reported by the GraphQL API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryVisibility {
    Public,
    Private,
    Internal,
}

impl RepositoryVisibility {
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Public)
    }
}

impl From<RepositoryVisibilityNode> for RepositoryVisibility {
    fn from(node: RepositoryVisibilityNode) -> Self {
        match node {
            RepositoryVisibilityNode::Public => Self::Public,
            RepositoryVisibilityNode::Private => Self::Private,
            RepositoryVisibilityNode::Internal => Self::Internal,
        }
    }
}

/// A repository in scope for the export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Numeric database id, the same value REST endpoints report as `id`
    pub id: u64,
    pub name: RepositoryName,
    pub visibility: RepositoryVisibility,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<RepositoryNode> for Repository {
    type Error = ExportError;

    fn try_from(node: RepositoryNode) -> Result<Self, Self::Error> {
        let id = node.database_id.ok_or_else(|| ExportError::Decode {
            what: format!("repository {}", node.name),
            message: "missing databaseId".to_string(),
        })?;

        let updated_at = DateTime::parse_from_rfc3339(&node.updated_at)
            .map_err(|e| ExportError::Decode {
                what: format!("updatedAt of repository {}", node.name),
                message: e.to_string(),
            })?
            .with_timezone(&Utc);

        Ok(Self {
            id,
            name: RepositoryName::new(node.name),
            visibility: node.visibility.into(),
            updated_at,
        })
    }
}

/// Opaque continuation cursor of the organization repository listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryCursor(pub String);

/// One page of the organization repository listing
#[derive(Debug, Clone)]
pub struct RepositoryPage {
    pub repositories: Vec<Repository>,
    pub end_cursor: Option<RepositoryCursor>,
    pub has_next_page: bool,
}
