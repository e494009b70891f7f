use serde::{Deserialize, Serialize};

use super::PageInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RepositoryVisibilityNode {
    Public,
    Private,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryNode {
    #[serde(rename = "databaseId")]
    pub database_id: Option<u64>,
    pub name: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    pub visibility: RepositoryVisibilityNode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConnection {
    #[serde(rename = "totalCount", default)]
    pub total_count: u64,
    pub nodes: Vec<RepositoryNode>,
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationRepositoriesNode {
    pub repositories: RepositoryConnection,
}

/// Response of the organization repository listing query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationRepositoriesResponse {
    pub organization: Option<OrganizationRepositoriesNode>,
}

/// Response of the single repository lookup query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryResponse {
    pub repository: Option<RepositoryNode>,
}
