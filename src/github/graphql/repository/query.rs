use crate::types::{Owner, RepositoryName};
use serde::{Deserialize, Serialize};

/// Page size requested from the organization repository listing
pub const REPOSITORY_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationRepositoriesVariable {
    pub owner: Owner,
    pub first: u32,
    #[serde(rename = "endCursor")]
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryVariable {
    pub owner: Owner,
    pub repository_name: RepositoryName,
}

pub fn organization_repositories_query() -> String {
    r#"
        query($owner: String!, $first: Int!, $endCursor: String) {
            organization(login: $owner) {
                repositories(first: $first, after: $endCursor) {
                    totalCount
                    nodes {
                        databaseId
                        name
                        updatedAt
                        visibility
                    }
                    pageInfo {
                        endCursor
                        hasNextPage
                    }
                }
            }
        }
    "#
    .to_string()
}

pub fn repository_query() -> String {
    r#"
        query($owner: String!, $repository_name: String!) {
            repository(owner: $owner, name: $repository_name) {
                databaseId
                name
                updatedAt
                visibility
            }
        }
    "#
    .to_string()
}
