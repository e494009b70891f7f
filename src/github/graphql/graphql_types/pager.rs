use serde::{Deserialize, Serialize};

use crate::types::RepositoryCursor;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    #[serde(rename = "hasNextPage")]
    pub has_next_page: bool,
    #[serde(rename = "endCursor")]
    pub end_cursor: Option<String>,
}

impl PageInfo {
    pub fn next_cursor(&self) -> Option<RepositoryCursor> {
        self.end_cursor.clone().map(RepositoryCursor)
    }
}
