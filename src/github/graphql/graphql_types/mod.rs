pub mod pager;
pub mod repository;

use serde::{Deserialize, Serialize};

pub use pager::*;
pub use repository::*;

#[derive(Debug, Clone, Serialize)]
pub struct GraphQLQuery(pub String);

#[derive(Debug, Clone, Serialize)]
pub struct GraphQLPayload<T: serde::Serialize> {
    pub query: GraphQLQuery,
    pub variables: Option<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default)]
    pub locations: Vec<serde_json::Value>,
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
}
