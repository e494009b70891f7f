pub mod client;
pub mod error;
pub mod graphql;

pub use client::GitHubClient;
pub use graphql::graphql_types;
