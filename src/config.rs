//! Run configuration
//!
//! The binary gathers flags and environment variables into an [`ExportConfig`];
//! everything below this module only sees already-validated values.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use url::Url;

use crate::error::{ExportError, Result};
use crate::types::{Owner, RepositoryName, SecretCategory};

/// Hostname used when neither a flag nor `GH_HOST` names one
pub const DEFAULT_HOSTNAME: &str = "github.com";

/// Environment variables consulted for a token, in order
pub const TOKEN_ENV_VARS: [&str; 2] = ["GH_TOKEN", "GITHUB_TOKEN"];

/// Where the REST and GraphQL APIs of a GitHub-compatible host live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubHost {
    base_uri: String,
    rest_prefix: String,
    graphql_route: String,
}

impl GitHubHost {
    /// The public github.com API
    pub fn github_dotcom() -> Self {
        Self {
            base_uri: "https://api.github.com".to_string(),
            rest_prefix: String::new(),
            graphql_route: "/graphql".to_string(),
        }
    }

    /// Interprets a hostname.
    ///
    /// - `github.com` (or `api.github.com`) is the public API.
    /// - A full `http(s)://` URL is an API root laid out like api.github.com,
    ///   with REST routes under its path and GraphQL at `<path>/graphql`.
    /// - Any other hostname is a GitHub Enterprise Server, with REST under
    ///   `/api/v3` and GraphQL at `/api/graphql`.
    pub fn parse(hostname: &str) -> Result<Self> {
        let hostname = hostname.trim().trim_end_matches('/');
        if hostname.is_empty() {
            return Err(ExportError::Config("hostname must not be empty".to_string()));
        }

        if hostname.eq_ignore_ascii_case(DEFAULT_HOSTNAME)
            || hostname.eq_ignore_ascii_case("api.github.com")
        {
            return Ok(Self::github_dotcom());
        }

        if hostname.contains("://") {
            let url = parse_http_url(hostname)?;
            let prefix = url.path().trim_end_matches('/').to_string();
            return Ok(Self {
                base_uri: url.origin().ascii_serialization(),
                graphql_route: format!("{}/graphql", prefix),
                rest_prefix: prefix,
            });
        }

        let url = parse_http_url(&format!("https://{}", hostname))?;
        if url.path() != "/" {
            return Err(ExportError::Config(format!(
                "hostname must not contain a path: {}",
                hostname
            )));
        }

        Ok(Self {
            base_uri: url.origin().ascii_serialization(),
            rest_prefix: "/api/v3".to_string(),
            graphql_route: "/api/graphql".to_string(),
        })
    }

    /// Scheme and authority every request is sent to
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Absolute path of a REST route such as `/orgs/octo/actions/secrets`
    pub fn rest_route(&self, route: &str) -> String {
        format!("{}{}", self.rest_prefix, route)
    }

    pub fn graphql_route(&self) -> &str {
        &self.graphql_route
    }
}

fn parse_http_url(input: &str) -> Result<Url> {
    let url = Url::parse(input)
        .map_err(|e| ExportError::Config(format!("invalid hostname {}: {}", input, e)))?;

    match url.scheme() {
        "http" | "https" if url.host().is_some() => Ok(url),
        _ => Err(ExportError::Config(format!(
            "hostname must be an http(s) host: {}",
            input
        ))),
    }
}

/// Which secret categories to include
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretSelection {
    All,
    Only(SecretCategory),
}

/// Expands selections into categories, in canonical order and without duplicates.
///
/// An empty selection, or one containing [`SecretSelection::All`], selects
/// every category.
pub fn selected_categories(selections: &[SecretSelection]) -> Vec<SecretCategory> {
    use strum::IntoEnumIterator;

    let all = selections.is_empty() || selections.contains(&SecretSelection::All);

    SecretCategory::iter()
        .filter(|category| all || selections.contains(&SecretSelection::Only(*category)))
        .collect()
}

/// Report file name derived from the local clock, e.g. `report-20240301104500.csv`
pub fn default_report_file(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!("report-{}.csv", now.format("%Y%m%d%H%M%S")))
}

/// Picks the explicit token, or the first non-empty token environment variable.
pub fn resolve_token<F>(explicit: Option<String>, lookup_env: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    explicit
        .into_iter()
        .chain(TOKEN_ENV_VARS.iter().filter_map(|name| lookup_env(name)))
        .map(|token| token.trim().to_string())
        .find(|token| !token.is_empty())
        .ok_or_else(|| {
            ExportError::Config(format!(
                "no GitHub token provided; pass --token or set {}",
                TOKEN_ENV_VARS.join(" or ")
            ))
        })
}

/// Everything one export run needs
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub owner: Owner,
    /// Explicit repositories; empty means the whole organization
    pub repositories: Vec<RepositoryName>,
    pub categories: Vec<SecretCategory>,
    pub output_file: PathBuf,
    pub host: GitHubHost,
    pub token: String,
}

impl ExportConfig {
    pub fn new(
        owner: String,
        repositories: Vec<String>,
        selections: &[SecretSelection],
        output_file: PathBuf,
        host: GitHubHost,
        token: String,
    ) -> Result<Self> {
        let owner = owner.trim().to_string();
        if owner.is_empty() {
            return Err(ExportError::Config(
                "organization must not be empty".to_string(),
            ));
        }

        if let Some(blank) = repositories.iter().find(|name| name.trim().is_empty()) {
            return Err(ExportError::Config(format!(
                "repository name must not be empty: {:?}",
                blank
            )));
        }

        Ok(Self {
            owner: Owner::new(owner),
            repositories: repositories.into_iter().map(RepositoryName::new).collect(),
            categories: selected_categories(selections),
            output_file,
            host,
            token,
        })
    }
}
