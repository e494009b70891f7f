use std::io::Write;

use tracing::{Instrument, info, info_span};

use crate::config::ExportConfig;
use crate::error::{ExportError, Result};
use crate::formatter::ReportWriter;
use crate::github::GitHubClient;
use crate::services::{SecretResolver, SecretsApi, enumerate_repositories};
use crate::types::{Owner, RepositoryName, SecretCategory};

/// What one export covers
#[derive(Debug, Clone)]
pub struct ExportScope {
    pub owner: Owner,
    /// Explicit repositories; empty means the whole organization
    pub repositories: Vec<RepositoryName>,
    pub categories: Vec<SecretCategory>,
}

impl ExportScope {
    pub fn is_org_wide(&self) -> bool {
        self.repositories.is_empty()
    }
}

impl From<&ExportConfig> for ExportScope {
    fn from(config: &ExportConfig) -> Self {
        Self {
            owner: config.owner.clone(),
            repositories: config.repositories.clone(),
            categories: config.categories.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub repositories: usize,
    pub rows: usize,
}

/// Runs one export: enumerate, resolve, then write every row.
///
/// Organization-level secrets are skipped when the scope names explicit
/// repositories. Nothing is written past the header if any step fails.
pub async fn export_secrets<A, W>(
    api: &A,
    scope: &ExportScope,
    report: &mut ReportWriter<W>,
) -> Result<ExportSummary>
where
    A: SecretsApi,
    W: Write,
{
    let span = info_span!("export", owner = %scope.owner);

    async {
        let repositories = enumerate_repositories(api, &scope.owner, &scope.repositories).await?;

        let resolver = SecretResolver::new(api, &scope.owner, &repositories);
        let rows = resolver
            .resolve(&scope.categories, scope.is_org_wide())
            .await?;

        report.write_rows(&rows)?;

        let summary = ExportSummary {
            repositories: repositories.len(),
            rows: rows.len(),
        };
        info!(
            "Export finished: {} repositories scanned, {} rows",
            summary.repositories, summary.rows
        );
        Ok::<_, ExportError>(summary)
    }
    .instrument(span)
    .await
}

/// Exports into the report file named in `config`.
///
/// An existing report is detected before any request is made. The report is
/// staged next to its destination and only appears there once the whole
/// export has succeeded.
pub async fn export_to_file(config: &ExportConfig) -> Result<ExportSummary> {
    let mut report = ReportWriter::stage(&config.output_file)?;
    info!("Writing report to {}", config.output_file.display());

    let client = GitHubClient::new(config.host.clone(), config.token.clone())?;
    let summary = export_secrets(&client, &ExportScope::from(config), &mut report).await?;

    report.persist(&config.output_file)?;
    Ok(summary)
}
