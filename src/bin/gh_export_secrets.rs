use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use gh_export_secrets::config::{
    DEFAULT_HOSTNAME, ExportConfig, GitHubHost, SecretSelection, default_report_file,
    resolve_token,
};
use gh_export_secrets::services::export_to_file;
use gh_export_secrets::types::SecretCategory;

#[derive(Parser)]
#[command(name = "gh-export-secrets")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Generate a report of Actions, Dependabot, and Codespaces secrets for an organization"
)]
#[command(
    long_about = "Generate a CSV report of Actions, Dependabot, and Codespaces secrets for an organization. Organization secrets are listed with the repositories that can use them; repository secrets are listed as RepoOnly. When repository names are given only those repositories are reported and organization secrets are skipped."
)]
struct Cli {
    /// Organization login to report on
    organization: String,
    /// Optional repository names within the organization - restricts the report to these repositories
    repositories: Vec<String>,
    /// Secret types to include - repeatable or comma-separated (default: all)
    #[arg(short, long, value_enum, value_delimiter = ',', default_values_t = [AppCli::All])]
    app: Vec<AppCli>,
    /// Name of file to write the CSV report to (default: report-<timestamp>.csv)
    #[arg(short, long)]
    output_file: Option<PathBuf>,
    /// GitHub token for API access (can also be set via GH_TOKEN or GITHUB_TOKEN environment variables)
    #[arg(short, long)]
    token: Option<String>,
    /// GitHub hostname - github.com, a GitHub Enterprise Server host, or a full API URL
    #[arg(long, env = "GH_HOST", default_value = DEFAULT_HOSTNAME)]
    hostname: String,
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AppCli {
    All,
    Actions,
    Dependabot,
    Codespaces,
}

impl From<AppCli> for SecretSelection {
    fn from(cli_option: AppCli) -> Self {
        match cli_option {
            AppCli::All => SecretSelection::All,
            AppCli::Actions => SecretSelection::Only(SecretCategory::Actions),
            AppCli::Dependabot => SecretSelection::Only(SecretCategory::Dependabot),
            AppCli::Codespaces => SecretSelection::Only(SecretCategory::Codespaces),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Install the rustls crypto provider before octocrab opens any connection
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "info" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("gh_export_secrets={}", level).parse()?),
        )
        .with_writer(std::io::stderr)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let token = resolve_token(cli.token, |name| env::var(name).ok())?;
    let host = GitHubHost::parse(&cli.hostname)?;
    let output_file = cli
        .output_file
        .unwrap_or_else(|| default_report_file(chrono::Local::now()));

    let selections: Vec<SecretSelection> = cli.app.into_iter().map(SecretSelection::from).collect();
    let config = ExportConfig::new(
        cli.organization,
        cli.repositories,
        &selections,
        output_file,
        host,
        token,
    )?;

    let summary = export_to_file(&config)
        .await
        .with_context(|| format!("Failed to export secrets for {}", config.owner))?;

    println!(
        "Wrote {} rows for {} repositories to {}",
        summary.rows,
        summary.repositories,
        config.output_file.display()
    );

    Ok(())
}
