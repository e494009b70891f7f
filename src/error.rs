//! Error types for the secret export
//!
//! Every failure aborts the run. The variants group into four classes,
//! exposed through [`ExportError::kind`], so callers can tell a bad invocation
//! apart from an upstream failure.

use std::path::PathBuf;

use crate::types::RepositoryId;

pub type Result<T> = std::result::Result<T, ExportError>;

/// Broad class of an [`ExportError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid or missing arguments, unusable output path
    Configuration,
    /// Network, authentication or non-2xx failures from the GitHub API
    Transport,
    /// A payload from the GitHub API did not have the expected shape
    Decode,
    /// The CSV report could not be written
    Write,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("report file {} already exists", .0.display())]
    OutputExists(PathBuf),

    #[error("GitHub API request `{operation}` failed: {message}")]
    Transport { operation: String, message: String },

    #[error("GitHub GraphQL query `{operation}` returned errors: {message}")]
    GraphQL { operation: String, message: String },

    #[error("repository not found: {0}")]
    RepositoryNotFound(RepositoryId),

    #[error("failed to decode {what}: {message}")]
    Decode { what: String, message: String },

    #[error("failed to write report: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) | Self::OutputExists(_) => ErrorKind::Configuration,
            Self::Transport { .. } | Self::GraphQL { .. } | Self::RepositoryNotFound(_) => {
                ErrorKind::Transport
            }
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Csv(_) | Self::Io(_) => ErrorKind::Write,
        }
    }

    pub(crate) fn decode(what: impl Into<String>, error: serde_json::Error) -> Self {
        Self::Decode {
            what: what.into(),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_classification() {
        assert_eq!(
            ExportError::Config("missing token".to_string()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            ExportError::OutputExists(PathBuf::from("report.csv")).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            ExportError::Transport {
                operation: "org_secrets".to_string(),
                message: "boom".to_string(),
            }
            .kind(),
            ErrorKind::Transport
        );
        assert_eq!(
            ExportError::RepositoryNotFound(RepositoryId::new("octo", "missing")).kind(),
            ErrorKind::Transport
        );

        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            ExportError::decode("secret list", json_error).kind(),
            ErrorKind::Decode
        );

        let io_error = std::io::Error::other("disk full");
        assert_eq!(ExportError::from(io_error).kind(), ErrorKind::Write);
    }

    #[test]
    fn test_output_exists_message_names_path() {
        let error = ExportError::OutputExists(PathBuf::from("report-1.csv"));
        assert_eq!(error.to_string(), "report file report-1.csv already exists");
    }
}
