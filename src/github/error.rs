use crate::error::ExportError;

/// Converts an octocrab error into an [`ExportError`], logging the details.
///
/// Nothing is retried, so the classification only separates payload decoding
/// failures from everything else that went wrong on the wire.
pub fn from_octocrab_error(operation: &str, error: octocrab::Error) -> ExportError {
    tracing::debug!("Raw octocrab error for {}: {:?}", operation, error);

    match &error {
        octocrab::Error::GitHub { source, .. } => {
            let status = source.status_code.as_u16();
            let detailed_error = format!(
                "GitHub API error - Status: {}, Message: {:?}, Documentation: {:?}",
                status, source.message, source.documentation_url
            );

            match status {
                401 | 403 => {
                    tracing::error!(
                        "Authorization failure ({}) for {}: {}",
                        status,
                        operation,
                        source.message
                    );
                }
                404 => {
                    tracing::error!("Resource not found for {}: {}", operation, source.message);
                }
                _ => {
                    tracing::error!("GitHub API error details for {}: {}", operation, detailed_error);
                }
            }

            ExportError::Transport {
                operation: operation.to_string(),
                message: detailed_error,
            }
        }
        octocrab::Error::Json { .. } | octocrab::Error::Serde { .. } => {
            tracing::error!("JSON parsing error for {}: {}", operation, error);
            ExportError::Decode {
                what: format!("response of {}", operation),
                message: error.to_string(),
            }
        }
        _ => {
            tracing::error!("HTTP error for {}: {}", operation, error);
            ExportError::Transport {
                operation: operation.to_string(),
                message: error.to_string(),
            }
        }
    }
}
