use crate::error::ExportError;
use crate::github::graphql::graphql_types::GraphQLError;

/// Turns the `errors` array of a GraphQL response into an [`ExportError`].
///
/// # Arguments
///
/// * `operation` - Name of the query, used in logs and the error message
/// * `errors` - The GraphQL errors returned alongside (or instead of) `data`
///
/// # Returns
///
/// `None` when the array is empty, otherwise the error to abort with.
pub fn graphql_errors_to_export_error(
    operation: &str,
    errors: &[GraphQLError],
) -> Option<ExportError> {
    if errors.is_empty() {
        return None;
    }

    let error_msg = errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    if error_msg.contains("Could not resolve to") {
        tracing::info!("GraphQL resource not found for {}: {}", operation, error_msg);
    } else if error_msg.contains("rate limit") {
        tracing::error!("GraphQL rate limit hit for {}: {}", operation, error_msg);
    } else {
        tracing::error!("GraphQL errors for {}: {}", operation, error_msg);
    }

    Some(ExportError::GraphQL {
        operation: operation.to_string(),
        message: error_msg,
    })
}
