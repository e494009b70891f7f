use tracing::{debug, info};

use crate::error::{ExportError, Result};
use crate::services::SecretsApi;
use crate::types::{Owner, Repository, RepositoryCursor, RepositoryName};

/// Resolves the repositories in scope for an export.
///
/// With explicit `names`, each is looked up individually in the order given
/// and any missing repository aborts. Otherwise the organization listing is
/// paged through until the API reports no further pages. The returned order
/// is the order rows are later produced in.
pub async fn enumerate_repositories<A: SecretsApi>(
    api: &A,
    owner: &Owner,
    names: &[RepositoryName],
) -> Result<Vec<Repository>> {
    let start_time = std::time::Instant::now();

    let repositories = if names.is_empty() {
        fetch_all_repositories(api, owner).await
    } else {
        fetch_named_repositories(api, owner, names).await
    }
    .inspect_err(|e| debug!("Repository enumeration for {} failed: {}", owner, e))?;

    info!(
        "Enumerated {} repositories for {} in {:?}",
        repositories.len(),
        owner,
        start_time.elapsed()
    );

    Ok(repositories)
}

async fn fetch_named_repositories<A: SecretsApi>(
    api: &A,
    owner: &Owner,
    names: &[RepositoryName],
) -> Result<Vec<Repository>> {
    let mut repositories = Vec::with_capacity(names.len());
    for name in names {
        debug!("Looking up repository {}/{}", owner, name);
        repositories.push(api.fetch_repository(owner, name).await?);
    }
    Ok(repositories)
}

async fn fetch_all_repositories<A: SecretsApi>(api: &A, owner: &Owner) -> Result<Vec<Repository>> {
    let mut all_repositories = Vec::new();
    let mut current_cursor: Option<RepositoryCursor> = None;
    let mut page_number = 0_usize;

    loop {
        let page = api
            .fetch_repository_page(owner, current_cursor.as_ref())
            .await?;
        page_number += 1;

        debug!(
            "Repository page {} for {} returned {} repositories",
            page_number,
            owner,
            page.repositories.len()
        );
        all_repositories.extend(page.repositories);

        if !page.has_next_page {
            break;
        }

        match page.end_cursor {
            Some(next_cursor) => current_cursor = Some(next_cursor),
            None => {
                return Err(ExportError::Decode {
                    what: format!("repository page {} of {}", page_number, owner),
                    message: "hasNextPage is true but endCursor is missing".to_string(),
                });
            }
        }
    }

    Ok(all_repositories)
}
