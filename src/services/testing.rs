//! In-memory [`SecretsApi`] used by the unit tests

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use chrono::{TimeZone, Utc};
use serde_json::{Value, json};

use crate::error::{ExportError, Result};
use crate::services::SecretsApi;
use crate::types::{
    Owner, Repository, RepositoryCursor, RepositoryId, RepositoryName, RepositoryPage,
    RepositoryVisibility, SecretCategory,
};

pub(crate) fn repository(id: u64, name: &str, visibility: RepositoryVisibility) -> Repository {
    Repository {
        id,
        name: RepositoryName::from(name),
        visibility,
        updated_at: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
    }
}

/// Secret list payload; `None` visibility mimics repository-level secrets.
pub(crate) fn secrets_json(secrets: &[(&str, Option<&str>)]) -> Value {
    let secrets: Vec<Value> = secrets
        .iter()
        .map(|(name, visibility)| {
            let mut secret = json!({
                "name": name,
                "created_at": "2023-05-01T08:00:00Z",
                "updated_at": "2023-06-01T08:00:00Z",
            });
            if let Some(visibility) = visibility {
                secret["visibility"] = json!(visibility);
            }
            secret
        })
        .collect();

    json!({ "total_count": secrets.len(), "secrets": secrets })
}

pub(crate) fn scoped_json(repositories: &[(u64, &str)]) -> Value {
    let repositories: Vec<Value> = repositories
        .iter()
        .map(|(id, name)| json!({ "id": id, "name": name, "full_name": format!("octo/{}", name) }))
        .collect();

    json!({ "total_count": repositories.len(), "repositories": repositories })
}

/// Records every call as a short string and serves canned responses.
///
/// Unknown secret listings answer with an empty list; an unknown scoped
/// listing or any call named in `fail_on` answers with a transport error.
#[derive(Default)]
pub(crate) struct FakeApi {
    pub pages: Vec<RepositoryPage>,
    pub repositories: HashMap<String, Repository>,
    pub org_secrets: HashMap<SecretCategory, Value>,
    pub repo_secrets: HashMap<(SecretCategory, String), Value>,
    pub scoped: HashMap<(SecretCategory, String), Value>,
    failing: RefCell<HashSet<String>>,
    calls: RefCell<Vec<String>>,
}

impl FakeApi {
    /// Splits `repositories` into pages of the given sizes, chained by cursors.
    pub fn with_pages(mut self, repositories: Vec<Repository>, sizes: &[usize]) -> Self {
        let mut remaining = repositories.into_iter();
        self.pages = sizes
            .iter()
            .enumerate()
            .map(|(index, size)| {
                let has_next_page = index + 1 < sizes.len();
                RepositoryPage {
                    repositories: remaining.by_ref().take(*size).collect(),
                    end_cursor: Some(RepositoryCursor(format!("cursor-{}", index + 1))),
                    has_next_page,
                }
            })
            .collect();
        self
    }

    /// Makes repositories available both by name and as a single listing page.
    pub fn with_repositories(mut self, repositories: Vec<Repository>) -> Self {
        for repository in &repositories {
            self.repositories
                .insert(repository.name.to_string(), repository.clone());
        }
        let count = repositories.len();
        self.with_pages(repositories, &[count])
    }

    pub fn with_org_secrets(mut self, category: SecretCategory, body: Value) -> Self {
        self.org_secrets.insert(category, body);
        self
    }

    pub fn with_repo_secrets(mut self, category: SecretCategory, repo: &str, body: Value) -> Self {
        self.repo_secrets.insert((category, repo.to_string()), body);
        self
    }

    pub fn with_scoped(mut self, category: SecretCategory, secret: &str, body: Value) -> Self {
        self.scoped.insert((category, secret.to_string()), body);
        self
    }

    pub fn fail_on(&self, call: &str) {
        self.failing.borrow_mut().insert(call.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.borrow_mut().push(call.clone());
        if self.failing.borrow().contains(&call) {
            return Err(ExportError::Transport {
                operation: call,
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

fn empty_secrets() -> Value {
    json!({ "total_count": 0, "secrets": [] })
}

impl SecretsApi for FakeApi {
    async fn fetch_repository_page(
        &self,
        _owner: &Owner,
        cursor: Option<&RepositoryCursor>,
    ) -> Result<RepositoryPage> {
        let label = cursor.map(|c| c.0.as_str()).unwrap_or("-");
        self.record(format!("page:{}", label))?;

        let index = match cursor {
            None => 0,
            Some(RepositoryCursor(c)) => c
                .trim_start_matches("cursor-")
                .parse::<usize>()
                .unwrap_or(usize::MAX),
        };

        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| ExportError::Transport {
                operation: "page".to_string(),
                message: format!("no page for cursor {}", label),
            })
    }

    async fn fetch_repository(&self, owner: &Owner, name: &RepositoryName) -> Result<Repository> {
        self.record(format!("repo:{}", name))?;
        self.repositories.get(name.as_str()).cloned().ok_or_else(|| {
            ExportError::RepositoryNotFound(RepositoryId {
                owner: owner.clone(),
                repository_name: name.clone(),
            })
        })
    }

    async fn fetch_org_secrets(&self, _owner: &Owner, category: SecretCategory) -> Result<Value> {
        self.record(format!("org:{}", category))?;
        Ok(self
            .org_secrets
            .get(&category)
            .cloned()
            .unwrap_or_else(empty_secrets))
    }

    async fn fetch_repository_secrets(
        &self,
        _owner: &Owner,
        repository: &RepositoryName,
        category: SecretCategory,
    ) -> Result<Value> {
        self.record(format!("repo_secrets:{}:{}", category, repository))?;
        Ok(self
            .repo_secrets
            .get(&(category, repository.to_string()))
            .cloned()
            .unwrap_or_else(empty_secrets))
    }

    async fn fetch_scoped_repositories(
        &self,
        _owner: &Owner,
        category: SecretCategory,
        secret_name: &str,
    ) -> Result<Value> {
        let call = format!("scoped:{}:{}", category, secret_name);
        self.record(call.clone())?;
        self.scoped
            .get(&(category, secret_name.to_string()))
            .cloned()
            .ok_or_else(|| ExportError::Transport {
                operation: call,
                message: "404 Not Found".to_string(),
            })
    }
}
