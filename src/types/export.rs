//! Flattened output records

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use super::{Repository, ScopedRepository, SecretCategory};

/// Access descriptor reported for every repository-level secret
pub const REPO_ONLY_ACCESS: &str = "RepoOnly";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
pub enum SecretLevel {
    Organization,
    Repository,
}

/// One CSV row: a secret, and optionally one repository that can use it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretExportRow {
    pub level: SecretLevel,
    pub category: SecretCategory,
    pub secret_name: String,
    pub access: String,
    pub repository_name: Option<String>,
    pub repository_id: Option<u64>,
}

impl SecretExportRow {
    /// Organization secret usable by every repository; no repository columns.
    pub fn organization_wide(category: SecretCategory, secret_name: &str, access: &str) -> Self {
        Self {
            level: SecretLevel::Organization,
            category,
            secret_name: secret_name.to_string(),
            access: access.to_string(),
            repository_name: None,
            repository_id: None,
        }
    }

    pub fn organization_scoped(
        category: SecretCategory,
        secret_name: &str,
        access: &str,
        repository: &ScopedRepository,
    ) -> Self {
        Self {
            level: SecretLevel::Organization,
            category,
            secret_name: secret_name.to_string(),
            access: access.to_string(),
            repository_name: Some(repository.name.clone()),
            repository_id: Some(repository.id),
        }
    }

    pub fn organization_for_repository(
        category: SecretCategory,
        secret_name: &str,
        access: &str,
        repository: &Repository,
    ) -> Self {
        Self {
            level: SecretLevel::Organization,
            category,
            secret_name: secret_name.to_string(),
            access: access.to_string(),
            repository_name: Some(repository.name.to_string()),
            repository_id: Some(repository.id),
        }
    }

    pub fn repository_only(
        category: SecretCategory,
        secret_name: &str,
        repository: &Repository,
    ) -> Self {
        Self {
            level: SecretLevel::Repository,
            category,
            secret_name: secret_name.to_string(),
            access: REPO_ONLY_ACCESS.to_string(),
            repository_name: Some(repository.name.to_string()),
            repository_id: Some(repository.id),
        }
    }

    /// Cells in report column order; absent repository fields become empty cells.
    pub fn to_record(&self) -> [String; 6] {
        [
            self.level.to_string(),
            self.category.to_string(),
            self.secret_name.clone(),
            self.access.clone(),
            self.repository_name.clone().unwrap_or_default(),
            self.repository_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
        ]
    }
}
