/// Run configuration: organization, categories, host, token and report path
pub mod config;

/// Error taxonomy shared by every stage of the export
pub mod error;

/// Report writers for resolved secret rows
pub mod formatter;

/// GitHub API client implementations for repository and secret listings
pub mod github;

/// Repository enumeration, secret resolution and the export run
pub mod services;

/// Core type definitions and domain models used throughout the library
pub mod types;

pub use error::{ErrorKind, ExportError};
