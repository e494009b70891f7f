//! Core type definitions for the secret export
//!
//! Repository and secret types mirror the shapes returned by the GitHub API;
//! [`SecretExportRow`] is the flattened unit written to the report.

pub mod export;
pub mod repository;
pub mod secret;

pub use export::*;
pub use repository::*;
pub use secret::*;
