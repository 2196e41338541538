//! Error types for the mortality dashboard.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`LoadError`] - Spreadsheet / CSV loading errors
//! - [`ResolveError`] - Column role resolution (the startup gate)
//! - [`AggregateError`] - Summary computation errors
//! - [`DashboardError`] - Top-level orchestration errors
//! - [`ServerError`] - HTTP server errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

use crate::models::Role;

// =============================================================================
// Loading Errors
// =============================================================================

/// Errors while reading the source table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to open or read a workbook.
    #[error("Failed to read workbook: {0}")]
    Workbook(String),

    /// Invalid CSV content.
    #[error("Invalid CSV format: {0}")]
    Csv(#[from] csv::Error),

    /// File extension not handled by any loader.
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// Workbook without any worksheet.
    #[error("Workbook has no worksheet")]
    NoWorksheet,

    /// Empty file.
    #[error("Source table is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in source table")]
    NoHeaders,
}

impl From<calamine::Error> for LoadError {
    fn from(err: calamine::Error) -> Self {
        LoadError::Workbook(err.to_string())
    }
}

// =============================================================================
// Column Resolution Errors
// =============================================================================

/// Errors raised by the column resolver.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// One or more required roles did not match any column.
    ///
    /// `detected` lists every required role with the column found for it
    /// (`month=<none>` when nothing matched).
    #[error("Required columns not found: {}. Detected: {detected}", format_roles(.missing))]
    MissingRequiredColumn { missing: Vec<Role>, detected: String },
}

fn format_roles(roles: &[Role]) -> String {
    roles
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Aggregation Errors
// =============================================================================

/// Errors while computing summary tables.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// The summary needs a role that was not resolved.
    #[error("Summary '{summary}' needs the {role} column, which was not found")]
    UnresolvedRole { summary: &'static str, role: Role },
}

// =============================================================================
// Dashboard Errors (top-level)
// =============================================================================

/// Top-level errors, returned by [`crate::dashboard::Dashboard::load`].
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Loading error.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Resolution error.
    #[error("{0}")]
    Resolve(#[from] ResolveError),

    /// Aggregation error.
    #[error("Aggregation error: {0}")]
    Aggregate(#[from] AggregateError),

    /// Serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Listener could not bind or serve.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid listen address.
    #[error("Invalid address: {0}")]
    BadAddress(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for resolution operations.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Result type for aggregation operations.
pub type AggregateResult<T> = Result<T, AggregateError>;

/// Result type for dashboard operations.
pub type DashboardResult<T> = Result<T, DashboardError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
