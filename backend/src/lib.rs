//! # Mortality - Colombian fetal and infant mortality dashboard (2019)
//!
//! Loads the mortality spreadsheet once, resolves which column plays which
//! role, and computes seven summary tables for a single-page dashboard.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ XLSX / CSV  │────▶│   Parser    │────▶│  Resolver   │────▶│  Aggregate  │
//! │   (source)  │     │ (normalize) │     │ (fail-fast) │     │ (7 tables)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                                                                    │
//!                                                     HTTP (JSON + page) / CLI
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mortality::Dashboard;
//!
//! let dashboard = Dashboard::load("NoFetal2019_BD.xlsx").unwrap();
//! println!("Top homicide city: {:?}", dashboard.summaries.homicides.first());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Cells, roles and records
//! - [`parser`] - Spreadsheet and CSV loading
//! - [`resolver`] - Column role resolution
//! - [`labels`] - Sex, age-group and month labels
//! - [`dataset`] - Typed records
//! - [`aggregate`] - Summary transforms
//! - [`dashboard`] - Load-and-compute entry point
//! - [`config`] - Environment configuration
//! - [`api`] - HTTP server

// Core modules
pub mod error;
pub mod models;

// Loading
pub mod parser;
pub mod resolver;
pub mod dataset;

// Derivation
pub mod labels;
pub mod aggregate;
pub mod dashboard;

// Configuration
pub mod config;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    AggregateError,
    DashboardError,
    LoadError,
    ResolveError,
    ServerError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Cell, Record, Role};

// =============================================================================
// Re-exports - Loading
// =============================================================================

pub use parser::{
    load_table,
    load_workbook,
    parse_bytes_auto,
    parse_csv,
    detect_delimiter,
    detect_encoding,
    RawTable,
};

pub use resolver::{ColumnMapping, ROLE_RULES};
pub use dataset::{Dataset, DegradedCounts};

// =============================================================================
// Re-exports - Labels
// =============================================================================

pub use labels::{classify_age_group, classify_age_code, month_name, SexLabel, NOT_SPECIFIED};

// =============================================================================
// Re-exports - Aggregation
// =============================================================================

pub use aggregate::{
    Summaries,
    SummaryName,
    DisplayLabels,
    GeographicTotal,
    CityCount,
    MonthlyTotal,
    CauseCount,
    SexDepartmentCount,
    AgeGroupCount,
};

pub use dashboard::Dashboard;
pub use config::DashboardConfig;

// Server
pub mod server {
    pub use crate::api::server::{router, start_server};
}
