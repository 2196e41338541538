//! HTTP API module.
//!
//! This module provides the HTTP server, the API types and the dashboard
//! page.

pub mod page;
pub mod server;
pub mod types;

pub use server::{router, start_server};
pub use types::*;
