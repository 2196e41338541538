//! REST API types.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::dashboard::Dashboard;

/// Health check payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub source: String,
    pub record_count: usize,
}

impl From<&Dashboard> for HealthResponse {
    fn from(dashboard: &Dashboard) -> Self {
        Self {
            status: "ok".to_string(),
            service: "mortality".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            source: dashboard.source.clone(),
            record_count: dashboard.record_count,
        }
    }
}

/// One role of the column mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRole {
    pub role: String,
    /// Source column, `null` when the role did not resolve
    pub column: Option<String>,
    pub required: bool,
}

/// Resolved mapping plus the raw column list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnsResponse {
    pub columns: Vec<String>,
    pub roles: Vec<ColumnRole>,
}

impl From<&Dashboard> for ColumnsResponse {
    fn from(dashboard: &Dashboard) -> Self {
        let roles = dashboard
            .column_roles()
            .into_iter()
            .map(|(role, column)| ColumnRole {
                role: role.as_str().to_string(),
                column: column.map(str::to_string),
                required: role.is_required(),
            })
            .collect();

        Self {
            columns: dashboard.columns.clone(),
            roles,
        }
    }
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "status": "error",
        "error": error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_shape() {
        let body = error_response("Unknown summary: pie");
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"], "Unknown summary: pie");
    }
}
