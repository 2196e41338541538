//! HTTP server for the mortality dashboard.
//!
//! Serves the summaries computed at startup; nothing is recomputed per
//! request.
//!
//! # API Endpoints
//!
//! | Method | Path                    | Description                          |
//! |--------|-------------------------|--------------------------------------|
//! | GET    | `/`                     | Dashboard page                       |
//! | GET    | `/health`               | Health check                         |
//! | GET    | `/api/columns`          | Resolved column roles                |
//! | GET    | `/api/summaries`        | All summaries with display labels    |
//! | GET    | `/api/summaries/{name}` | One summary                          |

use axum::{
    extract::{Path, State},
    http::{header, Method, StatusCode},
    response::{Html, Json},
    routing::get,
    Router,
};
use serde_json::Value;
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use super::page::render_page;
use super::types::{error_response, ColumnsResponse, HealthResponse};
use crate::aggregate::{Summaries, SummaryName};
use crate::dashboard::Dashboard;
use crate::error::ServerResult;

/// Shared, read-only server state.
pub struct AppState {
    pub dashboard: Dashboard,
    /// Page rendered once at startup
    pub page: String,
}

impl AppState {
    pub fn new(dashboard: Dashboard) -> Self {
        let page = render_page(&dashboard);
        Self { dashboard, page }
    }
}

/// Build the router around a loaded dashboard.
pub fn router(dashboard: Dashboard) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/columns", get(columns))
        .route("/api/summaries", get(all_summaries))
        .route("/api/summaries/{name}", get(one_summary))
        .layer(cors)
        .with_state(Arc::new(AppState::new(dashboard)))
}

/// Start the HTTP server and run until Ctrl-C.
pub async fn start_server(dashboard: Dashboard, addr: SocketAddr) -> ServerResult<()> {
    let app = router(dashboard);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("mortality dashboard running on http://{}", addr);
    info!("   GET  /                      - Dashboard page");
    info!("   GET  /api/summaries         - All summaries");
    info!("   GET  /api/summaries/{{name}}  - One summary");
    info!("   GET  /api/columns           - Column roles");
    info!("   GET  /health                - Health check");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", e);
    }
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.page.clone())
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse::from(&state.dashboard))
}

async fn columns(State(state): State<Arc<AppState>>) -> Json<ColumnsResponse> {
    Json(ColumnsResponse::from(&state.dashboard))
}

async fn all_summaries(State(state): State<Arc<AppState>>) -> Json<Summaries> {
    Json(state.dashboard.summaries.clone())
}

async fn one_summary(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let name: SummaryName = name
        .parse()
        .map_err(|e: String| (StatusCode::NOT_FOUND, Json(error_response(&e))))?;

    state.dashboard.summaries.to_json(name).map(Json).map_err(|e| {
        error!(summary = %name, "failed to serialize summary: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, Json(error_response(&e.to_string())))
    })
}
