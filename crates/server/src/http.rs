//! HTTP Endpoints
//!
//! REST API for the chat service.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use propchat_agent::ChatReply;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::metrics::metrics_handler;
use crate::state::AppState;
use crate::ServerError;

/// Entries shown in the `/debug` sample
const DEBUG_SAMPLE: usize = 3;

/// Create the router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(&state.config.server.cors_origins, state.config.server.cors_enabled);

    Router::new()
        .route("/chat", post(chat))
        .route("/search/:query", get(search))
        .route("/all", get(all))
        .route("/debug", get(debug))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, no cross-origin requests are allowed
/// - If cors_origins is empty, any origin is allowed
/// - Otherwise, only the configured origins are allowed
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        return CorsLayer::new();
    }

    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if origins.is_empty() {
        return base.allow_origin(Any);
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::error!("All configured CORS origins are invalid, allowing any origin");
        return base.allow_origin(Any);
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    base.allow_origin(parsed_origins)
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    success: bool,
    #[serde(flatten)]
    reply: ChatReply,
}

/// `POST /chat`
async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ServerError> {
    let Json(request) = body.map_err(|e| ServerError::InvalidRequest(e.body_text()))?;
    let reply = state.chat.chat(&request.message).await?;
    Ok(Json(ChatResponse { success: true, reply }))
}

/// `GET /search/:query`, a chat turn taken from the path
async fn search(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<Json<ChatResponse>, ServerError> {
    let reply = state.chat.chat(&query).await?;
    Ok(Json(ChatResponse { success: true, reply }))
}

#[derive(Debug, Deserialize)]
struct AllParams {
    limit: Option<usize>,
}

/// `GET /all?limit=N`
async fn all(State(state): State<AppState>, Query(params): Query<AllParams>) -> Json<serde_json::Value> {
    let listing = state.chat.all(params.limit);
    Json(serde_json::json!({
        "success": true,
        "properties": listing.properties,
        "total": listing.total,
    }))
}

/// `GET /debug`
async fn debug(State(state): State<AppState>) -> Json<serde_json::Value> {
    let store = state.store();
    let sample: Vec<_> = store.properties().iter().take(DEBUG_SAMPLE).collect();

    Json(serde_json::json!({
        "success": true,
        "totalProperties": store.len(),
        "source": store.source(),
        "mergeReport": store.merge_report(),
        "validation": store.validation(),
        "missingSources": store.missing_sources(),
        "cities": store.city_counts(),
        "llm": {
            "available": state.chat.llm_available(),
            "provider": state.llm_provider,
        },
        "sample": sample,
    }))
}

/// `GET /health`
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "properties": state.store().len(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
