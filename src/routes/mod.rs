//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the board REST endpoints and the long-poll update
//! feed under a single Axum router, wrapped in CORS and request tracing.

pub mod boards;

use axum::Json;
use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::state::AppState;

/// Build the complete router with all routes.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_allowed_origins);

    Router::new()
        .route("/api", get(health_check))
        .route("/api/board", post(boards::create_board))
        .route("/api/board/{board_id}", get(boards::get_board))
        .route("/api/board/{board_id}/item", post(boards::create_item))
        .route(
            "/api/board/{board_id}/item/{item_id}",
            get(boards::get_item).put(boards::update_item),
        )
        .route("/api/board/{board_id}/updates/{version}", get(boards::get_board_updates))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the CORS layer from `*` or a comma-separated origin list.
/// Unparsable origins are skipped.
fn cors_layer(allowed_origins: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origins.trim() == "*" {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| {
            s.parse::<HeaderValue>()
                .map_err(|_| warn!(origin = s, "ignoring invalid CORS origin"))
                .ok()
        })
        .collect();
    layer.allow_origin(origins)
}

#[derive(Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
}

/// `GET /api` — liveness probe.
async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck { status: "ok" })
}
