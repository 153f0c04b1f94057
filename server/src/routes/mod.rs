//! Router assembly.
//!
//! Three endpoints cover the whole server: the marker list resource,
//! the websocket push channel, and a health probe. CORS is wide open —
//! the embedded map page may be served from anywhere.

pub mod markers;
pub mod ws;

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/markers", get(markers::get_markers).post(markers::post_markers))
        .route("/api/ws", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
