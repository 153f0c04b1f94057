//! Marker list resource.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use bridge::{Marker, MarkerDraft, ServerPush};

use crate::state::AppState;

/// `GET /api/markers` — the full current marker list.
pub async fn get_markers(State(state): State<AppState>) -> Json<Vec<Marker>> {
    Json(state.snapshot().await)
}

/// `POST /api/markers` — replace the stored set with the uploaded
/// batch and push the resulting list to every subscriber.
pub async fn post_markers(
    State(state): State<AppState>,
    Json(batch): Json<Vec<MarkerDraft>>,
) -> StatusCode {
    tracing::info!(count = batch.len(), "marker set replaced");
    state.replace(batch).await;

    let markers = state.snapshot().await.into_iter().map(MarkerDraft::from).collect();
    state.broadcast(&ServerPush::MarkersUpdate { markers }).await;

    StatusCode::NO_CONTENT
}
