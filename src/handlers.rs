use crate::components::room_summary::{RoomSummary, SummaryService};
use crate::error::AppResult;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SummaryService>,
}

/// Build the summary router
pub fn router(service: SummaryService) -> Router {
    let state = AppState {
        service: Arc::new(service),
    };

    Router::new()
        .route("/health", get(health_handler))
        .route("/{room_name}", get(room_summary_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handler for a room's summary
pub async fn room_summary_handler(
    State(state): State<AppState>,
    Path(room_name): Path<String>,
) -> AppResult<Json<RoomSummary>> {
    let summary = state.service.get_room_summary(&room_name).await?;
    Ok(Json(summary))
}

// Handler for API health check
pub async fn health_handler() -> &'static str {
    "OK"
}
