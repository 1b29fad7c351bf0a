//! HTTP Router
//!
//! Sets up the axum router with the WebSocket endpoint and a small read-only
//! JSON API for displays that poll instead of holding a socket.

use axum::{
    extract::{Query, State, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use feedboard_types::TimeMode;

use crate::board::{DisplayConfig, TimeOverride};
use crate::types::Error;

use super::handler::handle_websocket;
use super::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // WebSocket endpoint for live displays and controllers
        .route("/ws", get(ws_upgrade))
        // Health check for monitoring/load balancers
        .route("/health", get(health_check))
        .route("/api/board", get(board_summary))
        .route("/api/grid", get(grid_page))
        // CORS for development
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// WebSocket upgrade handler
async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    clients: usize,
    board_loaded: bool,
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        clients: state.client_count().await,
        board_loaded: state.board().await.is_some(),
    })
}

/// Board overview
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BoardSummary {
    id: String,
    name: String,
    description: Option<String>,
    horses: usize,
    feeds: usize,
    diet_entries: usize,
    display: DisplayConfig,
    time_mode: TimeMode,
    time_override: Option<TimeOverride>,
}

async fn board_summary(State(state): State<AppState>) -> Response {
    let board = match state.require_board().await {
        Ok(board) => board,
        Err(e) => return error_response(e),
    };
    let info = &board.manifest.board;

    Json(BoardSummary {
        id: info.id.clone(),
        name: info.name.clone(),
        description: info.description.clone(),
        horses: board.horses.iter().filter(|h| h.is_visible()).count(),
        feeds: board.feeds.len(),
        diet_entries: board.diet.len(),
        display: board.display().clone(),
        time_mode: state.time_mode(&board),
        time_override: state.time_override(),
    })
    .into_response()
}

/// Query for `/api/grid`
#[derive(Debug, Deserialize)]
struct GridQuery {
    /// Linear page; the current display page when omitted
    page: Option<usize>,
}

async fn grid_page(State(state): State<AppState>, Query(query): Query<GridQuery>) -> Response {
    let frame = match query.page {
        Some(page) => state.frame_at(page).await,
        None => state.current_frame().await.ok_or(Error::NoBoard),
    };

    match frame {
        Ok(frame) => Json(frame).into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(error: Error) -> Response {
    let status = match error {
        Error::NoBoard => StatusCode::SERVICE_UNAVAILABLE,
        Error::Load(_) | Error::Watch(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(serde_json::json!({ "error": error.to_string() }))).into_response()
}
