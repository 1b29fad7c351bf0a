//! WebSocket Connection Handler
//!
//! Handles individual WebSocket connections and message processing.

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::board::BoardFrame;
use crate::types::{Error, Result};

use super::protocol::{ClientMessage, ErrorCode, ServerMessage};
use super::state::{AppState, PageStep};

/// Handle a WebSocket connection
pub async fn handle_websocket(socket: WebSocket, state: AppState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Create channel for sending messages to this client
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(64);

    // Register client and get session ID
    let session_id = state.register_client(tx).await;

    // Send connected message, then whatever the board is showing
    let connected_msg = ServerMessage::connected(session_id.to_string());
    if let Ok(json) = serde_json::to_string(&connected_msg) {
        let _ = ws_sender.send(Message::Text(json.into())).await;
    }
    if let Some(frame) = state.current_frame().await {
        state.send_to_client(session_id, ServerMessage::frame(&frame)).await;
    }

    // Spawn task to forward messages from channel to WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    // Process incoming messages
    let state_clone = state.clone();
    let recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = ws_receiver.next().await {
            match msg {
                Message::Text(text) => {
                    handle_client_message(&state_clone, session_id, &text).await;
                }
                Message::Close(_) => {
                    break;
                }
                Message::Ping(_data) => {
                    // Pong is handled automatically by axum
                    tracing::trace!("Received ping from {}", session_id);
                }
                _ => {}
            }
        }
    });

    // Wait for either task to complete
    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    // Cleanup
    state.remove_client(session_id).await;
}

/// Handle a client message
async fn handle_client_message(state: &AppState, session_id: Uuid, text: &str) {
    let msg: ClientMessage = match serde_json::from_str(text) {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!("Failed to parse client message: {}", e);
            send_error(state, session_id, None, ErrorCode::InvalidRequest, "Invalid JSON").await;
            return;
        }
    };

    match msg {
        ClientMessage::Ping { id } => {
            state.send_to_client(session_id, ServerMessage::pong(id)).await;
        }
        ClientMessage::GetFrame { id } => {
            let result = state.current_frame().await.ok_or(Error::NoBoard);
            respond(state, session_id, &id, result, false).await;
        }
        ClientMessage::NextPage { id } => {
            let result = state.turn_page(PageStep::Next).await;
            respond(state, session_id, &id, result, true).await;
        }
        ClientMessage::PrevPage { id } => {
            let result = state.turn_page(PageStep::Prev).await;
            respond(state, session_id, &id, result, true).await;
        }
        ClientMessage::GotoPage { id, page } => {
            let result = state.turn_page(PageStep::Goto(page)).await;
            respond(state, session_id, &id, result, true).await;
        }
        ClientMessage::SetTimeMode { id, mode, minutes } => {
            let result = state.set_time_mode(mode, minutes).await;
            respond(state, session_id, &id, result, true).await;
        }
    }
}

/// Answer a request with its frame; display changes are pushed to everyone
async fn respond(state: &AppState, session_id: Uuid, id: &str, result: Result<BoardFrame>, publish: bool) {
    match result {
        Ok(frame) => {
            let data = serde_json::to_value(&frame).ok();
            state.send_to_client(session_id, ServerMessage::success(id, data)).await;
            if publish {
                state.publish(&frame).await;
            }
        }
        Err(e) => {
            tracing::debug!("Request {} failed: {}", id, e);
            send_error(state, session_id, Some(id), ErrorCode::from(&e), e.to_string()).await;
        }
    }
}

/// Send an error to a specific client
async fn send_error(
    state: &AppState,
    session_id: Uuid,
    id: Option<&str>,
    code: ErrorCode,
    message: impl Into<String>,
) {
    let error = ServerMessage::error(id.map(String::from), code, message);
    state.send_to_client(session_id, error).await;
}
