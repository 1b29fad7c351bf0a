//! Server Application State
//!
//! Shared state accessible by all WebSocket handlers, the file watcher and
//! the page rotator.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use feedboard_types::TimeMode;

use crate::board::{Board, BoardFrame, TimeModeSetting, TimeOverride};
use crate::types::{Error, Result};

use super::protocol::ServerMessage;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Currently loaded board
    board: RwLock<Option<Arc<Board>>>,

    /// What every display is currently showing
    display: Mutex<DisplayState>,

    /// Connected clients
    clients: DashMap<Uuid, ClientState>,
}

/// Shared display position
#[derive(Debug, Clone, Default)]
struct DisplayState {
    /// Linear page index; re-wrapped on every render
    page: usize,
    time_override: Option<TimeOverride>,
    /// Time mode of the last frame put on display
    shown_mode: Option<TimeMode>,
}

/// Per-client state
#[derive(Debug, Clone)]
pub struct ClientState {
    /// Client session ID
    pub session_id: Uuid,

    /// Channel to send messages to this client
    pub tx: mpsc::Sender<ServerMessage>,
}

/// A page turn requested by a controller or the rotator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStep {
    Next,
    Prev,
    Goto(usize),
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Create new application state
    pub fn new() -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                board: RwLock::new(None),
                display: Mutex::new(DisplayState::default()),
                clients: DashMap::new(),
            }),
        }
    }

    // ─── Board ───────────────────────────────────────────────────────────

    /// Get the current board
    pub async fn board(&self) -> Option<Arc<Board>> {
        self.inner.board.read().await.clone()
    }

    /// Get the current board or fail with [`Error::NoBoard`]
    pub async fn require_board(&self) -> Result<Arc<Board>> {
        self.board().await.ok_or(Error::NoBoard)
    }

    /// Replace the current board
    pub async fn set_board(&self, board: Board) {
        *self.inner.board.write().await = Some(Arc::new(board));
    }

    /// Apply an edit to a copy of the current board and swap it in
    pub async fn update_board<F>(&self, edit: F)
    where
        F: FnOnce(&mut Board),
    {
        let mut guard = self.inner.board.write().await;
        if let Some(board_arc) = guard.take() {
            let mut board = (*board_arc).clone();
            edit(&mut board);
            *guard = Some(Arc::new(board));
            tracing::debug!("Updated board snapshot");
        }
    }

    // ─── Display ─────────────────────────────────────────────────────────

    /// Time mode the board shows right now
    pub fn time_mode(&self, board: &Board) -> TimeMode {
        self.time_mode_at(board, &Local::now())
    }

    fn time_mode_at<Tz: TimeZone>(&self, board: &Board, now: &DateTime<Tz>) -> TimeMode {
        let time_override = self.inner.display.lock().time_override;
        board
            .display()
            .time_mode_policy()
            .resolve(time_override.as_ref(), now)
    }

    /// Frame currently on display, if a board is loaded
    pub async fn current_frame(&self) -> Option<BoardFrame> {
        let board = self.board().await?;
        let time_mode = self.time_mode(&board);

        let mut display = self.inner.display.lock();
        let frame = board.frame(display.page, time_mode);
        display.page = frame.page;
        display.shown_mode = Some(time_mode);
        Some(frame)
    }

    /// Render an arbitrary page without moving the display
    pub async fn frame_at(&self, page: usize) -> Result<BoardFrame> {
        let board = self.require_board().await?;
        let time_mode = self.time_mode(&board);
        Ok(board.frame(page, time_mode))
    }

    /// Move the display and return the new frame
    pub async fn turn_page(&self, step: PageStep) -> Result<BoardFrame> {
        let board = self.require_board().await?;
        let time_mode = self.time_mode(&board);
        let layout = board.layout(time_mode);

        let frame = {
            let mut display = self.inner.display.lock();
            display.page = match step {
                PageStep::Next => layout.next(display.page),
                PageStep::Prev => layout.prev(display.page),
                PageStep::Goto(page) => layout.wrap(page),
            };
            display.shown_mode = Some(time_mode);
            board.frame(display.page, time_mode)
        };

        tracing::debug!(page = frame.page, total = frame.total_pages, "Turned page");
        Ok(frame)
    }

    /// Force AM/PM for `minutes` (board default when omitted), or clear with AUTO
    pub async fn set_time_mode(&self, setting: TimeModeSetting, minutes: Option<u32>) -> Result<BoardFrame> {
        let board = self.require_board().await?;

        let time_override = match setting {
            TimeModeSetting::Auto => None,
            TimeModeSetting::Am | TimeModeSetting::Pm => {
                let mode = if setting == TimeModeSetting::Am { TimeMode::Am } else { TimeMode::Pm };
                let minutes = minutes.unwrap_or(board.display().override_minutes);
                Some(TimeOverride::for_minutes(mode, Utc::now(), minutes))
            }
        };
        self.set_time_override(time_override);
        tracing::info!(?setting, ?minutes, "Time mode set");

        self.current_frame().await.ok_or(Error::NoBoard)
    }

    /// Replace the manual override without re-rendering
    pub fn set_time_override(&self, time_override: Option<TimeOverride>) {
        self.inner.display.lock().time_override = time_override;
    }

    /// Re-render and push when the clock or an expired override has changed
    /// the time mode since the last frame went out
    pub async fn refresh_time_mode(&self) -> Option<BoardFrame> {
        let board = self.board().await?;
        let time_mode = self.time_mode(&board);
        if self.inner.display.lock().shown_mode == Some(time_mode) {
            return None;
        }

        let frame = self.current_frame().await?;
        tracing::info!(time_mode = %frame.time_mode, "Time mode changed");
        self.publish(&frame).await;
        Some(frame)
    }

    /// Active manual override, if any
    pub fn time_override(&self) -> Option<TimeOverride> {
        self.inner.display.lock().time_override
    }

    // ─── Clients ─────────────────────────────────────────────────────────

    /// Register a new client connection
    pub async fn register_client(&self, tx: mpsc::Sender<ServerMessage>) -> Uuid {
        let session_id = Uuid::new_v4();
        self.inner.clients.insert(session_id, ClientState { session_id, tx });
        tracing::info!("Client connected: {}", session_id);
        session_id
    }

    /// Remove a client connection
    pub async fn remove_client(&self, session_id: Uuid) {
        self.inner.clients.remove(&session_id);
        tracing::info!("Client disconnected: {}", session_id);
    }

    /// Get the number of connected clients
    pub async fn client_count(&self) -> usize {
        self.inner.clients.len()
    }

    /// Send a message to a specific client
    pub async fn send_to_client(&self, session_id: Uuid, message: ServerMessage) {
        if let Some(client) = self.inner.clients.get(&session_id) {
            if let Err(e) = client.tx.try_send(message) {
                tracing::warn!("Failed to send message to client {}: {}", session_id, e);
            }
        }
    }

    /// Broadcast a message to all connected clients
    pub async fn broadcast_all(&self, message: ServerMessage) {
        for client in self.inner.clients.iter() {
            if let Err(e) = client.tx.try_send(message.clone()) {
                tracing::warn!(
                    "Failed to send message to client {}: {}",
                    client.session_id,
                    e
                );
            }
        }
    }

    /// Push a frame to every display
    pub async fn publish(&self, frame: &BoardFrame) {
        tracing::debug!(
            page = frame.page,
            clients = self.inner.clients.len(),
            "Publishing frame"
        );
        self.broadcast_all(ServerMessage::frame(frame)).await;
    }

    /// Re-render the current page and push it
    pub async fn publish_current(&self) {
        if let Some(frame) = self.current_frame().await {
            self.publish(&frame).await;
        }
    }
}
