//! WebSocket Protocol Messages
//!
//! Defines the message types exchanged between board clients and the server.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::board::{BoardFrame, TimeModeSetting};
use crate::types::Error;

/// Path carrying grid frame pushes
pub const GRID_PATH: &str = "/grid";

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Ping for keep-alive
    Ping { id: String },

    /// Fetch the current frame
    GetFrame { id: String },

    /// Turn to the next page (rows first, then columns)
    NextPage { id: String },

    /// Turn to the previous page
    PrevPage { id: String },

    /// Jump to a linear page; wraps when out of range
    GotoPage { id: String, page: usize },

    /// Force AM or PM for a while, or go back to AUTO
    SetTimeMode {
        id: String,
        mode: TimeModeSetting,
        /// Override lifetime; defaults to the board's `override_minutes`
        #[serde(default)]
        minutes: Option<u32>,
    },
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Sent on initial connection
    Connected {
        session_id: String,
        server_version: String,
    },

    /// Response to a client request
    Response {
        id: String,
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    /// Push notification
    Change {
        path: String,
        change_type: ChangeType,
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
    },

    /// Error message
    Error {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        code: ErrorCode,
        message: String,
    },

    /// Pong response to ping
    Pong { id: String },
}

/// Type of change for push notifications
///
/// Frames are always re-rendered whole, so every push is an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Updated,
}

/// Error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidRequest,
    NotFound,
    InternalError,
}

impl From<&Error> for ErrorCode {
    fn from(error: &Error) -> Self {
        match error {
            Error::NoBoard => ErrorCode::NotFound,
            Error::Load(_) | Error::Watch(_) => ErrorCode::InternalError,
        }
    }
}

impl ServerMessage {
    /// Create a success response
    pub fn success(id: impl Into<String>, data: Option<Value>) -> Self {
        Self::Response {
            id: id.into(),
            success: true,
            data,
            error: None,
        }
    }

    /// Create an error message
    pub fn error(id: Option<String>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Error {
            id,
            code,
            message: message.into(),
        }
    }

    /// Create a change notification
    pub fn change(path: impl Into<String>, change_type: ChangeType, data: Option<Value>) -> Self {
        Self::Change {
            path: path.into(),
            change_type,
            data,
        }
    }

    /// Push a new grid frame
    pub fn frame(frame: &BoardFrame) -> Self {
        Self::change(
            GRID_PATH,
            ChangeType::Updated,
            serde_json::to_value(frame).ok(),
        )
    }

    /// Create a connected message
    pub fn connected(session_id: impl Into<String>) -> Self {
        Self::Connected {
            session_id: session_id.into(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Create a pong message
    pub fn pong(id: impl Into<String>) -> Self {
        Self::Pong { id: id.into() }
    }
}
