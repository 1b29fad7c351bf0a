//! Board Server
//!
//! Provides a WebSocket API for displays and controllers, plus a read-only
//! HTTP API for the current board and grid pages.

mod handler;
mod protocol;
mod router;
mod state;

pub use handler::*;
pub use protocol::*;
pub use router::*;
pub use state::*;
