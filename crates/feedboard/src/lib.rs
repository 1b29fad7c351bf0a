//! Feedboard - Barn feed schedule board server
//!
//! This crate provides the board runtime around the grid engine:
//! - Loading and watching a board directory (the entity store)
//! - Time-mode resolution and page rotation
//! - HTTP and WebSocket API for board displays and controllers

// Re-export core crates
pub use feedboard_grid;
pub use feedboard_types;

// Board directory: config, loading, watching
pub mod board;

// Timed page rotation
pub mod rotation;

// HTTP + WebSocket server
pub mod server;

// Crate-wide error type
pub mod types;
