//! Board Management
//!
//! Handles loading, watching, and viewing a board directory on disk.

mod config;
mod frame;
mod loader;
mod time_mode;
mod watcher;

pub use config::*;
pub use frame::*;
pub use loader::*;
pub use time_mode::*;
pub use watcher::*;
