//! Feedboard Types - Core data structures for the feed schedule board
//!
//! This crate contains the plain entities supplied by the board store
//! (horses, feeds, diet entries) and the read-only projections produced by
//! the grid engine. It has no runtime dependencies beyond serde.

mod entities;
mod grid;
mod paging;

pub use entities::*;
pub use grid::*;
pub use paging::*;
