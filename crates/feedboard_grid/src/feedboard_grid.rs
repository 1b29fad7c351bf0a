//! Feedboard Grid - Layout and pagination engine for the feed board
//!
//! Turns a store snapshot (horses, feeds, diet) plus a view configuration
//! into the exact cell matrix a board renders. Everything here is pure and
//! synchronous; callers recompute whenever their inputs change.

pub use feedboard_types;

mod engine;
mod layout;
mod pages;

#[cfg(test)]
mod fixtures;

pub use engine::*;
pub use layout::*;
pub use pages::*;
