//! Core types and trait definitions for the Cram flashcard engine.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod card;
pub mod deck;
pub mod error;
pub mod location;
pub mod proximity;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod timestamp;
pub mod wire;

pub use error::{Error, Result};
