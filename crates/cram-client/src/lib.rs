//! Async HTTP client for the deck backend.
//!
//! Implements [`cram_core::store::DeckBackend`] against the JSON REST
//! service that owns decks. Transport failures are recoverable: callers are
//! expected to keep their last good in-memory state and retry.

mod client;

pub mod error;

pub use client::{DeckClient, DeckClientConfig};
pub use error::{Error, Result};
