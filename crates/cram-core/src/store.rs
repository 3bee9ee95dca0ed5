//! Collaborator traits and supporting types.
//!
//! These traits are implemented by the outer layers (`cram-client` for the
//! deck backend, `cram-store-sqlite` for saved locations, the binary for the
//! platform sampler). The engine depends on these abstractions, not on any
//! concrete collaborator.

use std::future::Future;

use thiserror::Error;
use uuid::Uuid;

use crate::{
  deck::{Deck, NewDeck},
  location::{NewLocation, SavedLocation},
  proximity::Coordinates,
};

// ─── Deck backend ────────────────────────────────────────────────────────────

/// The remote service that owns decks.
///
/// All writes are whole-deck, last-write-wins: there is no optimistic lock,
/// and concurrent sessions editing the same deck is an accepted gap.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded async runtimes.
pub trait DeckBackend: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch every deck visible to the caller.
  fn list(
    &self,
  ) -> impl Future<Output = Result<Vec<Deck>, Self::Error>> + Send + '_;

  /// Fetch one deck by id.
  fn get<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Deck, Self::Error>> + Send + 'a;

  /// Create a deck; the backend assigns and returns the id.
  fn create(
    &self,
    deck: NewDeck,
  ) -> impl Future<Output = Result<Deck, Self::Error>> + Send + '_;

  /// Replace a deck wholesale and return the persisted copy.
  fn update<'a>(
    &'a self,
    deck: &'a Deck,
  ) -> impl Future<Output = Result<Deck, Self::Error>> + Send + 'a;

  /// Delete a deck. Returns whether the backend acknowledged the removal.
  fn delete<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}

// ─── Saved locations ─────────────────────────────────────────────────────────

/// The bounded recent-locations store.
///
/// Holds at most [`RECENT_CAPACITY`](crate::location::RECENT_CAPACITY)
/// entries; inserting beyond that evicts the oldest entry **by timestamp**,
/// not by insertion order. The bound holds after every insert and delete.
pub trait LocationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a location, assigning its id and timestamp, and trim the store
  /// back to capacity.
  fn insert(
    &self,
    location: NewLocation,
  ) -> impl Future<Output = Result<SavedLocation, Self::Error>> + Send + '_;

  /// The retained locations, most recent first.
  fn recent(
    &self,
  ) -> impl Future<Output = Result<Vec<SavedLocation>, Self::Error>> + Send + '_;

  /// Remove a location by id. A no-op when the id is absent.
  fn delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Location sampling ───────────────────────────────────────────────────────

/// Why a coordinate sample could not be produced. Both cases degrade the
/// "nearby" features silently; neither ever affects deck scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SampleError {
  #[error("location permission not granted")]
  PermissionDenied,
  #[error("no location fix available")]
  NoFix,
}

/// The platform's source of coordinate samples.
pub trait LocationSampler: Send + Sync {
  /// Whether sampling is currently permitted.
  fn has_permission(&self) -> bool;

  /// Ask the platform for permission. Fire-and-forget: the outcome is
  /// observed later through [`has_permission`](Self::has_permission).
  fn request_permission(&self);

  /// Obtain one coordinate sample. May suspend while awaiting a fix.
  fn sample(
    &self,
  ) -> impl Future<Output = Result<Coordinates, SampleError>> + Send + '_;
}
