//! Saved locations — the named places a card can be tagged with.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::proximity::Coordinates;

/// How many saved locations the recent-locations store retains. Inserting
/// beyond this evicts the oldest entry by timestamp.
pub const RECENT_CAPACITY: usize = 7;

/// A named coordinate owned by the recent-locations store.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedLocation {
  pub id:        Uuid,
  pub name:      String,
  pub latitude:  f64,
  pub longitude: f64,
  pub timestamp: DateTime<Utc>,
}

impl SavedLocation {
  pub fn coordinates(&self) -> Coordinates {
    Coordinates {
      latitude:  self.latitude,
      longitude: self.longitude,
    }
  }
}

/// A location as supplied by the user; the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewLocation {
  pub name:      String,
  pub latitude:  f64,
  pub longitude: f64,
}
