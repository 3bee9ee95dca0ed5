//! [`SqliteLocationStore`] — the SQLite implementation of [`LocationStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use cram_core::{
  location::{NewLocation, RECENT_CAPACITY, SavedLocation},
  store::LocationStore,
  timestamp,
};

use crate::{Error, Result, schema::SCHEMA};

/// Rows outside the newest `RECENT_CAPACITY` by timestamp are dropped after
/// every insert. Mirrors the read query, so the bound always holds.
const TRIM_SQL: &str = "DELETE FROM locations
 WHERE location_id NOT IN (
   SELECT location_id FROM locations ORDER BY timestamp DESC LIMIT ?1
 )";

/// A recent-locations store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteLocationStore {
  conn: tokio_rusqlite::Connection,
}

/// Row shape as it comes off the database, before id/timestamp decoding.
struct RawLocation {
  id:        String,
  name:      String,
  latitude:  f64,
  longitude: f64,
  timestamp: String,
}

impl RawLocation {
  fn decode(self) -> Result<SavedLocation> {
    Ok(SavedLocation {
      id:        Uuid::parse_str(&self.id)?,
      name:      self.name,
      latitude:  self.latitude,
      longitude: self.longitude,
      timestamp: timestamp::parse_wire(&self.timestamp),
    })
  }
}

impl SqliteLocationStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert with a caller-supplied timestamp, then trim to capacity.
  ///
  /// Eviction is by timestamp order, not insertion order, so inserting an
  /// entry dated older than the current seven evicts it immediately.
  pub async fn insert_at(
    &self,
    location: NewLocation,
    at: DateTime<Utc>,
  ) -> Result<SavedLocation> {
    let saved = SavedLocation {
      id:        Uuid::new_v4(),
      name:      location.name,
      latitude:  location.latitude,
      longitude: location.longitude,
      timestamp: at,
    };

    let id_str = saved.id.to_string();
    let name = saved.name.clone();
    let (latitude, longitude) = (saved.latitude, saved.longitude);
    let at_str = timestamp::format_wire(saved.timestamp);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO locations (location_id, name, latitude, longitude, timestamp)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, name, latitude, longitude, at_str],
        )?;
        tx.execute(TRIM_SQL, rusqlite::params![RECENT_CAPACITY as i64])?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(saved)
  }
}

impl LocationStore for SqliteLocationStore {
  type Error = Error;

  async fn insert(&self, location: NewLocation) -> Result<SavedLocation> {
    self.insert_at(location, Utc::now()).await
  }

  async fn recent(&self) -> Result<Vec<SavedLocation>> {
    let raw: Vec<RawLocation> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT location_id, name, latitude, longitude, timestamp
             FROM locations
            ORDER BY timestamp DESC
            LIMIT ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![RECENT_CAPACITY as i64], |row| {
            Ok(RawLocation {
              id:        row.get(0)?,
              name:      row.get(1)?,
              latitude:  row.get(2)?,
              longitude: row.get(3)?,
              timestamp: row.get(4)?,
            })
          })?
          .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
      })
      .await?;

    raw.into_iter().map(RawLocation::decode).collect()
  }

  async fn delete(&self, id: Uuid) -> Result<()> {
    let id_str = id.to_string();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM locations WHERE location_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
