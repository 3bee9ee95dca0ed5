//! SQL schema for the SQLite location store.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Timestamps are stored in the wire format (`yyyy-MM-dd'T'HH:mm:ss.SSS'Z'`),
/// whose lexicographic order matches chronological order, so recency queries
/// can sort the TEXT column directly.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS locations (
    location_id TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    latitude    REAL NOT NULL,
    longitude   REAL NOT NULL,
    timestamp   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS locations_timestamp_idx ON locations(timestamp);

PRAGMA user_version = 1;
";
