//! The wire timestamp format.
//!
//! Every due time and location timestamp crosses the wire as the literal
//! pattern `yyyy-MM-dd'T'HH:mm:ss.SSS'Z'`, always UTC. Encoding is
//! byte-for-byte reproducible; decoding a malformed string falls back to
//! "now" by policy rather than failing the caller.

use chrono::{DateTime, NaiveDateTime, Utc};

/// chrono rendering of `yyyy-MM-dd'T'HH:mm:ss.SSS'Z'`.
const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Encode a timestamp in the wire format (millisecond precision, literal
/// trailing `Z`).
pub fn format_wire(ts: DateTime<Utc>) -> String {
  ts.format(WIRE_FORMAT).to_string()
}

/// Decode a wire timestamp. Never errors: a string that does not match the
/// pattern decodes as the current time, so a corrupt due date makes the card
/// due immediately instead of poisoning the deck.
pub fn parse_wire(s: &str) -> DateTime<Utc> {
  parse_exact(s).unwrap_or_else(Utc::now)
}

/// Strict parse, used by [`parse_wire`] and directly by tests.
pub fn parse_exact(s: &str) -> Option<DateTime<Utc>> {
  NaiveDateTime::parse_from_str(s, WIRE_FORMAT)
    .ok()
    .map(|naive| naive.and_utc())
}
