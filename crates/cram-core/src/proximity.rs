//! Proximity matching against saved locations.
//!
//! Distance is great-circle (haversine) on a mean-radius sphere, which is
//! within centimetres of an ellipsoidal calculation at the scale of the
//! 10-metre threshold used here.

use crate::location::SavedLocation;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
  pub latitude:  f64,
  pub longitude: f64,
}

/// Mean Earth radius in metres (IUGG).
const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// How close (in metres) a sample must be to a saved location to count as
/// "near" it. Tighter than typical consumer GPS accuracy; kept deliberately.
pub const NEARBY_THRESHOLD_METERS: f64 = 10.0;

/// Great-circle surface distance between two points, in metres.
///
/// Symmetric, and exactly zero for identical inputs.
pub fn distance_meters(a: Coordinates, b: Coordinates) -> f64 {
  if a == b {
    return 0.0;
  }

  let lat_a = a.latitude.to_radians();
  let lat_b = b.latitude.to_radians();
  let d_lat = (b.latitude - a.latitude).to_radians();
  let d_lon = (b.longitude - a.longitude).to_radians();

  let h = (d_lat / 2.0).sin().powi(2)
    + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

  2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

/// Whether `current` is within the threshold of `location`.
pub fn is_near(current: Coordinates, location: &SavedLocation) -> bool {
  distance_meters(current, location.coordinates()) <= NEARBY_THRESHOLD_METERS
}

/// The first candidate (in supplied order) within the threshold of
/// `current`, or `None` if every candidate is too far away.
///
/// First-match, not nearest-match: callers supply candidates in recency
/// order, and a closer candidate later in the sequence does not win.
pub fn find_nearby<'a>(
  current: Coordinates,
  candidates: &'a [SavedLocation],
) -> Option<&'a SavedLocation> {
  candidates.iter().find(|loc| is_near(current, loc))
}
