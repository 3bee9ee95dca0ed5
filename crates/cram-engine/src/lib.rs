//! Async orchestration for Cram.
//!
//! Two independent pieces live here: the [`StudyRunner`], which drives one
//! study session against a deck backend, and the [`NearbyWatcher`], which
//! periodically samples the device location and publishes the name of the
//! saved location (if any) the user is currently near. A watcher failure
//! only ever affects the "nearby" label — deck scheduling never waits on a
//! location fix.

mod nearby;
mod study;

pub mod error;

pub use error::{Error, Result};
pub use nearby::{
  NearbyWatcher, SAMPLE_PERIOD, SAMPLE_TIMEOUT, suggest_location_tag,
};
pub use study::StudyRunner;

#[cfg(test)]
mod tests;
