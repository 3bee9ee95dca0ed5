//! A coordinate sampler for machines without a location service.

use cram_core::{
  proximity::Coordinates,
  store::{LocationSampler, SampleError},
};

/// Serves a fixed coordinate from config in place of a GPS fix. With no
/// coordinate configured it behaves as permission-denied, which degrades
/// every proximity feature to "no nearby location".
#[derive(Clone)]
pub struct FixedSampler {
  coords: Option<Coordinates>,
}

impl FixedSampler {
  pub fn new(coords: Option<Coordinates>) -> Self {
    FixedSampler { coords }
  }
}

impl LocationSampler for FixedSampler {
  fn has_permission(&self) -> bool {
    self.coords.is_some()
  }

  fn request_permission(&self) {
    tracing::info!(
      "set latitude/longitude in the config file to enable nearby locations"
    );
  }

  async fn sample(&self) -> Result<Coordinates, SampleError> {
    self.coords.ok_or(SampleError::PermissionDenied)
  }
}
