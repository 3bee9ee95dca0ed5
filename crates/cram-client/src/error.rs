//! Error type for `cram-client`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("{method} {path} → {status}")]
  Status {
    method: &'static str,
    path:   String,
    status: reqwest::StatusCode,
  },

  #[error("decoding deck payload: {0}")]
  Decode(#[from] cram_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
