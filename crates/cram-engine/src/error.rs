//! Error type for `cram-engine`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// An invalid session transition or out-of-range answer.
  #[error(transparent)]
  Session(#[from] cram_core::Error),

  /// A deck backend read failed. The runner keeps its last good in-memory
  /// state; the caller can retry the load.
  #[error("deck backend error: {0}")]
  Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
