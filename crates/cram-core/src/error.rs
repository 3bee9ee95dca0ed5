//! Error types for `cram-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown card kind: {0:?}")]
  UnknownCardKind(String),

  #[error("answer index {index} out of range for {options} options")]
  AnswerOutOfRange { index: usize, options: usize },

  #[error("no card is being presented")]
  NotPresenting,

  #[error("no answer has been revealed yet")]
  NotRevealed,

  #[error("correct index {index} out of range for {options} options")]
  CorrectIndexOutOfRange { index: usize, options: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
