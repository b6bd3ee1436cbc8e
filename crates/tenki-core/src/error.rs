//! Error types for `tenki-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid timestamp: {0:?}")]
  InvalidTimestamp(String),

  #[error("invalid precipitation probability: {0:?}")]
  InvalidProbability(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
