//! Error type for `tenki-store-sqlite`.
//!
//! Every variant is a storage fault; callers treat them alike.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("stored precipitation probability out of range: {0}")]
  Probability(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
