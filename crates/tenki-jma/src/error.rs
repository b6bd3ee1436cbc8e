//! Error types for `tenki-jma`.

use thiserror::Error;

/// Failure of a single GET against a JMA endpoint.
#[derive(Debug, Error)]
pub enum RequestError {
  #[error("request to {url} failed: {source}")]
  Transport {
    url:    String,
    #[source]
    source: reqwest::Error,
  },

  #[error("{url} returned {status}")]
  Status {
    url:    String,
    status: reqwest::StatusCode,
  },

  #[error("could not decode {url}: {source}")]
  Decode {
    url:    String,
    #[source]
    source: serde_json::Error,
  },
}

/// A forecast document that does not have the expected shape.
#[derive(Debug, Error)]
pub enum ParseError {
  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("document contains no reports")]
  NoReports,

  #[error("report has no weather time series")]
  NoWeatherSeries,

  #[error("area {area_code} has {weathers} weather entries but only {time_defines} timeDefines")]
  WeathersExceedTimeDefines {
    area_code:    String,
    weathers:     usize,
    time_defines: usize,
  },

  #[error("core error: {0}")]
  Core(#[from] tenki_core::Error),
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("area catalog unavailable: {0}")]
  CatalogUnavailable(#[source] RequestError),

  #[error("forecast fetch failed for office {office_code}: {source}")]
  FetchFailed {
    office_code: String,
    #[source]
    source:      RequestError,
  },

  #[error("unexpected forecast document for office {office_code}: {source}")]
  Parse {
    office_code: String,
    #[source]
    source:      ParseError,
  },

  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
