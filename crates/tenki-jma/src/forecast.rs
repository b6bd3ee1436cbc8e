//! Forecast retrieval.

use tenki_core::forecast::Forecast;

use crate::{
  Error, JmaClient, Result,
  error::{ParseError, RequestError},
  normalize::normalize,
  wire::ForecastReport,
};

impl JmaClient {
  /// Fetch and normalize the forecast covering `office_code`.
  ///
  /// The code is remapped first, so the document requested may belong to a
  /// neighbouring office. Network errors and non-2xx statuses are
  /// [`Error::FetchFailed`]; a body of the wrong shape is [`Error::Parse`].
  pub async fn fetch_forecast(&self, office_code: &str) -> Result<Forecast> {
    let effective = self.effective_office_code(office_code);
    let url = self.config.forecast_url(effective);

    tracing::info!(requested = office_code, effective, "fetching forecast");

    let reports: Vec<ForecastReport> = self.get_json(&url).await.map_err(|e| match e {
      RequestError::Decode { source, .. } => Error::Parse {
        office_code: effective.to_owned(),
        source:      ParseError::Json(source),
      },
      other => Error::FetchFailed {
        office_code: effective.to_owned(),
        source:      other,
      },
    })?;

    normalize(office_code, effective, reports).map_err(|source| Error::Parse {
      office_code: effective.to_owned(),
      source,
    })
  }
}
