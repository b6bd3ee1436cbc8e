//! [`JmaClient`] — async HTTP access to the JMA "bosai" endpoints.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tenki_core::{area::AreaCatalog, remap::CodeRemap};
use tokio::sync::OnceCell;

use crate::{Error, Result, error::RequestError};

pub const DEFAULT_AREA_URL: &str = "https://www.jma.go.jp/bosai/common/const/area.json";

/// `{code}` is replaced by the effective office code.
pub const DEFAULT_FORECAST_URL_TEMPLATE: &str =
  "https://www.jma.go.jp/bosai/forecast/data/forecast/{code}.json";

/// Endpoint and transport settings.
#[derive(Debug, Clone)]
pub struct JmaConfig {
  pub area_url:              String,
  pub forecast_url_template: String,
  pub timeout:               Duration,
  pub remap:                 CodeRemap,
}

impl Default for JmaConfig {
  fn default() -> Self {
    Self {
      area_url:              DEFAULT_AREA_URL.to_owned(),
      forecast_url_template: DEFAULT_FORECAST_URL_TEMPLATE.to_owned(),
      timeout:               Duration::from_secs(30),
      remap:                 CodeRemap::default(),
    }
  }
}

impl JmaConfig {
  /// Point both endpoints at another host, keeping JMA's path layout.
  pub fn with_base_url(base_url: &str) -> Self {
    let base = base_url.trim_end_matches('/');
    Self {
      area_url: format!("{base}/bosai/common/const/area.json"),
      forecast_url_template: format!("{base}/bosai/forecast/data/forecast/{{code}}.json"),
      ..Self::default()
    }
  }

  pub fn forecast_url(&self, office_code: &str) -> String {
    self.forecast_url_template.replace("{code}", office_code)
  }
}

/// Async client for the area catalog and per-office forecast documents.
///
/// The area catalog is fetched at most once successfully per client and
/// cached for its lifetime.
pub struct JmaClient {
  pub(crate) http:    reqwest::Client,
  pub(crate) config:  JmaConfig,
  pub(crate) catalog: OnceCell<AreaCatalog>,
}

impl JmaClient {
  pub fn new(config: JmaConfig) -> Result<Self> {
    let http = reqwest::Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(Error::Client)?;
    Ok(Self {
      http,
      config,
      catalog: OnceCell::new(),
    })
  }

  /// The office code whose document actually contains `office_code`.
  pub fn effective_office_code<'a>(&'a self, office_code: &'a str) -> &'a str {
    self.config.remap.resolve(office_code)
  }

  /// One GET, decoded as JSON. Non-2xx statuses are errors.
  pub(crate) async fn get_json<T: DeserializeOwned>(
    &self,
    url: &str,
  ) -> Result<T, RequestError> {
    tracing::debug!(%url, "GET");

    let resp = self
      .http
      .get(url)
      .send()
      .await
      .map_err(|source| RequestError::Transport {
        url: url.to_owned(),
        source,
      })?;

    let status = resp.status();
    if !status.is_success() {
      return Err(RequestError::Status {
        url: url.to_owned(),
        status,
      });
    }

    let body = resp.bytes().await.map_err(|source| RequestError::Transport {
      url: url.to_owned(),
      source,
    })?;

    serde_json::from_slice(&body).map_err(|source| RequestError::Decode {
      url: url.to_owned(),
      source,
    })
  }
}
