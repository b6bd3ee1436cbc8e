//! Application actions: what happens when the user picks an office, asks
//! for history, or opens the area list.
//!
//! Every action takes the selected office explicitly; nothing here remembers
//! a "current" selection between calls.

use chrono::{Days, NaiveDate};
use tenki_core::{
  area::{AreaCatalog, OfficeSelection},
  forecast::{DayLabel, Forecast, StoredForecast},
  store::ForecastStore,
};
use tenki_jma::JmaClient;
use thiserror::Error;

// ─── Errors ───────────────────────────────────────────────────────────────────

/// The error categories the front-end distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  CatalogUnavailable,
  FetchFailed,
  ParseError,
  StorageError,
}

/// An action failure. Its `Display` text is the message shown to the user.
#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Jma(#[from] tenki_jma::Error),

  #[error("storage error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl AppError {
  fn store<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self { Self::Store(Box::new(e)) }

  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::Jma(tenki_jma::Error::CatalogUnavailable(_)) => ErrorKind::CatalogUnavailable,
      Self::Jma(tenki_jma::Error::Parse { .. }) => ErrorKind::ParseError,
      Self::Jma(tenki_jma::Error::FetchFailed { .. } | tenki_jma::Error::Client(_)) => {
        ErrorKind::FetchFailed
      }
      Self::Store(_) => ErrorKind::StorageError,
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

// ─── Views ────────────────────────────────────────────────────────────────────

/// The area list, or an empty one plus the reason it could not be loaded.
#[derive(Debug, Default)]
pub struct CatalogView {
  pub catalog: AreaCatalog,
  pub error:   Option<AppError>,
}

/// Stored forecasts for one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayView {
  pub date:  NaiveDate,
  pub label: Option<DayLabel>,
  pub rows:  Vec<StoredForecast>,
}

/// Outcome of a fetch-and-store action.
#[derive(Debug, Clone)]
pub struct FetchSummary {
  pub forecast: Forecast,
  pub saved:    usize,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Glue between the JMA client and a forecast store.
pub struct App<S> {
  client: JmaClient,
  store:  S,
}

impl<S: ForecastStore> App<S> {
  pub fn new(client: JmaClient, store: S) -> Self { Self { client, store } }

  fn effective<'a>(&'a self, selection: &'a OfficeSelection) -> &'a str {
    self.client.effective_office_code(&selection.office_code)
  }

  /// Load the area list, degrading to an empty one on failure.
  pub async fn catalog_view(&self) -> CatalogView {
    match self.client.load_catalog().await {
      Ok(catalog) => CatalogView {
        catalog: catalog.clone(),
        error:   None,
      },
      Err(e) => {
        tracing::warn!(error = %e, "area catalog unavailable");
        CatalogView {
          catalog: AreaCatalog::default(),
          error:   Some(AppError::from(e)),
        }
      }
    }
  }

  /// Store the name of every catalog office. Returns how many were written.
  pub async fn sync_areas(&self) -> Result<usize> {
    let catalog = self.client.load_catalog().await?;
    let mut saved = 0;
    for area in catalog.office_areas() {
      self
        .store
        .save_area(&area.code, &area.name)
        .await
        .map_err(AppError::store)?;
      saved += 1;
    }
    tracing::info!(saved, "synchronised office names");
    Ok(saved)
  }

  /// Fetch the forecast for `selection` and persist it.
  ///
  /// Sub-area names are saved alongside the records so that later queries
  /// can show them. Nothing is written unless the fetch fully succeeds.
  pub async fn fetch_and_store(&self, selection: &OfficeSelection) -> Result<FetchSummary> {
    let forecast = self.client.fetch_forecast(&selection.office_code).await?;

    for area in &forecast.per_area {
      self
        .store
        .save_area(&area.area_code, &area.area_name)
        .await
        .map_err(AppError::store)?;
    }

    let mut saved = 0;
    for record in forecast.records() {
      self
        .store
        .save_forecast(record)
        .await
        .map_err(AppError::store)?;
      saved += 1;
    }

    tracing::info!(
      office = %forecast.office_code,
      areas = forecast.per_area.len(),
      saved,
      "stored forecast"
    );
    Ok(FetchSummary { forecast, saved })
  }

  /// Stored forecasts for `today` and the two following days. Dates with no
  /// stored rows are left out.
  pub async fn upcoming(
    &self,
    selection: &OfficeSelection,
    today: NaiveDate,
  ) -> Result<Vec<DayView>> {
    let office_code = self.effective(selection);
    let mut views = Vec::new();

    for offset in 0..3_u64 {
      let Some(date) = today.checked_add_days(Days::new(offset)) else {
        break;
      };
      let rows = self
        .store
        .get_forecasts(office_code, date)
        .await
        .map_err(AppError::store)?;
      if !rows.is_empty() {
        views.push(DayView {
          date,
          label: DayLabel::for_index(offset as usize),
          rows,
        });
      }
    }
    Ok(views)
  }

  /// Dates for which forecasts of `selection` have been stored, newest first.
  pub async fn history_dates(&self, selection: &OfficeSelection) -> Result<Vec<NaiveDate>> {
    self
      .store
      .get_historical_dates(self.effective(selection))
      .await
      .map_err(AppError::store)
  }

  /// The latest stored forecast of `selection` for a past date.
  pub async fn history(&self, selection: &OfficeSelection, date: NaiveDate) -> Result<DayView> {
    let rows = self
      .store
      .get_forecasts(self.effective(selection), date)
      .await
      .map_err(AppError::store)?;
    Ok(DayView {
      date,
      label: None,
      rows,
    })
  }

  /// Build a selection for `office_code`, naming it from the catalog or,
  /// when the catalog does not know it or cannot be loaded, the area table.
  pub async fn select(&self, office_code: &str) -> Result<OfficeSelection> {
    match self.client.load_catalog().await {
      Ok(catalog) => {
        if let Some(office) = catalog.office(office_code) {
          return Ok(OfficeSelection::from(office));
        }
      }
      Err(e) => {
        tracing::warn!(error = %e, office = office_code, "area catalog unavailable, naming from area table");
      }
    }
    self.select_stored(office_code).await
  }

  /// Build a selection for `office_code` from the area table alone. Falls
  /// back to the code itself as the name. Never touches the network.
  pub async fn select_stored(&self, office_code: &str) -> Result<OfficeSelection> {
    let office_name = self
      .store
      .get_area(office_code)
      .await
      .map_err(AppError::store)?
      .map(|a| a.name)
      .unwrap_or_else(|| office_code.to_owned());

    Ok(OfficeSelection {
      office_code: office_code.to_owned(),
      office_name,
    })
  }
}

#[cfg(test)]
mod tests {
  use serde_json::{Value, json};
  use tempfile::TempDir;
  use tenki_jma::JmaConfig;
  use tenki_store_sqlite::SqliteStore;
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
  };

  use super::*;

  fn date(s: &str) -> NaiveDate { NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap() }

  async fn app(server: &MockServer) -> (TempDir, App<SqliteStore>) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("weather.db")).await.unwrap();
    let client = JmaClient::new(JmaConfig::with_base_url(&server.uri())).unwrap();
    (dir, App::new(client, store))
  }

  fn selection(code: &str, name: &str) -> OfficeSelection {
    OfficeSelection {
      office_code: code.into(),
      office_name: name.into(),
    }
  }

  fn kushiro_doc(reported: &str, first_weather: &str) -> Value {
    json!([{
      "reportDatetime": reported,
      "timeSeries": [
        {
          "timeDefines": [
            "2024-05-01T11:00:00+09:00",
            "2024-05-02T00:00:00+09:00",
            "2024-05-03T00:00:00+09:00"
          ],
          "areas": [
            { "area": { "name": "釧路地方", "code": "014010" },
              "weathers": [first_weather, "くもり", "雨"] },
            { "area": { "name": "十勝地方", "code": "014030" },
              "weathers": ["晴れ", "晴れ", "くもり"] }
          ]
        },
        {
          "timeDefines": [],
          "areas": [
            { "area": { "name": "十勝地方", "code": "014030" }, "pops": ["0", "10", "20"] },
            { "area": { "name": "釧路地方", "code": "014010" }, "pops": ["30", "", "50"] }
          ]
        }
      ]
    }])
  }

  async fn mount(server: &MockServer, code: &str, body: Value) {
    Mock::given(method("GET"))
      .and(path(format!("/bosai/forecast/data/forecast/{code}.json")))
      .respond_with(ResponseTemplate::new(200).set_body_json(body))
      .mount(server)
      .await;
  }

  #[tokio::test]
  async fn fetch_store_and_query_round() {
    let server = MockServer::start().await;
    mount(&server, "014100", kushiro_doc("2024-05-01T11:00:00+09:00", "晴れ")).await;
    let (_dir, app) = app(&server).await;
    let tokachi = selection("014030", "十勝地方");

    let summary = app.fetch_and_store(&tokachi).await.unwrap();
    assert_eq!(summary.saved, 6);
    assert_eq!(summary.forecast.office_code, "014100");

    let days = app.upcoming(&tokachi, date("2024-05-01")).await.unwrap();
    assert_eq!(days.len(), 3);
    assert_eq!(days[0].label, Some(DayLabel::Today));
    assert_eq!(days[2].label, Some(DayLabel::DayAfterTomorrow));

    let first = &days[0].rows;
    assert_eq!(first.len(), 2);
    let tokachi_row = first.iter().find(|r| r.area_code == "014030").unwrap();
    assert_eq!(tokachi_row.area_name, "十勝地方");
    assert_eq!(tokachi_row.precipitation_probability, Some(0));
    let kushiro_row = first.iter().find(|r| r.area_code == "014010").unwrap();
    assert_eq!(kushiro_row.precipitation_probability, Some(30));

    let second_day = days[1]
      .rows
      .iter()
      .find(|r| r.area_code == "014010")
      .unwrap();
    assert_eq!(second_day.precipitation_probability, None);

    let history = app.history_dates(&tokachi).await.unwrap();
    assert_eq!(
      history,
      [date("2024-05-03"), date("2024-05-02"), date("2024-05-01")]
    );
  }

  #[tokio::test]
  async fn newer_report_replaces_older_in_queries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/bosai/forecast/data/forecast/014100.json"))
      .respond_with(
        ResponseTemplate::new(200)
          .set_body_json(kushiro_doc("2024-05-01T05:00:00+09:00", "霧")),
      )
      .up_to_n_times(1)
      .mount(&server)
      .await;
    mount(&server, "014100", kushiro_doc("2024-05-01T11:00:00+09:00", "晴れ")).await;

    let (_dir, app) = app(&server).await;
    let kushiro = selection("014100", "釧路・根室地方");
    app.fetch_and_store(&kushiro).await.unwrap();
    app.fetch_and_store(&kushiro).await.unwrap();

    let view = app.history(&kushiro, date("2024-05-01")).await.unwrap();
    let row = view.rows.iter().find(|r| r.area_code == "014010").unwrap();
    assert_eq!(row.weather_text, "晴れ");

    // Both reports are retained underneath.
    let records = app
      .store
      .get_records("014100", date("2024-05-01"))
      .await
      .unwrap();
    assert_eq!(records.len(), 4);
  }

  #[tokio::test]
  async fn failed_fetch_persists_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/bosai/forecast/data/forecast/130000.json"))
      .respond_with(ResponseTemplate::new(500))
      .mount(&server)
      .await;
    let (_dir, app) = app(&server).await;

    let err = app
      .fetch_and_store(&selection("130000", "東京都"))
      .await
      .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FetchFailed);
    assert!(app.store.get_areas().await.unwrap().is_empty());
    assert!(
      app
        .history_dates(&selection("130000", "東京都"))
        .await
        .unwrap()
        .is_empty()
    );
  }

  #[tokio::test]
  async fn malformed_document_is_parse_error() {
    let server = MockServer::start().await;
    mount(&server, "130000", json!([{ "reportDatetime": "2024-05-01T11:00:00+09:00", "timeSeries": [] }])).await;
    let (_dir, app) = app(&server).await;

    let err = app
      .fetch_and_store(&selection("130000", "東京都"))
      .await
      .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParseError);
    assert!(!err.to_string().is_empty());
  }

  #[tokio::test]
  async fn office_without_sub_areas_writes_nothing() {
    let server = MockServer::start().await;
    mount(
      &server,
      "130000",
      json!([{
        "reportDatetime": "2024-05-01T11:00:00+09:00",
        "timeSeries": [{ "timeDefines": [], "areas": [] }]
      }]),
    )
    .await;
    let (_dir, app) = app(&server).await;

    let summary = app
      .fetch_and_store(&selection("130000", "東京都"))
      .await
      .unwrap();
    assert!(summary.forecast.per_area.is_empty());
    assert_eq!(summary.saved, 0);
    assert!(app.store.get_areas().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn catalog_failure_degrades_to_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/bosai/common/const/area.json"))
      .respond_with(ResponseTemplate::new(500))
      .mount(&server)
      .await;
    let (_dir, app) = app(&server).await;

    let view = app.catalog_view().await;
    assert!(view.catalog.is_empty());
    let err = view.error.unwrap();
    assert_eq!(err.kind(), ErrorKind::CatalogUnavailable);
    assert!(err.to_string().contains("area catalog unavailable"));

    let err = app.sync_areas().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CatalogUnavailable);
  }

  #[tokio::test]
  async fn sync_areas_stores_office_names_and_names_selections() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/bosai/common/const/area.json"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "centers": { "010300": { "name": "関東甲信地方", "children": ["130000"] } },
        "offices": { "130000": { "name": "東京都" } }
      })))
      .expect(1)
      .mount(&server)
      .await;
    let (_dir, app) = app(&server).await;

    assert_eq!(app.sync_areas().await.unwrap(), 1);
    let area = app.store.get_area("130000").await.unwrap().unwrap();
    assert_eq!(area.name, "東京都");

    let picked = app.select("130000").await.unwrap();
    assert_eq!(picked.office_name, "東京都");
    let unknown = app.select("999999").await.unwrap();
    assert_eq!(unknown.office_name, "999999");
  }

  #[tokio::test]
  async fn catalog_failure_falls_back_to_area_table_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/bosai/common/const/area.json"))
      .respond_with(ResponseTemplate::new(500))
      .mount(&server)
      .await;
    let (_dir, app) = app(&server).await;
    app.store.save_area("130000", "東京都").await.unwrap();

    let picked = app.select("130000").await.unwrap();
    assert_eq!(picked.office_name, "東京都");
    let unknown = app.select("999999").await.unwrap();
    assert_eq!(unknown.office_name, "999999");
  }

  #[tokio::test]
  async fn stored_selection_never_loads_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/bosai/common/const/area.json"))
      .respond_with(ResponseTemplate::new(500))
      .expect(0)
      .mount(&server)
      .await;
    let (_dir, app) = app(&server).await;
    app.store.save_area("014030", "十勝地方").await.unwrap();

    let tokachi = app.select_stored("014030").await.unwrap();
    assert_eq!(tokachi.office_name, "十勝地方");
    assert!(app.history_dates(&tokachi).await.unwrap().is_empty());
  }
}
