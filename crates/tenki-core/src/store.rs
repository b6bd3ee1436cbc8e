//! The `ForecastStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `tenki-store-sqlite`).
//! The front-end depends on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  area::Area,
  forecast::{ForecastRecord, NewForecast, StoredForecast},
};

/// Durable storage for area names and forecast records.
///
/// Every write is an upsert; nothing is ever deleted. Each call is a single
/// atomic statement against the backend.
pub trait ForecastStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Areas ─────────────────────────────────────────────────────────────

  /// Insert or overwrite the name stored for `code`.
  fn save_area<'a>(
    &'a self,
    code: &'a str,
    name: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// All known areas, in no particular order.
  fn get_areas(&self) -> impl Future<Output = Result<Vec<Area>, Self::Error>> + Send + '_;

  /// Look up a single area. Returns `None` if it was never saved.
  fn get_area<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Option<Area>, Self::Error>> + Send + 'a;

  // ── Forecasts ─────────────────────────────────────────────────────────

  /// Upsert a forecast on `(office_code, area_code, target_date,
  /// report_datetime)`. `fetched_at` is set to the current time on every
  /// write, so overwriting an unchanged record still refreshes it.
  fn save_forecast(
    &self,
    input: NewForecast,
  ) -> impl Future<Output = Result<ForecastRecord, Self::Error>> + Send + '_;

  /// Every area's forecast for `office_code` on `target_date`, restricted to
  /// the most recent report datetime stored for that pair. Records whose
  /// area name was never saved are omitted.
  fn get_forecasts<'a>(
    &'a self,
    office_code: &'a str,
    target_date: NaiveDate,
  ) -> impl Future<Output = Result<Vec<StoredForecast>, Self::Error>> + Send + 'a;

  /// Every stored record for `office_code` on `target_date`, across all
  /// report datetimes, ordered by area code then report datetime.
  fn get_records<'a>(
    &'a self,
    office_code: &'a str,
    target_date: NaiveDate,
  ) -> impl Future<Output = Result<Vec<ForecastRecord>, Self::Error>> + Send + 'a;

  /// Distinct target dates ever stored for `office_code`, most recent first.
  fn get_historical_dates<'a>(
    &'a self,
    office_code: &'a str,
  ) -> impl Future<Output = Result<Vec<NaiveDate>, Self::Error>> + Send + 'a;
}
