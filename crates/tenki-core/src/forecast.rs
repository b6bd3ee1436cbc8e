//! Forecast types — normalized documents, persisted records and query rows.
//!
//! A [`Forecast`] is what a single fetch of one office's document normalizes
//! to. [`Forecast::records`] flattens it into [`NewForecast`] rows, which the
//! store turns into [`ForecastRecord`]s by stamping `fetched_at`.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Normalized fetch result ─────────────────────────────────────────────────

/// One day of one sub-area's forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayForecast {
  pub date:                      NaiveDate,
  pub weather_text:              String,
  pub precipitation_probability: Option<u8>,
}

/// All days for one sub-area, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaForecast {
  pub area_code: String,
  pub area_name: String,
  pub days:      Vec<DayForecast>,
}

/// A normalized forecast document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forecast {
  /// The office code the caller asked for.
  pub requested_office_code: String,
  /// The office whose document was actually fetched (after remapping).
  pub office_code:           String,
  pub report_datetime:       DateTime<FixedOffset>,
  pub per_area:              Vec<AreaForecast>,
}

impl Forecast {
  /// Flatten into one row per (sub-area, day), keyed by the effective office.
  pub fn records(&self) -> Vec<NewForecast> {
    self
      .per_area
      .iter()
      .flat_map(|area| {
        area.days.iter().map(move |day| NewForecast {
          office_code:               self.office_code.clone(),
          area_code:                 area.area_code.clone(),
          report_datetime:           self.report_datetime,
          target_date:               day.date,
          weather_text:              day.weather_text.clone(),
          precipitation_probability: day.precipitation_probability,
        })
      })
      .collect()
  }
}

// ─── Persisted records ───────────────────────────────────────────────────────

/// A forecast row before the store has stamped it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewForecast {
  pub office_code:               String,
  pub area_code:                 String,
  pub report_datetime:           DateTime<FixedOffset>,
  pub target_date:               NaiveDate,
  pub weather_text:              String,
  pub precipitation_probability: Option<u8>,
}

/// A persisted forecast row.
///
/// Unique on `(office_code, area_code, target_date, report_datetime)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRecord {
  pub office_code:               String,
  pub area_code:                 String,
  pub report_datetime:           DateTime<FixedOffset>,
  pub target_date:               NaiveDate,
  pub weather_text:              String,
  pub precipitation_probability: Option<u8>,
  /// Set by the store on every write, including overwrites.
  pub fetched_at:                DateTime<Utc>,
}

/// A row returned by [`ForecastStore::get_forecasts`], joined with the area
/// name for display.
///
/// [`ForecastStore::get_forecasts`]: crate::store::ForecastStore::get_forecasts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredForecast {
  pub area_code:                 String,
  pub area_name:                 String,
  pub weather_text:              String,
  pub precipitation_probability: Option<u8>,
  pub report_datetime:           DateTime<FixedOffset>,
}

// ─── Day labels ──────────────────────────────────────────────────────────────

/// Display label for a day index. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayLabel {
  Today,
  Tomorrow,
  DayAfterTomorrow,
}

impl DayLabel {
  /// Index 0, 1 and 2 have labels; anything later does not.
  pub fn for_index(index: usize) -> Option<Self> {
    match index {
      0 => Some(Self::Today),
      1 => Some(Self::Tomorrow),
      2 => Some(Self::DayAfterTomorrow),
      _ => None,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Today => "today",
      Self::Tomorrow => "tomorrow",
      Self::DayAfterTomorrow => "day after tomorrow",
    }
  }
}

impl std::fmt::Display for DayLabel {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Parsing helpers ─────────────────────────────────────────────────────────

/// Japan Standard Time, the offset JMA publishes every timestamp in.
pub const JST: FixedOffset = match FixedOffset::east_opt(9 * 60 * 60) {
  Some(offset) => offset,
  None => panic!("JST offset out of range"),
};

/// The current calendar date in Japan.
pub fn today_in_japan() -> NaiveDate { Utc::now().with_timezone(&JST).date_naive() }

/// Parse a JMA timestamp such as `2024-05-01T11:00:00+09:00`.
pub fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>> {
  DateTime::parse_from_rfc3339(s).map_err(|_| Error::InvalidTimestamp(s.to_owned()))
}

/// Calendar date of a JMA timestamp, in the timestamp's own offset.
pub fn parse_target_date(s: &str) -> Result<NaiveDate> {
  Ok(parse_timestamp(s)?.date_naive())
}

/// Parse a JMA `pops` entry. The empty string means "no value".
pub fn parse_probability(s: &str) -> Result<Option<u8>> {
  let trimmed = s.trim();
  if trimmed.is_empty() {
    return Ok(None);
  }
  match trimmed.parse::<u8>() {
    Ok(p) if p <= 100 => Ok(Some(p)),
    _ => Err(Error::InvalidProbability(s.to_owned())),
  }
}
