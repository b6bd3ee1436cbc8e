//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Report datetimes are converted to UTC and written with whole seconds, so
//! every stored value has the same shape and a lexical `MAX()` is also the
//! chronological maximum. They are read back in JST. `fetched_at` is RFC 3339
//! UTC. Dates are `YYYY-MM-DD`.

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, Utc};
use tenki_core::forecast::{ForecastRecord, JST, StoredForecast};

use crate::{Error, Result};

// ─── Timestamps ──────────────────────────────────────────────────────────────

pub fn encode_report_dt(dt: DateTime<FixedOffset>) -> String {
  dt.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn decode_report_dt(s: &str) -> Result<DateTime<FixedOffset>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&JST))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Dates ───────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Probability ─────────────────────────────────────────────────────────────

pub fn decode_pop(v: Option<i64>) -> Result<Option<u8>> {
  v.map(|p| {
    u8::try_from(p)
      .ok()
      .filter(|p| *p <= 100)
      .ok_or(Error::Probability(p))
  })
  .transpose()
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `forecasts` row joined with `areas`.
pub struct RawStoredForecast {
  pub area_code:       String,
  pub area_name:       String,
  pub weather:         String,
  pub pop:             Option<i64>,
  pub report_datetime: String,
}

impl RawStoredForecast {
  pub fn into_stored(self) -> Result<StoredForecast> {
    Ok(StoredForecast {
      area_code:                 self.area_code,
      area_name:                 self.area_name,
      weather_text:              self.weather,
      precipitation_probability: decode_pop(self.pop)?,
      report_datetime:           decode_report_dt(&self.report_datetime)?,
    })
  }
}

/// Raw values read directly from a `forecasts` row.
pub struct RawRecord {
  pub office_code:     String,
  pub area_code:       String,
  pub report_datetime: String,
  pub target_date:     String,
  pub weather:         String,
  pub pop:             Option<i64>,
  pub fetched_at:      String,
}

impl RawRecord {
  pub fn into_record(self) -> Result<ForecastRecord> {
    Ok(ForecastRecord {
      office_code:               self.office_code,
      area_code:                 self.area_code,
      report_datetime:           decode_report_dt(&self.report_datetime)?,
      target_date:               decode_date(&self.target_date)?,
      weather_text:              self.weather,
      precipitation_probability: decode_pop(self.pop)?,
      fetched_at:                decode_dt(&self.fetched_at)?,
    })
  }
}
