//! Typed schema for the two JMA documents.
//!
//! Only the fields tenki consumes are declared; everything else in the
//! documents is ignored by serde.

use std::collections::BTreeMap;

use serde::Deserialize;

// ─── area.json ───────────────────────────────────────────────────────────────

/// `https://www.jma.go.jp/bosai/common/const/area.json`
#[derive(Debug, Clone, Deserialize)]
pub struct AreaDocument {
  pub centers: BTreeMap<String, CenterEntry>,
  pub offices: BTreeMap<String, OfficeEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CenterEntry {
  pub name:     String,
  #[serde(default)]
  pub children: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OfficeEntry {
  pub name: String,
}

// ─── forecast/{code}.json ────────────────────────────────────────────────────

/// One element of the top-level forecast array.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReport {
  pub report_datetime: String,
  pub time_series:     Vec<TimeSeries>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
  #[serde(default)]
  pub time_defines: Vec<String>,
  #[serde(default)]
  pub areas:        Vec<SeriesArea>,
}

/// A sub-area entry. Which value lists are present depends on the series.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesArea {
  pub area:     AreaRef,
  #[serde(default)]
  pub weathers: Vec<String>,
  #[serde(default)]
  pub pops:     Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AreaRef {
  pub code: String,
  #[serde(default)]
  pub name: String,
}
