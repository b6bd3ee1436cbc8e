//! Plain-text rendering of catalog and forecast views.

use std::fmt::Write as _;

use chrono::NaiveDate;
use tenki_core::area::OfficeSelection;

use crate::app::{CatalogView, DayView};

pub fn catalog(view: &CatalogView) -> String {
  let mut out = String::new();
  for center in &view.catalog.centers {
    let _ = writeln!(out, "{} ({})", center.name, center.code);
    for office in center.offices(&view.catalog) {
      let _ = writeln!(out, "  {}  {}", office.code, office.name);
    }
  }
  out
}

/// Render stored forecasts. The selected office's own sub-area, when
/// present, is marked with `*`.
pub fn days(selection: &OfficeSelection, views: &[DayView]) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{} ({})", selection.office_name, selection.office_code);

  if views.iter().all(|v| v.rows.is_empty()) {
    let _ = writeln!(out, "no forecasts stored");
    return out;
  }

  for view in views.iter().filter(|v| !v.rows.is_empty()) {
    match view.label {
      Some(label) => {
        let _ = writeln!(out, "[{}] {label}", view.date);
      }
      None => {
        let _ = writeln!(out, "[{}]", view.date);
      }
    }
    for row in &view.rows {
      let marker = if row.area_code == selection.office_code { '*' } else { ' ' };
      let pop = row
        .precipitation_probability
        .map(|p| format!(" / precipitation {p}%"))
        .unwrap_or_default();
      let _ = writeln!(out, " {marker} {}: {}{pop}", row.area_name, row.weather_text);
    }
  }
  out
}

pub fn dates(selection: &OfficeSelection, dates: &[NaiveDate]) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{} ({})", selection.office_name, selection.office_code);
  if dates.is_empty() {
    let _ = writeln!(out, "no history");
  }
  for date in dates {
    let _ = writeln!(out, "  {date}");
  }
  out
}
