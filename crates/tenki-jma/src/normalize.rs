//! Forecast normalization: typed wire reports → [`Forecast`].
//!
//! Pure; no I/O happens here.

use std::collections::HashMap;

use tenki_core::forecast::{
  AreaForecast, DayForecast, Forecast, parse_probability, parse_target_date, parse_timestamp,
};

use crate::{
  error::ParseError,
  wire::{ForecastReport, SeriesArea},
};

/// Normalize a decoded forecast document.
///
/// Only the first report is used. `timeSeries[0]` must be present and holds
/// the weather text; `timeSeries[1]`, when present, holds precipitation
/// probabilities, which are matched to weather areas by area code.
pub fn normalize(
  requested_office_code: &str,
  office_code: &str,
  reports: Vec<ForecastReport>,
) -> Result<Forecast, ParseError> {
  let report = reports.into_iter().next().ok_or(ParseError::NoReports)?;
  let report_datetime = parse_timestamp(&report.report_datetime)?;

  let mut series = report.time_series.into_iter();
  let weather = series.next().ok_or(ParseError::NoWeatherSeries)?;
  let pops_by_area: HashMap<String, Vec<String>> = series
    .next()
    .map(|pop_series| {
      pop_series
        .areas
        .into_iter()
        .map(|a| (a.area.code, a.pops))
        .collect()
    })
    .unwrap_or_default();

  let dates = weather
    .time_defines
    .iter()
    .map(|t| parse_target_date(t))
    .collect::<Result<Vec<_>, _>>()?;

  let per_area = weather
    .areas
    .into_iter()
    .map(|area| normalize_area(area, &dates, &pops_by_area))
    .collect::<Result<Vec<_>, _>>()?;

  Ok(Forecast {
    requested_office_code: requested_office_code.to_owned(),
    office_code: office_code.to_owned(),
    report_datetime,
    per_area,
  })
}

fn normalize_area(
  area: SeriesArea,
  dates: &[chrono::NaiveDate],
  pops_by_area: &HashMap<String, Vec<String>>,
) -> Result<AreaForecast, ParseError> {
  if area.weathers.len() > dates.len() {
    return Err(ParseError::WeathersExceedTimeDefines {
      area_code:    area.area.code,
      weathers:     area.weathers.len(),
      time_defines: dates.len(),
    });
  }

  let pops = pops_by_area
    .get(&area.area.code)
    .map(Vec::as_slice)
    .unwrap_or_default();

  let days = area
    .weathers
    .into_iter()
    .zip(dates)
    .enumerate()
    .map(|(idx, (weather_text, date))| -> Result<DayForecast, ParseError> {
      let precipitation_probability = match pops.get(idx) {
        Some(raw) => parse_probability(raw)?,
        None => None,
      };
      Ok(DayForecast {
        date: *date,
        weather_text,
        precipitation_probability,
      })
    })
    .collect::<Result<Vec<_>, ParseError>>()?;

  Ok(AreaForecast {
    area_code: area.area.code,
    area_name: area.area.name,
    days,
  })
}
