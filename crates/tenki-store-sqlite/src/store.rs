//! [`SqliteStore`] — the SQLite implementation of [`ForecastStore`].

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use rusqlite::OptionalExtension as _;

use tenki_core::{
  area::Area,
  forecast::{ForecastRecord, NewForecast, StoredForecast},
  store::ForecastStore,
};

use crate::{
  Result,
  encode::{
    RawRecord, RawStoredForecast, decode_date, encode_date, encode_dt, encode_report_dt,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A tenki forecast store backed by a single SQLite file.
///
/// Holds only the file path. Each operation opens a connection, runs one
/// statement and closes the connection again, so there is no connection
/// state shared between calls. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct SqliteStore {
  path: PathBuf,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let store = Self {
      path: path.as_ref().to_path_buf(),
    };
    store
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!(path = %store.path.display(), "opened forecast store");
    Ok(store)
  }

  /// Run `f` on a fresh connection, closing it afterwards whatever `f`
  /// returned.
  ///
  /// The bundled SQLite enforces foreign keys by default. Forecasts may be
  /// written before their area is named, so enforcement is switched off on
  /// every connection.
  async fn call<F, R>(&self, f: F) -> Result<R>
  where
    F: FnOnce(&mut rusqlite::Connection) -> tokio_rusqlite::Result<R> + Send + 'static,
    R: Send + 'static,
  {
    let conn = tokio_rusqlite::Connection::open(&self.path).await?;
    let out = conn
      .call(move |conn| {
        conn.pragma_update(None, "foreign_keys", false)?;
        f(conn)
      })
      .await;
    conn.close().await?;
    Ok(out?)
  }
}

// ─── ForecastStore impl ──────────────────────────────────────────────────────

impl ForecastStore for SqliteStore {
  type Error = crate::Error;

  // ── Areas ─────────────────────────────────────────────────────────────────

  async fn save_area(&self, code: &str, name: &str) -> Result<()> {
    let code = code.to_owned();
    let name = name.to_owned();

    self
      .call(move |conn| {
        conn.execute(
          "INSERT INTO areas (code, name) VALUES (?1, ?2)
           ON CONFLICT (code) DO UPDATE SET name = excluded.name",
          rusqlite::params![code, name],
        )?;
        Ok(())
      })
      .await
  }

  async fn get_areas(&self) -> Result<Vec<Area>> {
    self
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT code, name FROM areas")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(Area {
              code: row.get(0)?,
              name: row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
  }

  async fn get_area(&self, code: &str) -> Result<Option<Area>> {
    let code = code.to_owned();

    self
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT code, name FROM areas WHERE code = ?1",
            rusqlite::params![code],
            |row| {
              Ok(Area {
                code: row.get(0)?,
                name: row.get(1)?,
              })
            },
          )
          .optional()?)
      })
      .await
  }

  // ── Forecasts ─────────────────────────────────────────────────────────────

  async fn save_forecast(&self, input: NewForecast) -> Result<ForecastRecord> {
    let record = ForecastRecord {
      office_code:               input.office_code,
      area_code:                 input.area_code,
      report_datetime:           input.report_datetime,
      target_date:               input.target_date,
      weather_text:              input.weather_text,
      precipitation_probability: input.precipitation_probability,
      fetched_at:                Utc::now(),
    };

    let office_code = record.office_code.clone();
    let area_code   = record.area_code.clone();
    let report_str  = encode_report_dt(record.report_datetime);
    let date_str    = encode_date(record.target_date);
    let weather     = record.weather_text.clone();
    let pop         = record.precipitation_probability;
    let fetched_str = encode_dt(record.fetched_at);

    tracing::debug!(
      office = %record.office_code,
      area = %record.area_code,
      date = %date_str,
      "saving forecast"
    );

    self
      .call(move |conn| {
        conn.execute(
          "INSERT INTO forecasts (
             office_code, area_code, report_datetime, target_date,
             weather, pop, fetched_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
           ON CONFLICT (office_code, area_code, target_date, report_datetime)
           DO UPDATE SET
             weather    = excluded.weather,
             pop        = excluded.pop,
             fetched_at = excluded.fetched_at",
          rusqlite::params![
            office_code,
            area_code,
            report_str,
            date_str,
            weather,
            pop,
            fetched_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn get_forecasts(
    &self,
    office_code: &str,
    target_date: NaiveDate,
  ) -> Result<Vec<StoredForecast>> {
    let office_code = office_code.to_owned();
    let date_str    = encode_date(target_date);

    let raws: Vec<RawStoredForecast> = self
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT f.area_code, a.name, f.weather, f.pop, f.report_datetime
           FROM forecasts f
           JOIN areas a ON a.code = f.area_code
           WHERE f.office_code = ?1
             AND f.target_date = ?2
             AND f.report_datetime = (
               SELECT MAX(report_datetime)
               FROM forecasts
               WHERE office_code = ?1 AND target_date = ?2
             )
           ORDER BY f.area_code",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![office_code, date_str], |row| {
            Ok(RawStoredForecast {
              area_code:       row.get(0)?,
              area_name:       row.get(1)?,
              weather:         row.get(2)?,
              pop:             row.get(3)?,
              report_datetime: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStoredForecast::into_stored).collect()
  }

  async fn get_records(
    &self,
    office_code: &str,
    target_date: NaiveDate,
  ) -> Result<Vec<ForecastRecord>> {
    let office_code = office_code.to_owned();
    let date_str    = encode_date(target_date);

    let raws: Vec<RawRecord> = self
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT office_code, area_code, report_datetime, target_date,
                  weather, pop, fetched_at
           FROM forecasts
           WHERE office_code = ?1 AND target_date = ?2
           ORDER BY area_code, report_datetime",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![office_code, date_str], |row| {
            Ok(RawRecord {
              office_code:     row.get(0)?,
              area_code:       row.get(1)?,
              report_datetime: row.get(2)?,
              target_date:     row.get(3)?,
              weather:         row.get(4)?,
              pop:             row.get(5)?,
              fetched_at:      row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }

  async fn get_historical_dates(&self, office_code: &str) -> Result<Vec<NaiveDate>> {
    let office_code = office_code.to_owned();

    let raws: Vec<String> = self
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT target_date
           FROM forecasts
           WHERE office_code = ?1
           ORDER BY target_date DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![office_code], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;

    raws.iter().map(|s| decode_date(s)).collect()
  }
}
