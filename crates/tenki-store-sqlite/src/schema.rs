//! SQL schema for the tenki SQLite store.
//!
//! Executed by `SqliteStore::open` every time a store is opened.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `forecasts.area_code` references `areas(code)`, but `SqliteStore` turns
/// foreign key enforcement off on each connection: forecasts may be written
/// before their area name is known.
///
/// `report_datetime` is always stored as UTC with whole seconds, so a
/// lexical `MAX()` is the chronological maximum.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS areas (
    code  TEXT PRIMARY KEY,
    name  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS forecasts (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    office_code      TEXT NOT NULL,   -- effective (fetched) office code
    area_code        TEXT NOT NULL REFERENCES areas(code),
    report_datetime  TEXT NOT NULL,   -- RFC 3339 UTC, whole seconds
    target_date      TEXT NOT NULL,   -- YYYY-MM-DD
    weather          TEXT NOT NULL,
    pop              INTEGER,         -- 0..=100 or NULL
    fetched_at       TEXT NOT NULL,   -- RFC 3339 UTC; store-assigned
    UNIQUE (office_code, area_code, target_date, report_datetime)
);

CREATE INDEX IF NOT EXISTS forecasts_office_date_idx
    ON forecasts(office_code, target_date);

PRAGMA user_version = 1;
";
