//! JMA client for tenki.
//!
//! Loads the area catalog and fetches per-office forecast documents from the
//! Japan Meteorological Agency, decoding them once into the typed schema in
//! [`wire`] and normalizing them into [`tenki_core`] types.

mod catalog;
mod client;
mod forecast;

pub mod error;
pub mod normalize;
pub mod wire;

pub use client::{DEFAULT_AREA_URL, DEFAULT_FORECAST_URL_TEMPLATE, JmaClient, JmaConfig};
pub use error::{Error, ParseError, RequestError, Result};
pub use normalize::normalize;
