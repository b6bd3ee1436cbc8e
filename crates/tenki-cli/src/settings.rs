//! Runtime settings: built-in defaults, then an optional TOML file, then
//! `TENKI_*` environment variables.

use std::{
  collections::BTreeMap,
  path::{Path, PathBuf},
  time::Duration,
};

use serde::Deserialize;
use tenki_core::remap::CodeRemap;
use tenki_jma::{DEFAULT_AREA_URL, DEFAULT_FORECAST_URL_TEMPLATE, JmaConfig};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  pub store_path:            PathBuf,
  pub area_url:              String,
  pub forecast_url_template: String,
  pub timeout_secs:          u64,
  /// Extra office code remaps, merged over the built-in ones.
  #[serde(default)]
  pub code_remap:            BTreeMap<String, String>,
}

impl Settings {
  pub fn load(file: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("store_path", "weather.db")?
      .set_default("area_url", DEFAULT_AREA_URL)?
      .set_default("forecast_url_template", DEFAULT_FORECAST_URL_TEMPLATE)?
      .set_default("timeout_secs", 30_i64)?
      .add_source(config::File::from(file.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("TENKI"))
      .build()?
      .try_deserialize()
  }

  pub fn jma_config(&self) -> JmaConfig {
    let mut remap = CodeRemap::default();
    remap.extend(self.code_remap.clone());
    JmaConfig {
      area_url: self.area_url.clone(),
      forecast_url_template: self.forecast_url_template.clone(),
      timeout: Duration::from_secs(self.timeout_secs),
      remap,
    }
  }

  /// The store path with a leading `~` expanded.
  pub fn store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
