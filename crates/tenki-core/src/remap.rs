//! Office code remapping.
//!
//! Some sub-region offices have no forecast document of their own; their
//! forecast lives inside a neighbouring office's file.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Built-in remap entries.
pub const DEFAULT_REMAP: &[(&str, &str)] = &[
  // 十勝地方 is published in the 釧路・根室地方 file.
  ("014030", "014100"),
  // 奄美地方 is published in the 鹿児島県 file.
  ("460040", "460100"),
];

/// Maps a requested office code to the office code whose document contains
/// it. Codes without an entry map to themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeRemap {
  entries: BTreeMap<String, String>,
}

impl Default for CodeRemap {
  fn default() -> Self {
    Self {
      entries: DEFAULT_REMAP
        .iter()
        .map(|(from, to)| ((*from).to_owned(), (*to).to_owned()))
        .collect(),
    }
  }
}

impl CodeRemap {
  /// Merge `extra` over the current entries; `extra` wins on conflict.
  pub fn extend<I, K, V>(&mut self, extra: I)
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    self
      .entries
      .extend(extra.into_iter().map(|(k, v)| (k.into(), v.into())));
  }

  pub fn resolve<'a>(&'a self, office_code: &'a str) -> &'a str {
    self
      .entries
      .get(office_code)
      .map(String::as_str)
      .unwrap_or(office_code)
  }
}
