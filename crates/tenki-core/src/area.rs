//! Areas, offices and centers — the JMA region hierarchy.
//!
//! Only [`Area`] rows are ever persisted. Centers exist purely to group
//! offices for navigation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A named JMA region code. Offices and sub-areas alike are stored as areas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
  pub code: String,
  pub name: String,
}

impl Area {
  pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      code: code.into(),
      name: name.into(),
    }
  }
}

/// An office: the unit whose code selects a forecast document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Office {
  pub code: String,
  pub name: String,
}

/// A display grouping of offices (e.g. 関東甲信地方).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Center {
  pub code:               String,
  pub name:               String,
  pub child_office_codes: Vec<String>,
}

impl Center {
  /// The center's offices in listed order. Children that the catalog does
  /// not know about are skipped.
  pub fn offices<'a>(
    &'a self,
    catalog: &'a AreaCatalog,
  ) -> impl Iterator<Item = &'a Office> + 'a {
    self
      .child_office_codes
      .iter()
      .filter_map(|code| catalog.office(code))
  }
}

/// The region hierarchy as published in JMA's `area.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaCatalog {
  pub centers: Vec<Center>,
  pub offices: BTreeMap<String, Office>,
}

impl AreaCatalog {
  pub fn office(&self, code: &str) -> Option<&Office> { self.offices.get(code) }

  pub fn is_empty(&self) -> bool { self.centers.is_empty() && self.offices.is_empty() }

  /// Every office as an [`Area`], for seeding the area table.
  pub fn office_areas(&self) -> impl Iterator<Item = Area> + '_ {
    self
      .offices
      .values()
      .map(|office| Area::new(office.code.clone(), office.name.clone()))
  }
}

/// What the presentation layer hands over when the user picks an office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeSelection {
  pub office_code: String,
  pub office_name: String,
}

impl From<&Office> for OfficeSelection {
  fn from(office: &Office) -> Self {
    Self {
      office_code: office.code.clone(),
      office_name: office.name.clone(),
    }
  }
}
