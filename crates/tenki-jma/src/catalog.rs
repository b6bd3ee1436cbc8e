//! Area catalog loading.

use tenki_core::area::{AreaCatalog, Center, Office};

use crate::{Error, JmaClient, Result, wire::AreaDocument};

impl JmaClient {
  /// Load the region hierarchy, fetching it on first use.
  ///
  /// Failures are not cached: the next call makes one fresh attempt.
  pub async fn load_catalog(&self) -> Result<&AreaCatalog> {
    self
      .catalog
      .get_or_try_init(|| async {
        let doc: AreaDocument = self
          .get_json(&self.config.area_url)
          .await
          .map_err(Error::CatalogUnavailable)?;
        let catalog = AreaCatalog::from(doc);
        tracing::info!(
          centers = catalog.centers.len(),
          offices = catalog.offices.len(),
          "loaded area catalog"
        );
        Ok::<_, Error>(catalog)
      })
      .await
  }
}

impl From<AreaDocument> for AreaCatalog {
  fn from(doc: AreaDocument) -> Self {
    let centers = doc
      .centers
      .into_iter()
      .map(|(code, entry)| Center {
        code,
        name: entry.name,
        child_office_codes: entry.children,
      })
      .collect();

    let offices = doc
      .offices
      .into_iter()
      .map(|(code, entry)| {
        let office = Office {
          code: code.clone(),
          name: entry.name,
        };
        (code, office)
      })
      .collect();

    AreaCatalog { centers, offices }
  }
}
