use folio_hosted::{FetchError, HostedSource};
use folio_overlay::{OverlayBackend, OverlayStore};
use folio_schemas::{Record, SiteDocument};
use tracing::debug;

use crate::catalog::merge_catalog;
use crate::site::merge_site;
use crate::types::{CatalogMerge, SiteMerge};

/// Fetch-then-merge driver over an injected hosted source and overlay store.
///
/// The hosted fetch is the only suspension point and happens before the
/// overlay is read, so a failed fetch returns `Err` with the overlay untouched
/// and no partial output.
#[derive(Debug)]
pub struct Reconciler<S, B> {
    source: S,
    overlay: OverlayStore<B>,
}

impl<S: HostedSource, B: OverlayBackend> Reconciler<S, B> {
    pub fn new(source: S, overlay: OverlayStore<B>) -> Self {
        Self { source, overlay }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn overlay(&self) -> &OverlayStore<B> {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut OverlayStore<B> {
        &mut self.overlay
    }

    pub fn into_parts(self) -> (S, OverlayStore<B>) {
        (self.source, self.overlay)
    }

    /// Merged catalog plus the per-draft report.
    pub async fn reconcile_catalog(&mut self) -> Result<CatalogMerge, FetchError> {
        let hosted = self.source.fetch_catalog().await?;
        debug!(source = self.source.name(), hosted = hosted.len(), "hosted catalog fetched");
        Ok(merge_catalog(hosted, &mut self.overlay))
    }

    pub async fn load_merged_catalog(&mut self) -> Result<Vec<Record>, FetchError> {
        Ok(self.reconcile_catalog().await?.records)
    }

    /// One merged record by slug (the detail view). Runs a full pass so that
    /// redundant drafts are still collected.
    pub async fn find_merged(&mut self, slug: &str) -> Result<Option<Record>, FetchError> {
        let records = self.load_merged_catalog().await?;
        Ok(records.into_iter().find(|r| r.slug() == Some(slug)))
    }

    /// Merged site configuration plus the decision taken.
    pub async fn reconcile_config(&mut self) -> Result<SiteMerge, FetchError> {
        let hosted = self.source.fetch_site_config().await?;
        Ok(merge_site(hosted, &mut self.overlay))
    }

    pub async fn load_merged_config(&mut self) -> Result<SiteDocument, FetchError> {
        Ok(self.reconcile_config().await?.config)
    }
}
