use std::path::{Path, PathBuf};

use folio_schemas::{Record, SiteDocument};
use tracing::debug;

use crate::{decode_catalog, decode_site_config, FetchError, HostedSource, CATALOG_INDEX, SITE_CONFIG};

/// Reads the published files straight out of a build output directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
    catalog_path: String,
    config_path: String,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_paths(root, CATALOG_INDEX, SITE_CONFIG)
    }

    pub fn with_paths(
        root: impl Into<PathBuf>,
        catalog_path: impl Into<String>,
        config_path: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            catalog_path: catalog_path.into(),
            config_path: config_path.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn read(&self, rel: &str) -> Result<String, FetchError> {
        let path = self.root.join(rel.trim_start_matches('/'));
        debug!(path = %path.display(), "hosted read");
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| FetchError::Transport(format!("read {}: {e}", path.display())))
    }
}

#[async_trait::async_trait]
impl HostedSource for DirSource {
    fn name(&self) -> &'static str {
        "dir"
    }

    async fn fetch_catalog(&self) -> Result<Vec<Record>, FetchError> {
        let body = self.read(&self.catalog_path).await?;
        decode_catalog(&body)
    }

    async fn fetch_site_config(&self) -> Result<SiteDocument, FetchError> {
        let body = self.read(&self.config_path).await?;
        decode_site_config(&body)
    }
}
