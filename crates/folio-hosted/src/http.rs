use std::time::Duration;

use folio_schemas::{Record, SiteDocument};
use tracing::debug;

use crate::{decode_catalog, decode_site_config, FetchError, HostedSource, CATALOG_INDEX, SITE_CONFIG};

/// JSON-over-HTTP GET against the published site root.
#[derive(Debug, Clone)]
pub struct HttpSource {
    http: reqwest::Client,
    base_url: String,
    catalog_path: String,
    config_path: String,
}

impl HttpSource {
    /// Source for `base_url` using the default index file names.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        Self::with_paths(base_url, CATALOG_INDEX, SITE_CONFIG, timeout)
    }

    pub fn with_paths(
        base_url: impl Into<String>,
        catalog_path: impl Into<String>,
        config_path: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(format!("http client build failed: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            catalog_path: catalog_path.into(),
            config_path: config_path.into(),
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn get_text(&self, path: &str) -> Result<String, FetchError> {
        let url = self.url_for(path);
        debug!(%url, "hosted GET");

        let resp = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport(format!("GET {url}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        resp.text()
            .await
            .map_err(|e| FetchError::Transport(format!("GET {url} body: {e}")))
    }
}

#[async_trait::async_trait]
impl HostedSource for HttpSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch_catalog(&self) -> Result<Vec<Record>, FetchError> {
        let body = self.get_text(&self.catalog_path).await?;
        decode_catalog(&body)
    }

    async fn fetch_site_config(&self) -> Result<SiteDocument, FetchError> {
        let body = self.get_text(&self.config_path).await?;
        decode_site_config(&body)
    }
}
