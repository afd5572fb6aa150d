//! folio-hosted
//!
//! Hosted-side collaborators: fetch the published catalog index and site
//! configuration.
//!
//! This crate owns the source abstraction and its two concrete sources. It does
//! not touch drafts; the reconciler fetches through [`HostedSource`] and merges.

mod dir;
mod http;

pub use dir::DirSource;
pub use http::HttpSource;

use std::fmt;

use folio_schemas::{Record, SiteDocument};
use serde_json::Value;

/// Default file name of the published catalog index.
pub const CATALOG_INDEX: &str = "pdf-index.json";

/// Default file name of the published site configuration.
pub const SITE_CONFIG: &str = "site-config.json";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Failure to obtain the hosted baseline. Always surfaced to the caller.
#[derive(Debug)]
pub enum FetchError {
    /// Network, timeout or filesystem failure.
    Transport(String),
    /// The host answered with a non-success status.
    Status { url: String, status: u16 },
    /// The body was not the expected JSON shape.
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "hosted fetch transport error: {msg}"),
            FetchError::Status { url, status } => {
                write!(f, "hosted fetch {url} returned http {status}")
            }
            FetchError::Decode(msg) => write!(f, "hosted fetch decode error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// Where the published baseline comes from.
///
/// Object-safe so the CLI can hold a `Box<dyn HostedSource>` chosen at runtime.
#[async_trait::async_trait]
pub trait HostedSource: Send + Sync {
    /// Short name for logs (e.g. `"http"`).
    fn name(&self) -> &'static str;

    /// The hosted catalog, in published order.
    async fn fetch_catalog(&self) -> Result<Vec<Record>, FetchError>;

    /// The hosted site configuration.
    async fn fetch_site_config(&self) -> Result<SiteDocument, FetchError>;
}

#[async_trait::async_trait]
impl<S: HostedSource + ?Sized> HostedSource for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn fetch_catalog(&self) -> Result<Vec<Record>, FetchError> {
        (**self).fetch_catalog().await
    }

    async fn fetch_site_config(&self) -> Result<SiteDocument, FetchError> {
        (**self).fetch_site_config().await
    }
}

// ---------------------------------------------------------------------------
// Body decoding (shared by both sources)
// ---------------------------------------------------------------------------

/// Decode a catalog index body: a JSON array of objects.
pub fn decode_catalog(body: &str) -> Result<Vec<Record>, FetchError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(format!("catalog: {e}")))?;
    let Value::Array(items) = value else {
        return Err(FetchError::Decode("catalog: expected a JSON array".to_string()));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            Record::from_value(item)
                .ok_or_else(|| FetchError::Decode(format!("catalog: entry {i} is not an object")))
        })
        .collect()
}

/// Decode a site configuration body: a JSON object.
pub fn decode_site_config(body: &str) -> Result<SiteDocument, FetchError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(format!("site config: {e}")))?;
    SiteDocument::from_value(value)
        .ok_or_else(|| FetchError::Decode("site config: expected a JSON object".to_string()))
}
