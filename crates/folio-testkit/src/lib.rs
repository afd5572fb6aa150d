//! folio-testkit
//!
//! Shared fixtures for scenario tests: an in-memory hosted source and an
//! overlay backend, both with failure injection, plus JSON record builders.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use folio_hosted::{FetchError, HostedSource};
use folio_overlay::{MemoryBackend, OverlayBackend, OverlayStore, StoreError};
use folio_schemas::{Record, SiteDocument};
use serde_json::{json, Value};

/// Build a record from a JSON object literal. Panics on non-objects.
pub fn record(v: Value) -> Record {
    Record::from_value(v).unwrap_or_else(|| panic!("record fixture must be a JSON object"))
}

/// Build a site document from a JSON object literal. Panics on non-objects.
pub fn site(v: Value) -> SiteDocument {
    SiteDocument::from_value(v).unwrap_or_else(|| panic!("site fixture must be a JSON object"))
}

/// Overlay over a fresh memory backend seeded with raw key/value pairs.
pub fn memory_overlay(pairs: &[(&str, &str)]) -> OverlayStore<MemoryBackend> {
    OverlayStore::new(MemoryBackend::from_pairs(pairs.iter().copied()))
}

/// Two fully-populated hosted entries.
pub fn sample_catalog() -> Vec<Record> {
    vec![
        record(json!({
            "title": "Test PDF 1",
            "slug": "test-pdf-1",
            "description": "Test Description 1",
            "file": "/pdfs/test1.pdf",
            "tags": ["tag1", "tag2"],
            "genres": ["genre1"],
            "instruments": ["piano"],
            "artists": ["Artist 1"],
            "_lastModified": "2024-03-20T10:00:00.000Z"
        })),
        record(json!({
            "title": "Test PDF 2",
            "slug": "test-pdf-2",
            "description": "Test Description 2",
            "file": "/pdfs/test2.pdf",
            "tags": ["tag3"],
            "genres": ["genre2"],
            "instruments": ["guitar"],
            "artists": ["Artist 2"],
            "_lastModified": "2024-03-20T10:00:00.000Z"
        })),
    ]
}

pub fn sample_site() -> SiteDocument {
    site(json!({
        "title": "Ricky Bob Dog's Collection",
        "description": "A collection of musical scores and arrangements.",
        "colors": {
            "background": "#ffffff",
            "surface": "#ffffff",
            "text": "#1f2937",
            "accent": "#4f46e5"
        },
        "_lastModified": "2024-03-20T10:00:00.000Z"
    }))
}

/// Hosted source backed by shared in-memory state.
///
/// Clones share state, so a test can keep a handle while the reconciler owns
/// another and still change the published baseline between passes.
#[derive(Clone, Default)]
pub struct StaticSource {
    catalog: Arc<Mutex<Vec<Record>>>,
    site: Arc<Mutex<SiteDocument>>,
    failing: Arc<AtomicBool>,
    fetches: Arc<AtomicUsize>,
}

impl StaticSource {
    pub fn new(catalog: Vec<Record>) -> Self {
        let src = Self::default();
        src.set_catalog(catalog);
        src
    }

    pub fn with_site(self, doc: SiteDocument) -> Self {
        self.set_site(doc);
        self
    }

    pub fn set_catalog(&self, catalog: Vec<Record>) {
        *self.catalog.lock().unwrap_or_else(|p| p.into_inner()) = catalog;
    }

    pub fn set_site(&self, doc: SiteDocument) {
        *self.site.lock().unwrap_or_else(|p| p.into_inner()) = doc;
    }

    /// While set, every fetch fails with a transport error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of fetch calls made so far (successful or not).
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn begin_fetch(&self) -> Result<(), FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(FetchError::Transport("static source set to fail".to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl HostedSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch_catalog(&self) -> Result<Vec<Record>, FetchError> {
        self.begin_fetch()?;
        let catalog = self.catalog.lock().unwrap_or_else(|p| p.into_inner()).clone();
        Ok(catalog)
    }

    async fn fetch_site_config(&self) -> Result<SiteDocument, FetchError> {
        self.begin_fetch()?;
        let doc = self.site.lock().unwrap_or_else(|p| p.into_inner()).clone();
        Ok(doc)
    }
}

/// Memory backend that refuses writes and removals of chosen keys.
///
/// Reads always succeed, so a refused removal leaves the entry visible to the
/// next pass exactly as a failing disk would.
#[derive(Debug, Clone, Default)]
pub struct FaultyBackend {
    inner: MemoryBackend,
    refused: BTreeSet<String>,
    refusals: usize,
}

impl FaultyBackend {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            inner: MemoryBackend::from_pairs(pairs.iter().copied()),
            ..Self::default()
        }
    }

    /// Refuse every mutation of `key` until [`FaultyBackend::heal`].
    pub fn refuse(mut self, key: &str) -> Self {
        self.refused.insert(key.to_string());
        self
    }

    pub fn heal(&mut self) {
        self.refused.clear();
    }

    /// Mutations refused so far.
    pub fn refusals(&self) -> usize {
        self.refusals
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    fn check(&mut self, key: &str) -> Result<(), StoreError> {
        if self.refused.contains(key) {
            self.refusals += 1;
            return Err(StoreError::Io {
                path: key.into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "refused"),
            });
        }
        Ok(())
    }
}

impl OverlayBackend for FaultyBackend {
    fn keys(&self) -> Vec<String> {
        self.inner.keys()
    }

    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.check(key)?;
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.check(key)?;
        self.inner.remove(key)
    }
}
