//! Draft editing surface: the writes the reconciler later judges.

use std::fmt;
use std::path::Path;

use folio_hosted::{FetchError, HostedSource};
use folio_overlay::{encode_file, EncodeError, OverlayBackend, OverlayStore, StoreError};
use folio_schemas::{Record, SiteDocument};
use tracing::info;

use crate::engine::Reconciler;

#[derive(Debug)]
pub enum StageError {
    /// The record's own `slug` disagrees with the key it is staged under.
    SlugMismatch { id: String, slug: String },
    /// A payload was staged for an identifier with no textual draft and no
    /// hosted record to seed one from.
    NoDraft { id: String },
    Encode(EncodeError),
    Store(StoreError),
    Fetch(FetchError),
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageError::SlugMismatch { id, slug } => {
                write!(f, "draft staged as '{id}' carries slug '{slug}'")
            }
            StageError::NoDraft { id } => {
                write!(f, "no draft or hosted record for '{id}' to attach a file to")
            }
            StageError::Encode(e) => write!(f, "{e}"),
            StageError::Store(e) => write!(f, "{e}"),
            StageError::Fetch(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for StageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StageError::Encode(e) => Some(e),
            StageError::Store(e) => Some(e),
            StageError::Fetch(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EncodeError> for StageError {
    fn from(e: EncodeError) -> Self {
        StageError::Encode(e)
    }
}

impl From<StoreError> for StageError {
    fn from(e: StoreError) -> Self {
        StageError::Store(e)
    }
}

impl From<FetchError> for StageError {
    fn from(e: FetchError) -> Self {
        StageError::Fetch(e)
    }
}

/// Borrowing editor over an overlay store.
pub struct DraftEditor<'a, B> {
    overlay: &'a mut OverlayStore<B>,
}

impl<'a, B: OverlayBackend> DraftEditor<'a, B> {
    pub fn new(overlay: &'a mut OverlayStore<B>) -> Self {
        Self { overlay }
    }

    /// Write `record` as the draft for `id`. A record with no `slug` is
    /// stored with `slug` set to `id`.
    pub fn stage_record(&mut self, id: &str, record: &Record) -> Result<(), StageError> {
        match record.get("slug") {
            None => {
                let record = record.clone().with_slug(id);
                self.overlay.write(id, &record)?;
            }
            Some(v) if v.as_str() == Some(id) => self.overlay.write(id, record)?,
            Some(v) => {
                return Err(StageError::SlugMismatch {
                    id: id.to_string(),
                    slug: v.as_str().map_or_else(|| v.to_string(), str::to_string),
                });
            }
        }
        info!(id, "draft staged");
        Ok(())
    }

    /// Encode `path` and store it as the payload for `id`.
    ///
    /// The draft must already exist. Encoding happens before any write, so a
    /// failed read leaves the store as it was.
    pub async fn stage_file(&mut self, id: &str, path: &Path) -> Result<(), StageError> {
        if !self.overlay.has_draft(id) {
            return Err(StageError::NoDraft { id: id.to_string() });
        }
        let data = encode_file(path).await?;
        self.overlay.write_payload(id, data)?;
        info!(id, path = %path.display(), "payload staged");
        Ok(())
    }

    /// Drop the draft and its payload.
    pub fn discard(&mut self, id: &str) -> Result<(), StageError> {
        self.overlay.remove(id)?;
        Ok(())
    }

    pub fn stage_site(&mut self, doc: &SiteDocument) -> Result<(), StageError> {
        self.overlay.write_config(doc)?;
        info!("site config draft staged");
        Ok(())
    }

    pub fn discard_site(&mut self) -> Result<(), StageError> {
        self.overlay.remove_config()?;
        Ok(())
    }
}

impl<S: HostedSource, B: OverlayBackend> Reconciler<S, B> {
    /// Attach a local file to `id`, seeding the textual draft from the hosted
    /// record when none exists yet.
    pub async fn attach_file(&mut self, id: &str, path: &Path) -> Result<(), StageError> {
        if !self.overlay().has_draft(id) {
            let hosted = self.source().fetch_catalog().await?;
            let seed = hosted
                .into_iter()
                .find(|r| r.slug() == Some(id))
                .ok_or_else(|| StageError::NoDraft { id: id.to_string() })?;

            // Encode first so a bad path does not leave a seeded draft behind.
            let data = encode_file(path).await?;
            let overlay = self.overlay_mut();
            overlay.write(id, &seed)?;
            overlay.write_payload(id, data)?;
            info!(id, path = %path.display(), "draft seeded from hosted; payload staged");
            return Ok(());
        }

        DraftEditor::new(self.overlay_mut()).stage_file(id, path).await
    }
}
