use folio_schemas::{Record, SiteDocument};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::backend::{OverlayBackend, StoreError};
use crate::keys::{self, SITE_CONFIG_KEY};

/// Outcome of parsing one stored draft.
///
/// Parsing never fails the caller: text that is not a JSON object comes back
/// as `Unparseable` and the reconciler treats it as absent.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftParse<T = Record> {
    Parsed(T),
    Unparseable { reason: String },
}

impl<T: DeserializeOwned> DraftParse<T> {
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<T>(raw) {
            Ok(v) => DraftParse::Parsed(v),
            Err(e) => DraftParse::Unparseable {
                reason: e.to_string(),
            },
        }
    }
}

impl<T> DraftParse<T> {
    pub fn is_parsed(&self) -> bool {
        matches!(self, DraftParse::Parsed(_))
    }

    pub fn parsed(self) -> Option<T> {
        match self {
            DraftParse::Parsed(v) => Some(v),
            DraftParse::Unparseable { .. } => None,
        }
    }
}

/// Draft-record view over a key/value backend.
#[derive(Debug, Clone, Default)]
pub struct OverlayStore<B> {
    backend: B,
}

impl<B: OverlayBackend> OverlayStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    // -- catalog drafts -----------------------------------------------------

    /// Every textual catalog draft, in backend enumeration order.
    ///
    /// Payload keys are excluded. Keys that vanish between enumeration and
    /// read are skipped.
    pub fn read_all(&self) -> Vec<(String, DraftParse)> {
        self.backend
            .keys()
            .iter()
            .filter_map(|key| {
                let id = keys::draft_id(key)?;
                let raw = self.backend.get(key)?;
                Some((id.to_string(), DraftParse::parse(&raw)))
            })
            .collect()
    }

    /// Identifiers that currently have a textual draft.
    pub fn draft_ids(&self) -> Vec<String> {
        self.backend
            .keys()
            .iter()
            .filter_map(|key| keys::draft_id(key).map(str::to_string))
            .collect()
    }

    pub fn read_draft(&self, id: &str) -> Option<DraftParse> {
        self.backend
            .get(&keys::draft_key(id))
            .map(|raw| DraftParse::parse(&raw))
    }

    pub fn has_draft(&self, id: &str) -> bool {
        self.backend.get(&keys::draft_key(id)).is_some()
    }

    /// The data-URI payload attached to `id`, if any.
    pub fn read_payload(&self, id: &str) -> Option<String> {
        self.backend.get(&keys::payload_key(id))
    }

    pub fn write(&mut self, id: &str, record: &Record) -> Result<(), StoreError> {
        let raw = to_json(record)?;
        self.backend.set(&keys::draft_key(id), raw)
    }

    pub fn write_payload(&mut self, id: &str, data: impl Into<String>) -> Result<(), StoreError> {
        self.backend.set(&keys::payload_key(id), data.into())
    }

    /// Drop the draft and its payload. Absent entries are not an error.
    ///
    /// The payload goes first: a failure part way leaves at worst a draft
    /// without its payload, never a payload without its draft.
    pub fn remove(&mut self, id: &str) -> Result<(), StoreError> {
        debug!(id, "overlay remove");
        self.backend.remove(&keys::payload_key(id))?;
        self.backend.remove(&keys::draft_key(id))
    }

    /// Payloads whose owning draft no longer exists.
    pub fn orphan_payloads(&self) -> Vec<String> {
        let all = self.backend.keys();
        all.iter()
            .filter_map(|key| keys::payload_owner(key))
            .filter(|id| !all.contains(&keys::draft_key(id)))
            .map(str::to_string)
            .collect()
    }

    /// Remove every orphaned payload; returns the identifiers swept.
    pub fn sweep_orphan_payloads(&mut self) -> Result<Vec<String>, StoreError> {
        let orphans = self.orphan_payloads();
        for id in &orphans {
            self.backend.remove(&keys::payload_key(id))?;
        }
        Ok(orphans)
    }

    // -- site configuration draft -------------------------------------------

    pub fn read_config(&self) -> Option<DraftParse<SiteDocument>> {
        self.backend
            .get(SITE_CONFIG_KEY)
            .map(|raw| DraftParse::parse(&raw))
    }

    pub fn write_config(&mut self, doc: &SiteDocument) -> Result<(), StoreError> {
        let raw = to_json(doc)?;
        self.backend.set(SITE_CONFIG_KEY, raw)
    }

    pub fn remove_config(&mut self) -> Result<(), StoreError> {
        debug!("overlay remove site config");
        self.backend.remove(SITE_CONFIG_KEY)
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|e| StoreError::Serialize(e.to_string()))
}
