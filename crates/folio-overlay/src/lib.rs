//! folio-overlay
//!
//! Local draft storage: the only mutable state the reconciliation engine
//! touches.
//!
//! - Drafts live under `draft:pdfs:<slug>`, payloads under `draft:pdfs:<slug>:file`,
//!   the site configuration draft under `draft:site-config`.
//! - Values are JSON text. Entries that fail to parse are reported as
//!   [`DraftParse::Unparseable`], never as errors.
//! - Removal is idempotent and always takes the payload with the draft.
//!
//! The store is generic over an [`OverlayBackend`] so reconciliation can run
//! against an in-memory map in tests and a JSON file on disk in the CLI.

mod backend;
pub mod keys;
pub mod payload;
mod store;

pub use backend::{FileBackend, MemoryBackend, OverlayBackend, StoreError};
pub use payload::{encode_data_uri, encode_file, mime_for_path, EncodeError};
pub use store::{DraftParse, OverlayStore};
