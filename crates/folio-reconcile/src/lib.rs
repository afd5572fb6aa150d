//! folio-reconcile
//!
//! Draft / hosted reconciliation.
//!
//! Decisions:
//! - Hosted order is authoritative; local-only drafts are appended.
//! - A draft structurally equal to hosted with no payload is garbage and is
//!   purged on sight.
//! - A payload alone keeps the local composite alive.
//! - Unparseable drafts are ignored, never fatal.
//! - A draft joins by the identifier it is stored under and always carries it
//!   as `slug`; one carrying a different slug is ignored like an unparseable one.
//! - Site configuration: local wins outright when it differs.
//!
//! [`merge_catalog`] and [`merge_site`] are pure over their inputs except for
//! purging the overlay. [`Reconciler`] adds the hosted fetch in front of them.

mod catalog;
mod editor;
mod engine;
mod equality;
mod site;
mod types;

pub use catalog::merge_catalog;
pub use editor::{DraftEditor, StageError};
pub use engine::Reconciler;
pub use equality::structurally_equal;
pub use site::merge_site;
pub use types::*;
