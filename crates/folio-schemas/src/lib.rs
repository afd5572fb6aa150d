//! folio-schemas
//!
//! Catalog record and site configuration shapes shared by every folio crate.
//!
//! Records are kept as JSON objects rather than fixed structs: hosted and
//! drafted copies of the same entry are compared key-for-key, so a record must
//! carry exactly the keys it was published or drafted with. The typed views
//! ([`PdfEntry`], [`SiteConfig`]) exist for display and are derived on demand.

mod record;
mod site;

pub use record::{PdfEntry, Record};
pub use site::{Colors, SiteConfig, SiteDocument};

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Key under which the last-modified timestamp is published.
pub const LAST_MODIFIED_KEY: &str = "_lastModified";

/// Older documents spell the timestamp without the leading underscore.
pub const LAST_MODIFIED_ALIAS: &str = "lastModified";

fn str_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str)
}

/// Collect the string members of an array field. Non-string members are skipped.
fn str_list<'a>(map: &'a Map<String, Value>, key: &str) -> Vec<&'a str> {
    match map.get(key) {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

fn last_modified(map: &Map<String, Value>) -> Option<DateTime<Utc>> {
    let raw = str_field(map, LAST_MODIFIED_KEY).or_else(|| str_field(map, LAST_MODIFIED_ALIAS))?;
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
