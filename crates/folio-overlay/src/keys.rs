//! Overlay key naming. These strings are shared with the browser front end and
//! must not change.

/// Prefix of every catalog draft key.
pub const DRAFT_PREFIX: &str = "draft:pdfs:";

/// Suffix that turns a draft key into its payload key.
pub const PAYLOAD_SUFFIX: &str = ":file";

/// Key of the single site configuration draft.
pub const SITE_CONFIG_KEY: &str = "draft:site-config";

pub fn draft_key(id: &str) -> String {
    format!("{DRAFT_PREFIX}{id}")
}

pub fn payload_key(id: &str) -> String {
    format!("{DRAFT_PREFIX}{id}{PAYLOAD_SUFFIX}")
}

/// Identifier of a textual draft key. Payload keys and foreign keys yield `None`.
pub fn draft_id(key: &str) -> Option<&str> {
    if key.ends_with(PAYLOAD_SUFFIX) {
        return None;
    }
    key.strip_prefix(DRAFT_PREFIX).filter(|id| !id.is_empty())
}

/// Identifier owning a payload key.
pub fn payload_owner(key: &str) -> Option<&str> {
    key.strip_prefix(DRAFT_PREFIX)?
        .strip_suffix(PAYLOAD_SUFFIX)
        .filter(|id| !id.is_empty())
}
