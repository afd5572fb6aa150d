use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{last_modified, str_field, str_list, LAST_MODIFIED_ALIAS, LAST_MODIFIED_KEY};

/// One catalog entry, exactly as published or drafted.
///
/// Serializes as the bare JSON object. Accessors return `None` / empty lists
/// for absent or mistyped fields instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Wrap a JSON value. Only objects are records.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The join key between hosted and local copies.
    pub fn slug(&self) -> Option<&str> {
        str_field(&self.0, "slug")
    }

    pub fn title(&self) -> Option<&str> {
        str_field(&self.0, "title")
    }

    pub fn description(&self) -> Option<&str> {
        str_field(&self.0, "description")
    }

    /// Content reference: a path under the hosted root or a `data:` URI.
    pub fn file(&self) -> Option<&str> {
        str_field(&self.0, "file")
    }

    pub fn artists(&self) -> Vec<&str> {
        str_list(&self.0, "artists")
    }

    pub fn tags(&self) -> Vec<&str> {
        str_list(&self.0, "tags")
    }

    pub fn genres(&self) -> Vec<&str> {
        str_list(&self.0, "genres")
    }

    pub fn instruments(&self) -> Vec<&str> {
        str_list(&self.0, "instruments")
    }

    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        last_modified(&self.0)
    }

    /// `true` when the content reference is an embedded payload.
    pub fn has_embedded_file(&self) -> bool {
        self.file().is_some_and(|f| f.starts_with("data:"))
    }

    /// Replace (or add) the content reference. All other keys are untouched.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.0.insert("file".to_string(), Value::String(file.into()));
        self
    }

    /// Set `slug`. All other keys are untouched.
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.0.insert("slug".to_string(), Value::String(slug.into()));
        self
    }
}

impl From<PdfEntry> for Record {
    fn from(entry: PdfEntry) -> Self {
        let strings = |items: Vec<String>| Value::Array(items.into_iter().map(Value::String).collect());

        let mut map = Map::new();
        map.insert("slug".to_string(), Value::String(entry.slug));
        map.insert("title".to_string(), Value::String(entry.title));
        map.insert("description".to_string(), Value::String(entry.description));
        map.insert("artists".to_string(), strings(entry.artists));
        map.insert("instruments".to_string(), strings(entry.instruments));
        map.insert("genres".to_string(), strings(entry.genres));
        map.insert("tags".to_string(), strings(entry.tags));
        map.insert("file".to_string(), Value::String(entry.file));
        if let Some(ts) = entry.last_modified {
            map.insert(LAST_MODIFIED_KEY.to_string(), Value::String(ts));
        }
        Self(map)
    }
}

/// Typed view of a [`Record`] for display. Missing fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfEntry {
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub artists: Vec<String>,
    #[serde(default)]
    pub instruments: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub file: String,
    #[serde(
        rename = "_lastModified",
        alias = "lastModified",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_modified: Option<String>,
}

impl TryFrom<&Record> for PdfEntry {
    type Error = serde_json::Error;

    fn try_from(record: &Record) -> Result<Self, Self::Error> {
        serde_json::from_value(record.to_value())
    }
}
