use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{last_modified, str_field};

/// The site configuration object, exactly as published or drafted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteDocument(Map<String, Value>);

impl SiteDocument {
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Wrap a JSON value. Only objects are site documents.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    pub fn title(&self) -> Option<&str> {
        str_field(&self.0, "title")
    }

    pub fn description(&self) -> Option<&str> {
        str_field(&self.0, "description")
    }

    /// Look up a theme colour by name (`background`, `surface`, `text`, `accent`).
    ///
    /// Reads the nested `colors` object first and falls back to the flat
    /// `color-<name>` keys used by older site configs.
    pub fn color(&self, name: &str) -> Option<&str> {
        self.0
            .get("colors")
            .and_then(Value::as_object)
            .and_then(|colors| str_field(colors, name))
            .or_else(|| str_field(&self.0, &format!("color-{name}")))
    }

    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        last_modified(&self.0)
    }
}

/// Theme colours. Values are CSS colour strings and are not interpreted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Colors {
    pub background: String,
    pub surface: String,
    pub text: String,
    pub accent: String,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            surface: "#ffffff".to_string(),
            text: "#1f2937".to_string(),
            accent: "#4f46e5".to_string(),
        }
    }
}

/// Typed view of a [`SiteDocument`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
    pub colors: Colors,
    #[serde(rename = "_lastModified", skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

impl From<&SiteDocument> for SiteConfig {
    fn from(doc: &SiteDocument) -> Self {
        let defaults = Colors::default();
        let color = |name: &str, fallback: String| doc.color(name).map(str::to_string).unwrap_or(fallback);

        Self {
            title: doc.title().unwrap_or_default().to_string(),
            description: doc.description().unwrap_or_default().to_string(),
            colors: Colors {
                background: color("background", defaults.background),
                surface: color("surface", defaults.surface),
                text: color("text", defaults.text),
                accent: color("accent", defaults.accent),
            },
            last_modified: doc.last_modified().map(|ts| ts.to_rfc3339()),
        }
    }
}
