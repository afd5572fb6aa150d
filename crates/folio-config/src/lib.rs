//! folio-config
//!
//! Layered YAML configuration for the catalog browser.
//!
//! A config file has two sections, `hosted` and `overlay`. Layers apply in
//! order and, inside a section, a later layer replaces single keys: a local
//! file can point `hosted.base` at a build directory and keep the shared
//! `hosted.timeout_secs`. Keys outside the two sections are never read; they
//! are collected so a misspelled section surfaces instead of doing nothing.
//! [`BrowserConfig`] is the typed view the CLI consumes.

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

mod browser;

pub use browser::{
    BrowserConfig, HostedConfig, OverlayConfig, ENV_HOSTED_BASE, ENV_OVERLAY_PATH,
};

/// Top-level sections read by [`BrowserConfig`].
pub const SECTIONS: &[&str] = &["hosted", "overlay"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedKeyPolicy {
    Warn,
    Fail,
}

/// Every layer folded together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedConfig {
    /// Only the sections some layer set, each a mapping.
    pub sections: Map<String, Value>,
    /// JSON pointers of the leaves outside [`SECTIONS`], sorted.
    pub unused: Vec<String>,
}

impl LoadedConfig {
    pub fn section(&self, name: &str) -> Option<&Map<String, Value>> {
        self.sections.get(name).and_then(Value::as_object)
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.sections.clone())
    }

    /// Log each unused key (`Warn`) or refuse the config (`Fail`).
    pub fn check_unused(&self, policy: UnusedKeyPolicy) -> Result<()> {
        if self.unused.is_empty() {
            return Ok(());
        }
        match policy {
            UnusedKeyPolicy::Fail => bail!(
                "CONFIG_UNUSED_KEYS: {} key(s) outside {:?}: {:?}",
                self.unused.len(),
                SECTIONS,
                self.unused.iter().take(12).collect::<Vec<_>>()
            ),
            UnusedKeyPolicy::Warn => {
                for leaf in &self.unused {
                    tracing::warn!(leaf = %leaf, "unused config key");
                }
            }
        }
        Ok(())
    }
}

pub fn load_layered_yaml<P: AsRef<Path>>(paths: &[P]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let p = p.as_ref();
        let raw = fs::read_to_string(p)
            .with_context(|| format!("failed to read config file: {}", p.display()))?;
        docs.push(raw);
    }

    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut loaded = LoadedConfig::default();
    let mut outside: Map<String, Value> = Map::new();

    for (i, raw) in yaml_docs.iter().enumerate() {
        let Some(layer) = parse_layer(raw).with_context(|| format!("config layer {}", i + 1))?
        else {
            continue;
        };
        for (key, value) in layer {
            if SECTIONS.contains(&key.as_str()) {
                merge_section(&mut loaded.sections, &key, value)?;
            } else {
                outside.insert(key, value);
            }
        }
    }

    for (key, value) in &outside {
        collect_leaf_pointers(value, &format!("/{}", escape_pointer_token(key)), &mut loaded.unused);
    }
    loaded.unused.sort();
    Ok(loaded)
}

/// One YAML document as a mapping. Empty and comment-only documents are
/// `None`.
fn parse_layer(raw: &str) -> Result<Option<Map<String, Value>>> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
    match serde_json::to_value(yaml).context("yaml->json conversion failed")? {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map)),
        _ => bail!("config layer must be a YAML mapping"),
    }
}

fn merge_section(sections: &mut Map<String, Value>, name: &str, value: Value) -> Result<()> {
    let incoming = match value {
        // `hosted:` with nothing under it
        Value::Null => return Ok(()),
        Value::Object(map) => map,
        _ => bail!("config section '{name}' must be a mapping"),
    };
    let slot = sections
        .entry(name.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if let Value::Object(existing) = slot {
        existing.extend(incoming);
    }
    Ok(())
}

fn collect_leaf_pointers(v: &Value, prefix: &str, out: &mut Vec<String>) {
    match v {
        Value::Object(map) if !map.is_empty() => {
            for (k, vv) in map {
                collect_leaf_pointers(vv, &format!("{}/{}", prefix, escape_pointer_token(k)), out);
            }
        }
        Value::Array(arr) if !arr.is_empty() => {
            for (i, vv) in arr.iter().enumerate() {
                collect_leaf_pointers(vv, &format!("{}/{}", prefix, i), out);
            }
        }
        _ => out.push(prefix.to_string()),
    }
}

fn escape_pointer_token(s: &str) -> String {
    s.replace('~', "~0").replace('/', "~1")
}
