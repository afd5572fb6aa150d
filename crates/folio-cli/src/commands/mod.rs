//! Command handler modules for the `folio` binary.
//!
//! Shared wiring (config, hosted source, overlay) lives here; each submodule
//! holds one command family.

pub mod draft;
pub mod view;

use anyhow::{Context, Result};
use folio_config::{BrowserConfig, UnusedKeyPolicy};
use folio_hosted::{DirSource, HostedSource, HttpSource};
use folio_overlay::{FileBackend, OverlayStore};
use folio_reconcile::Reconciler;
use folio_schemas::Record;
use serde_json::Value;
use std::fs;

pub type CliReconciler = Reconciler<Box<dyn HostedSource>, FileBackend>;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Layered YAML (if any paths were given) → typed config → env overrides.
pub fn load_browser_config(config_paths: &[String]) -> Result<BrowserConfig> {
    let cfg = if config_paths.is_empty() {
        BrowserConfig::default()
    } else {
        let loaded = folio_config::load_layered_yaml(config_paths)?;

        loaded.check_unused(UnusedKeyPolicy::Warn)?;
        if !loaded.unused.is_empty() {
            eprintln!("WARN: CONFIG_UNUSED_KEYS unused_leaf_keys={}", loaded.unused.len());
            for p in loaded.unused.iter().take(50) {
                eprintln!("  unused={}", p);
            }
        }

        tracing::debug!(layers = config_paths.len(), "config loaded");
        BrowserConfig::from_loaded(&loaded)?
    };

    cfg.with_env_overrides()
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

/// HTTP for `http(s)://` bases, otherwise a local publish directory.
pub fn hosted_source(cfg: &BrowserConfig) -> Result<Box<dyn HostedSource>> {
    let h = &cfg.hosted;
    if h.is_http() {
        let src = HttpSource::with_paths(&h.base, &h.catalog_path, &h.config_path, h.timeout())
            .context("failed to build http source")?;
        Ok(Box::new(src))
    } else {
        Ok(Box::new(DirSource::with_paths(
            &h.base,
            &h.catalog_path,
            &h.config_path,
        )))
    }
}

pub fn open_overlay(cfg: &BrowserConfig) -> Result<OverlayStore<FileBackend>> {
    let backend = FileBackend::open(&cfg.overlay.path)
        .with_context(|| format!("failed to open overlay: {}", cfg.overlay.path.display()))?;
    Ok(OverlayStore::new(backend))
}

pub fn reconciler(cfg: &BrowserConfig) -> Result<CliReconciler> {
    Ok(Reconciler::new(hosted_source(cfg)?, open_overlay(cfg)?))
}

// ---------------------------------------------------------------------------
// Input helpers
// ---------------------------------------------------------------------------

/// Read a JSON object from `--json <text>` or `--file <path>`.
pub fn load_object(json: Option<String>, file: Option<String>) -> Result<Value> {
    let raw = match (json, file) {
        (Some(text), None) => text,
        (None, Some(path)) => {
            fs::read_to_string(&path).with_context(|| format!("failed to read json file: {path}"))?
        }
        _ => anyhow::bail!("exactly one of --json or --file is required"),
    };

    let v: Value = serde_json::from_str(&raw).context("input is not valid JSON")?;
    if !v.is_object() {
        anyhow::bail!("input must be a JSON object");
    }
    Ok(v)
}

/// One-line `key=value` rendering of a record.
pub fn record_line(r: &Record) -> String {
    let file = if r.has_embedded_file() {
        "<attached>".to_string()
    } else {
        r.file().unwrap_or("-").to_string()
    };
    format!(
        "slug={} title={:?} file={}",
        r.slug().unwrap_or("-"),
        r.title().unwrap_or(""),
        file
    )
}
