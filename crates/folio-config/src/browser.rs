use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::LoadedConfig;

pub const ENV_HOSTED_BASE: &str = "FOLIO_HOSTED_BASE";
pub const ENV_OVERLAY_PATH: &str = "FOLIO_OVERLAY_PATH";

/// Where the published catalog lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostedConfig {
    /// `http(s)://` base URL, or a local publish directory.
    pub base: String,
    pub catalog_path: String,
    pub config_path: String,
    pub timeout_secs: u64,
}

impl Default for HostedConfig {
    fn default() -> Self {
        Self {
            base: "http://localhost:5173".to_string(),
            catalog_path: "pdf-index.json".to_string(),
            config_path: "site-config.json".to_string(),
            timeout_secs: 10,
        }
    }
}

impl HostedConfig {
    pub fn is_http(&self) -> bool {
        self.base.starts_with("http://") || self.base.starts_with("https://")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Where drafts are persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayConfig {
    pub path: PathBuf,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".folio/overlay.json"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub hosted: HostedConfig,
    pub overlay: OverlayConfig,
}

impl BrowserConfig {
    /// Typed view of a merged config value. Missing keys take defaults; the
    /// sections themselves reject keys they do not know.
    pub fn from_json(config_json: &Value) -> Result<Self> {
        let cfg: BrowserConfig =
            serde_json::from_value(config_json.clone()).context("invalid browser config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Typed view of the layered sections. Unused keys are the caller's
    /// concern; see [`LoadedConfig::check_unused`].
    pub fn from_loaded(loaded: &LoadedConfig) -> Result<Self> {
        Self::from_json(&loaded.to_json())
    }

    /// Apply `FOLIO_HOSTED_BASE` / `FOLIO_OVERLAY_PATH` from the process
    /// environment.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup. Empty values are ignored.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(base) = get(ENV_HOSTED_BASE) {
            tracing::debug!(%base, "hosted base overridden from environment");
            self.hosted.base = base;
        }
        if let Some(path) = get(ENV_OVERLAY_PATH) {
            tracing::debug!(%path, "overlay path overridden from environment");
            self.overlay.path = PathBuf::from(path);
        }

        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.hosted.base.trim().is_empty() {
            bail!("hosted.base must not be empty");
        }
        if self.hosted.timeout_secs == 0 {
            bail!("hosted.timeout_secs must be positive");
        }
        if self.overlay.path.as_os_str().is_empty() {
            bail!("overlay.path must not be empty");
        }
        Ok(())
    }
}
