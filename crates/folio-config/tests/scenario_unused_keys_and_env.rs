//! Unused-key report and environment overrides.

use std::collections::HashMap;
use std::path::PathBuf;

use folio_config::{
    load_layered_yaml_from_strings, BrowserConfig, UnusedKeyPolicy, ENV_HOSTED_BASE,
    ENV_OVERLAY_PATH,
};

const YAML_WITH_EXTRAS: &str = r#"
hosted:
  base: "https://scores.example.org"
overlay:
  path: "drafts.json"
theme:
  dark: true
hostedx: 1
"#;

#[test]
fn keys_outside_the_sections_are_reported() {
    let loaded = load_layered_yaml_from_strings(&[YAML_WITH_EXTRAS]).unwrap();
    assert_eq!(loaded.unused, vec!["/hostedx", "/theme/dark"]);
    loaded.check_unused(UnusedKeyPolicy::Warn).unwrap();

    // The typed view still loads: unused keys never reach it.
    let cfg = BrowserConfig::from_loaded(&loaded).unwrap();
    assert_eq!(cfg.overlay.path, PathBuf::from("drafts.json"));
}

#[test]
fn fail_mode_errors_on_unused_keys() {
    let loaded = load_layered_yaml_from_strings(&[YAML_WITH_EXTRAS]).unwrap();
    let err = loaded.check_unused(UnusedKeyPolicy::Fail).unwrap_err();
    assert!(err.to_string().contains("CONFIG_UNUSED_KEYS"));
    assert!(err.to_string().contains("/theme/dark"));
}

#[test]
fn later_layer_replaces_an_unused_key() {
    let loaded =
        load_layered_yaml_from_strings(&[YAML_WITH_EXTRAS, "theme: light
hostedx: 2
"]).unwrap();
    assert_eq!(loaded.unused, vec!["/hostedx", "/theme"]);
}

#[test]
fn env_overrides_replace_base_and_overlay_path() {
    let loaded = load_layered_yaml_from_strings(&[YAML_WITH_EXTRAS]).unwrap();
    let env: HashMap<&str, &str> = [
        (ENV_HOSTED_BASE, "/srv/publish"),
        (ENV_OVERLAY_PATH, "/tmp/drafts.json"),
    ]
    .into_iter()
    .collect();

    let cfg = BrowserConfig::from_loaded(&loaded)
        .unwrap()
        .with_overrides_from(|k| env.get(k).map(|v| v.to_string()))
        .unwrap();

    assert_eq!(cfg.hosted.base, "/srv/publish");
    assert!(!cfg.hosted.is_http());
    assert_eq!(cfg.overlay.path, PathBuf::from("/tmp/drafts.json"));
}

#[test]
fn blank_env_values_are_ignored() {
    let cfg = BrowserConfig::default()
        .with_overrides_from(|k| (k == ENV_HOSTED_BASE).then(|| "  ".to_string()))
        .unwrap();
    assert_eq!(cfg, BrowserConfig::default());
}
