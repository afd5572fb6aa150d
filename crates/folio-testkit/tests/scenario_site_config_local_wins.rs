//! Scenario: the single site-configuration draft.
//!
//! Local wins outright when it differs from hosted, regardless of which side
//! carries the later `_lastModified`. Equal drafts are purged; unreadable
//! drafts are ignored and left in place.

use folio_reconcile::{Reconciler, SiteDecision};
use folio_schemas::SiteConfig;
use folio_testkit::{memory_overlay, sample_site, site, StaticSource};
use serde_json::json;

const KEY: &str = "draft:site-config";

#[tokio::test]
async fn absent_draft_returns_hosted() {
    let source = StaticSource::default().with_site(sample_site());
    let mut rec = Reconciler::new(source, memory_overlay(&[]));

    let merge = rec.reconcile_config().await.unwrap();
    assert_eq!(merge.decision, SiteDecision::Hosted);
    assert_eq!(merge.config, sample_site());
}

#[tokio::test]
async fn equal_draft_is_purged() {
    let raw = serde_json::to_string(&sample_site()).unwrap();
    let source = StaticSource::default().with_site(sample_site());
    let mut rec = Reconciler::new(source, memory_overlay(&[(KEY, raw.as_str())]));

    let merge = rec.reconcile_config().await.unwrap();
    assert_eq!(merge.decision, SiteDecision::Purged);
    assert!(merge.store_fault.is_none());
    assert!(rec.overlay().read_config().is_none());
}

#[tokio::test]
async fn newer_local_draft_wins() {
    let local = r##"{
        "title": "Updated Collection",
        "description": "A collection of musical scores and arrangements.",
        "colors": { "background": "#000000", "surface": "#111111", "text": "#eeeeee", "accent": "#4f46e5" },
        "_lastModified": "2024-03-21T10:00:00.000Z"
    }"##;
    let source = StaticSource::default().with_site(sample_site());
    let mut rec = Reconciler::new(source, memory_overlay(&[(KEY, local)]));

    let doc = rec.load_merged_config().await.unwrap();
    let typed = SiteConfig::from(&doc);
    assert_eq!(typed.title, "Updated Collection");
    assert_eq!(typed.colors.background, "#000000");
    assert!(rec.overlay().read_config().is_some());
}

#[tokio::test]
async fn older_local_draft_still_wins() {
    let local = r#"{"title":"Old Local","_lastModified":"2020-01-01T00:00:00.000Z"}"#;
    let source = StaticSource::default().with_site(sample_site());
    let mut rec = Reconciler::new(source, memory_overlay(&[(KEY, local)]));

    let merge = rec.reconcile_config().await.unwrap();
    assert_eq!(merge.decision, SiteDecision::Local);
    assert_eq!(merge.config, site(json!({
        "title": "Old Local",
        "_lastModified": "2020-01-01T00:00:00.000Z"
    })));
}

#[tokio::test]
async fn corrupt_draft_falls_back_to_hosted_and_stays() {
    let source = StaticSource::default().with_site(sample_site());
    let mut rec = Reconciler::new(source, memory_overlay(&[(KEY, "invalid-json")]));

    let merge = rec.reconcile_config().await.unwrap();
    assert!(matches!(merge.decision, SiteDecision::Unparseable { .. }));
    assert_eq!(merge.config, sample_site());
    assert!(rec.overlay().backend().contains_key(KEY));
}

#[tokio::test]
async fn fetch_failure_leaves_draft_alone() {
    let raw = serde_json::to_string(&sample_site()).unwrap();
    let source = StaticSource::default().with_site(sample_site());
    source.set_failing(true);
    let mut rec = Reconciler::new(source, memory_overlay(&[(KEY, raw.as_str())]));

    assert!(rec.load_merged_config().await.is_err());
    assert!(rec.overlay().backend().contains_key(KEY));
}

#[tokio::test]
async fn site_draft_does_not_leak_into_catalog() {
    let source = StaticSource::default().with_site(sample_site());
    let mut rec = Reconciler::new(
        source,
        memory_overlay(&[(KEY, r#"{"title":"Local"}"#)]),
    );

    let catalog = rec.load_merged_catalog().await.unwrap();
    assert!(catalog.is_empty());
    assert!(rec.overlay().backend().contains_key(KEY));
}
