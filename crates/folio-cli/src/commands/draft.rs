//! `folio draft ...` handlers.

use anyhow::{Context, Result};
use folio_config::BrowserConfig;
use folio_overlay::DraftParse;
use folio_reconcile::{DraftEditor, SiteDecision};
use folio_schemas::{Record, SiteDocument};
use std::path::Path;

use super::{load_object, open_overlay, reconciler};

pub fn put(cfg: &BrowserConfig, slug: &str, json: Option<String>, file: Option<String>) -> Result<()> {
    let record = Record::from_value(load_object(json, file)?).context("input must be a JSON object")?;

    let mut overlay = open_overlay(cfg)?;
    DraftEditor::new(&mut overlay).stage_record(slug, &record)?;
    println!("staged=true slug={}", slug);
    Ok(())
}

pub async fn attach(cfg: &BrowserConfig, slug: &str, path: &str) -> Result<()> {
    let mut rec = reconciler(cfg)?;
    rec.attach_file(slug, Path::new(path))
        .await
        .with_context(|| format!("failed to attach {path} to '{slug}'"))?;
    println!("attached=true slug={} path={}", slug, path);
    Ok(())
}

pub fn rm(cfg: &BrowserConfig, slug: &str) -> Result<()> {
    let mut overlay = open_overlay(cfg)?;
    let existed = overlay.has_draft(slug) || overlay.read_payload(slug).is_some();
    DraftEditor::new(&mut overlay).discard(slug)?;
    println!("removed={} slug={}", existed, slug);
    Ok(())
}

pub fn ls(cfg: &BrowserConfig) -> Result<()> {
    let overlay = open_overlay(cfg)?;

    for (id, parsed) in overlay.read_all() {
        let attached = overlay.read_payload(&id).is_some();
        match parsed {
            DraftParse::Parsed(_) => {
                println!("draft={} parsed=true attached={}", id, attached)
            }
            DraftParse::Unparseable { reason } => {
                println!("draft={} parsed=false attached={} reason={:?}", id, attached, reason)
            }
        }
    }
    for id in overlay.orphan_payloads() {
        println!("orphan_attachment={}", id);
    }
    match overlay.read_config() {
        Some(DraftParse::Parsed(_)) => println!("site_draft=present"),
        Some(DraftParse::Unparseable { .. }) => println!("site_draft=unparseable"),
        None => {}
    }
    Ok(())
}

/// One reconciliation pass over both engines, then an orphan sweep.
///
/// A failed hosted fetch aborts before anything is removed.
pub async fn gc(cfg: &BrowserConfig) -> Result<()> {
    let mut rec = reconciler(cfg)?;

    let catalog = rec
        .reconcile_catalog()
        .await
        .context("failed to load hosted catalog")?;
    let site = rec
        .reconcile_config()
        .await
        .context("failed to load hosted site config")?;
    let swept = rec
        .overlay_mut()
        .sweep_orphan_payloads()
        .context("failed to sweep orphaned attachments")?;

    let faults = catalog.report.store_faults.len() + usize::from(site.store_fault.is_some());
    println!(
        "purged={} site_purged={} orphans_swept={} store_faults={}",
        catalog.report.purged().len(),
        site.decision == SiteDecision::Purged,
        swept.len(),
        faults
    );
    if faults > 0 {
        anyhow::bail!("{faults} overlay write(s) failed during gc");
    }
    Ok(())
}

pub fn site(cfg: &BrowserConfig, json: Option<String>, file: Option<String>) -> Result<()> {
    let doc = SiteDocument::from_value(load_object(json, file)?)
        .context("input must be a JSON object")?;
    let mut overlay = open_overlay(cfg)?;
    DraftEditor::new(&mut overlay).stage_site(&doc)?;
    println!("site_staged=true");
    Ok(())
}

pub fn site_rm(cfg: &BrowserConfig) -> Result<()> {
    let mut overlay = open_overlay(cfg)?;
    DraftEditor::new(&mut overlay).discard_site()?;
    println!("site_removed=true");
    Ok(())
}
