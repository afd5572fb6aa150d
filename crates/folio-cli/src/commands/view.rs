//! Read-side commands: `catalog`, `show`, `site`.
//!
//! Every read runs a full reconciliation pass, so redundant drafts are
//! collected as a side effect of viewing.

use anyhow::{Context, Result};
use folio_config::BrowserConfig;
use folio_reconcile::{DraftDecision, RecordSource, SiteDecision};
use folio_schemas::SiteConfig;

use super::{reconciler, record_line};

pub async fn catalog(cfg: &BrowserConfig, json: bool) -> Result<()> {
    let mut rec = reconciler(cfg)?;
    let merge = rec
        .reconcile_catalog()
        .await
        .context("failed to load hosted catalog")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&merge.records)?);
        return Ok(());
    }

    for (r, source) in merge.tagged() {
        let tag = match source {
            RecordSource::Drafted => "draft",
            RecordSource::LocalOnly => "local",
            RecordSource::Hosted => "hosted",
        };
        println!("{} source={}", record_line(r), tag);
    }
    for (id, d) in &merge.report.decisions {
        match d {
            DraftDecision::Unparseable { reason } => {
                eprintln!("WARN: draft {} ignored: {}", id, reason)
            }
            DraftDecision::SlugMismatch { slug } => {
                eprintln!("WARN: draft {} ignored: carries slug '{}'", id, slug)
            }
            _ => {}
        }
    }
    Ok(())
}

pub async fn show(cfg: &BrowserConfig, slug: &str, json: bool) -> Result<()> {
    let mut rec = reconciler(cfg)?;
    let found = rec
        .find_merged(slug)
        .await
        .context("failed to load hosted catalog")?;
    let Some(r) = found else {
        anyhow::bail!("no catalog entry with slug '{slug}'");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&r)?);
        return Ok(());
    }

    println!("{}", record_line(&r));
    println!("description={:?}", r.description().unwrap_or(""));
    println!("artists={}", r.artists().join(","));
    println!("tags={}", r.tags().join(","));
    println!("genres={}", r.genres().join(","));
    println!("instruments={}", r.instruments().join(","));
    if let Some(ts) = r.last_modified() {
        println!("last_modified={}", ts.to_rfc3339());
    }
    Ok(())
}

pub async fn site(cfg: &BrowserConfig, json: bool) -> Result<()> {
    let mut rec = reconciler(cfg)?;
    let merge = rec
        .reconcile_config()
        .await
        .context("failed to load hosted site config")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&merge.config)?);
        return Ok(());
    }

    let typed = SiteConfig::from(&merge.config);
    let source = match merge.decision {
        SiteDecision::Local => "local",
        SiteDecision::Hosted | SiteDecision::Purged | SiteDecision::Unparseable { .. } => "hosted",
    };
    println!("title={:?}", typed.title);
    println!("description={:?}", typed.description);
    println!("color_background={}", typed.colors.background);
    println!("color_surface={}", typed.colors.surface);
    println!("color_text={}", typed.colors.text);
    println!("color_accent={}", typed.colors.accent);
    if let Some(ts) = &typed.last_modified {
        println!("last_modified={}", ts);
    }
    println!("source={}", source);
    Ok(())
}
