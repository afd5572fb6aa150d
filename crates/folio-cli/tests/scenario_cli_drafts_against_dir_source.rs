//! `folio` end to end against a local publish directory.
//!
//! Each test gets its own temp dir holding the hosted files and the overlay
//! file; the binary runs with that dir as its working directory so no stray
//! `.env.local` is picked up.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let publish = dir.path().join("publish");
        std::fs::create_dir_all(&publish).unwrap();
        std::fs::write(
            publish.join("pdf-index.json"),
            json!([
                { "slug": "clair-de-lune", "title": "Clair de Lune", "file": "/pdfs/clair.pdf", "tags": ["piano"] },
                { "slug": "canon-in-d", "title": "Canon in D", "file": "/pdfs/canon.pdf", "tags": ["strings"] }
            ])
            .to_string(),
        )
        .unwrap();
        std::fs::write(
            publish.join("site-config.json"),
            json!({ "title": "Hosted Collection", "description": "Scores" }).to_string(),
        )
        .unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn overlay_path(&self) -> PathBuf {
        self.path().join("state").join("overlay.json")
    }

    fn folio(&self) -> Command {
        let mut cmd = Command::cargo_bin("folio").unwrap();
        cmd.current_dir(self.path())
            .env("FOLIO_HOSTED_BASE", self.path().join("publish"))
            .env("FOLIO_OVERLAY_PATH", self.overlay_path())
            .env_remove("RUST_LOG");
        cmd
    }

    fn catalog_json(&self) -> Vec<Value> {
        let out = self.folio().args(["catalog", "--json"]).output().unwrap();
        assert!(out.status.success(), "catalog failed: {out:?}");
        serde_json::from_slice(&out.stdout).unwrap()
    }
}

#[test]
fn put_ls_rm_round_trip() {
    let fx = Fixture::new();

    fx.folio()
        .args(["draft", "put", "new-piece", "--json", r#"{"title":"New Piece"}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("staged=true slug=new-piece"));

    fx.folio()
        .args(["draft", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("draft=new-piece parsed=true attached=false"));

    fx.folio()
        .args(["draft", "rm", "new-piece"])
        .assert()
        .success()
        .stdout(predicate::str::contains("removed=true"));

    fx.folio()
        .args(["draft", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("draft=").not());
}

#[test]
fn put_rejects_non_object_and_slug_mismatch() {
    let fx = Fixture::new();

    fx.folio()
        .args(["draft", "put", "a", "--json", "[1,2]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON object"));

    fx.folio()
        .args(["draft", "put", "a", "--json", r#"{"slug":"b"}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("carries slug 'b'"));

    assert!(!fx.overlay_path().exists());
}

#[test]
fn catalog_merges_drafts_over_directory_source() {
    let fx = Fixture::new();

    fx.folio()
        .args([
            "draft",
            "put",
            "canon-in-d",
            "--json",
            r#"{"slug":"canon-in-d","title":"Canon in D (arr.)","tags":["strings"]}"#,
        ])
        .assert()
        .success();
    fx.folio()
        .args(["draft", "put", "local-etude", "--json", r#"{"title":"Etude"}"#])
        .assert()
        .success();

    let records = fx.catalog_json();
    assert_eq!(records.len(), 3);
    assert_eq!(records[1]["title"], "Canon in D (arr.)");
    // Hosted file reference fills in under a draft with none.
    assert_eq!(records[1]["file"], "/pdfs/canon.pdf");
    assert_eq!(records[2]["slug"], "local-etude");

    fx.folio()
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("slug=clair-de-lune").and(predicate::str::contains("source=hosted")))
        .stdout(predicate::str::contains("source=draft"))
        .stdout(predicate::str::contains("slug=local-etude").and(predicate::str::contains("source=local")));
}

#[test]
fn identical_draft_is_collected_by_catalog_read() {
    let fx = Fixture::new();

    fx.folio()
        .args([
            "draft",
            "put",
            "clair-de-lune",
            "--json",
            r#"{"slug":"clair-de-lune","title":"Clair de Lune","file":"/pdfs/clair.pdf","tags":["piano"]}"#,
        ])
        .assert()
        .success();

    assert_eq!(fx.catalog_json().len(), 2);

    fx.folio()
        .args(["draft", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn attach_seeds_draft_and_embeds_file() {
    let fx = Fixture::new();
    let pdf = fx.path().join("local.pdf");
    std::fs::write(&pdf, b"%PDF").unwrap();

    fx.folio()
        .args(["draft", "attach", "clair-de-lune"])
        .arg(&pdf)
        .assert()
        .success();

    let records = fx.catalog_json();
    assert_eq!(records[0]["file"], "data:application/pdf;base64,JVBERg==");
    assert_eq!(records[0]["title"], "Clair de Lune");

    fx.folio()
        .args(["show", "clair-de-lune"])
        .assert()
        .success()
        .stdout(predicate::str::contains("file=<attached>"));
}

#[test]
fn show_unknown_slug_fails() {
    let fx = Fixture::new();
    fx.folio()
        .args(["show", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no catalog entry with slug 'nope'"));
}

#[test]
fn site_draft_wins_until_removed() {
    let fx = Fixture::new();

    fx.folio()
        .args(["draft", "site", "--json", r#"{"title":"My Local Collection"}"#])
        .assert()
        .success();
    fx.folio()
        .arg("site")
        .assert()
        .success()
        .stdout(predicate::str::contains("title=\"My Local Collection\""))
        .stdout(predicate::str::contains("source=local"))
        .stdout(predicate::str::contains("color_accent=#4f46e5"));

    fx.folio().args(["draft", "site-rm"]).assert().success();
    fx.folio()
        .arg("site")
        .assert()
        .success()
        .stdout(predicate::str::contains("title=\"Hosted Collection\""))
        .stdout(predicate::str::contains("source=hosted"));
}

#[test]
fn gc_purges_redundant_and_orphaned_entries() {
    let fx = Fixture::new();
    std::fs::create_dir_all(fx.overlay_path().parent().unwrap()).unwrap();
    std::fs::write(
        fx.overlay_path(),
        json!({
            "draft:pdfs:canon-in-d": r#"{"slug":"canon-in-d","title":"Canon in D","file":"/pdfs/canon.pdf","tags":["strings"]}"#,
            "draft:pdfs:gone:file": "data:application/pdf;base64,AA==",
            "draft:site-config": r#"{"title":"Hosted Collection","description":"Scores"}"#
        })
        .to_string(),
    )
    .unwrap();

    fx.folio()
        .args(["draft", "gc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("purged=1 site_purged=true orphans_swept=1 store_faults=0"));

    let left: Value =
        serde_json::from_str(&std::fs::read_to_string(fx.overlay_path()).unwrap()).unwrap();
    assert_eq!(left, json!({}));
}

#[test]
fn missing_publish_dir_fails_and_keeps_overlay() {
    let fx = Fixture::new();
    fx.folio()
        .args(["draft", "put", "x", "--json", "{}"])
        .assert()
        .success();
    let before = std::fs::read_to_string(fx.overlay_path()).unwrap();

    fx.folio()
        .env("FOLIO_HOSTED_BASE", fx.path().join("does-not-exist"))
        .arg("catalog")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load hosted catalog"));

    assert_eq!(std::fs::read_to_string(fx.overlay_path()).unwrap(), before);
}

#[test]
fn layered_config_file_selects_sources() {
    let fx = Fixture::new();
    let cfg = fx.path().join("folio.yaml");
    std::fs::write(
        &cfg,
        format!(
            "hosted:\n  base: {:?}\noverlay:\n  path: {:?}\nextra: 1\n",
            fx.path().join("publish").display().to_string(),
            fx.path().join("cfg-overlay.json").display().to_string(),
        ),
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("folio").unwrap();
    cmd.current_dir(fx.path())
        .env_remove("FOLIO_HOSTED_BASE")
        .env_remove("FOLIO_OVERLAY_PATH")
        .arg("--config")
        .arg(&cfg)
        .args(["draft", "put", "via-config", "--json", "{}"])
        .assert()
        .success()
        .stderr(predicate::str::contains("unused=/extra"));

    assert!(fx.path().join("cfg-overlay.json").exists());
}

#[test]
fn misspelled_config_section_key_fails_before_touching_the_overlay() {
    let fx = Fixture::new();
    let cfg = fx.path().join("folio.yaml");
    std::fs::write(&cfg, "overlay:\n  pth: elsewhere.json\n").unwrap();

    fx.folio()
        .arg("--config")
        .arg(&cfg)
        .args(["draft", "put", "x", "--json", "{}"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid browser config"));
    assert!(!fx.overlay_path().exists());
}

#[test]
fn catalog_tags_only_the_slot_a_draft_replaced() {
    let fx = Fixture::new();
    std::fs::write(
        fx.path().join("publish").join("pdf-index.json"),
        json!([
            { "slug": "dup", "title": "First" },
            { "slug": "dup", "title": "Second" }
        ])
        .to_string(),
    )
    .unwrap();
    fx.folio()
        .args(["draft", "put", "dup", "--json", r#"{"title":"Draft"}"#])
        .assert()
        .success();

    let out = fx.folio().arg("catalog").output().unwrap();
    assert!(out.status.success(), "catalog failed: {out:?}");
    let stdout = String::from_utf8(out.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains(r#"title="Draft""#) && lines[0].ends_with("source=draft"));
    assert!(lines[1].contains(r#"title="Second""#) && lines[1].ends_with("source=hosted"));
}

#[test]
fn catalog_warns_about_draft_stored_under_another_slug() {
    let fx = Fixture::new();
    std::fs::create_dir_all(fx.overlay_path().parent().unwrap()).unwrap();
    std::fs::write(
        fx.overlay_path(),
        json!({ "draft:pdfs:x": r#"{"slug":"canon-in-d","title":"Hijack"}"# }).to_string(),
    )
    .unwrap();

    fx.folio()
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("Hijack").not())
        .stderr(predicate::str::contains("draft x ignored: carries slug 'canon-in-d'"));
    assert_eq!(fx.catalog_json().len(), 2);
}
