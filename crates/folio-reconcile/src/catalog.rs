use std::collections::HashMap;

use folio_overlay::{DraftParse, OverlayBackend, OverlayStore};
use folio_schemas::Record;
use tracing::{debug, info, warn};

use crate::equality::objects_equal;
use crate::types::{CatalogMerge, DraftDecision, MergeReport, RecordSource, StoreFault};

/// Merge the hosted catalog with every catalog draft in `overlay`.
///
/// - Hosted order is kept; local-only drafts are appended in overlay order.
/// - A draft is joined by the identifier it is stored under. A draft with no
///   `slug` takes that identifier; a draft whose `slug` names something else
///   is skipped and left in place.
/// - A draft structurally equal to its hosted record, with no payload, is
///   removed from the overlay and the hosted record is kept.
/// - Any other draft replaces its hosted record. The content reference is the
///   payload if one exists, else the draft's own `file`, else the hosted `file`.
/// - Unparseable drafts are skipped and left in place.
///
/// Store failures while purging are logged and reported; the merge continues.
pub fn merge_catalog<B: OverlayBackend>(
    hosted: Vec<Record>,
    overlay: &mut OverlayStore<B>,
) -> CatalogMerge {
    let mut sources = vec![RecordSource::Hosted; hosted.len()];
    let mut records = hosted;
    let mut report = MergeReport::default();

    // First hosted record wins when the index carries duplicate slugs.
    let mut position: HashMap<String, usize> = HashMap::new();
    for (i, rec) in records.iter().enumerate() {
        if let Some(slug) = rec.slug() {
            position.entry(slug.to_string()).or_insert(i);
        }
    }

    for (id, parsed) in overlay.read_all() {
        let draft = match parsed {
            DraftParse::Parsed(draft) => draft,
            DraftParse::Unparseable { reason } => {
                warn!(id = %id, %reason, "ignoring unparseable draft");
                report
                    .decisions
                    .push((id, DraftDecision::Unparseable { reason }));
                continue;
            }
        };

        let draft = match draft.get("slug").cloned() {
            None => draft.with_slug(id.as_str()),
            Some(v) if v.as_str() == Some(id.as_str()) => draft,
            Some(v) => {
                let slug = v.as_str().map_or_else(|| v.to_string(), str::to_string);
                warn!(id = %id, %slug, "ignoring draft stored under another slug");
                report
                    .decisions
                    .push((id, DraftDecision::SlugMismatch { slug }));
                continue;
            }
        };

        let payload = overlay.read_payload(&id);
        let with_payload = payload.is_some();

        let decision = match position.get(&id) {
            Some(&pos) => {
                let hosted = &records[pos];
                if !with_payload && objects_equal(hosted.as_map(), draft.as_map()) {
                    if let Err(e) = overlay.remove(&id) {
                        warn!(id = %id, error = %e, "failed to purge redundant draft");
                        report.store_faults.push(StoreFault {
                            id: id.clone(),
                            message: e.to_string(),
                        });
                    } else {
                        info!(id = %id, "draft matches hosted record; purged");
                    }
                    DraftDecision::Purged
                } else {
                    let file = payload
                        .or_else(|| draft.file().map(str::to_string))
                        .or_else(|| hosted.file().map(str::to_string));
                    records[pos] = match file {
                        Some(file) => draft.with_file(file),
                        None => draft,
                    };
                    sources[pos] = RecordSource::Drafted;
                    debug!(id = %id, with_payload, "draft replaces hosted record");
                    DraftDecision::Drafted { with_payload }
                }
            }
            None => {
                records.push(match payload {
                    Some(file) => draft.with_file(file),
                    None => draft,
                });
                sources.push(RecordSource::LocalOnly);
                debug!(id = %id, with_payload, "local-only draft appended");
                DraftDecision::LocalOnly { with_payload }
            }
        };

        report.decisions.push((id, decision));
    }

    CatalogMerge {
        records,
        sources,
        report,
    }
}
