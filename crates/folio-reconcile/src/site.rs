use folio_overlay::{DraftParse, OverlayBackend, OverlayStore};
use folio_schemas::SiteDocument;
use tracing::{debug, info, warn};

use crate::equality::objects_equal;
use crate::types::{SiteDecision, SiteMerge};

/// Merge the hosted site configuration with the single config draft.
///
/// Local wins outright whenever it differs from hosted: the configuration is
/// one atomic object and is never merged field by field. `_lastModified` is
/// not consulted. A draft equal to hosted is removed.
pub fn merge_site<B: OverlayBackend>(
    hosted: SiteDocument,
    overlay: &mut OverlayStore<B>,
) -> SiteMerge {
    let local = match overlay.read_config() {
        None => {
            return SiteMerge {
                config: hosted,
                decision: SiteDecision::Hosted,
                store_fault: None,
            }
        }
        Some(DraftParse::Unparseable { reason }) => {
            warn!(%reason, "ignoring unparseable site config draft");
            return SiteMerge {
                config: hosted,
                decision: SiteDecision::Unparseable { reason },
                store_fault: None,
            };
        }
        Some(DraftParse::Parsed(local)) => local,
    };

    if objects_equal(local.as_map(), hosted.as_map()) {
        let store_fault = match overlay.remove_config() {
            Ok(()) => {
                info!("site config draft matches hosted; purged");
                None
            }
            Err(e) => {
                warn!(error = %e, "failed to purge redundant site config draft");
                Some(e.to_string())
            }
        };
        return SiteMerge {
            config: hosted,
            decision: SiteDecision::Purged,
            store_fault,
        };
    }

    debug!("site config draft wins over hosted");
    SiteMerge {
        config: local,
        decision: SiteDecision::Local,
        store_fault: None,
    }
}
