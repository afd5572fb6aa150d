use folio_schemas::{Record, SiteDocument};

/// What the collection merge decided for one overlay entry.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum DraftDecision {
    /// Draft equal to hosted with no payload: purged, hosted kept.
    Purged,
    /// Draft (or payload) replaced the hosted record in place.
    Drafted { with_payload: bool },
    /// No hosted counterpart: draft appended.
    LocalOnly { with_payload: bool },
    /// Stored text was not a JSON object: ignored, hosted (if any) kept.
    Unparseable { reason: String },
    /// Draft carries a `slug` other than the identifier it is stored under:
    /// ignored and left in place, hosted (if any) kept.
    SlugMismatch { slug: String },
}

/// Where one emitted record came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordSource {
    Hosted,
    Drafted,
    LocalOnly,
}

/// A store write or removal that failed during the merge. Logged and carried
/// in the report; never aborts the merge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreFault {
    pub id: String,
    pub message: String,
}

/// Per-entry evidence of one reconciliation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// `(identifier, decision)` in overlay enumeration order.
    pub decisions: Vec<(String, DraftDecision)>,
    pub store_faults: Vec<StoreFault>,
}

impl MergeReport {
    fn ids_where(&self, pred: impl Fn(&DraftDecision) -> bool) -> Vec<&str> {
        self.decisions
            .iter()
            .filter(|(_, d)| pred(d))
            .map(|(id, _)| id.as_str())
            .collect()
    }

    pub fn purged(&self) -> Vec<&str> {
        self.ids_where(|d| matches!(d, DraftDecision::Purged))
    }

    pub fn drafted(&self) -> Vec<&str> {
        self.ids_where(|d| matches!(d, DraftDecision::Drafted { .. }))
    }

    pub fn local_only(&self) -> Vec<&str> {
        self.ids_where(|d| matches!(d, DraftDecision::LocalOnly { .. }))
    }

    pub fn unparseable(&self) -> Vec<&str> {
        self.ids_where(|d| matches!(d, DraftDecision::Unparseable { .. }))
    }

    pub fn slug_mismatches(&self) -> Vec<&str> {
        self.ids_where(|d| matches!(d, DraftDecision::SlugMismatch { .. }))
    }

    /// `true` when the pass neither purged anything nor hit a store fault, i.e.
    /// the overlay was already stable.
    pub fn is_stable(&self) -> bool {
        self.purged().is_empty() && self.store_faults.is_empty()
    }
}

/// Output of the collection merge.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogMerge {
    pub records: Vec<Record>,
    /// Parallel to `records`.
    pub sources: Vec<RecordSource>,
    pub report: MergeReport,
}

impl CatalogMerge {
    /// Records paired with where each came from.
    pub fn tagged(&self) -> impl Iterator<Item = (&Record, RecordSource)> + '_ {
        self.records.iter().zip(self.sources.iter().copied())
    }
}

/// Which copy the singleton merge surfaced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SiteDecision {
    /// No usable draft.
    Hosted,
    /// Draft equal to hosted: purged, hosted returned.
    Purged,
    /// Draft differs: returned as-is.
    Local,
    /// Draft text was not a JSON object: ignored.
    Unparseable { reason: String },
}

/// Output of the singleton merge.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteMerge {
    pub config: SiteDocument,
    pub decision: SiteDecision,
    pub store_fault: Option<String>,
}
