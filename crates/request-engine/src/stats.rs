//! Aggregate counters for dashboards and archive headers.

use request_types::{ArchivedBy, RequestRecord, RequestType, RevisionSubtype};
use serde::Serialize;

/// Counts over a list of records.
///
/// Every field equals an independent filter-and-count over the same list;
/// [`compute_stats`] just does them in one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestStats {
    pub total: usize,
    /// Plain inspection requests (no CPRs, no revisions).
    pub ir: usize,
    /// Non-revision CPRs.
    pub cpr: usize,
    pub revisions: usize,
    pub ir_revisions: usize,
    pub cpr_revisions: usize,
    pub completed: usize,
    pub pending: usize,
    pub archived_by_dc: usize,
    pub archived_by_engineer: usize,
}

impl RequestStats {
    /// Fold one record into the counters.
    pub fn record(&mut self, record: &RequestRecord) {
        self.total += 1;
        match record.request_type() {
            RequestType::Ir => self.ir += 1,
            RequestType::Cpr => self.cpr += 1,
            RequestType::Revision => {
                self.revisions += 1;
                match record.revision_subtype() {
                    Some(RevisionSubtype::CprRevision) => self.cpr_revisions += 1,
                    Some(RevisionSubtype::IrRevision) | None => self.ir_revisions += 1,
                }
            }
        }
        if record.is_done {
            self.completed += 1;
        } else {
            self.pending += 1;
        }
        match record.archived_by {
            Some(ArchivedBy::Dc) => self.archived_by_dc += 1,
            Some(ArchivedBy::Engineer) => self.archived_by_engineer += 1,
            None => {}
        }
    }
}

/// Count records by type, status and archiver.
pub fn compute_stats<'a, I>(records: I) -> RequestStats
where
    I: IntoIterator<Item = &'a RequestRecord>,
{
    let mut stats = RequestStats::default();
    for record in records {
        stats.record(record);
    }
    stats
}

/// Admin dashboard tiles, computed from the three backend lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub active_requests: usize,
    pub completed_requests: usize,
    pub pending_requests: usize,
    pub cpr_count: usize,
    pub total_revisions: usize,
    pub completed_revisions: usize,
    pub pending_revisions: usize,
    pub archive_total: usize,
}

impl DashboardSummary {
    /// `requests` is the active IR/CPR list, `revisions` the active
    /// revision list, `archive` everything archived.
    pub fn compute(
        requests: &[RequestRecord],
        revisions: &[RequestRecord],
        archive: &[RequestRecord],
    ) -> Self {
        let req = compute_stats(requests);
        let rev = compute_stats(revisions);
        Self {
            active_requests: req.total,
            completed_requests: req.completed,
            pending_requests: req.pending,
            cpr_count: req.cpr,
            total_revisions: rev.total,
            completed_revisions: rev.completed,
            pending_revisions: rev.pending,
            archive_total: archive.len(),
        }
    }
}
