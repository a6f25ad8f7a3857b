//! Recent-activity feed: newest requests and revisions first.

use chrono::{DateTime, FixedOffset};
use request_types::RequestRecord;
use serde::Serialize;

use crate::timestamp::EvalContext;

/// Feed length used by the admin dashboard.
pub const DEFAULT_ACTIVITY_LIMIT: usize = 10;

/// A record and the instant it is ordered by.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityEntry<'a> {
    pub record: &'a RequestRecord,
    pub at: DateTime<FixedOffset>,
}

/// The `limit` most recent records, newest first.
///
/// Each record is ordered by `sentAt ?? createdAt ?? updatedAt`; records
/// whose chosen timestamp is missing or unparseable are dropped. Ties keep
/// their input order.
pub fn recent_activity<'a, I>(records: I, limit: usize) -> Vec<ActivityEntry<'a>>
where
    I: IntoIterator<Item = &'a RequestRecord>,
{
    recent_activity_with(records, limit, &EvalContext::default())
}

/// [`recent_activity`] with naive timestamps read in `ctx`'s offset.
pub fn recent_activity_with<'a, I>(
    records: I,
    limit: usize,
    ctx: &EvalContext,
) -> Vec<ActivityEntry<'a>>
where
    I: IntoIterator<Item = &'a RequestRecord>,
{
    let mut entries: Vec<ActivityEntry<'a>> = records
        .into_iter()
        .filter_map(|record| {
            let at = record.activity_timestamp().and_then(|ts| ctx.parse(ts));
            if at.is_none() {
                tracing::debug!(id = %record.id, "no usable activity timestamp, skipping");
            }
            at.map(|at| ActivityEntry { record, at })
        })
        .collect();

    // sort_by is stable
    entries.sort_by(|a, b| b.at.cmp(&a.at));
    entries.truncate(limit);
    entries
}

/// Merge the active request and revision lists into one feed.
pub fn merge_activity<'a>(
    requests: &'a [RequestRecord],
    revisions: &'a [RequestRecord],
    limit: usize,
    ctx: &EvalContext,
) -> Vec<ActivityEntry<'a>> {
    recent_activity_with(requests.iter().chain(revisions.iter()), limit, ctx)
}
