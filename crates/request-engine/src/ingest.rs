//! Ingestion boundary: backend JSON shapes -> [`RequestRecord`].
//!
//! Everything loosely typed about the backend is resolved here once, so the
//! rest of the engine can match on [`RecordKind`] instead of probing flags.

use request_types::{
    ArchivedBy, RawRequestRecord, RecordKind, RecordPayload, RequestRecord, RevisionSubtype,
};

/// Normalize one backend record.
///
/// - id: revisions use `revNo ?? irNo ?? id`, others `irNo ?? id`
/// - kind: `isRevision` wins, then `requestType == "CPR"`, else IR
/// - description: revisions prefer `revNote` over `desc`
/// - `archivedBy`: unknown values are dropped
pub fn ingest(raw: RawRequestRecord) -> RequestRecord {
    let is_revision = raw.is_revision.unwrap_or(false);

    let id = if is_revision {
        first_present([&raw.rev_no, &raw.ir_no, &raw.id])
    } else {
        first_present([&raw.ir_no, &raw.id])
    }
    .unwrap_or_default()
    .to_string();

    let kind = if is_revision {
        RecordKind::Revision {
            subtype: revision_subtype(&raw),
            user_rev_number: present(&raw.user_rev_number).map(str::to_string),
            rev_text: present(&raw.rev_text).map(str::to_string),
        }
    } else if raw
        .request_type
        .as_deref()
        .is_some_and(|t| t.trim().eq_ignore_ascii_case("CPR"))
    {
        RecordKind::Cpr
    } else {
        RecordKind::Ir
    };

    let description = if is_revision {
        first_present([&raw.rev_note, &raw.desc])
    } else {
        present(&raw.desc)
    }
    .unwrap_or_default()
    .to_string();

    let archived_by = raw.archived_by.as_deref().and_then(|value| {
        match value.parse::<ArchivedBy>() {
            Ok(by) => Some(by),
            Err(err) => {
                tracing::debug!(%id, error = %err, "dropping archivedBy");
                None
            }
        }
    });

    RequestRecord {
        id,
        kind,
        project: raw.project.unwrap_or_default(),
        department: raw.department.unwrap_or_default(),
        description,
        location: raw.location,
        floor: raw.floor,
        user: raw.user.unwrap_or_default(),
        is_done: raw.is_done.unwrap_or(false),
        sent_at: raw.sent_at,
        created_at: raw.created_at,
        updated_at: raw.updated_at,
        archived_at: raw.archived_at,
        archived_by,
        downloaded_by: raw.downloaded_by,
        downloaded_at: raw.downloaded_at,
        display_number: raw.display_number.filter(|d| !d.trim().is_empty()),
    }
}

/// Normalize a list of backend records, keeping order.
pub fn ingest_all<I>(raws: I) -> Vec<RequestRecord>
where
    I: IntoIterator<Item = RawRequestRecord>,
{
    raws.into_iter().map(ingest).collect()
}

/// Normalize a whole payload (`irs`, then `revs`, then `archive`).
pub fn ingest_payload(payload: RecordPayload) -> Vec<RequestRecord> {
    let count = payload.len();
    let records = ingest_all(payload.into_raw_records());
    tracing::trace!(count, "ingested payload");
    records
}

fn revision_subtype(raw: &RawRequestRecord) -> RevisionSubtype {
    let tagged_cpr = raw
        .revision_type
        .as_deref()
        .and_then(|t| t.parse::<RevisionSubtype>().ok())
        == Some(RevisionSubtype::CprRevision);

    if tagged_cpr || raw.is_cpr_revision.unwrap_or(false) {
        RevisionSubtype::CprRevision
    } else {
        RevisionSubtype::IrRevision
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn first_present<const N: usize>(values: [&Option<String>; N]) -> Option<&str> {
    values.into_iter().find_map(present)
}
