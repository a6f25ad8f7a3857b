//! Backend wire shapes.
//!
//! The backend stores loosely shaped documents: revisions repeat their label
//! under three names, CPR-ness is spread over `requestType`, `revisionType`
//! and boolean flags, and any field may be missing or `null`. These structs
//! accept all of that as-is; `request_engine::ingest` turns them into
//! [`crate::RequestRecord`].

use serde::{Deserialize, Serialize};

/// One request, revision or archived item exactly as the backend returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRequestRecord {
    pub id: Option<String>,
    pub ir_no: Option<String>,
    pub rev_no: Option<String>,
    pub is_revision: Option<bool>,
    /// `IR` or `CPR`; revisions repeat their parent's type here.
    pub request_type: Option<String>,
    /// `IR_REVISION` or `CPR_REVISION`.
    pub revision_type: Option<String>,
    #[serde(rename = "isCPRRevision")]
    pub is_cpr_revision: Option<bool>,
    /// Written by older clients next to `isCPRRevision`. Accepted but not
    /// read: the subtype comes from `revisionType` and `isCPRRevision`.
    #[serde(rename = "isIRRevision")]
    pub is_ir_revision: Option<bool>,
    pub project: Option<String>,
    pub department: Option<String>,
    pub desc: Option<String>,
    pub rev_note: Option<String>,
    pub location: Option<String>,
    pub floor: Option<String>,
    pub user: Option<String>,
    pub is_done: Option<bool>,
    pub sent_at: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub archived_at: Option<String>,
    pub archived_by: Option<String>,
    pub downloaded_by: Option<String>,
    pub downloaded_at: Option<String>,
    pub user_rev_number: Option<String>,
    pub rev_text: Option<String>,
    pub display_number: Option<String>,
}

/// Response body of the list endpoints (`/irs`, `/revs`, `/archive/*`).
///
/// A snapshot may merge several bodies; every list is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordPayload {
    #[serde(default)]
    pub irs: Vec<RawRequestRecord>,
    #[serde(default)]
    pub revs: Vec<RawRequestRecord>,
    #[serde(default)]
    pub archive: Vec<RawRequestRecord>,
}

impl RecordPayload {
    pub fn len(&self) -> usize {
        self.irs.len() + self.revs.len() + self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fill in a missing `isRevision` on every `revs` entry.
    ///
    /// Entries of `revs` are revisions by construction. An explicit flag
    /// from the backend is kept.
    pub fn mark_revisions(&mut self) {
        for rev in &mut self.revs {
            rev.is_revision.get_or_insert(true);
        }
    }

    /// All raw records in `irs`, `revs`, `archive` order, with
    /// [`Self::mark_revisions`] applied.
    pub fn into_raw_records(mut self) -> Vec<RawRequestRecord> {
        self.mark_revisions();
        let mut out = Vec::with_capacity(self.len());
        out.extend(self.irs);
        out.extend(self.revs);
        out.extend(self.archive);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_raw_record_accepts_nulls_and_unknown_fields() {
        let json = r#"{
            "irNo": "BADYA-CON-D1-IR-ST-001",
            "project": "D1",
            "archivedAt": null,
            "archivedBy": null,
            "tags": {"urgent": true},
            "engineerNote": ""
        }"#;
        let raw: RawRequestRecord = serde_json::from_str(json).unwrap();
        assert_eq!(raw.ir_no.as_deref(), Some("BADYA-CON-D1-IR-ST-001"));
        assert_eq!(raw.archived_at, None);
        assert_eq!(raw.is_done, None);
    }

    #[test]
    fn test_payload_marks_revs_as_revisions() {
        let json = r#"{
            "irs": [{"irNo": "BADYA-CON-D1-IR-ST-001"}],
            "revs": [{"revNo": "REV-D1-IRREV-001"}, {"revNo": "REV-D1-IRREV-002", "isRevision": false}]
        }"#;
        let payload: RecordPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.len(), 3);

        let raws = payload.into_raw_records();
        assert_eq!(raws[0].is_revision, None);
        assert_eq!(raws[1].is_revision, Some(true));
        // An explicit flag from the backend is kept.
        assert_eq!(raws[2].is_revision, Some(false));
    }

    #[test]
    fn test_mark_revisions_leaves_other_lists_alone() {
        let mut payload = RecordPayload {
            irs: vec![RawRequestRecord::default()],
            revs: vec![RawRequestRecord::default()],
            archive: vec![RawRequestRecord::default()],
        };
        payload.mark_revisions();
        payload.mark_revisions();

        assert_eq!(payload.irs[0].is_revision, None);
        assert_eq!(payload.revs[0].is_revision, Some(true));
        assert_eq!(payload.archive[0].is_revision, None);
    }
}
