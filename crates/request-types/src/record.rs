//! Normalized request record and its closed enums.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::UNKNOWN_PROJECT;

// ============================================================================
// CLOSED ENUMS
// ============================================================================

/// The three record kinds, without per-kind payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    /// Inspection request
    Ir,
    /// Concrete pouring request
    Cpr,
    /// Follow-up correction of an IR or CPR
    Revision,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Ir => "IR",
            RequestType::Cpr => "CPR",
            RequestType::Revision => "REVISION",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestType {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IR" => Ok(RequestType::Ir),
            "CPR" => Ok(RequestType::Cpr),
            "REVISION" | "REV" => Ok(RequestType::Revision),
            _ => Err(RecordError::UnknownRequestType(s.to_string())),
        }
    }
}

/// Which kind of request a revision corrects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevisionSubtype {
    IrRevision,
    CprRevision,
}

impl RevisionSubtype {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevisionSubtype::IrRevision => "IR_REVISION",
            RevisionSubtype::CprRevision => "CPR_REVISION",
        }
    }

    /// Short parent tag used inside display numbers (`IR` / `CPR`).
    pub fn parent_tag(&self) -> &'static str {
        match self {
            RevisionSubtype::IrRevision => "IR",
            RevisionSubtype::CprRevision => "CPR",
        }
    }
}

impl fmt::Display for RevisionSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RevisionSubtype {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IR_REVISION" => Ok(RevisionSubtype::IrRevision),
            "CPR_REVISION" => Ok(RevisionSubtype::CprRevision),
            _ => Err(RecordError::UnknownRevisionSubtype(s.to_string())),
        }
    }
}

/// Role that moved a record into the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchivedBy {
    /// Document controller
    Dc,
    Engineer,
}

impl ArchivedBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArchivedBy::Dc => "dc",
            ArchivedBy::Engineer => "engineer",
        }
    }
}

impl fmt::Display for ArchivedBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArchivedBy {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dc" => Ok(ArchivedBy::Dc),
            "engineer" => Ok(ArchivedBy::Engineer),
            _ => Err(RecordError::UnknownArchivedBy(s.to_string())),
        }
    }
}

// ============================================================================
// RECORD KIND
// ============================================================================

/// Kind discriminant plus the fields that only exist for that kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum RecordKind {
    #[serde(rename = "IR")]
    Ir,
    #[serde(rename = "CPR")]
    Cpr,
    #[serde(rename = "REVISION")]
    Revision {
        #[serde(rename = "revisionSubtype")]
        subtype: RevisionSubtype,
        /// Label typed by the engineer (`"R1"`, `"001"`).
        #[serde(rename = "userRevNumber", default, skip_serializing_if = "Option::is_none")]
        user_rev_number: Option<String>,
        /// Older revisions only carry the label here.
        #[serde(rename = "revText", default, skip_serializing_if = "Option::is_none")]
        rev_text: Option<String>,
    },
}

impl RecordKind {
    pub fn request_type(&self) -> RequestType {
        match self {
            RecordKind::Ir => RequestType::Ir,
            RecordKind::Cpr => RequestType::Cpr,
            RecordKind::Revision { .. } => RequestType::Revision,
        }
    }
}

// ============================================================================
// REQUEST RECORD
// ============================================================================

/// A normalized IR, CPR or revision as held in memory for one page view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRecord {
    /// Canonical backend identifier (`BADYA-CON-D1-IR-ST-001`, `REV-D1-IRREV-003`).
    pub id: String,
    #[serde(flatten)]
    pub kind: RecordKind,
    #[serde(default)]
    pub project: String,
    /// Free-form department name as entered on the request.
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,
    /// Submitting user.
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub is_done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_by: Option<ArchivedBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloaded_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloaded_at: Option<String>,
    /// Display number supplied upstream; wins over anything computed locally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_number: Option<String>,
}

impl RequestRecord {
    /// Create a record of the given kind with every optional field empty.
    pub fn new(id: impl Into<String>, kind: RecordKind) -> Self {
        Self {
            id: id.into(),
            kind,
            project: String::new(),
            department: String::new(),
            description: String::new(),
            location: None,
            floor: None,
            user: String::new(),
            is_done: false,
            sent_at: None,
            created_at: None,
            updated_at: None,
            archived_at: None,
            archived_by: None,
            downloaded_by: None,
            downloaded_at: None,
            display_number: None,
        }
    }

    /// Create an inspection request.
    pub fn ir(id: impl Into<String>) -> Self {
        Self::new(id, RecordKind::Ir)
    }

    /// Create a concrete pouring request.
    pub fn cpr(id: impl Into<String>) -> Self {
        Self::new(id, RecordKind::Cpr)
    }

    /// Create a revision carrying a user-entered label.
    pub fn revision(
        id: impl Into<String>,
        subtype: RevisionSubtype,
        user_rev_number: Option<String>,
    ) -> Self {
        Self::new(
            id,
            RecordKind::Revision {
                subtype,
                user_rev_number,
                rev_text: None,
            },
        )
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn with_done(mut self, is_done: bool) -> Self {
        self.is_done = is_done;
        self
    }

    pub fn with_sent_at(mut self, sent_at: impl Into<String>) -> Self {
        self.sent_at = Some(sent_at.into());
        self
    }

    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    pub fn with_updated_at(mut self, updated_at: impl Into<String>) -> Self {
        self.updated_at = Some(updated_at.into());
        self
    }

    /// Mark as archived by `by` at `at`.
    pub fn with_archive(mut self, by: ArchivedBy, at: impl Into<String>) -> Self {
        self.archived_by = Some(by);
        self.archived_at = Some(at.into());
        self
    }

    pub fn with_downloaded_by(mut self, user: impl Into<String>) -> Self {
        self.downloaded_by = Some(user.into());
        self
    }

    pub fn with_display_number(mut self, display_number: impl Into<String>) -> Self {
        self.display_number = Some(display_number.into());
        self
    }

    pub fn request_type(&self) -> RequestType {
        self.kind.request_type()
    }

    pub fn is_revision(&self) -> bool {
        matches!(self.kind, RecordKind::Revision { .. })
    }

    /// True for a non-revision CPR.
    pub fn is_cpr(&self) -> bool {
        matches!(self.kind, RecordKind::Cpr)
    }

    pub fn revision_subtype(&self) -> Option<RevisionSubtype> {
        match &self.kind {
            RecordKind::Revision { subtype, .. } => Some(*subtype),
            _ => None,
        }
    }

    /// Human revision label: `userRevNumber`, then `revText`. Empty labels are absent.
    pub fn revision_label(&self) -> Option<&str> {
        match &self.kind {
            RecordKind::Revision {
                user_rev_number,
                rev_text,
                ..
            } => non_empty(user_rev_number).or_else(|| non_empty(rev_text)),
            _ => None,
        }
    }

    /// Project used for grouping, `"Unknown"` when empty.
    ///
    /// Whitespace-only names are kept as their own key.
    pub fn project_key(&self) -> &str {
        if self.project.is_empty() {
            UNKNOWN_PROJECT
        } else {
            &self.project
        }
    }

    /// Timestamp used for recent-activity ordering: `sentAt ?? createdAt ?? updatedAt`.
    pub fn activity_timestamp(&self) -> Option<&str> {
        non_empty(&self.sent_at)
            .or_else(|| non_empty(&self.created_at))
            .or_else(|| non_empty(&self.updated_at))
    }

    /// Date compared by date-range filters: `archivedAt ?? sentAt`.
    pub fn reference_date(&self) -> Option<&str> {
        non_empty(&self.archived_at).or_else(|| non_empty(&self.sent_at))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_type_parse() {
        assert_eq!("ir".parse::<RequestType>().unwrap(), RequestType::Ir);
        assert_eq!("CPR".parse::<RequestType>().unwrap(), RequestType::Cpr);
        assert_eq!("Revision".parse::<RequestType>().unwrap(), RequestType::Revision);
        assert!("ORC".parse::<RequestType>().is_err());
    }

    #[test]
    fn test_archived_by_parse_is_case_insensitive() {
        assert_eq!("DC".parse::<ArchivedBy>().unwrap(), ArchivedBy::Dc);
        assert_eq!(" engineer ".parse::<ArchivedBy>().unwrap(), ArchivedBy::Engineer);
        let err = "admin".parse::<ArchivedBy>().unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_ARCHIVED_BY");
    }

    #[test]
    fn test_revision_label_precedence() {
        let rev = RequestRecord::new(
            "REV-1",
            RecordKind::Revision {
                subtype: RevisionSubtype::IrRevision,
                user_rev_number: Some(String::new()),
                rev_text: Some("R3".into()),
            },
        );
        assert_eq!(rev.revision_label(), Some("R3"));
        assert!(rev.is_revision());
        assert_eq!(rev.revision_subtype(), Some(RevisionSubtype::IrRevision));
    }

    #[test]
    fn test_project_key_falls_back_to_unknown() {
        assert_eq!(RequestRecord::ir("X").project_key(), "Unknown");
        assert_eq!(RequestRecord::ir("X").with_project("D6").project_key(), "D6");
    }

    #[test]
    fn test_whitespace_values_are_present() {
        assert_eq!(RequestRecord::ir("X").with_project("  ").project_key(), "  ");

        let rev = RequestRecord::new(
            "REV-1",
            RecordKind::Revision {
                subtype: RevisionSubtype::IrRevision,
                user_rev_number: Some(" ".into()),
                rev_text: Some("R3".into()),
            },
        );
        assert_eq!(rev.revision_label(), Some(" "));

        let record = RequestRecord::ir("X")
            .with_sent_at(" ")
            .with_created_at("2026-01-02T00:00:00Z");
        assert_eq!(record.activity_timestamp(), Some(" "));
    }

    #[test]
    fn test_activity_timestamp_precedence() {
        let record = RequestRecord::ir("X")
            .with_created_at("2026-01-02T00:00:00Z")
            .with_updated_at("2026-01-03T00:00:00Z");
        assert_eq!(record.activity_timestamp(), Some("2026-01-02T00:00:00Z"));

        let record = record.with_sent_at("2026-01-01T00:00:00Z");
        assert_eq!(record.activity_timestamp(), Some("2026-01-01T00:00:00Z"));
    }

    #[test]
    fn test_reference_date_prefers_archive() {
        let record = RequestRecord::ir("X")
            .with_sent_at("2026-01-01T00:00:00Z")
            .with_archive(ArchivedBy::Dc, "2026-02-01T00:00:00Z");
        assert_eq!(record.reference_date(), Some("2026-02-01T00:00:00Z"));
    }

    #[test]
    fn test_record_serializes_kind_inline() {
        let record = RequestRecord::revision(
            "REV-D1-CPRREV-001",
            RevisionSubtype::CprRevision,
            Some("R2".into()),
        )
        .with_project("D1");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "REVISION");
        assert_eq!(json["revisionSubtype"], "CPR_REVISION");
        assert_eq!(json["userRevNumber"], "R2");
        assert_eq!(json["isDone"], false);

        let back: RequestRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
