//! Display numbers for request records.
//!
//! Backend identifiers are long and positional
//! (`BADYA-CON-<project>-<type>-<dept>-<seq>`); views show a shortened form.
//! Formatting never fails: anything that does not fit a known layout is shown
//! as-is.

use request_types::{RecordKind, RequestRecord, RevisionSubtype};

/// Infix carried by every IR / CPR identifier the backend issues.
pub const CANONICAL_INFIX: &str = "BADYA-CON";

/// Infix carried by revision identifiers.
pub const REVISION_INFIX: &str = "REV-";

/// Short display string for a record.
///
/// Revisions show their user-entered label (`REV-IR-R1`, `REV-CPR-R2`), or a
/// display number computed upstream when one is present. IR and CPR records
/// show their shortened identifier (see [`format_identifier`]).
pub fn format_display_number(record: &RequestRecord) -> String {
    match &record.kind {
        RecordKind::Revision { subtype, .. } => {
            if let Some(display) = record.display_number.as_deref().filter(|d| !d.is_empty()) {
                return display.to_string();
            }
            match record.revision_label() {
                Some(label) => revision_display_number(*subtype, label),
                None => record.id.clone(),
            }
        }
        RecordKind::Ir | RecordKind::Cpr => format_identifier(&record.id),
    }
}

/// Shorten a raw backend identifier.
///
/// ```
/// use request_engine::format_identifier;
///
/// assert_eq!(format_identifier("BADYA-CON-D6A1-IR-ST-007"), "D6A1-ST-007");
/// assert_eq!(format_identifier("BADYA-CON-D6A1-CPR-ST-007"), "CPR-D6A1-ST-007");
/// assert_eq!(format_identifier("REV-D1-IRREV-004"), "REV-D1-IRREV");
/// assert_eq!(format_identifier("legacy-42"), "legacy-42");
/// ```
pub fn format_identifier(id: &str) -> String {
    if id.is_empty() {
        return String::new();
    }

    if id.contains(CANONICAL_INFIX) {
        let parts: Vec<&str> = id.split('-').collect();
        // [BADYA, CON, project, type, dept, seq]
        if let [_, _, project, kind, dept, seq, ..] = parts.as_slice() {
            return if *kind == "CPR" {
                format!("CPR-{project}-{dept}-{seq}")
            } else {
                format!("{project}-{dept}-{seq}")
            };
        }
    }

    if id.contains(REVISION_INFIX) {
        let parts: Vec<&str> = id.split('-').collect();
        if let [_, first, second, ..] = parts.as_slice() {
            return format!("REV-{first}-{second}");
        }
    }

    id.to_string()
}

/// `REV-IR-<label>` / `REV-CPR-<label>`.
pub fn revision_display_number(subtype: RevisionSubtype, label: &str) -> String {
    format!("REV-{}-{}", subtype.parent_tag(), label)
}
