//! Short type badges shown next to records.

use request_types::{RecordKind, RequestRecord, RevisionSubtype};

/// `IR`, `CPR`, `IR REVISION` or `CPR REVISION`.
pub fn type_label(record: &RequestRecord) -> &'static str {
    match &record.kind {
        RecordKind::Ir => "IR",
        RecordKind::Cpr => "CPR",
        RecordKind::Revision {
            subtype: RevisionSubtype::IrRevision,
            ..
        } => "IR REVISION",
        RecordKind::Revision {
            subtype: RevisionSubtype::CprRevision,
            ..
        } => "CPR REVISION",
    }
}
