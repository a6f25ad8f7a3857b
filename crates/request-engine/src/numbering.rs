//! Request and revision number allocation.
//!
//! Each project keeps one counter per department plus one for CPRs. A new
//! request takes the next value of its counter and is named
//! `BADYA-CON-<PROJECT>-<TYPE>-<DEPT>-<nnn>`. Revisions have their own
//! counters keyed by project and revision subtype.
//!
//! The department code used here differs from [`crate::normalize_dept`]:
//! mechanical maps to `MECH`, blank or unknown names default to `ST`, and the
//! Arabic department names used on site are recognized.

use std::collections::BTreeMap;
use std::fmt;

use request_types::{RequestType, RevisionSubtype};
use serde::{Deserialize, Serialize};

use crate::error::NumberingError;
use crate::identifier::{revision_display_number, CANONICAL_INFIX};

/// Counter key for CPR requests.
pub const CPR_COUNTER: &str = "CPR";

/// Department code embedded in request numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IrDept {
    Arch,
    St,
    Mech,
    Elect,
    Surv,
}

impl IrDept {
    pub const ALL: [IrDept; 5] = [
        IrDept::Arch,
        IrDept::St,
        IrDept::Mech,
        IrDept::Elect,
        IrDept::Surv,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IrDept::Arch => "ARCH",
            IrDept::St => "ST",
            IrDept::Mech => "MECH",
            IrDept::Elect => "ELECT",
            IrDept::Surv => "SURV",
        }
    }
}

impl fmt::Display for IrDept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Department code for numbering a new request.
pub fn ir_dept_code(department: &str) -> IrDept {
    let dept = department.trim().to_uppercase();
    let has = |needles: &[&str]| needles.iter().any(|n| dept.contains(n));

    if dept.is_empty() {
        IrDept::St
    } else if has(&["ARCH", "معماري"]) {
        IrDept::Arch
    } else if has(&["CIVIL", "STRUCT", "إنشائي"]) {
        IrDept::St
    } else if has(&["ELECT", "كهرباء"]) {
        IrDept::Elect
    } else if has(&["MEP", "MECH", "ميكانيكا"]) {
        IrDept::Mech
    } else if has(&["SURV", "مساحة"]) {
        IrDept::Surv
    } else {
        IrDept::St
    }
}

/// Per-project counters, stored by the backend as `{"ARCH": 3, "ST": 12, ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectCounters {
    counters: BTreeMap<String, u32>,
}

impl Default for ProjectCounters {
    fn default() -> Self {
        let counters = IrDept::ALL
            .iter()
            .map(|d| d.as_str())
            .chain([CPR_COUNTER])
            .map(|key| (key.to_string(), 0))
            .collect();
        Self { counters }
    }
}

impl ProjectCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a counter (0 when never used).
    pub fn get(&self, key: &str) -> u32 {
        self.counters.get(key).copied().unwrap_or(0)
    }

    /// Counter key a request of this type and department draws from.
    pub fn counter_key(
        request_type: RequestType,
        dept: IrDept,
    ) -> Result<&'static str, NumberingError> {
        match request_type {
            RequestType::Ir => Ok(dept.as_str()),
            RequestType::Cpr if dept == IrDept::St => Ok(CPR_COUNTER),
            RequestType::Cpr => Err(NumberingError::CprRequiresStructural {
                department: dept.as_str().to_string(),
            }),
            RequestType::Revision => Err(NumberingError::NotARequest(request_type)),
        }
    }

    /// Increment and return the counter for a new request.
    ///
    /// A counter already at `u32::MAX` is rejected and left as it is.
    pub fn allocate(
        &mut self,
        request_type: RequestType,
        dept: IrDept,
    ) -> Result<u32, NumberingError> {
        let key = Self::counter_key(request_type, dept)?;
        let next = self
            .get(key)
            .checked_add(1)
            .ok_or_else(|| NumberingError::CounterOverflow {
                key: key.to_string(),
            })?;
        self.counters.insert(key.to_string(), next);
        Ok(next)
    }
}

/// Project name as embedded in identifiers: spaces become `-`, uppercased.
pub fn clean_project(project: &str) -> Result<String, NumberingError> {
    let project = project.trim();
    if project.is_empty() {
        return Err(NumberingError::EmptyProject);
    }
    Ok(project.replace(' ', "-").to_uppercase())
}

/// Backend identifier for a request.
///
/// CPRs always carry the `ST` department token so every request id has the
/// same six-token layout.
pub fn request_number(
    project: &str,
    dept: IrDept,
    counter: u32,
    request_type: RequestType,
) -> Result<String, NumberingError> {
    let project = clean_project(project)?;
    let type_token = match request_type {
        RequestType::Ir => "IR",
        RequestType::Cpr => "CPR",
        RequestType::Revision => return Err(NumberingError::NotARequest(request_type)),
    };
    Ok(format!(
        "{CANONICAL_INFIX}-{project}-{type_token}-{dept}-{counter:03}"
    ))
}

/// Result of allocating a number for a new request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocatedNumber {
    pub id: String,
    pub dept: IrDept,
    pub counter: u32,
}

/// Classify the department, draw the next counter value and build the id.
///
/// Counters are left untouched when the request is rejected.
pub fn allocate_request_number(
    counters: &mut ProjectCounters,
    project: &str,
    department: &str,
    request_type: RequestType,
) -> Result<AllocatedNumber, NumberingError> {
    clean_project(project)?;
    let dept = ir_dept_code(department);
    let counter = counters.allocate(request_type, dept)?;
    let id = request_number(project, dept, counter, request_type)?;
    tracing::debug!(%id, counter, "allocated request number");
    Ok(AllocatedNumber { id, dept, counter })
}

/// Name of the revision counter for a subtype (`rev_counter_ir_revision`).
pub fn revision_counter_key(subtype: RevisionSubtype) -> String {
    format!("rev_counter_{}", subtype.as_str().to_lowercase())
}

/// Backend document holding a project's revision counter.
pub fn revision_counter_doc(project: &str, subtype: RevisionSubtype) -> String {
    format!("{}_{}", project.trim(), revision_counter_key(subtype))
}

/// Backend identifier for a revision: `REV-<PROJECT>-IRREV-<nnn>`.
pub fn revision_number(
    project: &str,
    subtype: RevisionSubtype,
    counter: u32,
) -> Result<String, NumberingError> {
    let project = clean_project(project)?;
    let tag = match subtype {
        RevisionSubtype::IrRevision => "IRREV",
        RevisionSubtype::CprRevision => "CPRREV",
    };
    Ok(format!("REV-{project}-{tag}-{counter:03}"))
}

/// Description stored on a new revision: `REV-IR: R1` or `REV-IR: R1 - <note>`.
pub fn revision_description(
    subtype: RevisionSubtype,
    label: &str,
    note: &str,
) -> Result<String, NumberingError> {
    let label = label.trim();
    if label.is_empty() {
        return Err(NumberingError::EmptyRevisionLabel);
    }
    let prefix = format!("REV-{}", subtype.parent_tag());
    Ok(if note.is_empty() {
        format!("{prefix}: {label}")
    } else {
        format!("{prefix}: {label} - {note}")
    })
}

/// Display number stored on a new revision.
pub fn new_revision_display_number(
    subtype: RevisionSubtype,
    label: &str,
) -> Result<String, NumberingError> {
    let label = label.trim();
    if label.is_empty() {
        return Err(NumberingError::EmptyRevisionLabel);
    }
    Ok(revision_display_number(subtype, label))
}
