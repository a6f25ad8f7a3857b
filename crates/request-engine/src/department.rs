//! Department classification.
//!
//! Department names are free text ("Civil/Structure", "Architectural",
//! "MEP works"). Views compare them through a short code derived by ordered
//! substring matching; the first rule that hits wins.

use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Normalized department code.
///
/// Codes compare by their text, so `Other("ST")` (a department literally
/// named "ST") equals `St`.
#[derive(Debug, Clone)]
pub enum DeptCode {
    Arch,
    /// Civil / structural
    St,
    Elect,
    Mep,
    Surv,
    Rev,
    /// First four characters of an unrecognized name, uppercased. Empty for
    /// a blank department.
    Other(String),
}

impl DeptCode {
    pub fn as_str(&self) -> &str {
        match self {
            DeptCode::Arch => "ARCH",
            DeptCode::St => "ST",
            DeptCode::Elect => "ELECT",
            DeptCode::Mep => "MEP",
            DeptCode::Surv => "SURV",
            DeptCode::Rev => "REV",
            DeptCode::Other(code) => code,
        }
    }

    /// Interpret an already-abbreviated code, e.g. a value picked from a
    /// filter dropdown. Unknown codes are kept verbatim (uppercased).
    pub fn from_code(code: &str) -> Self {
        let upper = code.trim().to_uppercase();
        match upper.as_str() {
            "ARCH" => DeptCode::Arch,
            "ST" => DeptCode::St,
            "ELECT" => DeptCode::Elect,
            "MEP" => DeptCode::Mep,
            "SURV" => DeptCode::Surv,
            "REV" => DeptCode::Rev,
            _ => DeptCode::Other(upper),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl PartialEq for DeptCode {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for DeptCode {}

impl Hash for DeptCode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl PartialOrd for DeptCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DeptCode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl fmt::Display for DeptCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeptCode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(DeptCode::from_code(s))
    }
}

impl Serialize for DeptCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Classify a free-form department name.
///
/// Case-insensitive, checked in this order: `ARCH`; `CIVIL` or `STRUCT`;
/// `ELECT`; `MEP` or `MECH`; `SURV`; `REV`. Anything else becomes its first
/// four characters uppercased.
pub fn normalize_dept(raw: &str) -> DeptCode {
    let dept = raw.to_uppercase();
    if dept.contains("ARCH") {
        DeptCode::Arch
    } else if dept.contains("CIVIL") || dept.contains("STRUCT") {
        DeptCode::St
    } else if dept.contains("ELECT") {
        DeptCode::Elect
    } else if dept.contains("MEP") || dept.contains("MECH") {
        DeptCode::Mep
    } else if dept.contains("SURV") {
        DeptCode::Surv
    } else if dept.contains("REV") {
        DeptCode::Rev
    } else {
        DeptCode::Other(dept.chars().take(4).collect())
    }
}
