//! Signed-in user, persisted between runs.
//!
//! The shell owns the session: it loads it at startup, passes it to whatever
//! needs the current user and stores it again after login or logout. The
//! engine only ever sees the [`FilterSpec`] a session scope produces.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use request_engine::{normalize_dept, FilterSpec};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};

/// Account role as stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    SuperAdmin,
    /// Document controller
    Dc,
    /// Head of department
    Head,
    Engineer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
            Role::Dc => "dc",
            Role::Head => "head",
            Role::Engineer => "engineer",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    /// Roles that submit requests and get the personal/department tabs.
    pub fn is_submitter(&self) -> bool {
        matches!(self, Role::Engineer | Role::Head)
    }

    /// View a user of this role lands on after login.
    pub fn landing_view(&self) -> &'static str {
        match self {
            Role::Admin | Role::SuperAdmin => "admin",
            Role::Dc => "dc",
            Role::Head | Role::Engineer => "engineer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "super_admin" => Ok(Role::SuperAdmin),
            "dc" => Ok(Role::Dc),
            "head" => Ok(Role::Head),
            "engineer" => Ok(Role::Engineer),
            _ => Err(TrackerError::UnknownValue {
                kind: "role",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub username: String,
    pub role: Role,
    #[serde(default)]
    pub department: String,
}

/// Tabs of the engineer records view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordsTab {
    /// Records the user submitted
    Personal,
    /// Records of the user's department
    Department,
    All,
}

impl FromStr for RecordsTab {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "personal" | "mine" => Ok(RecordsTab::Personal),
            "department" | "dept" => Ok(RecordsTab::Department),
            "all" => Ok(RecordsTab::All),
            _ => Err(TrackerError::UnknownValue {
                kind: "tab",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<SessionUser>,
}

impl Session {
    pub fn signed_in(user: SessionUser) -> Self {
        Self { user: Some(user) }
    }

    /// Read a stored session. A missing file is a signed-out session.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let session: Session = serde_json::from_str(&content)?;
                tracing::debug!(
                    user = session.user.as_ref().map(|u| u.username.as_str()),
                    "loaded session"
                );
                Ok(session)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(TrackerError::io(path, e)),
        }
    }

    pub fn store<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| TrackerError::io(path, e))
    }

    pub fn sign_out(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::info!(user = %user.username, "signed out");
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Filter preset for a records tab.
    ///
    /// Admins see everything on every tab. Signed-out sessions get an empty
    /// preset; route guarding is the views' concern.
    pub fn scope(&self, tab: RecordsTab) -> FilterSpec {
        let Some(user) = &self.user else {
            return FilterSpec::new();
        };
        if user.role.is_admin() {
            return FilterSpec::new();
        }
        match tab {
            RecordsTab::Personal => FilterSpec::new().with_user(user.username.clone()),
            RecordsTab::Department if !user.department.trim().is_empty() => {
                FilterSpec::new().with_department(normalize_dept(&user.department))
            }
            RecordsTab::Department | RecordsTab::All => FilterSpec::new(),
        }
    }
}
