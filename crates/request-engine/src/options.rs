//! Values offered by the filter dropdowns.

use std::collections::BTreeSet;

use request_types::{ArchivedBy, RequestRecord};
use serde::Serialize;

use crate::department::{normalize_dept, DeptCode};

/// Distinct, sorted axis values present in a record list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub projects: Vec<String>,
    pub departments: Vec<DeptCode>,
    pub archived_by: Vec<ArchivedBy>,
    pub users: Vec<String>,
}

impl FilterOptions {
    /// Collect options; blank projects, departments and users are skipped.
    pub fn collect<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a RequestRecord>,
    {
        let mut projects = BTreeSet::new();
        let mut departments = BTreeSet::new();
        let mut archived_by = BTreeSet::new();
        let mut users = BTreeSet::new();

        for record in records {
            if !record.project.trim().is_empty() {
                projects.insert(record.project.clone());
            }
            let dept = normalize_dept(&record.department);
            if !dept.is_empty() {
                departments.insert(dept);
            }
            if let Some(by) = record.archived_by {
                archived_by.insert(by);
            }
            if !record.user.trim().is_empty() {
                users.insert(record.user.clone());
            }
        }

        Self {
            projects: projects.into_iter().collect(),
            departments: departments.into_iter().collect(),
            archived_by: archived_by.into_iter().collect(),
            users: users.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collect() {
        let records = vec![
            RequestRecord::ir("1")
                .with_project("D2")
                .with_department("Civil")
                .with_user("omar"),
            RequestRecord::ir("2")
                .with_project("D1")
                .with_department("STRUCTURE")
                .with_archive(ArchivedBy::Engineer, "2026-01-01"),
            RequestRecord::ir("3").with_project("").with_department("Electrical"),
            RequestRecord::ir("4")
                .with_project("D1")
                .with_archive(ArchivedBy::Dc, "2026-01-01")
                .with_user("omar"),
        ];
        let options = FilterOptions::collect(&records);

        assert_eq!(options.projects, vec!["D1", "D2"]);
        assert_eq!(options.departments, vec![DeptCode::Elect, DeptCode::St]);
        assert_eq!(options.archived_by, vec![ArchivedBy::Dc, ArchivedBy::Engineer]);
        assert_eq!(options.users, vec!["omar"]);
    }

    #[test]
    fn test_empty() {
        assert_eq!(FilterOptions::collect(&Vec::<RequestRecord>::new()), FilterOptions::default());
    }
}
