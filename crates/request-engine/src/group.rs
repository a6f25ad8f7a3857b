//! Grouping of records by project.
//!
//! Groups keep first-occurrence order and records keep their relative order
//! inside a group. Views that want alphabetical project headings call
//! [`ProjectGroups::sorted`].

use std::collections::HashMap;

use request_types::RequestRecord;
use serde::Serialize;

/// Records of one project, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectGroup<'a> {
    pub project: String,
    pub records: Vec<&'a RequestRecord>,
}

impl ProjectGroup<'_> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Ordered mapping project -> records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectGroups<'a> {
    groups: Vec<ProjectGroup<'a>>,
    index: HashMap<String, usize>,
}

impl<'a> ProjectGroups<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to its project's group (`"Unknown"` for empty projects).
    pub fn push(&mut self, record: &'a RequestRecord) {
        let project = record.project_key();
        match self.index.get(project) {
            Some(&slot) => self.groups[slot].records.push(record),
            None => {
                self.index.insert(project.to_string(), self.groups.len());
                self.groups.push(ProjectGroup {
                    project: project.to_string(),
                    records: vec![record],
                });
            }
        }
    }

    pub fn get(&self, project: &str) -> Option<&ProjectGroup<'a>> {
        self.index.get(project).map(|&slot| &self.groups[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectGroup<'a>> {
        self.groups.iter()
    }

    pub fn projects(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.project.as_str())
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of records across all groups.
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(ProjectGroup::len).sum()
    }

    /// Same groups with project keys in alphabetical order. Record order
    /// inside each group is untouched.
    pub fn sorted(mut self) -> Self {
        self.groups.sort_by(|a, b| a.project.cmp(&b.project));
        self.index = self
            .groups
            .iter()
            .enumerate()
            .map(|(slot, g)| (g.project.clone(), slot))
            .collect();
        self
    }

    pub fn into_groups(self) -> Vec<ProjectGroup<'a>> {
        self.groups
    }
}

impl<'a> IntoIterator for ProjectGroups<'a> {
    type Item = ProjectGroup<'a>;
    type IntoIter = std::vec::IntoIter<ProjectGroup<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl<'a> FromIterator<&'a RequestRecord> for ProjectGroups<'a> {
    fn from_iter<I: IntoIterator<Item = &'a RequestRecord>>(iter: I) -> Self {
        let mut groups = ProjectGroups::new();
        for record in iter {
            groups.push(record);
        }
        groups
    }
}

impl Serialize for ProjectGroups<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.groups.serialize(serializer)
    }
}

/// Group records by project, preserving order.
///
/// Accepts owned slices (`&records`) as well as the borrowed output of
/// [`crate::apply_filters`].
pub fn group_by_project<'a, I, R>(records: I) -> ProjectGroups<'a>
where
    I: IntoIterator<Item = R>,
    R: std::borrow::Borrow<&'a RequestRecord>,
{
    records.into_iter().map(|r| *r.borrow()).collect()
}
