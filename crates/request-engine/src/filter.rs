//! Multi-axis filtering and free-text search.
//!
//! A [`FilterSpec`] holds one optional value per axis; an absent axis (or the
//! UI's `"all"`) is disabled. Axes are ANDed and evaluated in a fixed order,
//! stopping at the first one that rejects the record:
//!
//! 1. project
//! 2. department (normalized code)
//! 3. request type
//! 4. status
//! 5. archived by
//! 6. submitting user
//! 7. date range over `archivedAt ?? sentAt`
//!
//! The free-text query is applied last: case-insensitive substring match
//! over the display number, shortened id, description, project, user,
//! archiver and downloader. Any one field matching keeps the record.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Months};
use request_types::{ArchivedBy, RequestRecord, RevisionSubtype};
use serde::{Deserialize, Deserializer};

use crate::department::{normalize_dept, DeptCode};
use crate::error::FilterSpecError;
use crate::identifier::{format_display_number, format_identifier};
use crate::timestamp::EvalContext;

/// Value the UI uses for a disabled axis.
pub const ALL: &str = "all";

// ============================================================================
// AXIS VALUES
// ============================================================================

/// Request-type axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFilter {
    /// Plain inspection requests: no revisions, no CPRs.
    Ir,
    /// CPRs and CPR revisions.
    Cpr,
    /// Any revision.
    Revision,
}

impl TypeFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeFilter::Ir => "ir",
            TypeFilter::Cpr => "cpr",
            TypeFilter::Revision => "revision",
        }
    }

    pub fn matches(&self, record: &RequestRecord) -> bool {
        match self {
            TypeFilter::Ir => !record.is_revision() && !record.is_cpr(),
            TypeFilter::Cpr => {
                record.is_cpr() || record.revision_subtype() == Some(RevisionSubtype::CprRevision)
            }
            TypeFilter::Revision => record.is_revision(),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = FilterSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ir" => Ok(TypeFilter::Ir),
            "cpr" | "orc" => Ok(TypeFilter::Cpr),
            "revision" | "rev" => Ok(TypeFilter::Revision),
            _ => Err(FilterSpecError::UnknownValue {
                axis: "type",
                value: s.to_string(),
            }),
        }
    }
}

/// Completion axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    Pending,
    Completed,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::Pending => "pending",
            StatusFilter::Completed => "completed",
        }
    }

    pub fn matches(&self, record: &RequestRecord) -> bool {
        match self {
            StatusFilter::Pending => !record.is_done,
            StatusFilter::Completed => record.is_done,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = FilterSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(StatusFilter::Pending),
            "completed" | "done" => Ok(StatusFilter::Completed),
            _ => Err(FilterSpecError::UnknownValue {
                axis: "status",
                value: s.to_string(),
            }),
        }
    }
}

/// Date-range axis, relative to the evaluation context's "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateRange {
    /// Same calendar day, in the context's offset.
    Today,
    /// Within the last seven days.
    Week,
    /// On or after the same day one calendar month ago.
    Month,
}

impl DateRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateRange::Today => "today",
            DateRange::Week => "week",
            DateRange::Month => "month",
        }
    }

    /// Missing or unparseable dates never fall inside a range.
    pub fn contains(&self, date: Option<&str>, ctx: &EvalContext) -> bool {
        let Some(at) = date.and_then(|d| ctx.parse(d)) else {
            return false;
        };
        let now = ctx.now();
        match self {
            DateRange::Today => at.with_timezone(&ctx.offset()).date_naive() == now.date_naive(),
            DateRange::Week => at >= now - Duration::days(7),
            DateRange::Month => {
                // Month-end days clamp (31 Mar -> 28/29 Feb).
                let since = now
                    .checked_sub_months(Months::new(1))
                    .unwrap_or(now - Duration::days(31));
                at >= since
            }
        }
    }
}

impl FromStr for DateRange {
    type Err = FilterSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(DateRange::Today),
            "week" => Ok(DateRange::Week),
            "month" => Ok(DateRange::Month),
            _ => Err(FilterSpecError::UnknownValue {
                axis: "dateRange",
                value: s.to_string(),
            }),
        }
    }
}

// ============================================================================
// FILTER SPEC
// ============================================================================

/// Active filter axes. `None` disables an axis.
///
/// Deserializes from the UI's filter state, where `"all"` means disabled:
///
/// ```
/// use request_engine::{FilterSpec, TypeFilter};
///
/// let spec: FilterSpec = serde_json::from_str(
///     r#"{"project": "all", "type": "cpr", "archivedBy": "dc"}"#,
/// ).unwrap();
/// assert_eq!(spec.project, None);
/// assert_eq!(spec.request_type, Some(TypeFilter::Cpr));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    #[serde(deserialize_with = "all_or")]
    pub project: Option<String>,
    #[serde(deserialize_with = "all_or")]
    pub department: Option<DeptCode>,
    #[serde(rename = "type", deserialize_with = "all_or")]
    pub request_type: Option<TypeFilter>,
    #[serde(deserialize_with = "all_or")]
    pub status: Option<StatusFilter>,
    #[serde(deserialize_with = "all_or")]
    pub date_range: Option<DateRange>,
    #[serde(deserialize_with = "all_or")]
    pub archived_by: Option<ArchivedBy>,
    /// Submitter scope used by the engineer "personal" view.
    #[serde(deserialize_with = "all_or")]
    pub user: Option<String>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn with_department(mut self, department: DeptCode) -> Self {
        self.department = Some(department);
        self
    }

    pub fn with_type(mut self, request_type: TypeFilter) -> Self {
        self.request_type = Some(request_type);
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn with_archived_by(mut self, by: ArchivedBy) -> Self {
        self.archived_by = Some(by);
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Set one axis from its textual UI name and value; `"all"` clears it.
    pub fn set(&mut self, axis: &str, value: &str) -> Result<(), FilterSpecError> {
        let value = value.trim();
        let disabled = value.is_empty() || value.eq_ignore_ascii_case(ALL);
        match axis {
            "project" => self.project = (!disabled).then(|| value.to_string()),
            "department" => self.department = (!disabled).then(|| DeptCode::from_code(value)),
            "type" => self.request_type = parse_axis(value, disabled)?,
            "status" => self.status = parse_axis(value, disabled)?,
            "dateRange" | "date_range" => self.date_range = parse_axis(value, disabled)?,
            "archivedBy" | "archived_by" => {
                self.archived_by = if disabled {
                    None
                } else {
                    Some(value.parse().map_err(|_| FilterSpecError::UnknownValue {
                        axis: "archivedBy",
                        value: value.to_string(),
                    })?)
                }
            }
            "user" => self.user = (!disabled).then(|| value.to_string()),
            other => return Err(FilterSpecError::UnknownAxis(other.to_string())),
        }
        Ok(())
    }

    /// True when every axis is disabled.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Evaluate the axes against one record.
    pub fn matches(&self, record: &RequestRecord, ctx: &EvalContext) -> bool {
        if let Some(project) = &self.project {
            if &record.project != project {
                return false;
            }
        }
        if let Some(department) = &self.department {
            if &normalize_dept(&record.department) != department {
                return false;
            }
        }
        if let Some(request_type) = &self.request_type {
            if !request_type.matches(record) {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if !status.matches(record) {
                return false;
            }
        }
        if let Some(by) = &self.archived_by {
            if record.archived_by.as_ref() != Some(by) {
                return false;
            }
        }
        if let Some(user) = &self.user {
            if &record.user != user {
                return false;
            }
        }
        if let Some(range) = &self.date_range {
            if !range.contains(record.reference_date(), ctx) {
                return false;
            }
        }
        true
    }
}

fn parse_axis<T: FromStr<Err = FilterSpecError>>(
    value: &str,
    disabled: bool,
) -> Result<Option<T>, FilterSpecError> {
    if disabled {
        Ok(None)
    } else {
        value.parse().map(Some)
    }
}

fn all_or<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.eq_ignore_ascii_case(ALL) => Ok(None),
        Some(v) => v.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

// ============================================================================
// SEARCH
// ============================================================================

/// Lowercased free-text query. Empty queries match everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    needle: String,
}

impl SearchQuery {
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, record: &RequestRecord) -> bool {
        if self.is_empty() {
            return true;
        }
        let hit = |text: &str| text.to_lowercase().contains(&self.needle);

        hit(&format_display_number(record))
            || hit(&format_identifier(&record.id))
            || hit(&record.description)
            || hit(&record.project)
            || hit(&record.user)
            || record.archived_by.is_some_and(|by| hit(by.as_str()))
            || record.downloaded_by.as_deref().is_some_and(hit)
    }
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Records matching every active axis and the query, in input order.
///
/// "Now" is the wall clock in the backend's offset; use
/// [`apply_filters_with`] to pin it.
pub fn apply_filters<'a>(
    records: &'a [RequestRecord],
    spec: &FilterSpec,
    query: &str,
) -> Vec<&'a RequestRecord> {
    apply_filters_with(records, spec, query, &EvalContext::default())
}

/// [`apply_filters`] with an explicit evaluation context.
pub fn apply_filters_with<'a>(
    records: &'a [RequestRecord],
    spec: &FilterSpec,
    query: &str,
    ctx: &EvalContext,
) -> Vec<&'a RequestRecord> {
    let query = SearchQuery::new(query);
    let matched: Vec<&RequestRecord> = records
        .iter()
        .filter(|record| spec.matches(record, ctx) && query.matches(record))
        .collect();

    tracing::trace!(
        total = records.len(),
        matched = matched.len(),
        "applied record filters"
    );
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    fn ctx() -> EvalContext {
        EvalContext::at(DateTime::parse_from_rfc3339("2026-10-18T12:00:00+02:00").unwrap())
    }

    fn sample() -> Vec<RequestRecord> {
        vec![
            RequestRecord::ir("BADYA-CON-D1-IR-ST-001")
                .with_project("D1")
                .with_department("Civil")
                .with_user("ahmed")
                .with_description("Slab rebar level 3")
                .with_sent_at("18-Oct-26 09:00 AM"),
            RequestRecord::cpr("BADYA-CON-D1-CPR-ST-002")
                .with_project("D1")
                .with_department("Civil")
                .with_user("sara")
                .with_done(true)
                .with_archive(ArchivedBy::Dc, "2026-10-10T10:00:00+02:00"),
            RequestRecord::revision("REV-D2-IRREV-001", RevisionSubtype::IrRevision, Some("R1".into()))
                .with_project("D2")
                .with_department("Architectural")
                .with_user("ahmed")
                .with_archive(ArchivedBy::Engineer, "2026-08-01T10:00:00+02:00"),
            RequestRecord::revision("REV-D2-CPRREV-001", RevisionSubtype::CprRevision, Some("R2".into()))
                .with_project("D2")
                .with_department("Structure")
                .with_user("omar")
                .with_downloaded_by("dc.mona"),
        ]
    }

    fn ids(records: &[&RequestRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_empty_spec_keeps_everything() {
        let records = sample();
        let out = apply_filters_with(&records, &FilterSpec::new(), "", &ctx());
        assert_eq!(out.len(), records.len());
        assert!(FilterSpec::new().is_empty());
    }

    #[test]
    fn test_type_axes() {
        let records = sample();
        let run = |t| ids(&apply_filters_with(&records, &FilterSpec::new().with_type(t), "", &ctx()));

        assert_eq!(run(TypeFilter::Ir), vec!["BADYA-CON-D1-IR-ST-001"]);
        assert_eq!(
            run(TypeFilter::Cpr),
            vec!["BADYA-CON-D1-CPR-ST-002", "REV-D2-CPRREV-001"]
        );
        assert_eq!(
            run(TypeFilter::Revision),
            vec!["REV-D2-IRREV-001", "REV-D2-CPRREV-001"]
        );
    }

    #[test]
    fn test_department_uses_normalized_code() {
        let records = sample();
        let spec = FilterSpec::new().with_department(DeptCode::St);
        assert_eq!(
            ids(&apply_filters_with(&records, &spec, "", &ctx())),
            vec![
                "BADYA-CON-D1-IR-ST-001",
                "BADYA-CON-D1-CPR-ST-002",
                "REV-D2-CPRREV-001"
            ]
        );
    }

    #[test]
    fn test_status_and_archived_by() {
        let records = sample();
        let done = FilterSpec::new().with_status(StatusFilter::Completed);
        assert_eq!(
            ids(&apply_filters_with(&records, &done, "", &ctx())),
            vec!["BADYA-CON-D1-CPR-ST-002"]
        );

        let pending = FilterSpec::new().with_status(StatusFilter::Pending);
        assert_eq!(apply_filters_with(&records, &pending, "", &ctx()).len(), 3);

        let by_engineer = FilterSpec::new().with_archived_by(ArchivedBy::Engineer);
        assert_eq!(
            ids(&apply_filters_with(&records, &by_engineer, "", &ctx())),
            vec!["REV-D2-IRREV-001"]
        );
    }

    #[test]
    fn test_date_ranges() {
        let records = sample();
        let run = |r| ids(&apply_filters_with(&records, &FilterSpec::new().with_date_range(r), "", &ctx()));

        // Backend-format sentAt on the same day.
        assert_eq!(run(DateRange::Today), vec!["BADYA-CON-D1-IR-ST-001"]);
        assert_eq!(run(DateRange::Week), vec!["BADYA-CON-D1-IR-ST-001"]);
        // archivedAt 8 days back is inside the month, 2.5 months back is not;
        // the last record has no date at all.
        assert_eq!(
            run(DateRange::Month),
            vec!["BADYA-CON-D1-IR-ST-001", "BADYA-CON-D1-CPR-ST-002"]
        );
    }

    #[test]
    fn test_month_clamps_at_month_end() {
        let ctx = EvalContext::at(DateTime::parse_from_rfc3339("2026-03-31T12:00:00+02:00").unwrap());
        assert!(DateRange::Month.contains(Some("2026-02-28T12:00:00+02:00"), &ctx));
        assert!(!DateRange::Month.contains(Some("2026-02-27T12:00:00+02:00"), &ctx));
        assert!(!DateRange::Month.contains(Some("garbage"), &ctx));
        assert!(!DateRange::Month.contains(None, &ctx));
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let records = sample();
        let spec = FilterSpec::new();
        let run = |q| ids(&apply_filters_with(&records, &spec, q, &ctx()));

        assert_eq!(run("SLAB"), vec!["BADYA-CON-D1-IR-ST-001"]);
        assert_eq!(run("d1-st-001"), vec!["BADYA-CON-D1-IR-ST-001"]);
        assert_eq!(run("rev-cpr-r2"), vec!["REV-D2-CPRREV-001"]);
        assert_eq!(run("mona"), vec!["REV-D2-CPRREV-001"]);
        assert_eq!(run("Engineer"), vec!["REV-D2-IRREV-001"]);
        assert_eq!(run("AHMED").len(), 2);
        assert!(run("nothing-like-this").is_empty());
    }

    #[test]
    fn test_axes_and_query_combine() {
        let records = sample();
        let spec = FilterSpec::new().with_project("D2").with_type(TypeFilter::Revision);
        assert_eq!(
            ids(&apply_filters_with(&records, &spec, "ahmed", &ctx())),
            vec!["REV-D2-IRREV-001"]
        );
    }

    #[test]
    fn test_user_scope() {
        let records = sample();
        let spec = FilterSpec::new().with_user("ahmed");
        assert_eq!(
            ids(&apply_filters_with(&records, &spec, "", &ctx())),
            vec!["BADYA-CON-D1-IR-ST-001", "REV-D2-IRREV-001"]
        );
    }

    #[test]
    fn test_set_axis_from_text() {
        let mut spec = FilterSpec::new();
        spec.set("type", "CPR").unwrap();
        spec.set("department", "st").unwrap();
        spec.set("archivedBy", "dc").unwrap();
        assert_eq!(spec.request_type, Some(TypeFilter::Cpr));
        assert_eq!(spec.department, Some(DeptCode::St));
        assert_eq!(spec.archived_by, Some(ArchivedBy::Dc));

        spec.set("type", "all").unwrap();
        assert_eq!(spec.request_type, None);

        let err = spec.set("status", "later").unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_FILTER_VALUE");
        let err = spec.set("colour", "red").unwrap_err();
        assert_eq!(err, FilterSpecError::UnknownAxis("colour".into()));
    }

    #[test]
    fn test_deserialize_ui_state() {
        let spec: FilterSpec = serde_json::from_str(
            r#"{
                "project": "all",
                "department": "ST",
                "type": "revision",
                "status": "pending",
                "dateRange": "week",
                "archivedBy": "all"
            }"#,
        )
        .unwrap();
        assert_eq!(
            spec,
            FilterSpec::new()
                .with_department(DeptCode::St)
                .with_type(TypeFilter::Revision)
                .with_status(StatusFilter::Pending)
                .with_date_range(DateRange::Week)
        );

        let bad = serde_json::from_str::<FilterSpec>(r#"{"type": "everything"}"#);
        assert!(bad.is_err());
    }
}
