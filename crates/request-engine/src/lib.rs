//! Request Engine - normalization, filtering and aggregation over request records.
//!
//! This crate holds everything the tracker views compute from the record
//! lists fetched from the backend:
//! - Ingestion - backend JSON ([`RawRequestRecord`](request_types::RawRequestRecord)) to [`RequestRecord`]
//! - Identifier formatting - `BADYA-CON-D1-IR-ST-001` to `D1-ST-001`
//! - Department classification - free text to a short code
//! - Filtering - multi-axis [`FilterSpec`] plus free-text [`SearchQuery`]
//! - Grouping, statistics and the recent-activity feed
//! - Number allocation for new requests and revisions
//!
//! # Architecture
//!
//! ```text
//! RecordPayload ── ingest ──► Vec<RequestRecord>
//!                                  │
//!               apply_filters(spec, query)
//!                                  │
//!                          Vec<&RequestRecord>
//!                 ┌────────────────┼────────────────┐
//!          group_by_project   compute_stats   recent_activity
//! ```
//!
//! Every operation is pure and synchronous. Records are borrowed, never
//! mutated; the only clock access goes through [`EvalContext`].
//!
//! # Example
//!
//! ```
//! use request_engine::{apply_filters, compute_stats, FilterSpec, TypeFilter};
//! use request_types::RequestRecord;
//!
//! let records = vec![
//!     RequestRecord::ir("BADYA-CON-D1-IR-ST-001").with_project("D1"),
//!     RequestRecord::cpr("BADYA-CON-D1-CPR-ST-002").with_project("D1").with_done(true),
//! ];
//!
//! let spec = FilterSpec::new().with_type(TypeFilter::Cpr);
//! let cprs = apply_filters(&records, &spec, "");
//! assert_eq!(cprs.len(), 1);
//!
//! let stats = compute_stats(cprs);
//! assert_eq!(stats.completed, 1);
//! ```

mod activity;
mod department;
mod error;
mod filter;
mod group;
mod identifier;
mod ingest;
mod label;
pub mod numbering;
mod options;
mod stats;
pub mod timestamp;

// Re-exports
pub use activity::{merge_activity, recent_activity, recent_activity_with, ActivityEntry, DEFAULT_ACTIVITY_LIMIT};
pub use department::{normalize_dept, DeptCode};
pub use error::{FilterSpecError, NumberingError};
pub use filter::{
    apply_filters, apply_filters_with, DateRange, FilterSpec, SearchQuery, StatusFilter,
    TypeFilter, ALL,
};
pub use group::{group_by_project, ProjectGroup, ProjectGroups};
pub use identifier::{format_display_number, format_identifier, revision_display_number};
pub use ingest::{ingest, ingest_all, ingest_payload};
pub use label::type_label;
pub use numbering::{allocate_request_number, ir_dept_code, AllocatedNumber, IrDept, ProjectCounters};
pub use options::FilterOptions;
pub use stats::{compute_stats, DashboardSummary, RequestStats};
pub use timestamp::EvalContext;

pub use request_types::RequestRecord;
