//! Request Types - Level 1 Foundation Types
//!
//! Pure data structures for the inspection request tracker. Every other crate in
//! the workspace builds on these; this crate depends on nothing in the workspace.
//!
//! ## Contents
//!
//! - [`RequestRecord`] - normalized IR / CPR / revision record
//! - [`RecordKind`] - tagged union carrying the per-kind fields
//! - [`RawRequestRecord`] - the backend's JSON shape, before normalization
//! - Small closed enums ([`RequestType`], [`RevisionSubtype`], [`ArchivedBy`])
//!
//! ## Rules
//!
//! 1. **NO EVALUATION LOGIC** - formatting, filtering and counting live in
//!    `request-engine`
//! 2. **SERIALIZABLE** - every type round-trips through serde
//! 3. **IMMUTABLE BY CONVENTION** - consumers read and project records, they
//!    never mutate backend state through them

mod error;
mod raw;
mod record;

pub use error::RecordError;
pub use raw::{RawRequestRecord, RecordPayload};
pub use record::{ArchivedBy, RecordKind, RequestRecord, RequestType, RevisionSubtype};

/// Project key used when a record carries no project.
pub const UNKNOWN_PROJECT: &str = "Unknown";
