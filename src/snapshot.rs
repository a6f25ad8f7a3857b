//! Record lists captured from the backend and saved to disk.
//!
//! A snapshot file holds one or more list-endpoint bodies merged into one
//! JSON object (`{"irs": [...], "revs": [...], "archive": [...]}`). Loading
//! normalizes every entry once; views then borrow from the snapshot.

use std::path::Path;

use request_engine::{ingest_all, DashboardSummary};
use request_types::{RecordPayload, RequestRecord};

use crate::error::{Result, TrackerError};

/// Normalized records, kept in the three lists the backend serves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub requests: Vec<RequestRecord>,
    pub revisions: Vec<RequestRecord>,
    pub archive: Vec<RequestRecord>,
}

impl Snapshot {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| TrackerError::io(path, e))?;
        let snapshot = Self::from_json(&content)?;
        tracing::info!(
            path = %path.display(),
            requests = snapshot.requests.len(),
            revisions = snapshot.revisions.len(),
            archive = snapshot.archive.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let payload: RecordPayload = serde_json::from_str(json)?;
        Ok(Self::from_payload(payload))
    }

    pub fn from_payload(mut payload: RecordPayload) -> Self {
        payload.mark_revisions();
        let RecordPayload { irs, revs, archive } = payload;
        Self {
            requests: ingest_all(irs),
            revisions: ingest_all(revs),
            archive: ingest_all(archive),
        }
    }

    /// Active requests followed by active revisions.
    pub fn active(&self) -> impl Iterator<Item = &RequestRecord> {
        self.requests.iter().chain(self.revisions.iter())
    }

    /// Every record, archive last.
    pub fn all(&self) -> Vec<RequestRecord> {
        self.active().chain(self.archive.iter()).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.requests.len() + self.revisions.len() + self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dashboard(&self) -> DashboardSummary {
        DashboardSummary::compute(&self.requests, &self.revisions, &self.archive)
    }
}
