//! IR Tracker - application shell for the inspection request tracker.
//!
//! Wraps the pure [`request_engine`] with the pieces that touch the outside
//! world:
//! - [`config`] - YAML configuration with environment overrides
//! - [`logging`] - `tracing` subscriber setup
//! - [`session`] - the signed-in user and its view scopes
//! - [`snapshot`] - backend list bodies loaded from disk
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ir_tracker::{snapshot::Snapshot, TrackerConfig};
//! use request_engine::{apply_filters_with, FilterSpec};
//!
//! let config = TrackerConfig::resolve(None)?;
//! let snapshot = Snapshot::load("snapshot.json")?;
//! let records = snapshot.all();
//! let pending = apply_filters_with(&records, &FilterSpec::new(), "slab", &config.eval_context());
//! println!("{} matching records", pending.len());
//! # Ok::<(), ir_tracker::TrackerError>(())
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod snapshot;

pub use config::{ApiEndpoint, TrackerConfig};
pub use error::TrackerError;
pub use session::{RecordsTab, Role, Session, SessionUser};
pub use snapshot::Snapshot;
