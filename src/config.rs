//! Tracker YAML configuration
//!
//! Defines the serde schema for `config/tracker.yaml` and the environment
//! overlay applied on top of it.

use std::path::Path;
use std::time::Duration;

use chrono::FixedOffset;
use request_engine::timestamp::{offset_from_hours, BACKEND_UTC_OFFSET_HOURS};
use request_engine::{EvalContext, DEFAULT_ACTIVITY_LIMIT};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, TrackerError};

pub const ENV_API_URL: &str = "IR_TRACKER_API_URL";
pub const ENV_RECENT_LIMIT: &str = "IR_TRACKER_RECENT_LIMIT";
pub const ENV_POLL_SECS: &str = "IR_TRACKER_POLL_SECS";
pub const ENV_UTC_OFFSET: &str = "IR_TRACKER_UTC_OFFSET";

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Backend base URL; endpoints are resolved relative to it.
    pub api_base_url: String,

    /// Length of the dashboard's recent-activity feed
    pub recent_activity_limit: usize,

    /// Refresh period for list views
    pub poll_interval_secs: u64,

    /// Offset the backend writes naive timestamps in
    pub utc_offset_hours: i32,

    /// `tracing` directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/".to_string(),
            recent_activity_limit: DEFAULT_ACTIVITY_LIMIT,
            poll_interval_secs: 30,
            utc_offset_hours: BACKEND_UTC_OFFSET_HOURS,
            log_filter: "ir_tracker=info,request_engine=info".to_string(),
        }
    }
}

impl TrackerConfig {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| TrackerError::io(path, e))?;
        let config = Self::from_yaml(&content)?;
        tracing::debug!(path = %path.display(), "loaded tracker config");
        Ok(config)
    }

    /// Load configuration from YAML string (for testing)
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: TrackerConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an optional file, then apply `.env` and process environment.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();
        let config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.with_env(|key| std::env::var(key).ok())
    }

    /// Overlay values from an environment lookup.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(limit) = lookup(ENV_RECENT_LIMIT) {
            self.recent_activity_limit = parse_env(ENV_RECENT_LIMIT, &limit)?;
        }
        if let Some(secs) = lookup(ENV_POLL_SECS) {
            self.poll_interval_secs = parse_env(ENV_POLL_SECS, &secs)?;
        }
        if let Some(hours) = lookup(ENV_UTC_OFFSET) {
            self.utc_offset_hours = parse_env(ENV_UTC_OFFSET, &hours)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject values the views cannot work with.
    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err(TrackerError::InvalidConfig {
                key: "utc_offset_hours",
                value: self.utc_offset_hours.to_string(),
            });
        }
        if self.poll_interval_secs == 0 {
            return Err(TrackerError::InvalidConfig {
                key: "poll_interval_secs",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// Parsed base URL, always ending in `/`.
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(self.api_base_url.trim())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TrackerError::InvalidConfig {
                key: "api_base_url",
                value: self.api_base_url.clone(),
            });
        }
        Ok(with_trailing_slash(url))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn utc_offset(&self) -> FixedOffset {
        offset_from_hours(self.utc_offset_hours)
    }

    /// Evaluation context pinned to the wall clock in the configured offset.
    pub fn eval_context(&self) -> EvalContext {
        EvalContext::now_in(self.utc_offset())
    }

    /// Absolute URL of a backend endpoint.
    pub fn endpoint_url(&self, endpoint: &ApiEndpoint) -> Result<Url> {
        let mut url = self.base_url()?.join(&endpoint.path())?;
        if let ApiEndpoint::RecordsForUser { user, department } = endpoint {
            url.query_pairs_mut()
                .append_pair("user", user)
                .append_pair("dept", department);
        }
        Ok(url)
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| TrackerError::InvalidConfig {
        key,
        value: value.to_string(),
    })
}

/// `Url::join` drops the last path segment unless the base ends with `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Logical backend endpoints.
///
/// Mutations that act on one record (`archive`, `delete`, `mark done`) take
/// the record id in the request body, so their paths are fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiEndpoint {
    ListRequests,
    CreateRequest,
    MarkRequestDone,
    DeleteRequest,
    ListRevisions,
    CreateRevision,
    MarkRevisionDone,
    DeleteRevision,
    Archive,
    Unarchive,
    ArchiveByDc,
    ArchiveByEngineer,
    RecordsForUser { user: String, department: String },
    ListProjects,
    ListUsers,
    CreateUser,
    DeleteUser(String),
    Health,
}

impl ApiEndpoint {
    /// Every endpoint without parameters, for listing.
    pub const FIXED: [ApiEndpoint; 16] = [
        ApiEndpoint::ListRequests,
        ApiEndpoint::CreateRequest,
        ApiEndpoint::MarkRequestDone,
        ApiEndpoint::DeleteRequest,
        ApiEndpoint::ListRevisions,
        ApiEndpoint::CreateRevision,
        ApiEndpoint::MarkRevisionDone,
        ApiEndpoint::DeleteRevision,
        ApiEndpoint::Archive,
        ApiEndpoint::Unarchive,
        ApiEndpoint::ArchiveByDc,
        ApiEndpoint::ArchiveByEngineer,
        ApiEndpoint::ListProjects,
        ApiEndpoint::ListUsers,
        ApiEndpoint::CreateUser,
        ApiEndpoint::Health,
    ];

    pub fn method(&self) -> &'static str {
        match self {
            ApiEndpoint::ListRequests
            | ApiEndpoint::ListRevisions
            | ApiEndpoint::ArchiveByDc
            | ApiEndpoint::ArchiveByEngineer
            | ApiEndpoint::RecordsForUser { .. }
            | ApiEndpoint::ListProjects
            | ApiEndpoint::ListUsers
            | ApiEndpoint::Health => "GET",
            ApiEndpoint::DeleteUser(_) => "DELETE",
            _ => "POST",
        }
    }

    /// Path relative to the API base.
    pub fn path(&self) -> String {
        match self {
            ApiEndpoint::ListRequests | ApiEndpoint::CreateRequest => "irs".into(),
            ApiEndpoint::MarkRequestDone => "irs/mark-done".into(),
            ApiEndpoint::DeleteRequest => "irs/delete".into(),
            ApiEndpoint::ListRevisions | ApiEndpoint::CreateRevision => "revs".into(),
            ApiEndpoint::MarkRevisionDone => "revs/mark-done".into(),
            ApiEndpoint::DeleteRevision => "revs/delete".into(),
            ApiEndpoint::Archive => "archive".into(),
            ApiEndpoint::Unarchive => "unarchive".into(),
            ApiEndpoint::ArchiveByDc => "archive/dc".into(),
            ApiEndpoint::ArchiveByEngineer => "archive/engineer".into(),
            ApiEndpoint::RecordsForUser { .. } => "irs-by-user-and-dept".into(),
            ApiEndpoint::ListProjects => "projects".into(),
            ApiEndpoint::ListUsers | ApiEndpoint::CreateUser => "users".into(),
            ApiEndpoint::DeleteUser(username) => format!("users/{}", encode_segment(username)),
            ApiEndpoint::Health => "health".into(),
        }
    }
}

fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod config_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_load_config() {
        let yaml = r#"
api_base_url: "https://tracker.example.com/api"
recent_activity_limit: 5
"#;
        let config = TrackerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.base_url().unwrap().as_str(), "https://tracker.example.com/api/");
        assert_eq!(config.recent_activity_limit, 5);
        assert_eq!(config.poll_interval_secs, 30); // default
        assert_eq!(config.utc_offset_hours, 2); // default
    }

    #[test]
    fn test_env_overlay() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_URL, "http://10.0.0.5:8080"),
            (ENV_POLL_SECS, "45"),
        ]);
        let config = TrackerConfig::default()
            .with_env(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.base_url().unwrap().as_str(), "http://10.0.0.5:8080/");
        assert_eq!(config.poll_interval(), Duration::from_secs(45));
        assert_eq!(config.recent_activity_limit, 10);
    }

    #[test]
    fn test_env_rejects_bad_values() {
        let err = TrackerConfig::default()
            .with_env(|k| (k == ENV_RECENT_LIMIT).then(|| "ten".to_string()))
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_CONFIG");

        let err = TrackerConfig::default()
            .with_env(|k| (k == ENV_UTC_OFFSET).then(|| "30".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("utc_offset_hours"));
    }

    #[test]
    fn test_rejects_non_http_base() {
        let err = TrackerConfig::from_yaml("api_base_url: ftp://host/").unwrap_err();
        assert_eq!(err.code(), "INVALID_CONFIG");
        assert_eq!(TrackerConfig::from_yaml("api_base_url: not a url").unwrap_err().code(), "URL");
    }

    #[test]
    fn test_endpoint_urls() {
        let config = TrackerConfig::from_yaml("api_base_url: http://host:5000/api").unwrap();
        let url = |e: ApiEndpoint| config.endpoint_url(&e).unwrap().to_string();

        assert_eq!(url(ApiEndpoint::ListRequests), "http://host:5000/api/irs");
        assert_eq!(url(ApiEndpoint::ArchiveByDc), "http://host:5000/api/archive/dc");
        assert_eq!(
            url(ApiEndpoint::DeleteUser("eng ahmed".into())),
            "http://host:5000/api/users/eng%20ahmed"
        );
        assert_eq!(
            url(ApiEndpoint::RecordsForUser {
                user: "ahmed".into(),
                department: "Civil/Structure".into(),
            }),
            "http://host:5000/api/irs-by-user-and-dept?user=ahmed&dept=Civil%2FStructure"
        );
        assert_eq!(ApiEndpoint::DeleteUser("x".into()).method(), "DELETE");
        assert_eq!(ApiEndpoint::Archive.method(), "POST");
    }
}
