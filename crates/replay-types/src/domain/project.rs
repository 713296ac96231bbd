use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Session-level summary produced without segmenting the log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionScan {
    pub slug: Option<String>,
    pub model: Option<String>,
    pub first_timestamp: Option<DateTime<Utc>>,
    pub last_timestamp: Option<DateTime<Utc>>,
    /// Approximate number of user-authored prompts.
    pub turn_count: usize,
}

/// Listing entry for one session log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Session id (log file stem).
    pub id: String,
    pub path: PathBuf,
    pub file_size: u64,
    #[serde(flatten)]
    pub scan: SessionScan,
}

impl SessionInfo {
    /// Abbreviated id for tables.
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(8) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }
}

/// A directory of session logs belonging to one working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Display name (last path component).
    pub name: String,
    /// Working directory the sessions were recorded in.
    pub path: String,
    /// Raw, hyphen-encoded directory name.
    pub dir_name: String,
    /// Absolute path of the project directory.
    pub dir_path: PathBuf,
    /// Number of session logs.
    pub sessions: usize,
    /// Most recent modification time of any session log.
    pub last_used: Option<DateTime<Utc>>,
}

impl Project {
    /// Whether `query` names this project by display name, raw directory
    /// name, decoded path or directory path.
    pub fn matches(&self, query: &str) -> bool {
        self.name == query
            || self.dir_name == query
            || self.path == query
            || self.dir_path.as_os_str() == query
    }
}
