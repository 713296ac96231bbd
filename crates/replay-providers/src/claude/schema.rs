use chrono::{DateTime, Utc};
use replay_types::null_as_default;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use serde_json::value::RawValue;

/// One line of a Claude Code session log.
///
/// Only the envelope is decoded eagerly. `message` stays raw until the record
/// type is known, so a malformed message only loses its payload, not the line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClaudeRecord<'a> {
    #[serde(rename = "type")]
    pub record_type: String,
    pub uuid: Option<String>,
    pub parent_uuid: Option<String>,
    pub session_id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub cwd: Option<String>,
    pub git_branch: Option<String>,
    pub slug: Option<String>,
    pub version: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_sidechain: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_meta: bool,
    #[serde(borrow)]
    pub message: Option<&'a RawValue>,

    // System fields
    pub subtype: Option<String>,
    pub duration_ms: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserMessage {
    pub content: UserContent,
}

/// `message.content` of a user record: a plain string or an entry array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum UserContent {
    Text(String),
    Entries(#[serde(deserialize_with = "deserialize_user_entries")] Vec<UserEntry>),
}

/// Entries that fail to decode become `Unknown` so their siblings survive.
fn deserialize_user_entries<'de, D>(deserializer: D) -> Result<Vec<UserEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<Value>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .map(|entry| serde_json::from_value(entry).unwrap_or(UserEntry::Unknown))
        .collect())
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub(crate) enum UserEntry {
    Text {
        #[serde(default, deserialize_with = "null_as_default")]
        text: String,
    },
    ToolResult {
        #[serde(default, deserialize_with = "null_as_default")]
        tool_use_id: String,
        /// String, array of `{type, text}` objects, or absent
        #[serde(default)]
        content: Option<Value>,
        #[serde(default)]
        is_error: Option<bool>,
    },
    #[serde(other)]
    Unknown,
}

// --- Metadata scanner peek shapes ---

/// Minimal view of a record used by the scanner. Message content is kept as a
/// raw slice and only inspected structurally.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PeekRecord<'a> {
    #[serde(rename = "type")]
    pub record_type: Option<String>,
    pub slug: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_meta: bool,
    #[serde(borrow)]
    pub message: Option<PeekMessage<'a>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PeekMessage<'a> {
    pub role: Option<String>,
    pub model: Option<String>,
    #[serde(borrow)]
    pub content: Option<&'a RawValue>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PeekEntry {
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
}
