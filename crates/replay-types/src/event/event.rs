use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::payload::{AssistantPayload, SystemNote, UserPayload};

// NOTE: Event Model
//
// One Event per decoded log line. The producing tool evolves its record format
// independently, so everything except the payload shape is optional or defaulted.
//
// The kind is not stored separately: it is derived from the payload variant, so a
// UserMessage can never carry an assistant payload. A payload that failed to parse
// under its expected shape is kept as `None` inside its variant ("absent"), which
// lets the segmenter skip its effect while still honoring flags like `is_meta`.

/// Coarse classification of a decoded line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    UserMessage,
    AssistantMessage,
    SystemNote,
    /// Progress and snapshot records. Filtered out by the decoder.
    Noise,
}

/// Kind-specific content of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum EventPayload {
    User(Option<UserPayload>),
    Assistant(Option<AssistantPayload>),
    System(SystemNote),
    Noise,
}

/// A single decoded record from a session log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Record id (`uuid`)
    pub id: String,

    /// Parent record id; None for conversation roots
    pub parent_id: Option<String>,

    pub session_id: String,

    /// Missing on some snapshot-like records
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Belongs to a background exploration thread, not the main conversation
    #[serde(default)]
    pub is_sidechain: bool,

    /// Synthetic scaffolding injected by the tool, never user-authored
    #[serde(default)]
    pub is_meta: bool,

    pub payload: EventPayload,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self.payload {
            EventPayload::User(_) => EventKind::UserMessage,
            EventPayload::Assistant(_) => EventKind::AssistantMessage,
            EventPayload::System(_) => EventKind::SystemNote,
            EventPayload::Noise => EventKind::Noise,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(payload: EventPayload) -> Event {
        Event {
            id: "e1".to_string(),
            parent_id: None,
            session_id: "s1".to_string(),
            timestamp: None,
            cwd: None,
            git_branch: None,
            slug: None,
            version: None,
            is_sidechain: false,
            is_meta: false,
            payload,
        }
    }

    #[test]
    fn test_kind_follows_payload() {
        assert_eq!(event(EventPayload::User(None)).kind(), EventKind::UserMessage);
        assert_eq!(
            event(EventPayload::Assistant(None)).kind(),
            EventKind::AssistantMessage
        );
        assert_eq!(
            event(EventPayload::System(SystemNote::default())).kind(),
            EventKind::SystemNote
        );
        assert_eq!(event(EventPayload::Noise).kind(), EventKind::Noise);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let original = event(EventPayload::User(Some(UserPayload::Text(
            "hello".to_string(),
        ))));

        let json = serde_json::to_string(&original).unwrap();
        let parsed: Event = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, original);
    }
}
