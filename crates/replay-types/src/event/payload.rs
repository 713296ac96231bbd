use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Deserialize an explicit `null` as the type's default.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Content of a user record, resolved once at decode time.
///
/// The wire format carries either a plain string or an array of content
/// entries. Arrays holding tool results become `ToolResults`; arrays holding
/// only text (and ignored media) collapse into `Text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserPayload {
    Text(String),
    ToolResults(Vec<ToolResult>),
}

/// Output of one tool invocation, echoed back to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Id of the tool invocation this result answers
    pub tool_use_id: String,
    /// Flattened text content
    pub content: String,
    #[serde(default)]
    pub is_error: bool,
}

/// Content of an assistant record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(default, deserialize_with = "deserialize_content_blocks")]
    pub content: Vec<ContentBlock>,
}

/// Decode content entries one by one; an entry that fails to decode
/// becomes `Unknown` instead of discarding its siblings.
fn deserialize_content_blocks<'de, D>(deserializer: D) -> Result<Vec<ContentBlock>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(entries
        .unwrap_or_default()
        .into_iter()
        .map(|entry| serde_json::from_value(entry).unwrap_or(ContentBlock::Unknown))
        .collect())
}

/// One entry of an assistant message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        #[serde(default, deserialize_with = "null_as_default")]
        text: String,
    },
    Thinking {
        #[serde(default, deserialize_with = "null_as_default")]
        thinking: String,
    },
    ToolUse {
        #[serde(default, deserialize_with = "null_as_default")]
        id: String,
        #[serde(default, deserialize_with = "null_as_default")]
        name: String,
        #[serde(default)]
        input: Value,
    },
    #[serde(other)]
    Unknown,
}

/// Bookkeeping record emitted by the tool (e.g. turn timing).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemNote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f64>,
}

impl SystemNote {
    pub const TURN_DURATION: &'static str = "turn_duration";

    /// Duration carried by a `turn_duration` note, if positive.
    pub fn turn_duration(&self) -> Option<std::time::Duration> {
        if self.subtype.as_deref() != Some(Self::TURN_DURATION) {
            return None;
        }
        self.duration_ms
            .filter(|ms| ms.is_finite() && *ms > 0.0)
            .map(|ms| std::time::Duration::from_millis(ms as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_turn_duration_requires_subtype() {
        let note = SystemNote {
            subtype: Some("turn_duration".to_string()),
            duration_ms: Some(5000.0),
        };
        assert_eq!(note.turn_duration(), Some(Duration::from_secs(5)));

        let other = SystemNote {
            subtype: Some("compact_boundary".to_string()),
            duration_ms: Some(5000.0),
        };
        assert_eq!(other.turn_duration(), None);
    }

    #[test]
    fn test_turn_duration_ignores_non_positive() {
        let zero = SystemNote {
            subtype: Some("turn_duration".to_string()),
            duration_ms: Some(0.0),
        };
        assert_eq!(zero.turn_duration(), None);

        let missing = SystemNote {
            subtype: Some("turn_duration".to_string()),
            duration_ms: None,
        };
        assert_eq!(missing.turn_duration(), None);
    }

    #[test]
    fn test_content_block_unknown_type() {
        let block: ContentBlock =
            serde_json::from_str(r#"{"type":"server_tool_use","id":"x"}"#).unwrap();
        assert_eq!(block, ContentBlock::Unknown);
    }

    #[test]
    fn test_malformed_block_keeps_siblings() {
        let payload: AssistantPayload = serde_json::from_str(
            r#"{"model":"claude-opus-4-6","content":[
                {"type":"text","text":"keep me"},
                {"type":"tool_use","name":"Bash","input":{}},
                {"type":"text","text":7}
            ]}"#,
        )
        .unwrap();

        assert_eq!(payload.model, "claude-opus-4-6");
        assert_eq!(
            payload.content,
            vec![
                ContentBlock::Text { text: "keep me".to_string() },
                ContentBlock::ToolUse {
                    id: String::new(),
                    name: "Bash".to_string(),
                    input: serde_json::json!({}),
                },
                ContentBlock::Unknown,
            ]
        );
    }

    #[test]
    fn test_null_fields_take_defaults() {
        let payload: AssistantPayload = serde_json::from_str(
            r#"{"model":null,"content":[{"type":"tool_use","id":null,"name":"Read","input":null}]}"#,
        )
        .unwrap();

        assert_eq!(payload.model, "");
        assert!(matches!(
            &payload.content[0],
            ContentBlock::ToolUse { id, name, .. } if id.is_empty() && name == "Read"
        ));

        let empty: AssistantPayload = serde_json::from_str(r#"{"content":null}"#).unwrap();
        assert!(empty.content.is_empty());
    }
}
