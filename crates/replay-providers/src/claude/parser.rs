use replay_types::{
    AssistantPayload, Event, EventPayload, SystemNote, ToolResult, UserPayload,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_json::value::RawValue;

use super::schema::{ClaudeRecord, UserContent, UserEntry, UserMessage};

/// Decode one line into an event.
///
/// Returns None for lines that are not a JSON record or whose `type` is not
/// recognized. Unknown types are dropped like malformed lines so that newer
/// log formats degrade gracefully.
pub(crate) fn parse_line(line: &[u8]) -> Option<Event> {
    let repaired;
    let record: ClaudeRecord<'_> = match serde_json::from_slice(line) {
        Ok(record) => record,
        Err(err) => {
            let retry = std::str::from_utf8(line).ok().and_then(replace_lone_surrogates);
            match retry {
                Some(text) => {
                    repaired = text;
                    match serde_json::from_str(&repaired) {
                        Ok(record) => record,
                        Err(err) => {
                            tracing::trace!(error = %err, "skipping malformed line");
                            return None;
                        }
                    }
                }
                None => {
                    tracing::trace!(error = %err, "skipping malformed line");
                    return None;
                }
            }
        }
    };

    let payload = match record.record_type.as_str() {
        "user" => EventPayload::User(record.message.and_then(parse_user_message)),
        "assistant" => EventPayload::Assistant(record.message.and_then(parse_assistant_message)),
        "system" => EventPayload::System(SystemNote {
            subtype: record.subtype,
            duration_ms: record.duration_ms,
        }),
        "progress" | "file-history-snapshot" => EventPayload::Noise,
        other => {
            tracing::trace!(record_type = other, "skipping unrecognized record type");
            return None;
        }
    };

    Some(Event {
        id: record.uuid.unwrap_or_default(),
        parent_id: record.parent_uuid,
        session_id: record.session_id.unwrap_or_default(),
        timestamp: record.timestamp,
        cwd: record.cwd,
        git_branch: record.git_branch,
        slug: record.slug,
        version: record.version,
        is_sidechain: record.is_sidechain,
        is_meta: record.is_meta,
        payload,
    })
}

fn parse_user_message(raw: &RawValue) -> Option<UserPayload> {
    let message: UserMessage = from_str_lossy(raw.get())?;

    let payload = match message.content {
        UserContent::Text(text) => UserPayload::Text(text),
        UserContent::Entries(entries) => {
            let has_results = entries
                .iter()
                .any(|e| matches!(e, UserEntry::ToolResult { .. }));

            if has_results {
                UserPayload::ToolResults(
                    entries
                        .into_iter()
                        .filter_map(|entry| match entry {
                            UserEntry::ToolResult {
                                tool_use_id,
                                content,
                                is_error,
                            } => Some(ToolResult {
                                tool_use_id,
                                content: flatten_tool_content(content),
                                is_error: is_error.unwrap_or(false),
                            }),
                            _ => None,
                        })
                        .collect(),
                )
            } else {
                // Prompts with attachments arrive as arrays; keep only the text
                let texts: Vec<String> = entries
                    .into_iter()
                    .filter_map(|entry| match entry {
                        UserEntry::Text { text } if !text.is_empty() => Some(text),
                        _ => None,
                    })
                    .collect();
                UserPayload::Text(texts.join("\n"))
            }
        }
    };

    Some(payload)
}

fn parse_assistant_message(raw: &RawValue) -> Option<AssistantPayload> {
    from_str_lossy(raw.get())
}

/// Decode JSON text, retrying once with lone UTF-16 surrogate escapes
/// replaced by U+FFFD.
fn from_str_lossy<T: DeserializeOwned>(text: &str) -> Option<T> {
    match serde_json::from_str(text) {
        Ok(value) => Some(value),
        Err(err) => {
            let repaired = replace_lone_surrogates(text)?;
            tracing::trace!(error = %err, "retrying message with lone surrogates replaced");
            serde_json::from_str(&repaired).ok()
        }
    }
}

/// Rewrite `\uXXXX` escapes naming an unpaired surrogate as `\uFFFD`.
///
/// Returns None when the text holds no such escape.
fn replace_lone_surrogates(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut replaced = false;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'\\' {
            i += 1;
            continue;
        }
        let Some(unit) = escaped_unit(bytes, i) else {
            // Any other escape, including an escaped backslash
            i += 2;
            continue;
        };
        match unit {
            0xD800..=0xDBFF if matches!(escaped_unit(bytes, i + 6), Some(0xDC00..=0xDFFF)) => {
                i += 12;
            }
            0xD800..=0xDFFF => {
                out.push_str(&text[copied..i]);
                out.push_str("\\uFFFD");
                i += 6;
                copied = i;
                replaced = true;
            }
            _ => i += 6,
        }
    }

    if !replaced {
        return None;
    }
    out.push_str(&text[copied..]);
    Some(out)
}

/// Code unit of a `\uXXXX` escape starting at `at`.
fn escaped_unit(bytes: &[u8], at: usize) -> Option<u16> {
    let escape = bytes.get(at..at + 6)?;
    if escape[0] != b'\\' || escape[1] != b'u' {
        return None;
    }
    let hex = std::str::from_utf8(&escape[2..]).ok()?;
    u16::from_str_radix(hex, 16).ok()
}

/// Flatten tool result content into display text.
fn flatten_tool_content(content: Option<Value>) -> String {
    match content {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text,
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.get("text").and_then(Value::as_str))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        Some(other) => other.to_string(),
    }
}
