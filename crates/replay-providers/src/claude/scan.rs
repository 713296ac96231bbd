use replay_types::SessionScan;
use serde_json::value::RawValue;

use super::schema::{PeekEntry, PeekRecord};

/// Markers the tool wraps around `!cmd` output when it echoes it back as a
/// user record.
const SHELL_OUTPUT_MARKERS: [&str; 2] = ["bash-stdout", "bash-stderr"];

/// Single-pass accumulator for session metadata.
#[derive(Debug, Default)]
pub(crate) struct ScanState {
    scan: SessionScan,
}

impl ScanState {
    /// Fold one line into the summary. Malformed lines are ignored.
    pub(crate) fn push_line(&mut self, line: &[u8]) {
        let Ok(record) = serde_json::from_slice::<PeekRecord<'_>>(line) else {
            return;
        };

        if let Some(ts) = record.timestamp {
            if self.scan.first_timestamp.is_none() {
                self.scan.first_timestamp = Some(ts);
            }
            self.scan.last_timestamp = Some(ts);
        }

        if self.scan.slug.is_none()
            && let Some(slug) = record.slug.filter(|s| !s.is_empty())
        {
            self.scan.slug = Some(slug);
        }

        let Some(message) = record.message else {
            return;
        };

        match record.record_type.as_deref() {
            Some("user") => {
                // Expanded skill prompts and other scaffolding
                if record.is_meta || message.role.as_deref() != Some("user") {
                    return;
                }
                if message.content.is_some_and(is_user_prompt) {
                    self.scan.turn_count += 1;
                }
            }
            Some("assistant") => {
                if self.scan.model.is_none()
                    && let Some(model) = message.model.filter(|m| !m.is_empty())
                {
                    self.scan.model = Some(model);
                }
            }
            _ => {}
        }
    }

    pub(crate) fn finish(self) -> SessionScan {
        self.scan
    }
}

/// Structural check on raw user content: a string that is not shell output,
/// or an array whose first entry is not a tool result.
fn is_user_prompt(content: &RawValue) -> bool {
    let raw = content.get();
    match raw.as_bytes().first() {
        Some(b'"') => !SHELL_OUTPUT_MARKERS.iter().any(|m| raw.contains(m)),
        Some(b'[') => serde_json::from_str::<Vec<PeekEntry>>(raw)
            .ok()
            .and_then(|entries| entries.into_iter().next())
            .is_some_and(|first| first.entry_type.as_deref() != Some("tool_result")),
        _ => false,
    }
}
