use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

// ==========================================
// 1. Session (entire conversation)
// ==========================================

/// Conversation reconstructed from one session log.
///
/// A session is never mutated after it is returned by the loader, so it can be
/// shared read-only between consumers (e.g. behind an `Arc`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Session identifier (`sessionId` of the first record carrying one).
    pub id: String,
    /// Human-friendly session name assigned by the tool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Version of the producing tool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Log file the session was loaded from, when loaded from disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// First model seen in any assistant message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Working directory of the first turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    /// Git branch of the first turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
    /// Timestamp of the first turn.
    pub start_time: Option<DateTime<Utc>>,
    /// Timestamp of the last turn.
    pub end_time: Option<DateTime<Utc>>,

    /// User-initiated turns in order, numbered from 1.
    pub turns: Vec<Turn>,
}

impl Session {
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Sum of all recorded turn durations.
    pub fn total_duration(&self) -> Duration {
        self.turns.iter().filter_map(|t| t.duration).sum()
    }
}

// ==========================================
// 2. Turn (user-initiated interaction unit)
// ==========================================

/// How a turn was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOrigin {
    /// A typed prompt
    #[default]
    Prompt,
    /// A shell escape (`!cmd`)
    Shell,
    /// A slash command (`/name`)
    SlashCommand,
}

/// One user-initiated exchange: the triggering message and all assistant and
/// tool activity up to the next user-initiated message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// 1-based position in the session.
    pub number: usize,
    /// Text shown as the user's input. `!cmd` for shell escapes, `/name` for
    /// slash commands.
    pub user_text: String,
    #[serde(default)]
    pub origin: TurnOrigin,
    pub timestamp: Option<DateTime<Utc>>,
    /// Wall-clock duration reported by the tool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
    pub blocks: Vec<Block>,
}

impl Turn {
    pub fn new(number: usize, user_text: impl Into<String>, origin: TurnOrigin) -> Self {
        Self {
            number,
            user_text: user_text.into(),
            origin,
            timestamp: None,
            duration: None,
            model: None,
            cwd: None,
            git_branch: None,
            blocks: Vec::new(),
        }
    }

    /// Tool invocation in this turn with the given id.
    pub fn tool_use(&self, id: &str) -> Option<&Block> {
        self.blocks
            .iter()
            .find(|b| matches!(b, Block::ToolUse { id: use_id, .. } if use_id == id))
    }
}

// ==========================================
// 3. Block (renderable unit within a turn)
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Text {
        text: String,
    },
    Thinking {
        text: String,
    },
    ToolUse {
        name: String,
        id: String,
        input: Value,
    },
    /// Result of a tool invocation. `id` usually matches an earlier `ToolUse`
    /// in the same turn, but unmatched results are kept.
    ToolResult {
        id: String,
        text: String,
        is_error: bool,
    },
}

impl Block {
    pub fn text(text: impl Into<String>) -> Self {
        Block::Text { text: text.into() }
    }

    /// Short label for the block type.
    pub fn label(&self) -> &'static str {
        match self {
            Block::Text { .. } => "text",
            Block::Thinking { .. } => "thinking",
            Block::ToolUse { .. } => "tool_use",
            Block::ToolResult { .. } => "tool_result",
        }
    }
}
