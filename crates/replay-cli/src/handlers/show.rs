use crate::format::{format_duration, format_time, one_line};
use crate::types::OutputFormat;
use anyhow::Result;
use replay_engine::{DiffStat, diff_lines, diff_stat};
use replay_runtime::SessionSource;
use replay_types::{Block, Session, Turn, TurnOrigin};
use serde_json::Value;

const PREVIEW_CHARS: usize = 120;

pub fn handle(
    source: &dyn SessionSource,
    query: &str,
    full: bool,
    format: OutputFormat,
) -> Result<()> {
    let session = source.load_session(query)?;
    tracing::debug!(id = %session.id, turns = session.turns.len(), "showing session");

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    print_header(&session);
    for turn in &session.turns {
        println!();
        print_turn(turn, full);
    }
    Ok(())
}

fn print_header(session: &Session) {
    match &session.slug {
        Some(slug) => println!("Session {} ({})", session.id, slug),
        None => println!("Session {}", session.id),
    }
    if let Some(model) = &session.model {
        println!("  model:   {}", model);
    }
    if let Some(version) = &session.version {
        println!("  version: {}", version);
    }
    if let Some(cwd) = &session.cwd {
        match &session.git_branch {
            Some(branch) => println!("  cwd:     {} ({})", cwd, branch),
            None => println!("  cwd:     {}", cwd),
        }
    }
    println!("  started: {}", format_time(session.start_time));
    println!(
        "  turns:   {}, {} total",
        session.turns.len(),
        format_duration(session.total_duration())
    );
}

fn print_turn(turn: &Turn, full: bool) {
    let mut meta = Vec::new();
    if let Some(duration) = turn.duration {
        meta.push(format_duration(duration));
    }
    if let Some(model) = &turn.model {
        meta.push(model.clone());
    }

    let user_text = if full {
        turn.user_text.clone()
    } else {
        one_line(&turn.user_text, PREVIEW_CHARS)
    };
    let mut heading = format!("Turn {} [{}] {}", turn.number, origin_marker(turn.origin), user_text);
    if !meta.is_empty() {
        heading.push_str(&format!("  ({})", meta.join(", ")));
    }
    println!("{}", heading);

    for block in &turn.blocks {
        let (label, body) = describe_block(turn, block, full);
        if full {
            println!("  {}", label);
            for line in body.lines() {
                println!("    {}", line);
            }
        } else {
            println!("  {:<12} {}", label, one_line(&body, PREVIEW_CHARS));
        }
    }
}

fn origin_marker(origin: TurnOrigin) -> &'static str {
    match origin {
        TurnOrigin::Prompt => "prompt",
        TurnOrigin::Shell => "shell",
        TurnOrigin::SlashCommand => "command",
    }
}

fn describe_block(turn: &Turn, block: &Block, full: bool) -> (&'static str, String) {
    let body = match block {
        Block::Text { text } | Block::Thinking { text } => text.clone(),
        Block::ToolUse { name, input, .. } => match FileEdit::from_tool_use(name, input) {
            Some(edit) if full => edit.render(turn.cwd.as_deref()),
            Some(edit) => format!("{} {}", name, short_path(edit.path, turn.cwd.as_deref())),
            None => format!("{} {}", name, input),
        },
        Block::ToolResult { text, is_error: true, .. } => return ("tool_error", text.clone()),
        // A successful Edit reports its line counts instead of the tool's ack
        Block::ToolResult { id, text, .. } => {
            let edit = turn.tool_use(id).and_then(|tool_use| match tool_use {
                Block::ToolUse { name, input, .. } => FileEdit::from_tool_use(name, input),
                _ => None,
            });
            match edit {
                Some(edit) => edit_summary(edit.stat()),
                None => text.clone(),
            }
        }
    };
    (block.label(), body)
}

/// String replacement requested through the `Edit` tool.
struct FileEdit<'a> {
    path: &'a str,
    old: &'a str,
    new: &'a str,
}

impl<'a> FileEdit<'a> {
    fn from_tool_use(name: &str, input: &'a Value) -> Option<Self> {
        if name != "Edit" {
            return None;
        }
        Some(Self {
            path: input.get("file_path").and_then(Value::as_str).unwrap_or_default(),
            old: input.get("old_string")?.as_str()?,
            new: input.get("new_string")?.as_str()?,
        })
    }

    fn stat(&self) -> DiffStat {
        diff_stat(&diff_lines(self.old, self.new))
    }

    /// Path header followed by the unified-style diff lines.
    fn render(&self, cwd: Option<&str>) -> String {
        let mut out = vec![format!("Edit {}", short_path(self.path, cwd))];
        out.extend(
            diff_lines(self.old, self.new)
                .iter()
                .map(|line| format!("{}{}", line.prefix(), line.text)),
        );
        out.join("\n")
    }
}

fn edit_summary(stat: DiffStat) -> String {
    if stat.removed == 0 {
        format!("Added {} lines", stat.added)
    } else {
        format!("Added {} lines, removed {} lines", stat.added, stat.removed)
    }
}

/// Path relative to the working directory when it lies inside it.
fn short_path<'a>(path: &'a str, cwd: Option<&str>) -> &'a str {
    cwd.and_then(|cwd| path.strip_prefix(cwd))
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn edit_turn() -> Turn {
        let mut turn = Turn::new(1, "fix it", TurnOrigin::Prompt);
        turn.cwd = Some("/work/app".to_string());
        turn.blocks = vec![
            Block::ToolUse {
                name: "Edit".to_string(),
                id: "toolu_1".to_string(),
                input: json!({
                    "file_path": "/work/app/src/lib.rs",
                    "old_string": "fn a() {}\nfn b() {}",
                    "new_string": "fn a() {}\nfn c() {}\nfn d() {}",
                }),
            },
            Block::ToolResult {
                id: "toolu_1".to_string(),
                text: "The file has been updated.".to_string(),
                is_error: false,
            },
        ];
        turn
    }

    #[test]
    fn test_describe_tool_blocks() {
        let turn = Turn::new(1, "read", TurnOrigin::Prompt);
        let tool_use = Block::ToolUse {
            name: "Read".to_string(),
            id: "toolu_1".to_string(),
            input: json!({"file_path": "a.rs"}),
        };
        assert_eq!(
            describe_block(&turn, &tool_use, false),
            ("tool_use", r#"Read {"file_path":"a.rs"}"#.to_string())
        );

        let failed = Block::ToolResult {
            id: "toolu_1".to_string(),
            text: "boom".to_string(),
            is_error: true,
        };
        assert_eq!(
            describe_block(&turn, &failed, false),
            ("tool_error", "boom".to_string())
        );
    }

    #[test]
    fn test_edit_renders_diff() {
        let turn = edit_turn();

        assert_eq!(
            describe_block(&turn, &turn.blocks[0], true),
            (
                "tool_use",
                "Edit src/lib.rs\n fn a() {}\n-fn b() {}\n+fn c() {}\n+fn d() {}".to_string()
            )
        );
        assert_eq!(
            describe_block(&turn, &turn.blocks[0], false),
            ("tool_use", "Edit src/lib.rs".to_string())
        );
        assert_eq!(
            describe_block(&turn, &turn.blocks[1], false),
            ("tool_result", "Added 2 lines, removed 1 lines".to_string())
        );
    }

    #[test]
    fn test_edit_summary_wording() {
        assert_eq!(edit_summary(DiffStat { added: 3, removed: 0 }), "Added 3 lines");
        assert_eq!(
            edit_summary(DiffStat { added: 1, removed: 2 }),
            "Added 1 lines, removed 2 lines"
        );
    }

    #[test]
    fn test_edit_without_strings_falls_back_to_input() {
        let turn = Turn::new(1, "x", TurnOrigin::Prompt);
        let block = Block::ToolUse {
            name: "Edit".to_string(),
            id: "toolu_1".to_string(),
            input: json!({"file_path": "a.rs"}),
        };
        assert_eq!(
            describe_block(&turn, &block, true),
            ("tool_use", r#"Edit {"file_path":"a.rs"}"#.to_string())
        );
    }

    #[test]
    fn test_short_path() {
        assert_eq!(short_path("/work/app/src/lib.rs", Some("/work/app")), "src/lib.rs");
        assert_eq!(short_path("/work/application/x", Some("/work/app")), "/work/application/x");
        assert_eq!(short_path("/etc/hosts", None), "/etc/hosts");
    }
}
