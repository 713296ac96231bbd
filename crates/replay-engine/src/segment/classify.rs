use regex::Regex;
use replay_types::{ToolResult, UserPayload};
use std::sync::LazyLock;

// Markers the tool embeds in synthetic user records.
static BASH_INPUT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<bash-input>([\s\S]*)</bash-input>$").unwrap());
static BASH_STDOUT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<bash-stdout>([\s\S]*?)</bash-stdout>").unwrap());
static BASH_STDERR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<bash-stderr>([\s\S]*?)</bash-stderr>").unwrap());
static COMMAND_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<command-name>(/[^<]+)</command-name>").unwrap());

/// What a user record means for turn segmentation.
///
/// Variants are listed in precedence order: when a record could match more
/// than one, the earlier variant wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIntent<'a> {
    /// Meta scaffolding; never touches a turn
    Meta,
    /// Output of a shell escape, stdout and stderr joined (may be empty)
    ShellOutput(String),
    /// A shell escape command (`!cmd`)
    ShellInput(&'a str),
    /// Tool results to attach to the open turn
    ToolResults(&'a [ToolResult]),
    /// Slash command, carrying the canonical `/name`
    SlashCommand(&'a str),
    /// A typed prompt
    Prompt(&'a str),
    /// Nothing to act on (empty text or unparseable payload)
    Empty,
}

/// Classify a user record. Total over all inputs.
pub fn classify_user(is_meta: bool, payload: Option<&UserPayload>) -> UserIntent<'_> {
    if is_meta {
        return UserIntent::Meta;
    }

    let text = match payload {
        None => return UserIntent::Empty,
        Some(UserPayload::ToolResults(results)) => return UserIntent::ToolResults(results),
        Some(UserPayload::Text(text)) => text.as_str(),
    };

    if let Some(output) = shell_output(text) {
        return UserIntent::ShellOutput(output);
    }

    if let Some(command) = BASH_INPUT_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
    {
        return UserIntent::ShellInput(command.as_str());
    }

    if let Some(name) = COMMAND_NAME_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
    {
        return UserIntent::SlashCommand(name.as_str());
    }

    if text.is_empty() {
        UserIntent::Empty
    } else {
        UserIntent::Prompt(text)
    }
}

/// Join stdout and stderr of a shell output record, or None when the text
/// carries neither marker.
fn shell_output(text: &str) -> Option<String> {
    let stdout = capture(&BASH_STDOUT_REGEX, text);
    let stderr = capture(&BASH_STDERR_REGEX, text);
    if stdout.is_none() && stderr.is_none() {
        return None;
    }

    let parts: Vec<&str> = [stdout, stderr]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect();
    Some(parts.join("\n"))
}

fn capture<'t>(regex: &Regex, text: &'t str) -> Option<&'t str> {
    regex
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
