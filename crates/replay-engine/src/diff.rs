//! Line-level diff between two text blobs.
//!
//! Produces the full edit script (every line of both inputs, tagged as
//! context, added or removed) so callers can render it however they like:
//! ```text
//!  context line
//! -removed line
//! +added line
//! ```

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    Context,
    Added,
    Removed,
}

/// One line of an edit script, borrowing its text from the diffed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiffLine<'a> {
    pub kind: DiffKind,
    pub text: &'a str,
}

impl<'a> DiffLine<'a> {
    pub fn context(text: &'a str) -> Self {
        Self {
            kind: DiffKind::Context,
            text,
        }
    }

    pub fn added(text: &'a str) -> Self {
        Self {
            kind: DiffKind::Added,
            text,
        }
    }

    pub fn removed(text: &'a str) -> Self {
        Self {
            kind: DiffKind::Removed,
            text,
        }
    }

    /// Unified-diff style marker for this line.
    pub fn prefix(&self) -> char {
        match self.kind {
            DiffKind::Context => ' ',
            DiffKind::Added => '+',
            DiffKind::Removed => '-',
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffStat {
    pub added: usize,
    pub removed: usize,
}

/// Count added and removed lines in an edit script.
pub fn diff_stat(lines: &[DiffLine<'_>]) -> DiffStat {
    lines.iter().fold(DiffStat::default(), |mut stat, line| {
        match line.kind {
            DiffKind::Added => stat.added += 1,
            DiffKind::Removed => stat.removed += 1,
            DiffKind::Context => {}
        }
        stat
    })
}

/// Compute a minimal line-level edit script turning `old` into `new`.
///
/// Lines are split on `\n`; an empty string has no lines. When the LCS
/// backtrack has a choice between an insertion and a deletion it takes the
/// insertion, so within a changed region removed lines come first in the
/// returned (forward) order.
pub fn diff_lines<'a>(old: &'a str, new: &'a str) -> Vec<DiffLine<'a>> {
    let old_lines = split_lines(old);
    let new_lines = split_lines(new);
    let old_len = old_lines.len();
    let new_len = new_lines.len();

    // LCS table
    let mut dp = vec![vec![0u32; new_len + 1]; old_len + 1];
    for (i, old_line) in old_lines.iter().enumerate() {
        for (j, new_line) in new_lines.iter().enumerate() {
            dp[i + 1][j + 1] = if old_line == new_line {
                dp[i][j] + 1
            } else {
                dp[i + 1][j].max(dp[i][j + 1])
            };
        }
    }

    let mut script = Vec::with_capacity(old_len.max(new_len));
    let mut i = old_len;
    let mut j = new_len;
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && old_lines[i - 1] == new_lines[j - 1] {
            script.push(DiffLine::context(old_lines[i - 1]));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || dp[i][j - 1] >= dp[i - 1][j]) {
            script.push(DiffLine::added(new_lines[j - 1]));
            j -= 1;
        } else {
            script.push(DiffLine::removed(old_lines[i - 1]));
            i -= 1;
        }
    }
    script.reverse();
    script
}

fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        Vec::new()
    } else {
        text.split('\n').collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rebuild<'a>(script: &[DiffLine<'a>], skip: DiffKind) -> String {
        script
            .iter()
            .filter(|line| line.kind != skip)
            .map(|line| line.text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_identical_inputs_are_all_context() {
        let text = "fn main() {\n    println!(\"hi\");\n}";
        let script = diff_lines(text, text);

        assert_eq!(script.len(), 3);
        assert!(script.iter().all(|l| l.kind == DiffKind::Context));
        assert_eq!(diff_stat(&script), DiffStat::default());
    }

    #[test]
    fn test_empty_sides() {
        assert!(diff_lines("", "").is_empty());
        assert_eq!(diff_lines("a", ""), vec![DiffLine::removed("a")]);
        assert_eq!(diff_lines("", "a"), vec![DiffLine::added("a")]);
    }

    #[test]
    fn test_replacement_lists_removal_first() {
        assert_eq!(
            diff_lines("a", "b"),
            vec![DiffLine::removed("a"), DiffLine::added("b")]
        );
    }

    #[test]
    fn test_middle_change_keeps_surrounding_context() {
        let script = diff_lines("one\ntwo\nthree", "one\n2\nthree");

        assert_eq!(
            script,
            vec![
                DiffLine::context("one"),
                DiffLine::removed("two"),
                DiffLine::added("2"),
                DiffLine::context("three"),
            ]
        );
        assert_eq!(
            diff_stat(&script),
            DiffStat {
                added: 1,
                removed: 1
            }
        );
    }

    #[test]
    fn test_script_reconstructs_both_inputs() {
        let old = "use std::fs;\n\nfn read() {\n    todo!()\n}\n";
        let new = "use std::fs;\nuse std::io;\n\nfn read() -> io::Result<()> {\n    Ok(())\n}\n";
        let script = diff_lines(old, new);

        assert_eq!(rebuild(&script, DiffKind::Added), old);
        assert_eq!(rebuild(&script, DiffKind::Removed), new);
    }

    #[test]
    fn test_trailing_newline_is_an_empty_line() {
        let script = diff_lines("a\n", "a");
        assert_eq!(script, vec![DiffLine::context("a"), DiffLine::removed("")]);
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(DiffLine::context("x").prefix(), ' ');
        assert_eq!(DiffLine::added("x").prefix(), '+');
        assert_eq!(DiffLine::removed("x").prefix(), '-');
    }
}
