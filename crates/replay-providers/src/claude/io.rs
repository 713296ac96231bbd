use crate::Result;
use crate::lines::{JsonlLines, MAX_LINE_BYTES};
use replay_types::{Event, EventKind, SessionScan};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::parser::parse_line;
use super::scan::ScanState;

/// Decode a Claude Code JSONL session file into events.
pub fn decode_file(path: &Path) -> Result<Vec<Event>> {
    let file = File::open(path)?;
    decode(BufReader::new(file))
}

/// Decode a JSONL stream into events.
///
/// Malformed lines and unrecognized record types are skipped. Noise records
/// (progress, file history snapshots) and sidechain records are filtered out,
/// so every returned event belongs to the main conversation. Order is
/// preserved.
pub fn decode<R: BufRead>(reader: R) -> Result<Vec<Event>> {
    decode_with_limit(reader, MAX_LINE_BYTES)
}

/// [`decode`] with a custom per-line size limit.
pub fn decode_with_limit<R: BufRead>(reader: R, limit: usize) -> Result<Vec<Event>> {
    let mut lines = JsonlLines::with_limit(reader, limit);
    let mut events = Vec::new();
    let mut skipped = 0usize;
    let mut filtered = 0usize;

    while let Some(line) = lines.next_line()? {
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        match parse_line(line) {
            Some(event) if event.kind() == EventKind::Noise || event.is_sidechain => {
                filtered += 1;
            }
            Some(event) => events.push(event),
            None => skipped += 1,
        }
    }

    tracing::debug!(
        lines = lines.line_number(),
        events = events.len(),
        skipped,
        filtered,
        "decoded session log"
    );

    Ok(events)
}

/// Extract session metadata from a file without building events.
pub fn scan_file(path: &Path) -> Result<SessionScan> {
    let file = File::open(path)?;
    scan(BufReader::new(file))
}

/// Extract session metadata from a JSONL stream in a single pass.
pub fn scan<R: BufRead>(reader: R) -> Result<SessionScan> {
    let mut lines = JsonlLines::new(reader);
    let mut state = ScanState::default();

    while let Some(line) = lines.next_line()? {
        if line.is_empty() {
            continue;
        }
        state.push_line(line);
    }

    Ok(state.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_decode_filters_noise_and_sidechain() {
        let input = r#"{"type":"progress","parentUuid":"a","uuid":"b","timestamp":"2026-02-13T12:18:22.000Z","isSidechain":false}
{"type":"file-history-snapshot","messageId":"c","isSidechain":false}
{"type":"user","parentUuid":null,"uuid":"d","sessionId":"s","timestamp":"2026-02-13T12:18:22.000Z","message":{"role":"user","content":"test"},"isSidechain":false}
{"type":"user","parentUuid":null,"uuid":"e","sessionId":"s","timestamp":"2026-02-13T12:18:22.000Z","message":{"role":"user","content":"side"},"isSidechain":true}"#;

        let events = decode(input.as_bytes()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "d");
    }

    #[test]
    fn test_decode_skips_blank_and_malformed_lines() {
        let input = "\n   \n{broken\n{\"type\":\"user\",\"uuid\":\"u\",\"message\":{\"role\":\"user\",\"content\":\"ok\"}}\n";

        let events = decode(input.as_bytes()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "u");
    }

    #[test]
    fn test_decode_line_limit_is_a_read_failure() {
        let input = "{\"type\":\"user\",\"uuid\":\"u\"}\n{\"type\":\"user\",\"uuid\":\"a-very-long-id\"}\n";

        let err = decode_with_limit(input.as_bytes(), 30).unwrap_err();
        assert!(matches!(err, Error::LineTooLong { line: 2, .. }));
    }

    #[test]
    fn test_decode_file_missing() {
        let err = decode_file(Path::new("/definitely/not/here.jsonl")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
