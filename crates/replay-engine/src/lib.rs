// Engine module - turn reconstruction and text diffing
// This layer sits between decoded events (providers) and the runtime/CLI

pub mod diff;
pub mod segment;

pub use diff::{DiffKind, DiffLine, DiffStat, diff_lines, diff_stat};
pub use segment::{Segmenter, UserIntent, classify_user};

use replay_types::{Event, Session, Turn};

// Façade API - stable entry points for the runtime layer

/// Segment events into turns.
pub fn segment(events: &[Event]) -> Vec<Turn> {
    assemble_session(events).turns
}

/// Segment events into a session with its metadata filled in.
pub fn assemble_session(events: &[Event]) -> Session {
    events
        .iter()
        .fold(Segmenter::new(), Segmenter::step)
        .finish()
}
