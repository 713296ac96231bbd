use crate::{Error, Result};
use replay_engine::assemble_session;
use replay_providers::{decode_file, scan_file};
use replay_types::{Session, SessionInfo};
use std::path::Path;

/// Decode and segment one session log.
///
/// A log without a single turn is reported as [`Error::EmptySession`].
pub fn load_session_file(path: &Path) -> Result<Session> {
    let events = decode_file(path).map_err(|source| Error::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let mut session = assemble_session(&events);
    if session.id.is_empty() {
        session.id = session_id_from_path(path);
    }
    if session.is_empty() {
        return Err(Error::EmptySession(session.id));
    }

    session.path = Some(path.to_path_buf());
    tracing::debug!(
        path = %path.display(),
        events = events.len(),
        turns = session.turns.len(),
        "loaded session"
    );

    Ok(session)
}

/// Scan one log into a listing entry.
pub fn session_info(path: &Path) -> Result<SessionInfo> {
    let unreadable = |source| Error::Unreadable {
        path: path.to_path_buf(),
        source,
    };

    let scan = scan_file(path).map_err(unreadable)?;
    let file_size = std::fs::metadata(path)
        .map_err(|err| unreadable(err.into()))?
        .len();

    Ok(SessionInfo {
        id: session_id_from_path(path),
        path: path.to_path_buf(),
        file_size,
        scan,
    })
}

/// Session id as encoded in the log file name.
pub fn session_id_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
