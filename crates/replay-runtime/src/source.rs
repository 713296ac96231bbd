use crate::Result;
use replay_types::{Project, Session, SessionInfo};

/// Access to stored Claude Code sessions.
///
/// Implementations decide what a project id means: a directory for the
/// local filesystem, something else for archived sources.
pub trait SessionSource: Send + Sync {
    /// All projects holding at least one session, most recently used first.
    fn list_projects(&self) -> Result<Vec<Project>>;

    /// Sessions of one project, most recent first.
    fn list_sessions(&self, project_id: &str) -> Result<Vec<SessionInfo>>;

    /// Load a full session by id.
    fn load_session(&self, id: &str) -> Result<Session>;

    /// Resolve a query (path, id, id prefix or slug) to a session.
    fn find_session(&self, query: &str) -> Result<SessionInfo>;
}
