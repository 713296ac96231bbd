use crate::config::resolve_claude_dir;
use crate::loader::{load_session_file, session_id_from_path, session_info};
use crate::source::SessionSource;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use replay_providers::scan_file;
use replay_types::{Project, Session, SessionInfo};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Sessions stored by Claude Code on the local filesystem:
/// `<claude_dir>/projects/<encoded-cwd>/<session-id>.jsonl`.
#[derive(Debug, Clone)]
pub struct LocalSource {
    claude_dir: PathBuf,
}

impl LocalSource {
    pub fn new(claude_dir: impl Into<PathBuf>) -> Self {
        Self {
            claude_dir: claude_dir.into(),
        }
    }

    /// Build a source from an optional explicit directory, falling back to the
    /// environment, the config file and finally `~/.claude`.
    pub fn resolve(explicit_path: Option<&str>) -> Result<Self> {
        let claude_dir = resolve_claude_dir(explicit_path)?;
        tracing::debug!(claude_dir = %claude_dir.display(), "resolved Claude directory");
        Ok(Self::new(claude_dir))
    }

    pub fn claude_dir(&self) -> &Path {
        &self.claude_dir
    }

    pub fn projects_dir(&self) -> PathBuf {
        self.claude_dir.join("projects")
    }

    fn project_dirs(&self) -> Result<Vec<PathBuf>> {
        Ok(list_dir(&self.projects_dir())?
            .into_iter()
            .filter(|path| path.is_dir())
            .collect())
    }

    fn all_session_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for dir in self.project_dirs()? {
            files.extend(session_files(&dir));
        }
        Ok(files)
    }

    /// Resolve a query to a log file: existing path, exact id, id prefix,
    /// then slug.
    pub fn locate(&self, query: &str) -> Result<PathBuf> {
        let as_path = Path::new(query);
        if as_path.is_file() && is_session_file(as_path) {
            return Ok(as_path.to_path_buf());
        }

        if query.is_empty() {
            return Err(Error::NotFound(query.to_string()));
        }

        let files = self.all_session_files()?;

        if let Some(path) = files.iter().find(|p| session_id_from_path(p) == query) {
            return Ok(path.clone());
        }

        if let Some(path) = files
            .iter()
            .find(|p| session_id_from_path(p).starts_with(query))
        {
            return Ok(path.clone());
        }

        // Slowest: needs a scan of every file
        for path in &files {
            match scan_file(path) {
                Ok(scan) if scan.slug.as_deref() == Some(query) => return Ok(path.clone()),
                Ok(_) => {}
                Err(err) => {
                    tracing::trace!(path = %path.display(), error = %err, "skipping during slug search")
                }
            }
        }

        Err(Error::NotFound(query.to_string()))
    }

    fn project_dir(&self, project_id: &str) -> Result<PathBuf> {
        let as_path = Path::new(project_id);
        if as_path.is_dir() {
            return Ok(as_path.to_path_buf());
        }

        self.list_projects()?
            .into_iter()
            .find(|project| project.matches(project_id))
            .map(|project| project.dir_path)
            .ok_or_else(|| Error::ProjectNotFound(project_id.to_string()))
    }
}

impl SessionSource for LocalSource {
    fn list_projects(&self) -> Result<Vec<Project>> {
        let mut projects = Vec::new();

        for dir_path in self.project_dirs()? {
            let files = session_files(&dir_path);
            if files.is_empty() {
                continue;
            }

            let last_used = files
                .iter()
                .filter_map(|path| std::fs::metadata(path).and_then(|m| m.modified()).ok())
                .max()
                .map(DateTime::<Utc>::from);

            let dir_name = dir_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();

            projects.push(Project {
                name: decode_dir_name(&dir_name),
                path: decode_dir_path(&dir_name),
                dir_name,
                dir_path,
                sessions: files.len(),
                last_used,
            });
        }

        projects.sort_by(|a, b| b.last_used.cmp(&a.last_used));
        Ok(projects)
    }

    fn list_sessions(&self, project_id: &str) -> Result<Vec<SessionInfo>> {
        let dir = self.project_dir(project_id)?;
        let mut sessions = Vec::new();

        for path in session_files(&dir) {
            match session_info(&path) {
                Ok(info) if info.scan.turn_count > 0 => sessions.push(info),
                Ok(_) => {}
                Err(err) => tracing::warn!(error = %err, "skipping session"),
            }
        }

        sessions.sort_by(|a, b| b.scan.last_timestamp.cmp(&a.scan.last_timestamp));
        Ok(sessions)
    }

    fn load_session(&self, id: &str) -> Result<Session> {
        let path = self.locate(id)?;
        load_session_file(&path)
    }

    fn find_session(&self, query: &str) -> Result<SessionInfo> {
        let path = self.locate(query)?;
        session_info(&path)
    }
}

/// Direct children of a directory in file name order. A missing or unreadable
/// root is an error; unreadable children are skipped.
fn list_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        match entry {
            Ok(entry) => paths.push(entry.into_path()),
            Err(err) if err.depth() == 0 => return Err(err.into()),
            Err(err) => tracing::warn!(error = %err, "skipping unreadable entry"),
        }
    }

    Ok(paths)
}

fn session_files(dir: &Path) -> Vec<PathBuf> {
    match list_dir(dir) {
        Ok(paths) => paths
            .into_iter()
            .filter(|path| path.is_file() && is_session_file(path))
            .collect(),
        Err(err) => {
            tracing::warn!(dir = %dir.display(), error = %err, "cannot read project directory");
            Vec::new()
        }
    }
}

fn is_session_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "jsonl")
}

/// Convert a hyphen-encoded directory name back to the path it was created
/// for, e.g. `-Users-me-code-app` -> `/Users/me/code/app`.
///
/// The encoding is lossy: hyphens that were part of a path component come
/// back as separators.
pub fn decode_dir_path(dir_name: &str) -> String {
    let parts: Vec<&str> = dir_name.split('-').filter(|p| !p.is_empty()).collect();
    format!("/{}", parts.join("/"))
}

/// Display name for a project directory: last component of its decoded path.
pub fn decode_dir_name(dir_name: &str) -> String {
    let path = decode_dir_path(dir_name);
    match path.rsplit_once('/') {
        Some((_, name)) if !name.is_empty() => name.to_string(),
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_dir_path() {
        assert_eq!(decode_dir_path("-Users-me-code-app"), "/Users/me/code/app");
        assert_eq!(decode_dir_path("-tmp--nested"), "/tmp/nested");
        assert_eq!(decode_dir_path(""), "/");
    }

    #[test]
    fn test_decode_dir_name() {
        assert_eq!(decode_dir_name("-Users-me-code-app"), "app");
        assert_eq!(decode_dir_name("-"), "/");
    }

    #[test]
    fn test_missing_projects_dir_is_error() {
        let source = LocalSource::new("/definitely/not/a/claude/dir");
        assert!(matches!(source.list_projects(), Err(Error::Io(_))));
    }
}
