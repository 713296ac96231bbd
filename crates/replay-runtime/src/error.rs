use std::fmt;
use std::path::PathBuf;

/// Result type for replay-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// A session log could not be opened or read to the end
    Unreadable {
        path: PathBuf,
        source: replay_providers::Error,
    },

    /// The log decoded fine but produced no turns
    EmptySession(String),

    /// No session matched the query
    NotFound(String),

    /// No project matched the query
    ProjectNotFound(String),

    /// Directory listing failed
    Io(std::io::Error),

    /// Configuration error
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Unreadable { path, source } => {
                write!(f, "file unreadable: {}: {}", path.display(), source)
            }
            Error::EmptySession(id) => write!(f, "session has no turns: {}", id),
            Error::NotFound(query) => write!(f, "session not found: {}", query),
            Error::ProjectNotFound(query) => write!(f, "project not found: {}", query),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Unreadable { source, .. } => Some(source),
            Error::Io(err) => Some(err),
            Error::EmptySession(_)
            | Error::NotFound(_)
            | Error::ProjectNotFound(_)
            | Error::Config(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::Io(err.into())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}
