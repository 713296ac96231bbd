use std::fmt;

/// Result type for replay-providers operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading a session log.
///
/// Per-line decode problems never show up here: they are absorbed by the
/// decoder and scanner. Only stream-level failures are reported.
#[derive(Debug)]
pub enum Error {
    /// IO operation failed
    Io(std::io::Error),

    /// A single line exceeded the supported size
    LineTooLong { line: usize, limit: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::LineTooLong { line, limit } => {
                write!(f, "line {} exceeds the {} byte limit", line, limit)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::LineTooLong { .. } => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
