pub mod config;
pub mod error;
pub mod loader;
pub mod local;
pub mod source;

pub use config::{Config, resolve_claude_dir};
pub use error::{Error, Result};
pub use loader::{load_session_file, session_info};
pub use local::LocalSource;
pub use source::SessionSource;
