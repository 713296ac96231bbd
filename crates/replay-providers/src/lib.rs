// Error types
pub mod error;

// Provider implementations
pub mod claude;

// Line framing shared by decoders
pub mod lines;

// Claude Code decode/scan functions
pub use claude::{decode, decode_file, scan, scan_file};

pub use lines::{JsonlLines, MAX_LINE_BYTES};

// Error types
pub use error::{Error, Result};
