pub mod io;
pub(crate) mod parser;
pub(crate) mod scan;
pub(crate) mod schema;

pub use self::io::{decode, decode_file, decode_with_limit, scan, scan_file};
