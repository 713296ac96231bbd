pub mod diff;
pub mod list;
pub mod scan;
pub mod show;
