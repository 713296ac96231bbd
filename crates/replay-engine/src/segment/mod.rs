mod classify;
mod segmenter;

pub use classify::{UserIntent, classify_user};
pub use segmenter::Segmenter;
