//! Turning typed database rows into plain-text items.

mod item;
mod property;
mod time;

pub use item::{ItemNormalizer, DEFAULT_TAGS_PROPERTY, DEFAULT_TITLE_PROPERTY};
pub use property::{PropertyNormalizer, ROLLUP_INCOMPLETE, ROLLUP_UNSUPPORTED};
pub use time::ViewerClock;
