//! Ignore-rule filtering and HTML rendering of normalized items.

mod filter;
mod render;

pub use filter::filter_items;
pub use render::{display_text, render_digest};
