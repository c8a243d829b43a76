//! docqa-extract
//!
//! Content extraction for display: markdown cleanup, highlight sentence
//! selection, structured sub-content (lists, key/values, sections), and
//! per-hit formatting under a character budget.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod clean;
pub mod display;
pub mod highlights;
pub mod structured;

pub use clean::{clean_text, truncate_chars};
pub use display::format_for_display;
pub use highlights::extract_highlights;
pub use structured::{extract_structured_content, StructuredContent};
