//! URL handling module for Site-Checker
//!
//! Resolves attribute values found in a page to absolute URLs and derives
//! display names from them.

mod resolve;

pub use resolve::{last_path_segment, resolve_against};
