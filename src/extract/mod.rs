//! Content extraction module
//!
//! This module turns the page being checked into link and image candidates:
//! - Fetching the page HTML
//! - Parsing it into a typed node tree
//! - Walking the tree and classifying anchors and images

mod extractor;
mod node;
mod page;
mod types;

pub use extractor::extract;
pub use node::{Document, ElementNode, Node};
pub use page::{load_page, PageFetcher};
pub use types::{ExtractOptions, Extracted, ImageCandidate, LinkCandidate, LinkType, Location};
