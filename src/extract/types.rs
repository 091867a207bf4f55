use serde::Serialize;
use std::fmt;
use url::Url;

/// Coarse classification of where in the document a candidate was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Header,
    Body,
    Footer,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Body => "body",
            Self::Footer => "footer",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Heuristic classification of an anchor's behavioral role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    /// Plain hyperlink
    Link,
    /// Anchor that is or wraps a `<button>`
    Button,
    /// Anchor marked, or nested inside something marked, with class `cta`
    Cta,
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Button => "button",
            Self::Cta => "cta",
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An anchor discovered on the page, before resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
    /// Absolute URL of the anchor's `href`
    pub href: Url,

    /// Anchor text with whitespace collapsed
    pub link_text: String,

    /// `aria-label` attribute, empty when absent
    pub aria_label: String,

    /// `target` attribute, `_self` when absent
    pub target: String,

    pub link_type: LinkType,

    pub location: Location,
}

/// An image discovered on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    /// Last path segment of the resolved `src`
    pub img_name: String,

    /// `alt` attribute, empty when absent
    pub alt: String,

    pub location: Location,
}

/// Which candidates to extract and how
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractOptions {
    pub check_links: bool,
    pub check_images: bool,
    /// Prune `<header>`/`<footer>` subtrees and tag everything else `body`
    pub exclude_header_footer: bool,
}

impl ExtractOptions {
    /// Links and images, header and footer included
    pub fn all() -> Self {
        Self {
            check_links: true,
            check_images: true,
            exclude_header_footer: false,
        }
    }

    /// Links only, header and footer included
    pub fn links_only() -> Self {
        Self {
            check_links: true,
            check_images: false,
            exclude_header_footer: false,
        }
    }
}

/// Everything extracted from one page, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    pub links: Vec<LinkCandidate>,
    pub images: Vec<ImageCandidate>,
}

impl Extracted {
    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.images.is_empty()
    }
}
