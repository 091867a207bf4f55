//! Typed document tree
//!
//! The extractor walks this tree rather than the parser's DOM directly. A node
//! is either an element with a tag, attributes and children, or a run of text.

use scraper::{ElementRef, Html};
use std::collections::HashMap;

/// A node in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(ElementNode),
    Text(String),
}

/// An element with its attributes and children in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    /// Lowercase local tag name (`a`, `img`, `header`, ...)
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub children: Vec<Node>,
}

impl ElementNode {
    /// Returns an attribute value if present
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Returns true if the `class` attribute contains `class`
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|value| value.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }

    /// Iterates over direct element children, skipping text
    pub fn child_elements(&self) -> impl Iterator<Item = &ElementNode> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Returns true if any descendant element has the given tag
    pub fn contains_tag(&self, tag: &str) -> bool {
        self.child_elements()
            .any(|child| child.is(tag) || child.contains_tag(tag))
    }

    /// Concatenated text of all descendants, whitespace collapsed and trimmed
    pub fn text(&self) -> String {
        let mut raw = String::new();
        self.collect_text(&mut raw);
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }

    fn from_element(element: ElementRef<'_>) -> Self {
        let value = element.value();
        let attributes = value
            .attrs()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        let children = element
            .children()
            .filter_map(|child| match child.value() {
                scraper::Node::Element(_) => {
                    ElementRef::wrap(child).map(|el| Node::Element(Self::from_element(el)))
                }
                scraper::Node::Text(text) => {
                    let text: &str = text;
                    Some(Node::Text(text.to_owned()))
                }
                _ => None,
            })
            .collect();

        Self {
            tag: value.name().to_ascii_lowercase(),
            attributes,
            children,
        }
    }
}

/// A parsed HTML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: ElementNode,
}

impl Document {
    /// Parses an HTML document
    ///
    /// Parsing is lenient: malformed markup is repaired the way browsers do,
    /// so this never fails. The result always has `<html>` and `<body>`.
    pub fn parse(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        Self {
            root: ElementNode::from_element(parsed.root_element()),
        }
    }

    /// The `<html>` element
    pub fn root(&self) -> &ElementNode {
        &self.root
    }

    /// The `<body>` element, falling back to the root
    pub fn body(&self) -> &ElementNode {
        self.root
            .child_elements()
            .find(|child| child.is("body"))
            .unwrap_or(&self.root)
    }
}
