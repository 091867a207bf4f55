//! Link and image extraction
//!
//! # Traversal Rules
//!
//! The `<body>` subtree is visited depth-first in document order. Each
//! element inherits the location of its parent, except:
//!
//! - `<header>` switches its subtree to [`Location::Header`]
//! - `<footer>` switches its subtree to [`Location::Footer`]
//!
//! With `exclude_header_footer`, those two subtrees are skipped entirely and
//! every remaining candidate is tagged [`Location::Body`].
//!
//! **Produced:**
//! - one [`LinkCandidate`] per `<a>` with a non-empty `href`
//! - one [`ImageCandidate`] per `<img>` with a non-empty `src`
//!
//! Values that cannot be resolved to a URL are skipped.

use crate::extract::node::{Document, ElementNode};
use crate::extract::types::{
    ExtractOptions, Extracted, ImageCandidate, LinkCandidate, LinkType, Location,
};
use crate::url::{last_path_segment, resolve_against};
use url::Url;

/// Per-element traversal state inherited from ancestors
#[derive(Debug, Clone, Copy)]
struct Scope {
    location: Location,
    inside_cta: bool,
}

/// Extracts link and image candidates from a parsed document
///
/// # Arguments
///
/// * `document` - The parsed page
/// * `page_url` - The page's absolute URL, used to resolve relative values
/// * `options` - Which candidates to produce and whether to skip header/footer
///
/// # Example
///
/// ```
/// use site_checker::extract::{extract, Document, ExtractOptions};
/// use url::Url;
///
/// let doc = Document::parse(r#"<a href="/x">X</a><img src="/i/logo.png">"#);
/// let page = Url::parse("https://a.example/p").unwrap();
/// let found = extract(&doc, &page, ExtractOptions::all());
///
/// assert_eq!(found.links[0].href.as_str(), "https://a.example/x");
/// assert_eq!(found.images[0].img_name, "logo.png");
/// ```
pub fn extract(document: &Document, page_url: &Url, options: ExtractOptions) -> Extracted {
    let mut extracted = Extracted::default();

    if !options.check_links && !options.check_images {
        return extracted;
    }

    let scope = Scope {
        location: Location::Body,
        inside_cta: false,
    };
    visit(document.body(), scope, page_url, &options, &mut extracted);

    tracing::debug!(
        "Extracted {} links and {} images from {}",
        extracted.links.len(),
        extracted.images.len(),
        page_url
    );

    extracted
}

fn visit(
    element: &ElementNode,
    parent: Scope,
    page_url: &Url,
    options: &ExtractOptions,
    out: &mut Extracted,
) {
    let location = match element.tag.as_str() {
        "header" | "footer" if options.exclude_header_footer => return,
        "header" => Location::Header,
        "footer" => Location::Footer,
        _ => parent.location,
    };

    let scope = Scope {
        location,
        inside_cta: parent.inside_cta || element.has_class("cta"),
    };

    if options.check_links && element.is("a") {
        if let Some(link) = link_candidate(element, scope, page_url) {
            out.links.push(link);
        }
    }

    if options.check_images && element.is("img") {
        if let Some(image) = image_candidate(element, scope, page_url) {
            out.images.push(image);
        }
    }

    for child in element.child_elements() {
        visit(child, scope, page_url, options, out);
    }
}

fn link_candidate(anchor: &ElementNode, scope: Scope, page_url: &Url) -> Option<LinkCandidate> {
    let raw = anchor.attr("href").filter(|href| !href.is_empty())?;

    let href = match resolve_against(page_url, raw) {
        Some(url) => url,
        None => {
            tracing::debug!("Skipping unresolvable href '{}' on {}", raw, page_url);
            return None;
        }
    };

    Some(LinkCandidate {
        href,
        link_text: anchor.text(),
        aria_label: anchor.attr("aria-label").unwrap_or_default().to_string(),
        target: anchor.attr("target").unwrap_or("_self").to_string(),
        link_type: classify_link(anchor, scope),
        location: scope.location,
    })
}

fn image_candidate(image: &ElementNode, scope: Scope, page_url: &Url) -> Option<ImageCandidate> {
    let raw = image.attr("src").filter(|src| !src.is_empty())?;

    let src = match resolve_against(page_url, raw) {
        Some(url) => url,
        None => {
            tracing::debug!("Skipping unresolvable src '{}' on {}", raw, page_url);
            return None;
        }
    };

    Some(ImageCandidate {
        img_name: last_path_segment(&src),
        alt: image.attr("alt").unwrap_or_default().to_string(),
        location: scope.location,
    })
}

/// Button beats CTA beats plain link
fn classify_link(anchor: &ElementNode, scope: Scope) -> LinkType {
    if anchor.is("button") || anchor.contains_tag("button") {
        LinkType::Button
    } else if scope.inside_cta {
        LinkType::Cta
    } else {
        LinkType::Link
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("https://a.example/p").unwrap()
    }

    fn run(html: &str, options: ExtractOptions) -> Extracted {
        extract(&Document::parse(html), &page_url(), options)
    }

    const LAYOUT: &str = r#"
        <html><body>
            <header>
                <a href="/home">Home</a>
                <img src="/img/logo.png" alt="Logo">
            </header>
            <main>
                <a href="/article">Article</a>
                <img src="https://cdn.example/photos/cat.jpg">
            </main>
            <footer>
                <a href="/privacy">Privacy</a>
            </footer>
        </body></html>
    "#;

    #[test]
    fn test_locations_follow_subtrees() {
        let found = run(LAYOUT, ExtractOptions::all());

        let links: Vec<_> = found
            .links
            .iter()
            .map(|l| (l.href.path().to_string(), l.location))
            .collect();
        assert_eq!(
            links,
            vec![
                ("/home".to_string(), Location::Header),
                ("/article".to_string(), Location::Body),
                ("/privacy".to_string(), Location::Footer),
            ]
        );

        assert_eq!(found.images.len(), 2);
        assert_eq!(found.images[0].location, Location::Header);
        assert_eq!(found.images[1].location, Location::Body);
    }

    #[test]
    fn test_exclude_header_footer() {
        let options = ExtractOptions {
            exclude_header_footer: true,
            ..ExtractOptions::all()
        };
        let found = run(LAYOUT, options);

        assert_eq!(found.links.len(), 1);
        assert_eq!(found.links[0].href.as_str(), "https://a.example/article");
        assert_eq!(found.images.len(), 1);
        assert!(found.links.iter().all(|l| l.location == Location::Body));
        assert!(found.images.iter().all(|i| i.location == Location::Body));
    }

    #[test]
    fn test_each_candidate_reported_once() {
        let found = run(LAYOUT, ExtractOptions::all());
        assert_eq!(found.links.len(), 3);
    }

    #[test]
    fn test_nested_header_excluded() {
        let html = r#"<div><section><header><a href="/deep">Deep</a></header></section></div>"#;
        let options = ExtractOptions {
            exclude_header_footer: true,
            ..ExtractOptions::all()
        };
        assert!(run(html, options).links.is_empty());
    }

    #[test]
    fn test_relative_href_resolved() {
        let found = run(r#"<a href="/x">X</a>"#, ExtractOptions::links_only());
        assert_eq!(found.links[0].href.as_str(), "https://a.example/x");
    }

    #[test]
    fn test_empty_href_skipped() {
        let found = run(r#"<a href="">Empty</a><a>None</a>"#, ExtractOptions::links_only());
        assert!(found.links.is_empty());
    }

    #[test]
    fn test_link_defaults() {
        let found = run(r#"<a href="/x">  Click   me </a>"#, ExtractOptions::links_only());
        let link = &found.links[0];

        assert_eq!(link.link_text, "Click me");
        assert_eq!(link.aria_label, "");
        assert_eq!(link.target, "_self");
        assert_eq!(link.link_type, LinkType::Link);
    }

    #[test]
    fn test_link_attributes() {
        let html = r#"<a href="/x" aria-label="Open docs" target="_blank">Docs</a>"#;
        let found = run(html, ExtractOptions::links_only());
        let link = &found.links[0];

        assert_eq!(link.aria_label, "Open docs");
        assert_eq!(link.target, "_blank");
    }

    #[test]
    fn test_button_link_type() {
        let html = r#"<a href="/buy"><button>Buy</button></a>"#;
        let found = run(html, ExtractOptions::links_only());
        assert_eq!(found.links[0].link_type, LinkType::Button);
    }

    #[test]
    fn test_button_beats_cta() {
        let html = r#"<div class="cta"><a href="/buy"><span><button>Buy</button></span></a></div>"#;
        let found = run(html, ExtractOptions::links_only());
        assert_eq!(found.links[0].link_type, LinkType::Button);
    }

    #[test]
    fn test_cta_ancestor_link_type() {
        let html = r#"<section class="hero cta"><p><a href="/start">Start</a></p></section>"#;
        let found = run(html, ExtractOptions::links_only());
        assert_eq!(found.links[0].link_type, LinkType::Cta);
    }

    #[test]
    fn test_cta_class_on_anchor() {
        let html = r#"<a class="cta" href="/start">Start</a>"#;
        let found = run(html, ExtractOptions::links_only());
        assert_eq!(found.links[0].link_type, LinkType::Cta);
    }

    #[test]
    fn test_plain_link_type() {
        let html = r#"<div class="ctas"><a href="/x">X</a></div>"#;
        let found = run(html, ExtractOptions::links_only());
        assert_eq!(found.links[0].link_type, LinkType::Link);
    }

    #[test]
    fn test_image_name_and_alt() {
        let html = r#"<img src="assets/hero.webp?w=800" alt="Hero"><img src="">"#;
        let options = ExtractOptions {
            check_images: true,
            ..ExtractOptions::default()
        };
        let found = run(html, options);

        assert!(found.links.is_empty());
        assert_eq!(found.images.len(), 1);
        assert_eq!(found.images[0].img_name, "hero.webp");
        assert_eq!(found.images[0].alt, "Hero");
    }

    #[test]
    fn test_links_disabled() {
        let options = ExtractOptions {
            check_images: true,
            ..ExtractOptions::default()
        };
        let found = run(LAYOUT, options);
        assert!(found.links.is_empty());
        assert_eq!(found.images.len(), 2);
    }

    #[test]
    fn test_nothing_requested() {
        assert!(run(LAYOUT, ExtractOptions::default()).is_empty());
    }

    #[test]
    fn test_document_order() {
        let html = r#"<a href="/1">1</a><div><a href="/2">2</a></div><a href="/3">3</a>"#;
        let found = run(html, ExtractOptions::links_only());
        let paths: Vec<_> = found.links.iter().map(|l| l.href.path()).collect();
        assert_eq!(paths, vec!["/1", "/2", "/3"]);
    }
}
