use url::Url;

/// Resolves an `href`/`src` attribute value against the page URL
///
/// Absolute values are parsed as-is; relative values (`/x`, `x`, `../x`,
/// `//host/x`, `?q`) are joined onto `base` the way a browser would.
/// Surrounding whitespace is ignored.
///
/// # Returns
///
/// * `Some(Url)` - The absolute URL
/// * `None` - The value is empty or cannot be turned into a URL
///
/// # Examples
///
/// ```
/// use site_checker::url::resolve_against;
/// use url::Url;
///
/// let base = Url::parse("https://a.example/p").unwrap();
/// let url = resolve_against(&base, "/x").unwrap();
/// assert_eq!(url.as_str(), "https://a.example/x");
/// ```
pub fn resolve_against(base: &Url, raw: &str) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    // `Url::join` handles both cases: absolute inputs replace the base entirely
    base.join(raw).ok()
}

/// Returns the last path segment of a URL
///
/// Used as the display name of an image. A URL whose path ends in `/`
/// yields an empty name.
///
/// # Examples
///
/// ```
/// use site_checker::url::last_path_segment;
/// use url::Url;
///
/// let url = Url::parse("https://a.example/img/logo.png?v=2").unwrap();
/// assert_eq!(last_path_segment(&url), "logo.png");
/// ```
pub fn last_path_segment(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.last())
        .unwrap_or("")
        .to_string()
}
