use url::Url;

/// Normalizes a raw anchor href against the page it was found on
///
/// # Normalization Rules
///
/// 1. Trim surrounding whitespace; reject empty hrefs
/// 2. Reject in-page anchors (hrefs starting with `#`)
/// 3. Resolve hrefs starting with `/` against the base URL
/// 4. Accept only absolute `http`/`https` URLs; everything else
///    (`mailto:`, `javascript:`, scheme-relative fragments, bare
///    relative paths) is rejected
///
/// Classification runs before any network request, so the normalizer is
/// deliberately conservative: a href it cannot turn into an absolute
/// HTTP(S) URL is dropped rather than guessed at.
///
/// # Arguments
///
/// * `base` - The URL of the page the href was extracted from
/// * `href` - The raw href attribute value
///
/// # Returns
///
/// * `Some(Url)` - The absolute HTTP(S) URL
/// * `None` - The href was rejected
///
/// # Examples
///
/// ```
/// use url::Url;
/// use harvestman::url::normalize_href;
///
/// let base = Url::parse("https://example.com/index").unwrap();
///
/// let url = normalize_href(&base, "/a.csv").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/a.csv");
///
/// assert!(normalize_href(&base, "#top").is_none());
/// assert!(normalize_href(&base, "mailto:admin@example.com").is_none());
/// ```
pub fn normalize_href(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    // In-page anchor, never a new resource
    if href.starts_with('#') {
        return None;
    }

    let resolved = if href.starts_with('/') {
        base.join(href).ok()?
    } else {
        Url::parse(href).ok()?
    };

    match resolved.scheme() {
        "http" | "https" => Some(resolved),
        _ => None,
    }
}

/// Deduplicates a sequence of URL strings, preserving first-seen order
///
/// Uniqueness is by exact string match; no canonicalization is applied
/// beyond what [`normalize_href`] already did.
pub fn dedupe_urls<I, S>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();

    for url in urls {
        let url = url.into();
        if seen.insert(url.clone()) {
            out.push(url);
        }
    }

    out
}
