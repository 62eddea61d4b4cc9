use scraper::{Html, Selector};
use url::Url;

/// Extract the outbound links of an HTML document, resolved against the
/// document's origin and deduplicated in document order.
///
/// Relative hrefs resolve against `scheme://host[:port]/`, not against the
/// page path. Fragments are stripped from every resolved URL; anchors,
/// `mailto:`, `tel:`, `javascript:` and non-http(s) schemes are skipped.
/// Malformed markup degrades to whatever links the parser can still see,
/// never to an error.
pub fn extract_links(html: &str, page_url: &Url) -> Vec<Url> {
    let mut links = Vec::new();
    let mut seen = std::collections::HashSet::new();

    let Some(base) = origin_base(page_url) else {
        return links;
    };

    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").unwrap();

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href")
            && let Some(resolved) = resolve_href(&base, href)
            && seen.insert(resolved.to_string())
        {
            links.push(resolved);
        }
    }

    links
}

/// Reduce a page URL to its origin root, the base every relative href on
/// that page resolves against.
fn origin_base(page_url: &Url) -> Option<Url> {
    if page_url.cannot_be_a_base() {
        return None;
    }
    let mut base = page_url.clone();
    base.set_path("/");
    base.set_query(None);
    base.set_fragment(None);
    Some(base)
}

fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    let mut resolved = base.join(href).ok()?;
    resolved.set_fragment(None);

    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }

    Some(resolved)
}
