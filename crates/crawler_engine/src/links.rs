use std::collections::HashSet;

use scraper::{Html, Selector};
use url::Url;

use crawler_core::LinkExtractor;

use crate::decode::decode_html;

/// Scheme prefix a resolved link must start with; covers `https` too.
const LINK_PREFIX: &str = "http";
const ANCHOR_SELECTOR: &str = "a[href]";

/// Pulls every `<a href>` out of a page with `scraper` (html5ever), which
/// recovers from malformed markup and never touches the network.
#[derive(Debug, Clone)]
pub struct ScraperLinkExtractor {
    anchors: Selector,
}

impl ScraperLinkExtractor {
    pub fn new() -> Self {
        Self {
            anchors: Selector::parse(ANCHOR_SELECTOR).expect("anchor selector is valid CSS"),
        }
    }
}

impl Default for ScraperLinkExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkExtractor for ScraperLinkExtractor {
    /// Returns absolute `http`/`https` URLs in document order, without duplicates.
    fn extract(&self, html: &[u8], base_url: &str) -> Vec<String> {
        let base = Url::parse(base_url).ok();
        let text = decode_html(html);
        let document = Html::parse_document(&text);

        let mut seen = HashSet::new();
        let mut links = Vec::new();
        for element in document.select(&self.anchors) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Some(url) = resolve_url(href, base.as_ref()) else {
                continue;
            };
            let url: String = url.into();
            if url.starts_with(LINK_PREFIX) && seen.insert(url.clone()) {
                links.push(url);
            }
        }
        links
    }
}

/// Resolve `reference` against `base` per RFC 3986; absolute references
/// stand on their own when there is no usable base.
fn resolve_url(reference: &str, base: Option<&Url>) -> Option<Url> {
    let trimmed = reference.trim();
    match base {
        Some(base) => base.join(trimmed).ok(),
        None => Url::parse(trimmed).ok(),
    }
}
